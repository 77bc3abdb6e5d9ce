use itertools::{Either, Itertools};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cost::{CostMatrix, Encoded};
use crate::error::AssignError;
use crate::grouping::merge_constraint_groups;
use crate::hungarian;
use crate::model::entity::RunnerName;
use crate::model::race::RaceGroup;
use crate::model::{Assignment, Problem};

pub type Index = usize;

/// `candidate[g]` is the race-group that merged group `g` is placed in.
pub type Candidate = Vec<Index>;

pub const DEFAULT_MAX_CANDIDATES: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Refuse to search when there are more group placements than this.
    pub max_candidates: Option<usize>,
    /// Solve candidates on the rayon pool. The result is the same as the
    /// sequential search.
    pub parallel: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams { max_candidates: Some(DEFAULT_MAX_CANDIDATES), parallel: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Assigned(Assignment),
    /// No placement of the merged groups admits a full assignment.
    Infeasible,
}

impl SearchOutcome {
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SearchOutcome::Assigned(assignment) => Some(assignment),
            SearchOutcome::Infeasible => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, SearchOutcome::Infeasible)
    }
}

/// Every mapping from merged groups to race-groups. The first group varies
/// fastest.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator {
    n_groups: usize,
    n_race_groups: usize,
}

impl CandidateGenerator {
    pub fn new(n_groups: usize, n_race_groups: usize) -> CandidateGenerator {
        CandidateGenerator { n_groups, n_race_groups }
    }

    /// `None` if the count does not fit in a `usize`.
    pub fn count(&self) -> Option<usize> {
        let exp = u32::try_from(self.n_groups).ok()?;
        self.n_race_groups.checked_pow(exp)
    }

    pub fn iter(&self) -> impl Iterator<Item = Candidate> {
        if self.n_groups == 0 {
            return Either::Left(std::iter::once(Vec::new()));
        }
        let n_race_groups = self.n_race_groups;
        Either::Right(
            (0..self.n_groups)
                .map(move |_| 0..n_race_groups)
                .multi_cartesian_product()
                .map(|mut candidate| {
                    candidate.reverse();
                    candidate
                })
        )
    }
}

/// Solved candidate; ordering by `(total, index)` picks the first minimum in
/// enumeration order.
#[derive(Debug, Clone)]
struct Solved {
    index: Index,
    total: Encoded,
    col_of_row: Vec<usize>,
}

struct State<'a> {
    matrix: &'a CostMatrix,
    race_groups: &'a [RaceGroup],
    // merged group of each runner row, if any
    group_of_row: Vec<Option<Index>>,
}

impl<'a> State<'a> {
    fn solve(&self, index: Index, candidate: &[Index]) -> Option<Solved> {
        let masked = self.matrix.masked(|row, leg| match self.group_of_row[row] {
            Some(group) => !self.race_groups[candidate[group]].allows(leg),
            None => false,
        });
        let matching = hungarian::solve(&masked);
        if !self.matrix.encoding().is_feasible(matching.total) {
            return None;
        }
        Some(Solved { index, total: matching.total, col_of_row: matching.col_of_row })
    }

    fn sequential(&self, candidates: impl Iterator<Item = Candidate>) -> Option<Solved> {
        let mut best: Option<Solved> = None;
        for (index, candidate) in candidates.enumerate() {
            let Some(solved) = self.solve(index, &candidate) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| solved.total < b.total) {
                let cost = self.matrix.encoding().decode(solved.total);
                debug!(event = "improved", candidate = index, rank = cost.rank, time = cost.time);
                best = Some(solved);
            }
        }
        best
    }

    fn parallel(&self, candidates: impl Iterator<Item = Candidate>) -> Option<Solved> {
        let candidates = candidates.collect_vec();
        candidates
            .par_iter()
            .enumerate()
            .filter_map(|(index, candidate)| self.solve(index, candidate))
            .min_by_key(|solved| (solved.total, solved.index))
    }
}

/// Finds the assignment that keeps every merged constraint group inside one
/// race-group, minimizes the summed rank and then the summed time.
///
/// Tries every placement of merged groups into race-groups and solves the
/// masked cost matrix exactly for each. Among placements reaching the same
/// minimum, the first one enumerated wins.
pub fn optimal_assignment(problem: &Problem, params: &SearchParams) -> Result<SearchOutcome, AssignError> {
    problem.validate()?;
    if problem.runners.is_empty() {
        return Ok(SearchOutcome::Assigned(Assignment::new(Vec::new())));
    }
    let merged = merge_constraint_groups(&problem.runners, &problem.groups)?;
    let n_race_groups = problem.race.groups.len();
    let generator = CandidateGenerator::new(merged.len(), n_race_groups);

    if let Some(limit) = params.max_candidates {
        if generator.count().map_or(true, |count| count > limit) {
            return Err(AssignError::CandidateLimit {
                race_groups: n_race_groups,
                merged_groups: merged.len(),
                limit,
            });
        }
    }

    let matrix = CostMatrix::build(problem)?;
    let group_of_row = problem.runners.iter()
        .map(|runner| merged.iter().position(|group| group.contains(&runner.name)))
        .collect();
    let state = State { matrix: &matrix, race_groups: &problem.race.groups, group_of_row };

    info!(
        event = "search_start",
        runners = problem.runners.len(),
        merged_groups = merged.len(),
        race_groups = n_race_groups,
        candidates = generator.count().unwrap_or(usize::MAX),
        parallel = params.parallel,
    );

    let best = if params.parallel {
        state.parallel(generator.iter())
    } else {
        state.sequential(generator.iter())
    };

    let Some(best) = best else {
        info!(event = "search_end", outcome = "infeasible");
        return Ok(SearchOutcome::Infeasible);
    };

    let cost = matrix.encoding().decode(best.total);
    info!(event = "search_end", outcome = "assigned", candidate = best.index, rank = cost.rank, time = cost.time);

    let mut legs: Vec<RunnerName> = vec![String::new(); problem.n_legs()];
    for (row, leg) in best.col_of_row.iter().enumerate() {
        legs[*leg] = problem.runners[row].name.clone();
    }
    Ok(SearchOutcome::Assigned(Assignment::new(legs)))
}
