use std::iter::Sum;
use std::ops::Add;

use crate::error::AssignError;
use crate::model::entity::LegIndex;
use crate::model::{Assignment, Problem};

pub type Encoded = i64;

/// `(rank, time)` compared and summed termwise; rank dominates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LexCost {
    pub rank: i64,
    pub time: i64,
}

impl LexCost {
    pub fn new(rank: i64, time: i64) -> LexCost {
        LexCost { rank, time }
    }
}

impl Add for LexCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        LexCost { rank: self.rank + rhs.rank, time: self.time + rhs.time }
    }
}

impl Sum for LexCost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(LexCost::default(), Add::add)
    }
}

/// Packs a [`LexCost`] into one integer, `rank * big + time`, such that sums
/// of up to `n` encoded costs order exactly like the summed tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEncoding {
    pub big: Encoded,
    pub inf: Encoded,
}

impl CostEncoding {
    /// `big` is the smallest power of ten exceeding `2 * n * max_time`, and
    /// `inf = 2 * n^2 * big` outweighs any sum of `n` unmasked costs.
    pub fn derive(n: usize, max_time: i64) -> Result<CostEncoding, AssignError> {
        let n = i64::try_from(n).map_err(|_| AssignError::ScaleOverflow)?;
        let bound = n
            .checked_mul(2)
            .and_then(|b| b.checked_mul(max_time))
            .ok_or(AssignError::ScaleOverflow)?;
        let mut big: Encoded = 1;
        while big <= bound {
            big = big.checked_mul(10).ok_or(AssignError::ScaleOverflow)?;
        }
        let inf = n
            .checked_mul(n)
            .and_then(|nn| nn.checked_mul(2))
            .and_then(|nn| nn.checked_mul(big))
            .ok_or(AssignError::ScaleOverflow)?;
        // a solve sums n entries, and the potentials in the solver may need
        // a few times that
        inf.checked_mul(n.max(1))
            .and_then(|total| total.checked_mul(4))
            .ok_or(AssignError::ScaleOverflow)?;
        Ok(CostEncoding { big, inf })
    }

    pub fn encode(&self, cost: LexCost) -> Encoded {
        cost.rank * self.big + cost.time
    }

    /// Also valid for totals of up to `n` unmasked costs.
    pub fn decode(&self, value: Encoded) -> LexCost {
        LexCost { rank: value / self.big, time: value % self.big }
    }

    pub fn is_feasible(&self, total: Encoded) -> bool {
        total < self.inf
    }
}

/// Base cost of every (runner, leg) pair. Rows follow the problem's runner
/// order, columns follow the race's leg order.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    costs: Vec<Vec<LexCost>>,
    encoded: Vec<Vec<Encoded>>,
    encoding: CostEncoding,
}

impl CostMatrix {
    pub fn build(problem: &Problem) -> Result<CostMatrix, AssignError> {
        let n = problem.runners.len();
        if n != problem.n_legs() {
            return Err(AssignError::RunnerLegMismatch { runners: n, legs: problem.n_legs() });
        }

        let costs = problem.runners.iter().map(|runner| {
            problem.race.legs.iter().enumerate().map(|(leg, course)| {
                let rank = runner.rank_of(leg).ok_or_else(|| AssignError::MissingRanking {
                    runner: runner.name.clone(),
                    leg: leg + 1,
                })?;
                let time = runner.seconds_for(course.distance()).floor();
                if !time.is_finite() || time < 0.0 || time >= i64::MAX as f64 {
                    return Err(AssignError::ScaleOverflow);
                }
                Ok(LexCost::new(rank as i64, time as i64))
            }).collect::<Result<Vec<_>, _>>()
        }).collect::<Result<Vec<_>, _>>()?;

        let max_time = costs.iter().flatten().map(|cost| cost.time).max().unwrap_or(0);
        let encoding = CostEncoding::derive(n, max_time)?;
        let encoded = costs.iter()
            .map(|row| row.iter().map(|cost| encoding.encode(*cost)).collect())
            .collect();
        Ok(CostMatrix { costs, encoded, encoding })
    }

    pub fn size(&self) -> usize {
        self.costs.len()
    }

    pub fn encoding(&self) -> CostEncoding {
        self.encoding
    }

    pub fn cost(&self, runner: usize, leg: LegIndex) -> LexCost {
        self.costs[runner][leg]
    }

    pub fn encoded(&self) -> &[Vec<Encoded>] {
        &self.encoded
    }

    /// Copy of the encoded matrix with `inf` wherever `barred(runner, leg)`.
    pub fn masked<F>(&self, barred: F) -> Vec<Vec<Encoded>>
    where
        F: Fn(usize, LegIndex) -> bool,
    {
        self.encoded.iter().enumerate().map(|(runner, row)| {
            row.iter().enumerate().map(|(leg, value)| {
                if barred(runner, leg) { self.encoding.inf } else { *value }
            }).collect()
        }).collect()
    }
}

/// Total `(rank, time)` of an assignment, or `None` if it names a runner
/// outside the problem or leaves a leg uncovered.
pub fn assignment_cost(problem: &Problem, assignment: &Assignment) -> Option<LexCost> {
    if assignment.legs.len() != problem.n_legs() {
        return None;
    }
    assignment.iter().map(|(leg, name)| {
        let runner = problem.runner(name)?;
        let time = runner.seconds_for(problem.race.legs[leg].distance()).floor() as i64;
        Some(LexCost::new(runner.rank_of(leg)? as i64, time))
    }).sum()
}
