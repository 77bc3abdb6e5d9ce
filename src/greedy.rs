//! Greedy baselines, kept for comparison with the optimal search. Neither
//! looks at constraint groups.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::error::AssignError;
use crate::model::entity::{LegIndex, Runner, RunnerName};
use crate::model::{Assignment, Problem};

fn by_pace(problem: &Problem) -> Vec<&Runner> {
    problem.runners.iter()
        .sorted_by(|a, b| a.pace.total_cmp(&b.pace))
        .collect()
}

/// Fastest runner first, each takes their most preferred leg still open.
pub fn greedy_by_pace(problem: &Problem) -> Result<Assignment, AssignError> {
    problem.validate()?;
    let mut open: BTreeSet<LegIndex> = (0..problem.n_legs()).collect();
    let mut legs: Vec<RunnerName> = vec![String::new(); problem.n_legs()];
    for runner in by_pace(problem) {
        let leg = runner.ranking.iter()
            .map(|number| number - 1)
            .find(|leg| open.contains(leg))
            .ok_or(AssignError::RunnerLegMismatch { runners: problem.runners.len(), legs: problem.n_legs() })?;
        open.remove(&leg);
        legs[leg] = runner.name.clone();
    }
    Ok(Assignment::new(legs))
}

/// Fastest runner on the longest leg, second fastest on the second longest,
/// and so on. Minimizes total time.
pub fn greedy_by_time(problem: &Problem) -> Result<Assignment, AssignError> {
    problem.validate()?;
    let longest_first = problem.race.legs.iter()
        .enumerate()
        .sorted_by(|(_, a), (_, b)| b.distance().total_cmp(&a.distance()))
        .map(|(leg, _)| leg);
    let mut legs: Vec<RunnerName> = vec![String::new(); problem.n_legs()];
    for (runner, leg) in by_pace(problem).into_iter().zip(longest_first) {
        legs[leg] = runner.name.clone();
    }
    Ok(Assignment::new(legs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::race::{Leg, Race};

    fn problem() -> Problem {
        let race = Race {
            legs: vec![Leg::new(vec![2.0]), Leg::new(vec![4.0, 2.0]), Leg::new(vec![3.0])],
            groups: vec![],
        };
        let runners = vec![
            Runner::new("mid", 500.0, vec![2, 1, 3]),
            Runner::new("slow", 600.0, vec![2, 3, 1]),
            Runner::new("fast", 400.0, vec![2, 3, 1]),
        ];
        Problem::new(race, runners, vec![])
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn by_pace_lets_faster_runners_choose_first() {
        let assignment = greedy_by_pace(&problem()).unwrap();
        // fast takes 2, mid falls back to 1, slow gets 3
        assert_eq!(assignment.legs, names(&["mid", "fast", "slow"]));
    }

    #[test]
    fn by_time_puts_fastest_on_longest() {
        let assignment = greedy_by_time(&problem()).unwrap();
        assert_eq!(assignment.legs, names(&["slow", "fast", "mid"]));
    }

    #[test]
    fn equal_paces_keep_listing_order() {
        let mut problem = problem();
        for runner in &mut problem.runners {
            runner.pace = 450.0;
        }
        let assignment = greedy_by_time(&problem).unwrap();
        assert_eq!(assignment.legs, names(&["fast", "mid", "slow"]));
    }

    #[test]
    fn invalid_problem_is_refused() {
        let mut problem = problem();
        problem.runners.pop();
        assert!(greedy_by_pace(&problem).is_err());
        assert!(greedy_by_time(&problem).is_err());
    }
}
