use std::collections::BTreeSet;

use itertools::Itertools;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use relay_assign::cost::assignment_cost;
use relay_assign::model::condition::ConstraintGroup;
use relay_assign::model::entity::Runner;
use relay_assign::model::race::{Leg, Race, RaceGroup};
use relay_assign::{
    merge_constraint_groups, optimal_assignment, Assignment, LexCost, Problem, RaceConfig,
    SearchOutcome, SearchParams,
};

fn two_runner_problem(groups: Vec<ConstraintGroup>, race_groups: Vec<RaceGroup>) -> Problem {
    let race = Race { legs: vec![Leg::new(vec![3.0]), Leg::new(vec![5.0])], groups: race_groups };
    let runners = vec![Runner::new("A", 480.0, vec![1, 2]), Runner::new("B", 600.0, vec![2, 1])];
    Problem::new(race, runners, groups)
}

#[test]
fn each_runner_gets_their_favourite_leg() {
    let problem = two_runner_problem(vec![], vec![]);
    let outcome = optimal_assignment(&problem, &SearchParams::default()).unwrap();
    assert_eq!(outcome, SearchOutcome::Assigned(Assignment::new(vec!["A".into(), "B".into()])));
    let cost = assignment_cost(&problem, outcome.assignment().unwrap()).unwrap();
    assert_eq!(cost, LexCost::new(0, 1440 + 3000));
}

#[test]
fn pair_in_a_single_leg_race_group_is_infeasible() {
    let group: ConstraintGroup = ["A", "B"].into_iter().collect();
    let problem = two_runner_problem(vec![group], vec![RaceGroup::new([1])]);
    let outcome = optimal_assignment(&problem, &SearchParams::default()).unwrap();
    assert_eq!(outcome, SearchOutcome::Infeasible);
}

#[test]
fn yaml_description_end_to_end() {
    let config = RaceConfig::from_yaml_str(
        r#"
race:
  legs: [[3.1], [2.0, 2.5], [6.0], [3.3], [1.5, 1.5]]
  groups: [[1, 2], [3, 4, 5]]
runners:
  Ann: { pace: 450, ranking: [3, 1, 2, 4, 5] }
  Bob: { pace: 500, ranking: [3, 4, 1, 2, 5] }
  Cat: { pace: 540, ranking: [1, 2, 3, 4, 5] }
  Dan: { pace: 600, ranking: [5, 4, 3, 2, 1] }
  Eve: { pace: 660, ranking: [2, 5, 1, 4, 3] }
groups: [[Ann, Cat], [Cat, Eve]]
"#,
    )
    .unwrap();
    let params = config.search_params();
    let problem = config.into_problem().unwrap();
    let outcome = optimal_assignment(&problem, &params).unwrap();
    let assignment = outcome.assignment().expect("feasible");
    assert_bijection(&problem, assignment);
    assert_groups_intact(&problem, assignment);
    // Ann, Cat and Eve can only share legs 3-5, leaving 1-2 to Bob and Dan
    let trio: BTreeSet<_> = ["Ann", "Cat", "Eve"].iter().map(|name| assignment.leg_of(name).unwrap()).collect();
    assert_eq!(trio, BTreeSet::from([2, 3, 4]));
    assert_eq!(Some(brute_force(&problem)), assignment_cost(&problem, assignment));
}

fn assert_bijection(problem: &Problem, assignment: &Assignment) {
    assert_eq!(assignment.legs.len(), problem.n_legs());
    let names: BTreeSet<_> = assignment.legs.iter().collect();
    let expected: BTreeSet<_> = problem.runners.iter().map(|runner| &runner.name).collect();
    assert_eq!(names, expected);
}

fn groups_intact(problem: &Problem, merged: &[Vec<String>], assignment: &Assignment) -> bool {
    merged.iter().all(|group| {
        problem.race.groups.iter().any(|race_group| {
            group.iter().all(|name| assignment.leg_of(name).map_or(false, |leg| race_group.allows(leg)))
        })
    })
}

fn assert_groups_intact(problem: &Problem, assignment: &Assignment) {
    let merged = merge_constraint_groups(&problem.runners, &problem.groups).unwrap();
    assert!(groups_intact(problem, &merged, assignment), "group split in {assignment:?}");
}

/// Best cost over every legal permutation; `None` if no permutation is legal.
fn brute_force_opt(problem: &Problem) -> Option<LexCost> {
    let merged = merge_constraint_groups(&problem.runners, &problem.groups).unwrap();
    problem.runners.iter()
        .map(|runner| runner.name.clone())
        .permutations(problem.runners.len())
        .map(Assignment::new)
        .filter(|assignment| groups_intact(problem, &merged, assignment))
        .filter_map(|assignment| assignment_cost(problem, &assignment))
        .min()
}

fn brute_force(problem: &Problem) -> LexCost {
    brute_force_opt(problem).expect("some legal assignment")
}

fn random_problem(rng: &mut SmallRng) -> Problem {
    let n = rng.gen_range(1..=5);
    let legs = (0..n)
        .map(|_| {
            let segments = rng.gen_range(1..=2);
            Leg::new((0..segments).map(|_| f64::from(rng.gen_range(5..=60u32)) / 10.0).collect())
        })
        .collect();
    let race_groups = (0..rng.gen_range(1..=3))
        .map(|_| {
            let size = rng.gen_range(1..=n);
            let numbers: Vec<usize> = (1..=n).collect();
            RaceGroup::new(numbers.choose_multiple(rng, size).copied())
        })
        .collect();
    let runners = (0..n)
        .map(|i| {
            let mut ranking: Vec<usize> = (1..=n).collect();
            ranking.shuffle(rng);
            Runner::new(format!("r{i}"), f64::from(rng.gen_range(360..=720u32)), ranking)
        })
        .collect_vec();
    let groups = if n < 2 {
        vec![]
    } else {
        (0..rng.gen_range(0..=2))
            .map(|_| {
                let size = rng.gen_range(2..=n.min(3));
                runners.choose_multiple(rng, size).map(|runner| runner.name.clone()).collect()
            })
            .collect()
    };
    Problem::new(Race { legs, groups: race_groups }, runners, groups)
}

#[test]
fn matches_brute_force_on_random_instances() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut feasible = 0;
    for _ in 0..300 {
        let problem = random_problem(&mut rng);
        let outcome = optimal_assignment(&problem, &SearchParams::default()).unwrap();
        match (outcome, brute_force_opt(&problem)) {
            (SearchOutcome::Assigned(assignment), Some(best)) => {
                assert_bijection(&problem, &assignment);
                assert_groups_intact(&problem, &assignment);
                assert_eq!(assignment_cost(&problem, &assignment), Some(best), "{problem:?}");
                feasible += 1;
            }
            (SearchOutcome::Infeasible, None) => {}
            (outcome, best) => panic!("search gave {outcome:?}, brute force gave {best:?} for {problem:?}"),
        }
    }
    assert!(feasible > 0);
}

#[test]
fn parallel_search_is_reproducible() {
    let mut rng = SmallRng::seed_from_u64(7);
    let parallel = SearchParams { parallel: true, ..SearchParams::default() };
    for _ in 0..50 {
        let problem = random_problem(&mut rng);
        assert_eq!(
            optimal_assignment(&problem, &SearchParams::default()).unwrap(),
            optimal_assignment(&problem, &parallel).unwrap(),
        );
    }
}
