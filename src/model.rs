use std::collections::HashSet;

use crate::error::AssignError;

pub mod entity {
    pub type RunnerName = String;
    /// Leg number as written in race descriptions, starting at 1.
    pub type LegNumber = usize;
    /// Position of a leg within the race, starting at 0.
    pub type LegIndex = usize;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Runner {
        pub name: RunnerName,
        /// Seconds per mile.
        pub pace: f64,
        /// Leg numbers, most preferred first.
        pub ranking: Vec<LegNumber>,
    }

    impl Runner {
        pub fn new(name: impl Into<RunnerName>, pace: f64, ranking: Vec<LegNumber>) -> Runner {
            Runner { name: name.into(), pace, ranking }
        }

        /// 0 for the most preferred leg.
        pub fn rank_of(&self, leg: LegIndex) -> Option<usize> {
            self.ranking.iter().position(|number| *number == leg + 1)
        }

        pub fn seconds_for(&self, miles: f64) -> f64 {
            self.pace * miles
        }
    }
}


pub mod race {
    use std::collections::BTreeSet;
    use super::entity::{LegIndex, LegNumber};

    #[derive(Debug, Clone, PartialEq)]
    pub struct Leg {
        pub segments: Vec<f64>,
    }

    impl Leg {
        pub fn new(segments: Vec<f64>) -> Leg {
            Leg { segments }
        }
        pub fn distance(&self) -> f64 {
            self.segments.iter().sum()
        }
    }

    /// Legs that one constrained cluster of runners may occupy together.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RaceGroup {
        pub legs: BTreeSet<LegNumber>,
    }

    impl RaceGroup {
        pub fn new(legs: impl IntoIterator<Item = LegNumber>) -> RaceGroup {
            RaceGroup { legs: legs.into_iter().collect() }
        }
        pub fn allows(&self, leg: LegIndex) -> bool {
            self.legs.contains(&(leg + 1))
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Race {
        pub legs: Vec<Leg>,
        pub groups: Vec<RaceGroup>,
    }
}

pub mod condition {
    use super::entity::RunnerName;

    /// Runners that must end up inside a single race-group.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ConstraintGroup(pub Vec<RunnerName>);

    impl<S: Into<RunnerName>> FromIterator<S> for ConstraintGroup {
        fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
            ConstraintGroup(iter.into_iter().map(Into::into).collect())
        }
    }
}

use self::condition::ConstraintGroup;
use self::entity::{LegIndex, Runner, RunnerName};
use self::race::Race;

/// Everything one optimization run reads. Runner order is the row order of
/// every cost matrix built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub race: Race,
    pub runners: Vec<Runner>,
    pub groups: Vec<ConstraintGroup>,
}

impl Problem {
    pub fn new(race: Race, runners: Vec<Runner>, groups: Vec<ConstraintGroup>) -> Problem {
        Problem { race, runners, groups }
    }

    pub fn n_legs(&self) -> usize {
        self.race.legs.len()
    }

    pub fn runner(&self, name: &str) -> Option<&Runner> {
        self.runners.iter().find(|runner| runner.name == name)
    }

    pub fn validate(&self) -> Result<(), AssignError> {
        let n_legs = self.n_legs();
        if self.runners.len() != n_legs {
            return Err(AssignError::RunnerLegMismatch { runners: self.runners.len(), legs: n_legs });
        }

        for (index, leg) in self.race.legs.iter().enumerate() {
            if leg.segments.is_empty() || leg.segments.iter().any(|d| !d.is_finite() || *d <= 0.0) {
                return Err(AssignError::InvalidDistance { leg: index + 1 });
            }
        }

        let mut names = HashSet::new();
        for runner in &self.runners {
            if !names.insert(runner.name.as_str()) {
                return Err(AssignError::DuplicateRunner(runner.name.clone()));
            }
            if !runner.pace.is_finite() || runner.pace <= 0.0 {
                return Err(AssignError::InvalidPace { runner: runner.name.clone() });
            }
            let mut seen = HashSet::new();
            for number in &runner.ranking {
                if *number == 0 || *number > n_legs || !seen.insert(*number) {
                    return Err(AssignError::InvalidRanking { runner: runner.name.clone(), leg: *number });
                }
            }
            if let Some(leg) = (0..n_legs).find(|leg| runner.rank_of(*leg).is_none()) {
                return Err(AssignError::MissingRanking { runner: runner.name.clone(), leg: leg + 1 });
            }
        }

        for group in &self.race.groups {
            if let Some(leg) = group.legs.iter().find(|number| **number == 0 || **number > n_legs) {
                return Err(AssignError::UnknownLeg { leg: *leg });
            }
        }

        for ConstraintGroup(members) in &self.groups {
            if let Some(name) = members.iter().find(|name| !names.contains(name.as_str())) {
                return Err(AssignError::UnknownRunner(name.clone()));
            }
        }
        Ok(())
    }
}

/// One runner per leg, in race order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub legs: Vec<RunnerName>,
}

impl Assignment {
    pub fn new(legs: Vec<RunnerName>) -> Assignment {
        Assignment { legs }
    }

    pub fn runner_on(&self, leg: LegIndex) -> Option<&str> {
        self.legs.get(leg).map(String::as_str)
    }

    pub fn leg_of(&self, name: &str) -> Option<LegIndex> {
        self.legs.iter().position(|runner| runner == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LegIndex, &str)> {
        self.legs.iter().enumerate().map(|(leg, name)| (leg, name.as_str()))
    }
}
