//! Race descriptions in YAML.
//!
//! ```
//! use relay_assign::config::RaceConfig;
//!
//! let config = RaceConfig::from_yaml_str(r#"
//! race:
//!   legs: [[3.0], [2.5, 2.5]]
//!   groups: [[1], [2]]
//! runners:
//!   A: { pace: 480, ranking: [1, 2] }
//!   B: { pace: 600, ranking: [2, 1] }
//! groups: [[A, B]]
//! "#).unwrap();
//!
//! let problem = config.into_problem().unwrap();
//! assert_eq!(problem.runners[1].name, "B");
//! assert_eq!(problem.race.legs[1].distance(), 5.0);
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::condition::ConstraintGroup;
use crate::model::entity::{LegNumber, Runner, RunnerName};
use crate::model::race::{Leg, Race, RaceGroup};
use crate::model::Problem;
use crate::search::{SearchParams, DEFAULT_MAX_CANDIDATES};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RaceConfig {
    pub race: RaceSection,

    /// Listing order is kept; it decides ties.
    pub runners: IndexMap<RunnerName, RunnerConfig>,

    /// Constraint groups, possibly overlapping.
    #[serde(default)]
    pub groups: Vec<Vec<RunnerName>>,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RaceSection {
    /// Segment distances of each leg, in miles.
    pub legs: Vec<Vec<f64>>,

    /// Race-groups as 1-based leg numbers.
    #[serde(default)]
    pub groups: Vec<Vec<LegNumber>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Seconds per mile.
    pub pace: f64,
    pub ranking: Vec<LegNumber>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchConfig {
    /// `null` removes the ceiling.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: Option<usize>,

    #[serde(default)]
    pub parallel: bool,
}

fn default_max_candidates() -> Option<usize> {
    Some(DEFAULT_MAX_CANDIDATES)
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig { max_candidates: default_max_candidates(), parallel: false }
    }
}

impl From<&SearchConfig> for SearchParams {
    fn from(config: &SearchConfig) -> Self {
        SearchParams { max_candidates: config.max_candidates, parallel: config.parallel }
    }
}

impl RaceConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml_file(path)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams::from(&self.search)
    }

    /// Builds the validated problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the description is inconsistent,
    /// e.g. runner and leg counts differ or a ranking misses a leg.
    pub fn into_problem(self) -> Result<Problem, ConfigError> {
        let race = Race {
            legs: self.race.legs.into_iter().map(Leg::new).collect(),
            groups: self.race.groups.into_iter().map(RaceGroup::new).collect(),
        };
        let runners = self.runners.into_iter()
            .map(|(name, runner)| Runner::new(name, runner.pace, runner.ranking))
            .collect();
        let groups = self.groups.into_iter().map(ConstraintGroup).collect();
        let problem = Problem::new(race, runners, groups);
        problem.validate()?;
        Ok(problem)
    }
}
