use thiserror::Error;

use crate::model::entity::{LegNumber, RunnerName};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssignError {
    #[error("{runners} runners cannot fill {legs} legs")]
    RunnerLegMismatch { runners: usize, legs: usize },
    #[error("runner {runner} does not rank leg {leg}")]
    MissingRanking { runner: RunnerName, leg: LegNumber },
    #[error("runner {runner} ranks leg {leg} more than once or it is not part of the race")]
    InvalidRanking { runner: RunnerName, leg: LegNumber },
    #[error("runner {0} is listed more than once")]
    DuplicateRunner(RunnerName),
    #[error("unknown runner {0}")]
    UnknownRunner(RunnerName),
    #[error("race-group refers to leg {leg}, which is not part of the race")]
    UnknownLeg { leg: LegNumber },
    #[error("runner {runner} must have a positive pace")]
    InvalidPace { runner: RunnerName },
    #[error("leg {leg} must consist of positive distances")]
    InvalidDistance { leg: LegNumber },
    #[error("pace and distance values are too large to encode costs")]
    ScaleOverflow,
    #[error("{race_groups}^{merged_groups} group placements exceed the limit of {limit}")]
    CandidateLimit { race_groups: usize, merged_groups: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] AssignError),
}
