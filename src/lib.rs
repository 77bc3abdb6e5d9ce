//! Assigns relay runners to race legs.
//!
//! Runners who must stay together are kept inside one race-group, the sum of
//! preference ranks is minimized, and among equally happy assignments the
//! total time is minimized. Greedy baselines and a text report are included
//! for comparison.

pub mod config;
pub mod cost;
pub mod error;
pub mod greedy;
pub mod grouping;
pub mod hungarian;
pub mod model;
pub mod report;
pub mod search;

pub use config::RaceConfig;
pub use cost::{CostEncoding, CostMatrix, LexCost};
pub use error::{AssignError, ConfigError};
pub use greedy::{greedy_by_pace, greedy_by_time};
pub use grouping::{merge_constraint_groups, DisjointSet};
pub use model::{Assignment, Problem};
pub use report::AssignmentReport;
pub use search::{optimal_assignment, SearchOutcome, SearchParams};
