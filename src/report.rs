use std::fmt;

use itertools::Itertools;

use crate::error::AssignError;
use crate::model::entity::{LegNumber, RunnerName};
use crate::model::{Assignment, Problem};

const MIN_NAME_WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct LegRow {
    pub leg: LegNumber,
    pub runner: RunnerName,
    /// 1 for the runner's favourite leg.
    pub rank: usize,
    pub pace: f64,
    pub segments: Vec<f64>,
    pub distance: f64,
    /// Minutes.
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub distance: f64,
    /// Minutes.
    pub time: f64,
    pub rank: usize,
}

impl Totals {
    /// Minutes per mile.
    pub fn average_pace(&self) -> Option<f64> {
        (self.distance > 0.0).then(|| self.time / self.distance)
    }
}

/// Text table of an assignment: two lines per leg followed by race totals.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentReport {
    pub rows: Vec<LegRow>,
    pub totals: Totals,
    pub summary_only: bool,
}

impl AssignmentReport {
    pub fn new(problem: &Problem, assignment: &Assignment) -> Result<AssignmentReport, AssignError> {
        let rows = assignment.iter().zip(&problem.race.legs).map(|((leg, name), course)| {
            let runner = problem.runner(name).ok_or_else(|| AssignError::UnknownRunner(name.to_string()))?;
            let rank = runner.rank_of(leg).ok_or_else(|| AssignError::MissingRanking {
                runner: runner.name.clone(),
                leg: leg + 1,
            })?;
            let distance = course.distance();
            Ok(LegRow {
                leg: leg + 1,
                runner: runner.name.clone(),
                rank: rank + 1,
                pace: runner.pace,
                segments: course.segments.clone(),
                distance,
                time: runner.seconds_for(distance) / 60.0,
            })
        }).collect::<Result<Vec<_>, AssignError>>()?;

        let totals = Totals {
            distance: rows.iter().map(|row| row.distance).sum(),
            time: rows.iter().map(|row| row.time).sum(),
            rank: rows.iter().map(|row| row.rank).sum(),
        };
        Ok(AssignmentReport { rows, totals, summary_only: false })
    }

    pub fn summary(mut self) -> AssignmentReport {
        self.summary_only = true;
        self
    }

    fn name_width(&self) -> usize {
        self.rows.iter().map(|row| row.runner.len()).max().unwrap_or(0).max(MIN_NAME_WIDTH)
    }
}

/// `m:ss`
fn clock(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

impl fmt::Display for AssignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.name_width();
        if !self.summary_only {
            writeln!(f, "Num | {:<w$} | Legs", "Runner")?;
            writeln!(f, "----+-{}-+--------------------------", "-".repeat(w))?;
            for (i, row) in self.rows.iter().enumerate() {
                let distances = row.segments.iter().map(|d| format!("{d:4.1} mi")).join(" + ");
                let times = row.segments.iter().map(|d| format!("{:3.0} min", d * row.pace / 60.0)).join(" + ");
                writeln!(f, "{:3} | {:<w$} | {} = {:4.1} mi", row.leg, row.runner, distances, row.distance)?;
                writeln!(f, "#{:2} | {:<w$} | {} = {:3.0} min", row.rank, clock(row.pace.round() as i64), times, row.time)?;
                if i + 1 != self.rows.len() {
                    writeln!(f, "    | {:w$} |", "")?;
                }
            }
            writeln!(f)?;
            writeln!(f, "Total distance: {:.1} mi", self.totals.distance)?;
        }
        let minutes = self.totals.time as i64;
        writeln!(f, "Total time: {} hr {} min", minutes / 60, minutes % 60)?;
        if let Some(pace) = self.totals.average_pace() {
            writeln!(f, "Average pace: {} min/mi", clock((pace * 60.0) as i64))?;
        }
        write!(f, "Sum of ranks: {}", self.totals.rank)
    }
}
