use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use relay_assign::{
    greedy_by_pace, greedy_by_time, optimal_assignment, Assignment, AssignmentReport, Problem,
    RaceConfig, SearchOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "relay-assign")]
#[command(about = "Assign relay runners to race legs")]
#[command(version)]
struct Cli {
    /// Path to the YAML race description
    config: PathBuf,
    #[arg(long, value_enum, default_value = "all", help = "Which assignment(s) to print")]
    strategy: Strategy,
    #[arg(long, help = "Only print totals for the optimal assignment")]
    summary: bool,
    #[arg(long, help = "Solve group placements in parallel")]
    parallel: bool,
    #[arg(long, help = "Refuse to search more group placements than this")]
    max_candidates: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    All,
    Optimal,
    GreedyPace,
    GreedyTime,
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive("relay_assign=info".parse().expect("valid directive"))
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_report(assignment: &Assignment, problem: &Problem, summary: bool) -> Result<()> {
    let report = AssignmentReport::new(problem, assignment)?;
    let report = if summary { report.summary() } else { report };
    println!("{report}");
    Ok(())
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = RaceConfig::load(&cli.config)
        .with_context(|| format!("cannot read {}", cli.config.display()))?;
    let mut params = config.search_params();
    params.parallel |= cli.parallel;
    if cli.max_candidates.is_some() {
        params.max_candidates = cli.max_candidates;
    }
    let problem = config.into_problem().context("invalid race description")?;

    if cli.strategy == Strategy::All {
        println!("=== Minimum Time ===\n");
        print_report(&greedy_by_time(&problem)?, &problem, true)?;
        println!("\n=== Greedy by Pace ===\n");
        print_report(&greedy_by_pace(&problem)?, &problem, true)?;
        println!("\n=== Optimal ===\n");
    }

    match cli.strategy {
        Strategy::GreedyTime => print_report(&greedy_by_time(&problem)?, &problem, cli.summary)?,
        Strategy::GreedyPace => print_report(&greedy_by_pace(&problem)?, &problem, cli.summary)?,
        Strategy::All | Strategy::Optimal => match optimal_assignment(&problem, &params)? {
            SearchOutcome::Assigned(assignment) => print_report(&assignment, &problem, cli.summary)?,
            SearchOutcome::Infeasible => {
                println!("no valid assignment under given constraints");
                return Ok(ExitCode::from(2));
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
