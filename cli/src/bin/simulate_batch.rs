use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use engine::api::{self, TrialSummary};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "simulate-batch")]
#[command(about = "Monte Carlo: run one scenario over many consecutive seeds")]
struct Args {
    /// Path to a JSON or YAML scenario file
    #[arg(long, conflicts_with = "builtin")]
    file: Option<PathBuf>,

    /// Name of a built-in scenario
    #[arg(long, default_value = "skirmish")]
    builtin: String,

    /// Number of trials (trial i runs with seed + i)
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Override the scenario base seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the round cap per trial
    #[arg(long)]
    round_cap: Option<u32>,

    /// Emit the summary as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct TeamLine {
    team: String,
    wins: u32,
    rate: f64,
}

#[derive(Serialize)]
struct BatchReport {
    trials: u32,
    teams: Vec<TeamLine>,
    draws: u32,
    stalemates: u32,
    average_rounds: f64,
}

impl BatchReport {
    fn from_summary(summary: &TrialSummary) -> Self {
        let trials = summary.trials.max(1);
        Self {
            trials: summary.trials,
            teams: summary
                .wins
                .iter()
                .map(|(team, &wins)| TeamLine {
                    team: team.clone(),
                    wins,
                    rate: f64::from(wins) / f64::from(trials),
                })
                .collect(),
            draws: summary.draws,
            stalemates: summary.stalemates,
            average_rounds: summary.average_rounds(),
        }
    }
}

fn main() -> Result<()> {
    engine::init_tracing();
    let args = Args::parse();

    let mut cfg = match &args.file {
        Some(path) => api::load_scenario(path)?,
        None => api::load_builtin(&args.builtin)?,
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(cap) = args.round_cap {
        cfg.round_cap = cap;
    }

    let summary = api::run_trials(&cfg, args.trials)?;
    let report = BatchReport::from_summary(&summary);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} trials from seed {}", report.trials, cfg.seed);
    for line in &report.teams {
        println!("  {:<20} {:>6} wins  ({:.1}%)", line.team, line.wins, line.rate * 100.0);
    }
    println!("  {:<20} {:>6}", "draws", report.draws);
    println!("  {:<20} {:>6}", "stalemates", report.stalemates);
    println!("  average rounds: {:.1}", report.average_rounds);
    Ok(())
}
