use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use encoding_rs::Encoding;
use engine::api::{self, ScenarioConfig, ScenarioFormat};
use engine::content::builtin_scenarios;

#[derive(Subcommand)]
enum Cmd {
    /// Run a battle scenario and print the event log
    Run {
        /// Path to a JSON or YAML scenario file
        #[arg(long, conflicts_with = "builtin")]
        file: Option<PathBuf>,

        /// Name of a built-in scenario
        #[arg(long, default_value = "duel")]
        builtin: String,

        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the round cap
        #[arg(long)]
        round_cap: Option<u32>,

        /// Emit the full report as JSON instead of log lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List built-in scenarios
    Scenarios,
    /// Print a built-in scenario definition (stdout)
    Dump {
        #[arg(long, default_value = "duel")]
        builtin: String,
    },
}

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Deterministic line-combat simulator")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn main() -> Result<()> {
    engine::init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run {
            file,
            builtin,
            seed,
            round_cap,
            json,
        } => {
            let mut cfg = match file {
                Some(path) => read_scenario(&path)?,
                None => api::load_builtin(&builtin)?,
            };
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if let Some(cap) = round_cap {
                cfg.round_cap = cap;
            }
            let report = api::run_scenario(&cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for event in &report.events {
                    println!("{event}");
                }
                println!();
                println!(
                    "seed {} resolved in {} rounds: {}",
                    report.seed, report.rounds, report.verdict
                );
            }
        }
        Cmd::Scenarios => {
            let mut names: Vec<_> = builtin_scenarios().into_keys().collect();
            names.sort_unstable();
            for name in names {
                println!("{name}");
            }
        }
        Cmd::Dump { builtin } => {
            let Some(text) = builtin_scenarios().get(builtin.as_str()).copied() else {
                bail!("unknown built-in scenario '{builtin}'");
            };
            print!("{text}");
        }
    }
    Ok(())
}

/// Read a scenario file, sniffing the encoding from the BOM so that files
/// saved by Windows editors still parse.
fn read_scenario(path: &Path) -> Result<ScenarioConfig> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read scenario: {}", path.display()))?;
    let encoding = Encoding::for_bom(&bytes)
        .map(|(encoding, _)| encoding)
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        bail!("scenario file is not valid {}: {}", encoding.name(), path.display());
    }
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => ScenarioFormat::Yaml,
        _ => ScenarioFormat::Json,
    };
    api::parse_scenario(&text, format)
        .with_context(|| format!("failed to parse scenario: {}", path.display()))
}
