use std::path::PathBuf;

use clap::Parser;

use cheat_bench::config::{BenchConfig, ResolvedOutputs};
use cheat_bench::logging::init_logging;
use cheat_bench::runner::SeriesRunner;

/// Benchmarking harness for Cheat strategies.
#[derive(Debug, Parser)]
#[command(
    name = "cheat-bench",
    author,
    version,
    about = "Deterministic Cheat series harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/cheat.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for the series.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let games = config.games.count;

    println!("Loaded configuration '{run_id}' with {agent_count} agents ({games} games)");

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SeriesRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: series execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Series complete for '{run_id}': {} games → {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path().display());
    }

    Ok(())
}
