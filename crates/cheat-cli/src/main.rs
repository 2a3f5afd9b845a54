#![deny(warnings)]

use clap::Parser;

use cheat_cli::app::{self, GameOptions};

/// Bluffing card game at the console, with pluggable table strategies.
#[derive(Debug, Parser)]
#[command(name = "cheat", author, version, about)]
struct Cli {
    /// Number of seats at the table (2-8).
    #[arg(short, long, value_name = "COUNT")]
    players: Option<usize>,

    /// Strategy for one seat: basic, thinker, master, human or random.
    /// Repeat the flag once per seat, in table order.
    #[arg(short, long = "strategy", value_name = "KIND")]
    strategy: Vec<String>,

    /// Seed for the deal and every in-game choice; random when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Run without pacing prompts. The table must be all-AI.
    #[arg(long)]
    auto: bool,

    /// Stop an unfinished game after this many turns.
    #[arg(long, value_name = "TURNS", default_value_t = 10_000)]
    max_turns: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let options = GameOptions {
        players: cli.players,
        strategies: cli.strategy,
        seed: cli.seed,
        auto: cli.auto,
        max_turns: cli.max_turns,
    };
    app::run(&options)
}

/// Game output goes to stdout; diagnostics stay on stderr behind `RUST_LOG`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
