//! `klondike`: play Klondike in the terminal.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use klondike_engine::{cli, DealSource, Game, GameConfig};

#[derive(Parser)]
#[command(name = "klondike")]
#[command(about = "Klondike solitaire, one card per draw")]
struct Args {
    /// Deal from this seed (reproducible)
    #[arg(long, conflicts_with = "pysol")]
    seed: Option<u64>,

    /// Deal a PySolFC game number, e.g. 12345 or ms12345
    #[arg(long)]
    pysol: Option<String>,

    /// Undo steps to keep (overrides KLONDIKE_UNDO_DEPTH)
    #[arg(long)]
    undo_depth: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli::log_filter(args.verbose))
        .with_writer(io::stderr)
        .init();

    let mut config = match GameConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(depth) = args.undo_depth {
        config.undo_depth = depth;
    }

    let source = match (args.seed, args.pysol) {
        (Some(seed), _) => DealSource::Seeded(seed),
        (None, Some(number)) => DealSource::Pysol(number),
        (None, None) => DealSource::Random,
    };

    let mut game = match Game::new(&source, config) {
        Ok(game) => game,
        Err(e) => {
            error!("cannot deal {source}: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(deal = game.deal_label(), "starting");

    let stdin = io::stdin();
    if let Err(e) = cli::run(&mut game, stdin.lock(), io::stdout().lock()) {
        error!("i/o error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
