use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error};

use revstats::batch::{self, BatchOptions};
use revstats::cli;
use revstats::store::ParquetStore;

/// Compute per-user study statistics from spaced-repetition review logs
#[derive(Parser)]
#[command(name = "revstats")]
#[command(about = "Compute per-user study statistics from Anki review logs", long_about = None)]
struct Cli {
    /// Root directory of the columnar dataset (revlogs/cards/decks relations)
    #[arg(short, long, default_value = "../anki-revlogs-10k")]
    data_dir: PathBuf,

    /// Output JSONL file, one result object per surviving user
    #[arg(short, long, default_value = "results.jsonl")]
    output: PathBuf,

    /// Maximum number of concurrent workers (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// User ids to process: comma-separated ids and inclusive ranges,
    /// e.g. "1-10000" or "1,2,42"
    #[arg(short, long, default_value = "1-10000")]
    users: String,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .init();

    debug!("revstats started with verbosity level: {}", cli.verbose);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let user_ids = cli::parse_user_ids(&cli.users)?;
    let store = Arc::new(ParquetStore::new(cli.data_dir));
    let options = BatchOptions {
        output_path: cli.output,
        max_workers: cli.workers,
    };
    batch::process_users(store, user_ids, options).await?;
    Ok(())
}
