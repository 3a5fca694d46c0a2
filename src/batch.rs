//! Concurrent fan-out of the per-user pipeline and JSONL persistence.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::available_parallelism;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pipeline;
use crate::stats::{self, UserStats};
use crate::store::StudyStore;

/// Options for a batch run.
pub struct BatchOptions {
    /// Destination for the line-delimited JSON results; overwritten on each
    /// run.
    pub output_path: PathBuf,
    /// Upper bound on concurrent per-user tasks. `None` defers to the
    /// available parallelism of the host.
    pub max_workers: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("results.jsonl"),
            max_workers: None,
        }
    }
}

/// Run the load → aggregate pipeline for every user id on a bounded worker
/// pool and write the surviving results as line-delimited JSON.
///
/// Output rows keep the order of `user_ids`, not completion order. A user
/// that fails at any stage is logged and skipped; only directory creation
/// and the output write can fail the run as a whole.
pub async fn process_users(
    store: Arc<dyn StudyStore>,
    user_ids: Vec<u32>,
    options: BatchOptions,
) -> Result<Vec<UserStats>> {
    if let Some(parent) = options.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let max_workers = options.max_workers.unwrap_or_else(default_workers);
    let total = user_ids.len();
    info!("Processing {} users (max workers: {})", total, max_workers);

    let progress_bar = create_progress_bar(total);
    progress_bar.set_message("Processing users");

    let semaphore = Arc::new(Semaphore::new(max_workers));

    let mut futures = Vec::new();
    for user_id in user_ids {
        let store = store.clone();
        let semaphore = semaphore.clone();
        let progress = progress_bar.clone();

        let future = async move {
            let _permit = semaphore.acquire().await.unwrap();
            let result = task::spawn_blocking(move || process_user(store.as_ref(), user_id)).await;
            progress.inc(1);

            match result {
                Ok(Ok(user_stats)) => Some(user_stats),
                Ok(Err(e)) => {
                    warn!("{}", e);
                    None
                }
                Err(e) => {
                    warn!("Task for user {} panicked: {}", user_id, e);
                    None
                }
            }
        };
        futures.push(future);
    }

    // join_all yields outcomes in submission order, not completion order.
    let outcomes = join_all(futures).await;
    let results: Vec<UserStats> = outcomes.into_iter().flatten().collect();
    let skipped = total - results.len();

    progress_bar.finish_with_message(format!(
        "Completed: {} successful, {} skipped",
        results.len(),
        skipped
    ));

    write_results(&options.output_path, &results)?;

    info!(
        "Batch completed: {} total, {} successful, {} skipped",
        total,
        results.len(),
        skipped
    );
    println!("Results saved to {}", options.output_path.display());

    Ok(results)
}

/// Run load → aggregate for one user, mapping every failure into the skip
/// taxonomy (not-found, load, aggregation).
fn process_user(store: &dyn StudyStore, user_id: u32) -> Result<UserStats> {
    let joined = pipeline::load_joined(store, user_id).map_err(|e| match e {
        e @ Error::NotFound { .. } => e,
        e => Error::Load {
            user_id,
            message: e.to_string(),
        },
    })?;

    let user_stats = stats::aggregate(user_id, &joined).map_err(|e| match e {
        e @ Error::Aggregation { .. } => e,
        e => Error::Aggregation {
            user_id,
            message: e.to_string(),
        },
    })?;

    info!(
        "User {}: revlogs: {}, avg review count per note: {}, per card: {}, ratio: {}",
        user_id,
        user_stats.revlogs_count,
        user_stats.avg_review_count_per_note,
        user_stats.avg_review_count_per_card,
        user_stats.ratio
    );

    Ok(user_stats)
}

fn write_results(path: &Path, results: &[UserStats]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for result in results {
        let line = serde_json::to_string(result)?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

fn default_workers() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(4)
}

/// Create a progress bar for batch execution
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .unwrap()
            .progress_chars("█▓▒░ "),
    );
    pb
}
