//! Age-based removal of saved estimates and quote files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use estimate::cleanup_old_quotes;
use storage::EstimateRepository;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::ApiError;

pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);
const RETRY_DELAY: Duration = Duration::from_secs(300);
const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub estimates: u64,
    pub quotes: usize,
}

/// Deletes estimates and quote files older than `days` days.
pub async fn run_cleanup(
    repo: &EstimateRepository,
    quotes_dir: &Path,
    days: i64,
) -> Result<CleanupReport, ApiError> {
    let estimates = repo.cleanup_older_than(days).await?;
    let max_age = Duration::from_secs(days.max(0) as u64 * SECS_PER_DAY);
    let quotes = cleanup_old_quotes(quotes_dir, max_age)?;
    info!(estimates, quotes, days, "Cleanup finished");
    Ok(CleanupReport { estimates, quotes })
}

/// Runs [`run_cleanup`] every `interval`; a failed run is retried after five minutes.
pub fn spawn_periodic_cleanup(
    repo: EstimateRepository,
    quotes_dir: PathBuf,
    days: i64,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            if let Err(e) = run_cleanup(&repo, &quotes_dir, days).await {
                error!(error = %e, "Periodic cleanup failed");
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    })
}
