use animove_storage::LocalStorage;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Periodically deletes old files from the upload and download directories.
#[derive(Clone)]
pub struct CleanupService {
    directories: Vec<Arc<LocalStorage>>,
    retention: Duration,
    every: Duration,
}

impl CleanupService {
    pub fn new(directories: Vec<Arc<LocalStorage>>, retention: Duration, every: Duration) -> Self {
        Self {
            directories,
            retention,
            every,
        }
    }

    /// Start the background cleanup task.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut cleanup_interval = interval(self.every);

            loop {
                cleanup_interval.tick().await;

                tracing::info!("Starting scheduled cleanup of expired files");
                let removed = self.cleanup_expired_files().await;
                tracing::info!(removed, "Cleanup task completed");
            }
        })
    }

    /// One sweep over every directory. Returns how many files were deleted.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "expire_files"))]
    pub async fn cleanup_expired_files(&self) -> usize {
        let mut total = 0;
        for dir in &self.directories {
            match dir.remove_older_than(self.retention).await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(
                            dir = %dir.base_path().display(),
                            removed = count,
                            "Removed expired files"
                        );
                    }
                    total += count;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        dir = %dir.base_path().display(),
                        "Failed to cleanup directory"
                    );
                }
            }
        }
        total
    }
}
