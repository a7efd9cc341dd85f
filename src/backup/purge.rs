use crate::backup::{BackupError, Result};
use crate::config::WardenConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io;
use tracing::{info, warn};

/// Result of a completed purge.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeSummary {
    pub user_data_removed: usize,
    pub user_data_failures: usize,
    pub token_files_removed: usize,
    pub token_dirs_skipped: usize,
    pub message: String,
    pub purged_at: DateTime<Utc>,
}

/// Recursively clears both stores without archiving anything.
///
/// Precondition: the pool has been drained. The user data phase is best
/// effort (per-item failures are logged and counted); the token store phase
/// is strict, and any failure there fails the whole operation even though
/// the user data phase already ran. Purge is terminal: no restart follows.
pub struct PurgePipeline<'a> {
    config: &'a WardenConfig,
}

impl<'a> PurgePipeline<'a> {
    pub fn new(config: &'a WardenConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<PurgeSummary> {
        let (user_data_removed, user_data_failures) = self.clear_user_data().await;
        let (token_files_removed, token_dirs_skipped) = self.clear_token_store().await?;

        let message = format!(
            "Cleared {} user data entries and {} token files",
            user_data_removed, token_files_removed
        );
        info!("{}", message);
        Ok(PurgeSummary {
            user_data_removed,
            user_data_failures,
            token_files_removed,
            token_dirs_skipped,
            message,
            purged_at: Utc::now(),
        })
    }

    /// Delete every immediate child of the user data tree, recursing into
    /// directories. Best effort: failures are logged and counted.
    async fn clear_user_data(&self) -> (usize, usize) {
        let dir = self.config.user_data_tree();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "User data tree {} does not exist, treating as already clear",
                    dir.display()
                );
                return (0, 0);
            }
            Err(e) => {
                warn!("Failed to enumerate user data tree {}: {}", dir.display(), e);
                return (0, 1);
            }
        };

        let mut removed = 0;
        let mut failures = 0;
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    let is_dir = entry
                        .file_type()
                        .await
                        .map(|t| t.is_dir())
                        .unwrap_or(false);
                    let result = if is_dir {
                        tokio::fs::remove_dir_all(&path).await
                    } else {
                        tokio::fs::remove_file(&path).await
                    };
                    match result {
                        Ok(()) => removed += 1,
                        Err(e) => {
                            warn!("Failed to remove {}: {}", path.display(), e);
                            failures += 1;
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read user data tree entry: {}", e);
                    failures += 1;
                    break;
                }
            }
        }
        (removed, failures)
    }

    /// Delete every file in the token store. Strict: a subdirectory is
    /// skipped with a warning (never deleted), anything else that fails
    /// escalates to a fatal error.
    async fn clear_token_store(&self) -> Result<(usize, usize)> {
        let dir = self.config.token_store_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Token store {} does not exist, treating as already clear",
                    dir.display()
                );
                return Ok((0, 0));
            }
            Err(e) => return Err(BackupError::TokenStoreClear(e)),
        };

        let mut removed = 0;
        let mut skipped = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(BackupError::TokenStoreClear)?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(BackupError::TokenStoreClear)?;
            if file_type.is_dir() {
                warn!(
                    "Unexpected directory {} in token store, skipping",
                    path.display()
                );
                skipped += 1;
                continue;
            }
            tokio::fs::remove_file(&path)
                .await
                .map_err(BackupError::TokenStoreClear)?;
            removed += 1;
        }
        Ok((removed, skipped))
    }
}
