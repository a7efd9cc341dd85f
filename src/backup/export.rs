use crate::backup::{Result, StagingDir, archive};
use crate::config::WardenConfig;
use crate::lifecycle::SessionBootstrap;
use crate::registry::SessionRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{error, info, warn};

/// Result of a completed export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub archive_path: PathBuf,
    pub archive_bytes: u64,
    pub sessions_restarted: bool,
    pub exported_at: DateTime<Utc>,
}

/// Snapshots both stores into the fixed backup archive, streams the archive
/// to the caller, then restarts sessions.
///
/// Precondition: the pool has been drained. The strict internal order is
/// archive construction → disk flush → staging cleanup → response streaming
/// → restart; sessions are never restarted while the archive is still being
/// written or streamed.
pub struct ExportPipeline<'a> {
    config: &'a WardenConfig,
    registry: &'a SessionRegistry,
    bootstrap: &'a dyn SessionBootstrap,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(
        config: &'a WardenConfig,
        registry: &'a SessionRegistry,
        bootstrap: &'a dyn SessionBootstrap,
    ) -> Self {
        Self {
            config,
            registry,
            bootstrap,
        }
    }

    /// Run the export, streaming the finished archive into `out`.
    ///
    /// Archive construction errors reject the operation before any byte is
    /// streamed; streaming errors reject it afterwards. Both leave the
    /// sessions unstarted.
    pub async fn run<W: AsyncWrite + Unpin>(&self, out: &mut W) -> Result<ExportSummary> {
        let archive_path = self.config.backup_archive_path();
        let token_store = self.config.token_store_dir();
        let user_data = self.config.user_data_tree();

        // An empty pool still exports a valid archive
        tokio::fs::create_dir_all(&token_store).await?;

        let staging = StagingDir::create(self.config.export_staging_dir())?;
        info!("Writing backup archive to {}", archive_path.display());

        let archive_bytes = {
            let archive_path = archive_path.clone();
            let staging_path = staging.path().to_path_buf();
            tokio::task::spawn_blocking(move || {
                archive::pack_stores(&archive_path, &token_store, &user_data, &staging_path)
            })
            .await??
        };

        if let Err(e) = staging.cleanup() {
            warn!("Failed to remove export staging directory: {}", e);
        }

        let mut file = tokio::fs::File::open(&archive_path).await?;
        if let Err(e) = tokio::io::copy(&mut file, out).await {
            error!("Failed to stream backup archive to caller: {}", e);
            return Err(e.into());
        }
        out.flush().await?;

        // Restart only after the caller has received the full archive
        let sessions_restarted = match self
            .bootstrap
            .start_all_sessions(self.config, self.registry)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to restart sessions after export: {:#}", e);
                false
            }
        };

        info!("Exported {} bytes of session state", archive_bytes);
        Ok(ExportSummary {
            archive_path,
            archive_bytes,
            sessions_restarted,
            exported_at: Utc::now(),
        })
    }
}
