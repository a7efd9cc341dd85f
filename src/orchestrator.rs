//! Top-level coordination of the four pool operations.
//!
//! `SessionWarden` owns the registry and wires every public operation
//! through the teardown coordinator before any filesystem work: export,
//! import and purge all begin by draining the pool, and export/import end by
//! handing control to the bootstrap seam. Import additionally validates the
//! upload *before* teardown, so a malformed upload never costs the pool its
//! live sessions.

use crate::backup::{
    BackupError, ExportPipeline, ExportSummary, ImportPipeline, ImportSummary, ImportUpload,
    PurgePipeline, PurgeSummary,
};
use crate::config::WardenConfig;
use crate::lifecycle::{SessionBootstrap, TeardownCoordinator, TeardownReport};
use crate::registry::SessionRegistry;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tracing::info;

/// Coordinates the session registry, teardown and the snapshot pipelines.
pub struct SessionWarden {
    config: WardenConfig,
    registry: Arc<SessionRegistry>,
    bootstrap: Arc<dyn SessionBootstrap>,
}

impl SessionWarden {
    /// Create a warden over the stores described by `config`.
    pub fn new(config: WardenConfig, bootstrap: Arc<dyn SessionBootstrap>) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.token_store_dir()));
        Self {
            config,
            registry,
            bootstrap,
        }
    }

    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    /// Shared registry handle; the embedding application inserts live client
    /// handles here as it starts sessions.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    fn teardown(&self) -> TeardownCoordinator {
        TeardownCoordinator::new(self.registry.clone(), self.config.shutdown_grace())
    }

    /// Close every live session: best-effort, bounded drain of the pool.
    pub async fn close_all(&self) -> TeardownReport {
        self.teardown().drain_all().await
    }

    /// Snapshot both stores into the backup archive and stream it into
    /// `out`; sessions restart only after the stream has ended.
    pub async fn export_to<W: AsyncWrite + Unpin>(
        &self,
        out: &mut W,
    ) -> Result<ExportSummary, BackupError> {
        info!("Starting session pool export");
        self.close_all().await;
        ExportPipeline::new(&self.config, &self.registry, self.bootstrap.as_ref())
            .run(out)
            .await
    }

    /// Restore both stores from an uploaded archive, then restart sessions.
    /// The returned summary means the restore has fully completed.
    pub async fn import(&self, upload: &ImportUpload) -> Result<ImportSummary, BackupError> {
        // Reject bad uploads before costing the pool its live sessions
        ImportPipeline::validate(upload)?;
        info!("Starting session pool import from {}", upload.path.display());
        self.close_all().await;
        ImportPipeline::new(&self.config, &self.registry, self.bootstrap.as_ref())
            .run(upload)
            .await
    }

    /// Permanently wipe both stores. Terminal: no restart follows.
    pub async fn purge(&self) -> Result<PurgeSummary, BackupError> {
        info!("Starting session pool purge");
        self.close_all().await;
        PurgePipeline::new(&self.config).run().await
    }
}
