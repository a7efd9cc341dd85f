use crate::backup::fsops::{self, MergePolicy};
use crate::backup::{BackupError, Result, StagingDir, archive};
use crate::config::WardenConfig;
use crate::env;
use crate::lifecycle::SessionBootstrap;
use crate::registry::SessionRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Content types accepted for an uploaded backup archive.
pub const SUPPORTED_ARCHIVE_TYPES: &[&str] = &[
    "application/gzip",
    "application/x-gzip",
    "application/x-compressed-tar",
    "application/tar+gzip",
];

/// An uploaded archive plus its declared content type.
#[derive(Debug, Clone)]
pub struct ImportUpload {
    pub path: PathBuf,
    pub content_type: String,
}

impl ImportUpload {
    /// Build an upload whose content type is guessed from the file name.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let content_type = if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            "application/gzip"
        } else {
            "application/octet-stream"
        };
        Self {
            path,
            content_type: content_type.to_string(),
        }
    }

    /// Whether the declared content type indicates a supported archive.
    pub fn is_archive(&self) -> bool {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        SUPPORTED_ARCHIVE_TYPES.contains(&essence.as_str())
    }
}

/// What happened to one store during an import.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Entry merged into the live store
    Merged { copied: usize, skipped: usize },
    /// Archive had no entry for this store; live data left untouched
    MissingEntry,
    /// Merge failed; the live store kept its pre-import tree
    Failed,
}

/// Result of a completed import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub tokens: MergeOutcome,
    pub user_data: MergeOutcome,
    pub sessions_restarted: bool,
    pub imported_at: DateTime<Utc>,
}

/// Unpacks an uploaded archive and merges it into the live stores, then
/// restarts sessions.
///
/// Merge policy is asymmetric: the `tokens` entry overwrites conflicting
/// token files, while the `userDataDir` entry never overwrites live user
/// data. A failed or absent entry on either side is logged and does not
/// abort the other merge or the restart. The returned summary means *fully
/// restored*: extraction, both merges and the restart have all completed.
pub struct ImportPipeline<'a> {
    config: &'a WardenConfig,
    registry: &'a SessionRegistry,
    bootstrap: &'a dyn SessionBootstrap,
}

impl<'a> ImportPipeline<'a> {
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

    /// Reject uploads that do not declare an archive content type.
    ///
    /// Runs before teardown and before any filesystem access.
    pub fn validate(upload: &ImportUpload) -> Result<()> {
        if !upload.is_archive() {
            return Err(BackupError::UnsupportedContentType(
                upload.content_type.clone(),
            ));
        }
        Ok(())
    }

    /// Run the import. Precondition: upload validated, pool drained.
    pub async fn run(&self, upload: &ImportUpload) -> Result<ImportSummary> {
        Self::validate(upload)?;

        let staging = StagingDir::create(self.config.restore_staging_dir())?;
        info!(
            "Unpacking uploaded archive {} into {}",
            upload.path.display(),
            staging.path().display()
        );
        {
            let src = upload.path.clone();
            let dst = staging.path().to_path_buf();
            tokio::task::spawn_blocking(move || archive::unpack_archive(&src, &dst)).await??;
        }

        let tokens = self
            .merge_entry(
                env::archive::TOKENS_ENTRY,
                staging.path(),
                self.config.token_store_dir(),
                MergePolicy::PreferIncoming,
            )
            .await;
        let user_data = self
            .merge_entry(
                env::archive::USER_DATA_ENTRY,
                staging.path(),
                self.config.user_data_tree(),
                MergePolicy::PreferExisting,
            )
            .await;

        if let Err(e) = staging.cleanup() {
            warn!("Failed to remove restore staging directory: {}", e);
        }

        let sessions_restarted = match self
            .bootstrap
            .start_all_sessions(self.config, self.registry)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to restart sessions after import: {:#}", e);
                false
            }
        };

        info!("Import finished (tokens: {:?}, user data: {:?})", tokens, user_data);
        Ok(ImportSummary {
            tokens,
            user_data,
            sessions_restarted,
            imported_at: Utc::now(),
        })
    }

    async fn merge_entry(
        &self,
        entry: &str,
        extract_dir: &Path,
        live: PathBuf,
        policy: MergePolicy,
    ) -> MergeOutcome {
        let incoming = extract_dir.join(entry);
        if !incoming.is_dir() {
            warn!(
                "Archive has no '{}' entry, leaving {} untouched",
                entry,
                live.display()
            );
            return MergeOutcome::MissingEntry;
        }

        let result = tokio::task::spawn_blocking(move || {
            fsops::merge_directories(&incoming, &live, policy)
        })
        .await;

        match result {
            Ok(Ok(stats)) => MergeOutcome::Merged {
                copied: stats.copied,
                skipped: stats.skipped,
            },
            Ok(Err(e)) => {
                error!("Failed to merge '{}' entry: {}", entry, e);
                MergeOutcome::Failed
            }
            Err(e) => {
                error!("Merge task for '{}' entry aborted: {}", entry, e);
                MergeOutcome::Failed
            }
        }
    }
}
