//! Snapshot, restore and purge pipelines for the session stores.
//!
//! The pipelines operate on the two on-disk stores (token store and user
//! data tree) and share one interchange format: a gzip-compressed tar
//! archive with exactly two top-level entries, `tokens` and `userDataDir`,
//! each mirroring the respective store verbatim. The archive codec itself is
//! delegated to the `tar` and `flate2` crates; the pipelines own the
//! coordination contract around it.
//!
//! ## Components
//!
//! - [`export`]: build the archive from both stores and stream it out
//! - [`import`]: unpack an uploaded archive and merge it into the live stores
//! - [`purge`]: recursively clear both stores without archiving
//! - [`staging`]: scoped transient directories, removed on every exit path
//! - [`fsops`]: tree copy and staged directory merges with an atomic swap
//! - [`archive`]: the two-entry tar.gz layout

pub mod archive;
pub mod export;
pub mod fsops;
pub mod import;
pub mod purge;
pub mod staging;

#[cfg(test)]
mod tests;

pub use export::{ExportPipeline, ExportSummary};
pub use fsops::{MergePolicy, MergeStats};
pub use import::{ImportPipeline, ImportSummary, ImportUpload, MergeOutcome};
pub use purge::{PurgePipeline, PurgeSummary};
pub use staging::StagingDir;

/// Backup pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Upload declared a non-archive content type
    #[error("Unsupported upload content type: {0}")]
    UnsupportedContentType(String),

    /// Token store could not be cleared; partial success is not success
    #[error("Failed to clear token store: {0}")]
    TokenStoreClear(#[source] std::io::Error),

    /// Background archive task aborted before completing
    #[error("Archive task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;
