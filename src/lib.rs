//! # Session Warden
//!
//! A session lifecycle orchestrator for a pool of long-lived, stateful
//! automation-browser sessions. It coordinates four whole-pool operations
//! (export, close-all, import and purge) across an in-memory registry of
//! live client handles and two on-disk stores: a per-session token store and
//! a shared user data tree.
//!
//! ## Architecture Overview
//!
//! - **[`registry`]**: the shared session registry and the client handle seam
//! - **[`lifecycle`]**: bounded teardown of live sessions and the bootstrap
//!   seam that repopulates the registry afterwards
//! - **[`backup`]**: the export, import and purge pipelines plus their
//!   filesystem and archive collaborators
//! - **[`orchestrator`]**: `SessionWarden`, wiring every operation through
//!   teardown first
//! - **[`config`]** / **[`env`]**: the one configurable path (the user data
//!   tree) and the process-relative constants for everything else
//!
//! ## Coordination contract
//!
//! Every destructive operation drains the pool before touching the
//! filesystem; draining removes each identifier from the registry before its
//! close request is dispatched and waits at most a grace period for closures
//! to finish. Export and import conclude by invoking the external bootstrap
//! seam, and never before their filesystem work has fully completed. Purge
//! is terminal and triggers no restart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use session_warden::{DetachedBootstrap, SessionWarden, WardenConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WardenConfig::default();
//!     let warden = SessionWarden::new(config, Arc::new(DetachedBootstrap));
//!
//!     let mut out = tokio::fs::File::create("pool-backup.tar.gz").await?;
//!     let summary = warden.export_to(&mut out).await?;
//!     println!("exported {} bytes", summary.archive_bytes);
//!     Ok(())
//! }
//! ```

/// Backup, restore and purge pipelines over the two on-disk stores.
pub mod backup;

/// Command-line interface for operating on a detached pool.
pub mod cli;

/// Configuration loading and discovery.
pub mod config;

/// Path constants and utilities.
pub mod env;

/// Teardown coordination and the session bootstrap seam.
pub mod lifecycle;

/// `SessionWarden`, the top-level coordinator of the four pool operations.
pub mod orchestrator;

/// The session registry and client handle seam.
pub mod registry;

// Re-export the main operation types
pub use backup::{
    BackupError, ExportSummary, ImportSummary, ImportUpload, MergeOutcome, PurgeSummary,
};
pub use config::{ConfigDiscovery, WardenConfig};
pub use lifecycle::{DetachedBootstrap, SessionBootstrap, TeardownCoordinator, TeardownReport};
pub use orchestrator::SessionWarden;
pub use registry::{SessionClient, SessionRegistry};
