//! Synchronous filesystem collaborators for the pipelines.
//!
//! Everything here does bulk blocking work and is expected to run under
//! `tokio::task::spawn_blocking`.

use crate::env;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// How [`merge_directories`] resolves a path present on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Incoming file replaces the existing one (token store restore)
    PreferIncoming,
    /// Existing file is kept (user data restore)
    PreferExisting,
}

/// Counts of what a merge actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub copied: usize,
    pub skipped: usize,
}

/// Recursively copy `src` into `dst`, preserving relative paths.
///
/// `dst` is created if absent. Non-regular files (sockets, symlinks left by
/// a browser profile) are skipped.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
        } else {
            debug!("Skipping non-regular file {}", entry.path().display());
        }
    }
    Ok(())
}

/// Merge `incoming` into the live directory `live` under `policy`.
///
/// The merged result is staged in a scratch sibling and swapped into place
/// with renames, so the live path always points at a complete tree even if
/// the process dies mid-merge. Conflicts are resolved per file; directories
/// on both sides are merged recursively.
pub fn merge_directories(
    incoming: &Path,
    live: &Path,
    policy: MergePolicy,
) -> io::Result<MergeStats> {
    let scratch = env::merge_scratch_path(live);
    let retired = env::merge_retired_path(live);

    // Leftovers from an interrupted earlier merge
    remove_if_present(&scratch)?;
    remove_if_present(&retired)?;

    let mut stats = MergeStats::default();
    let build = (|| -> io::Result<()> {
        if live.is_dir() {
            copy_dir_recursive(live, &scratch)?;
        } else {
            fs::create_dir_all(&scratch)?;
        }
        overlay(incoming, &scratch, policy, &mut stats)
    })();
    if let Err(e) = build {
        let _ = fs::remove_dir_all(&scratch);
        return Err(e);
    }

    // Swap: live -> retired, scratch -> live, then drop the retired tree
    let had_live = live.is_dir();
    if had_live {
        fs::rename(live, &retired)?;
    }
    if let Err(e) = fs::rename(&scratch, live) {
        // Put the original back before surfacing the failure
        if had_live {
            let _ = fs::rename(&retired, live);
        }
        let _ = fs::remove_dir_all(&scratch);
        return Err(e);
    }
    if had_live {
        if let Err(e) = fs::remove_dir_all(&retired) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove retired tree {}: {}",
                    retired.display(),
                    e
                );
            }
        }
    }

    debug!(
        "Merged {} into {} ({} copied, {} kept)",
        incoming.display(),
        live.display(),
        stats.copied,
        stats.skipped
    );
    Ok(stats)
}

fn overlay(src: &Path, dst: &Path, policy: MergePolicy, stats: &mut MergeStats) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            overlay(&entry.path(), &target, policy, stats)?;
        } else if file_type.is_file() {
            if target.exists() && policy == MergePolicy::PreferExisting {
                stats.skipped += 1;
                continue;
            }
            fs::copy(entry.path(), &target)?;
            stats.copied += 1;
        } else {
            debug!("Skipping non-regular file {}", entry.path().display());
        }
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
