//! Path constants and utilities for the session warden.
//!
//! This module centralizes every hardcoded directory name, file name and
//! archive entry name used by the pipelines. Apart from the live user data
//! tree (a configuration option), all locations are process-relative
//! constants resolved against a base directory.

/// Directory holding one persisted token file per session
pub const TOKEN_STORE_DIR_NAME: &str = "tokens";

/// Extension of persisted token files (`<session-id>.json`)
pub const TOKEN_FILE_EXTENSION: &str = "json";

/// Default location of the live user data tree when not configured
pub const USER_DATA_DIR_NAME: &str = "userDataDir";

/// Fixed output path of the backup archive, overwritten on each export
pub const BACKUP_ARCHIVE_NAME: &str = "backup-sessions.tar.gz";

/// Transient directory holding the user data copy while an export runs
pub const EXPORT_STAGING_DIR_NAME: &str = ".export-staging";

/// Transient directory holding unpacked archive contents while an import runs
pub const RESTORE_STAGING_DIR_NAME: &str = ".restore-staging";

/// Suffix of the scratch sibling a staged merge is built in
pub const MERGE_SCRATCH_SUFFIX: &str = "merge-next";

/// Suffix of the retired sibling a staged merge swaps the old tree to
pub const MERGE_RETIRED_SUFFIX: &str = "merge-prev";

/// Configuration file name looked up by discovery
pub const CONFIG_FILE_NAME: &str = "warden.toml";

/// Hidden per-user configuration directory name (like .git, .vscode)
pub const WARDEN_DIR_NAME: &str = ".warden";

/// Archive entry names of the interchange format
pub mod archive {
    /// Top-level archive entry mirroring the token store
    pub const TOKENS_ENTRY: &str = "tokens";

    /// Top-level archive entry mirroring the user data tree
    pub const USER_DATA_ENTRY: &str = "userDataDir";
}

use std::path::{Path, PathBuf};

/// Build the token store path from a base directory
pub fn token_store_path(base: &Path) -> PathBuf {
    base.join(TOKEN_STORE_DIR_NAME)
}

/// Build the path of one session's persisted token file
pub fn token_file_path(base: &Path, session_id: &str) -> PathBuf {
    token_store_path(base).join(format!("{}.{}", session_id, TOKEN_FILE_EXTENSION))
}

/// Build the default user data tree path from a base directory
pub fn user_data_dir_path(base: &Path) -> PathBuf {
    base.join(USER_DATA_DIR_NAME)
}

/// Build the fixed backup archive path from a base directory
pub fn backup_archive_path(base: &Path) -> PathBuf {
    base.join(BACKUP_ARCHIVE_NAME)
}

/// Build the export staging directory path from a base directory
pub fn export_staging_path(base: &Path) -> PathBuf {
    base.join(EXPORT_STAGING_DIR_NAME)
}

/// Build the restore extraction directory path from a base directory
pub fn restore_staging_path(base: &Path) -> PathBuf {
    base.join(RESTORE_STAGING_DIR_NAME)
}

/// Build the scratch sibling a staged merge of `store` is assembled in
pub fn merge_scratch_path(store: &Path) -> PathBuf {
    sibling_with_suffix(store, MERGE_SCRATCH_SUFFIX)
}

/// Build the retired sibling the previous tree of `store` is swapped to
pub fn merge_retired_path(store: &Path) -> PathBuf {
    sibling_with_suffix(store, MERGE_RETIRED_SUFFIX)
}

fn sibling_with_suffix(dir: &Path, suffix: &str) -> PathBuf {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    dir.with_file_name(format!("{}.{}", name, suffix))
}

/// Build config file path in the user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    home_dir.join(WARDEN_DIR_NAME).join(CONFIG_FILE_NAME)
}
