//! Configuration loading and discovery.
//!
//! Configuration is intentionally small: the only path an operator must be
//! able to point elsewhere is the live user data tree; everything else (token
//! store, staging areas, archive output) derives from the base directory via
//! [`crate::env`]. Discovery follows the hierarchy:
//! 1. Current directory: ./warden.toml
//! 2. User config: ~/.warden/warden.toml
//! 3. Built-in defaults

use crate::env;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Runtime configuration for the session warden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Base directory anchoring the token store, staging areas and archive output
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Live user data tree location; defaults to `<base_dir>/userDataDir`
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,
    /// Grace period granted to in-flight session closures, in milliseconds
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_shutdown_grace_ms() -> u64 {
    500
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            user_data_dir: None,
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl WardenConfig {
    /// Token store directory holding one persisted token file per session
    pub fn token_store_dir(&self) -> PathBuf {
        env::token_store_path(&self.base_dir)
    }

    /// Live user data tree of the automation driver
    pub fn user_data_tree(&self) -> PathBuf {
        self.user_data_dir
            .clone()
            .unwrap_or_else(|| env::user_data_dir_path(&self.base_dir))
    }

    /// Fixed backup archive output path
    pub fn backup_archive_path(&self) -> PathBuf {
        env::backup_archive_path(&self.base_dir)
    }

    /// Transient staging directory used while building an export
    pub fn export_staging_dir(&self) -> PathBuf {
        env::export_staging_path(&self.base_dir)
    }

    /// Transient extraction directory used while restoring an import
    pub fn restore_staging_dir(&self) -> PathBuf {
        env::restore_staging_path(&self.base_dir)
    }

    /// Grace period granted to in-flight session closures
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: WardenConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy
    pub fn discover() -> Result<WardenConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {}", config_path.display());
            return WardenConfig::from_toml_file(config_path);
        }

        debug!("No configuration file found, using built-in defaults");
        Ok(WardenConfig::default())
    }

    /// Find the first config file in the discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(env::CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }

        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            let user_config = env::user_config_file_path(&home);
            if user_config.is_file() {
                return Some(user_config);
            }
        }

        None
    }
}
