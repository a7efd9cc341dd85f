//! Integration tests for configuration loading and discovery.

use serial_test::serial;
use session_warden::{ConfigDiscovery, WardenConfig, env};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_toml_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(env::CONFIG_FILE_NAME);

    let config = WardenConfig {
        base_dir: PathBuf::from("/srv/pool"),
        user_data_dir: Some(PathBuf::from("/var/lib/browser-profiles")),
        shutdown_grace_ms: 750,
    };
    config.to_toml_file(&path).unwrap();

    let loaded = WardenConfig::from_toml_file(&path).unwrap();
    assert_eq!(loaded.base_dir, PathBuf::from("/srv/pool"));
    assert_eq!(
        loaded.user_data_dir,
        Some(PathBuf::from("/var/lib/browser-profiles"))
    );
    assert_eq!(loaded.shutdown_grace_ms, 750);
}

#[test]
fn test_from_toml_file_missing_file_is_an_error() {
    assert!(WardenConfig::from_toml_file("/nonexistent/warden.toml").is_err());
}

#[test]
fn test_from_toml_file_rejects_malformed_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(env::CONFIG_FILE_NAME);
    fs::write(&path, "base_dir = [not valid toml").unwrap();

    assert!(WardenConfig::from_toml_file(&path).is_err());
}

#[test]
#[serial]
fn test_discovery_prefers_local_config_file() {
    let temp = TempDir::new().unwrap();
    let original_dir = std::env::current_dir().unwrap();

    let config = WardenConfig {
        base_dir: PathBuf::from("/srv/discovered"),
        ..Default::default()
    };
    config
        .to_toml_file(temp.path().join(env::CONFIG_FILE_NAME))
        .unwrap();

    std::env::set_current_dir(temp.path()).unwrap();
    let discovered = ConfigDiscovery::discover();
    std::env::set_current_dir(original_dir).unwrap();

    assert_eq!(discovered.unwrap().base_dir, PathBuf::from("/srv/discovered"));
}

#[test]
#[serial]
fn test_find_config_file_returns_local_path() {
    let temp = TempDir::new().unwrap();
    let original_dir = std::env::current_dir().unwrap();

    WardenConfig::default()
        .to_toml_file(temp.path().join(env::CONFIG_FILE_NAME))
        .unwrap();

    std::env::set_current_dir(temp.path()).unwrap();
    let found = ConfigDiscovery::find_config_file();
    std::env::set_current_dir(original_dir).unwrap();

    assert_eq!(found, Some(PathBuf::from(env::CONFIG_FILE_NAME)));
}
