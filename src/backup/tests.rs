use crate::backup::fsops::{MergePolicy, copy_dir_recursive, merge_directories};
use crate::backup::import::ImportUpload;
use crate::backup::staging::StagingDir;
use crate::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_staging_dir_removed_on_drop() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("staging");

    {
        let staging = StagingDir::create(path.clone()).unwrap();
        write_file(&staging.path().join("scratch.bin"), "x");
        assert!(path.is_dir());
    }

    assert!(!path.exists());
}

#[test]
fn test_staging_dir_cleanup_disarms_guard() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("staging");

    let staging = StagingDir::create(path.clone()).unwrap();
    staging.cleanup().unwrap();

    assert!(!path.exists());
}

#[test]
fn test_staging_dir_discards_stale_leftovers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("staging");
    write_file(&path.join("leftover.bin"), "stale");

    let staging = StagingDir::create(path.clone()).unwrap();

    assert!(staging.path().is_dir());
    assert!(!staging.path().join("leftover.bin").exists());
}

#[test]
fn test_copy_dir_recursive_preserves_relative_paths() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    write_file(&src.join("a.txt"), "top");
    write_file(&src.join("profile/cookies.bin"), "crumbs");
    write_file(&src.join("profile/cache/page.html"), "<html>");

    copy_dir_recursive(&src, &dst).unwrap();

    assert_eq!(read_file(&dst.join("a.txt")), "top");
    assert_eq!(read_file(&dst.join("profile/cookies.bin")), "crumbs");
    assert_eq!(read_file(&dst.join("profile/cache/page.html")), "<html>");
    // Source untouched
    assert_eq!(read_file(&src.join("profile/cookies.bin")), "crumbs");
}

#[test]
fn test_merge_prefer_incoming_overwrites_conflicts() {
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    let live = temp.path().join("live");
    write_file(&incoming.join("shared.json"), "from-archive");
    write_file(&incoming.join("new.json"), "added");
    write_file(&live.join("shared.json"), "pre-existing");
    write_file(&live.join("untouched.json"), "kept");

    let stats = merge_directories(&incoming, &live, MergePolicy::PreferIncoming).unwrap();

    assert_eq!(read_file(&live.join("shared.json")), "from-archive");
    assert_eq!(read_file(&live.join("new.json")), "added");
    assert_eq!(read_file(&live.join("untouched.json")), "kept");
    assert_eq!(stats.copied, 2);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn test_merge_prefer_existing_keeps_live_files() {
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    let live = temp.path().join("live");
    write_file(&incoming.join("profile/cookies.bin"), "from-archive");
    write_file(&incoming.join("profile/history.db"), "restored");
    write_file(&live.join("profile/cookies.bin"), "live-wins");

    let stats = merge_directories(&incoming, &live, MergePolicy::PreferExisting).unwrap();

    assert_eq!(read_file(&live.join("profile/cookies.bin")), "live-wins");
    assert_eq!(read_file(&live.join("profile/history.db")), "restored");
    assert_eq!(stats.copied, 1);
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_merge_into_missing_live_dir_creates_it() {
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    let live = temp.path().join("live");
    write_file(&incoming.join("a.json"), "fresh");

    let stats = merge_directories(&incoming, &live, MergePolicy::PreferIncoming).unwrap();

    assert_eq!(read_file(&live.join("a.json")), "fresh");
    assert_eq!(stats.copied, 1);
}

#[test]
fn test_merge_leaves_no_scratch_siblings_behind() {
    let temp = TempDir::new().unwrap();
    let incoming = temp.path().join("incoming");
    let live = temp.path().join("live");
    write_file(&incoming.join("a.json"), "x");
    write_file(&live.join("b.json"), "y");

    merge_directories(&incoming, &live, MergePolicy::PreferExisting).unwrap();

    assert!(!env::merge_scratch_path(&live).exists());
    assert!(!env::merge_retired_path(&live).exists());
}

#[test]
fn test_upload_content_type_gate() {
    let archive = |ct: &str| ImportUpload {
        path: PathBuf::from("upload.tar.gz"),
        content_type: ct.to_string(),
    };

    assert!(archive("application/gzip").is_archive());
    assert!(archive("application/x-gzip").is_archive());
    assert!(archive("Application/GZIP").is_archive());
    assert!(archive("application/gzip; charset=binary").is_archive());
    assert!(!archive("text/plain").is_archive());
    assert!(!archive("application/json").is_archive());
    assert!(!archive("").is_archive());
}

#[test]
fn test_upload_content_type_guessed_from_extension() {
    assert_eq!(
        ImportUpload::from_path(PathBuf::from("/tmp/backup-sessions.tar.gz")).content_type,
        "application/gzip"
    );
    assert_eq!(
        ImportUpload::from_path(PathBuf::from("/tmp/pool.TGZ")).content_type,
        "application/gzip"
    );
    assert_eq!(
        ImportUpload::from_path(PathBuf::from("/tmp/notes.txt")).content_type,
        "application/octet-stream"
    );
}
