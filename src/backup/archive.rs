//! The two-entry tar.gz interchange layout.
//!
//! An archive carries exactly two top-level entries, `tokens` and
//! `userDataDir`, each mirroring the respective store's directory tree
//! verbatim. Contents round-trip losslessly modulo compression. These
//! helpers are synchronous; callers run them under `spawn_blocking`.

use crate::backup::fsops;
use crate::env;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io;
use std::path::Path;
use tar::{Archive, Builder};
use tracing::debug;

/// Build the backup archive at `archive_path`, in strict order: append the
/// token store, snapshot the live user data tree into `staging` (a full
/// copy, the live tree stays usable), append the staged copy, finalize and
/// flush to disk. Returns the archive size in bytes.
pub fn pack_stores(
    archive_path: &Path,
    token_store: &Path,
    user_data_live: &Path,
    staging: &Path,
) -> io::Result<u64> {
    let file = File::create(archive_path)?;
    let encoder = GzEncoder::new(file, Compression::best());
    let mut builder = Builder::new(encoder);

    builder.append_dir_all(env::archive::TOKENS_ENTRY, token_store)?;

    if user_data_live.is_dir() {
        fsops::copy_dir_recursive(user_data_live, staging)?;
    } else {
        debug!(
            "User data tree {} does not exist, archiving an empty entry",
            user_data_live.display()
        );
    }
    builder.append_dir_all(env::archive::USER_DATA_ENTRY, staging)?;

    let encoder = builder.into_inner()?;
    let file = encoder.finish()?;
    file.sync_all()?;
    Ok(file.metadata()?.len())
}

/// Unpack `archive_path` into `dest`.
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> io::Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.unpack(dest)
}
