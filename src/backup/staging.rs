use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scoped transient directory exclusively owned by one pipeline invocation.
///
/// Construction recreates the directory empty (a leftover from an
/// interrupted earlier run is discarded). The directory is removed on drop
/// on every exit path; success paths call [`StagingDir::cleanup`] instead so
/// removal failures surface to the log at the right place.
pub struct StagingDir {
    path: PathBuf,
    armed: bool,
}

impl StagingDir {
    /// Recreate `path` as an empty directory owned by this guard.
    pub fn create(path: PathBuf) -> io::Result<Self> {
        if path.exists() {
            warn!("Removing stale staging directory {}", path.display());
            std::fs::remove_dir_all(&path)?;
        }
        std::fs::create_dir_all(&path)?;
        debug!("Created staging directory {}", path.display());
        Ok(Self { path, armed: true })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now, disarming the drop guard.
    pub fn cleanup(mut self) -> io::Result<()> {
        self.armed = false;
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove staging directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}
