//! Per-function run lock
//!
//! Serializes runs for the same function on one machine with an exclusive
//! advisory lock under the system temp directory.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{RankdeployError, RankdeployResult};

/// Held for the duration of a run; the lock is released on drop
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Lock file used for `function` in the system temp directory
    pub fn default_path(function: &str) -> PathBuf {
        let safe: String = function
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        std::env::temp_dir().join(format!("rankdeploy-{safe}.lock"))
    }

    /// Try to take the lock without waiting
    pub fn acquire(function: &str, path: &Path) -> RankdeployResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        if let Err(e) = file.try_lock_exclusive() {
            if is_contended(&e) {
                return Err(RankdeployError::RunInProgress {
                    function: function.to_string(),
                    lock: path.to_path_buf(),
                });
            }
            return Err(e.into());
        }

        tracing::debug!(lock = %path.display(), "acquired run lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether a lock error means another holder, as opposed to no lock support
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
