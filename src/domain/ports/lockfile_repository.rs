//! LockfileRepository port - abstraction for Python lockfiles and manifests
//!
//! This trait allows the pipeline to read `uv.lock` / `poetry.lock` and write
//! `requirements.txt` without knowing about TOML or the file system.

use std::path::{Path, PathBuf};

use crate::domain::entities::PythonLock;

/// Result type for lockfile operations
pub type LockfileResult<T> = Result<T, LockfileError>;

/// Lockfile operation errors
#[derive(Debug)]
pub enum LockfileError {
    /// No supported lockfile in the directory
    NotFound(PathBuf),
    /// Invalid lockfile format
    InvalidFormat { path: PathBuf, message: String },
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for LockfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockfileError::NotFound(dir) => {
                write!(f, "No uv.lock or poetry.lock in {}", dir.display())
            }
            LockfileError::InvalidFormat { path, message } => {
                write!(f, "Invalid lockfile {}: {}", path.display(), message)
            }
            LockfileError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for LockfileError {}

impl From<std::io::Error> for LockfileError {
    fn from(err: std::io::Error) -> Self {
        LockfileError::Io(err)
    }
}

/// Abstract repository for lockfiles and the manifests derived from them
pub trait LockfileRepository {
    /// Find the lockfile for a function source directory
    ///
    /// An explicit path wins; otherwise `uv.lock` is preferred over `poetry.lock`.
    fn locate(&self, source_dir: &Path, explicit: Option<&Path>) -> LockfileResult<PathBuf>;

    /// Parse a lockfile
    fn load(&self, path: &Path) -> LockfileResult<PythonLock>;

    /// Write the rendered manifest
    fn write_manifest(&self, path: &Path, content: &str) -> LockfileResult<()>;
}
