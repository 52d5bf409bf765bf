//! Python lockfile repository
//!
//! Reads `uv.lock` / `poetry.lock` natively and writes the exported manifest.

mod poetry;
mod uv;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::entities::{LockFormat, PythonLock};
use crate::domain::ports::lockfile_repository::{LockfileError, LockfileResult};
use crate::domain::ports::LockfileRepository;

/// File-system backed lockfile repository
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLockfileRepository;

impl FsLockfileRepository {
    pub fn new() -> Self {
        Self
    }
}

/// Lock format from a file name
pub fn detect_format(path: &Path) -> Option<LockFormat> {
    match path.file_name()?.to_str()? {
        "uv.lock" => Some(LockFormat::Uv),
        "poetry.lock" => Some(LockFormat::Poetry),
        _ => None,
    }
}

/// Parse lockfile content of a known format
pub fn parse_lockfile(format: LockFormat, content: &str) -> Result<PythonLock, String> {
    match format {
        LockFormat::Uv => uv::parse(content),
        LockFormat::Poetry => poetry::parse(content),
    }
}

impl LockfileRepository for FsLockfileRepository {
    fn locate(&self, source_dir: &Path, explicit: Option<&Path>) -> LockfileResult<PathBuf> {
        if let Some(path) = explicit {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                source_dir.join(path)
            };
            return if path.is_file() {
                Ok(path)
            } else {
                Err(LockfileError::NotFound(path))
            };
        }

        [LockFormat::Uv, LockFormat::Poetry]
            .iter()
            .map(|format| source_dir.join(format.file_name()))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| LockfileError::NotFound(source_dir.to_path_buf()))
    }

    fn load(&self, path: &Path) -> LockfileResult<PythonLock> {
        let format = detect_format(path).ok_or_else(|| LockfileError::InvalidFormat {
            path: path.to_path_buf(),
            message: "expected a file named uv.lock or poetry.lock".to_string(),
        })?;
        let content = fs::read_to_string(path)?;
        parse_lockfile(format, &content).map_err(|message| LockfileError::InvalidFormat {
            path: path.to_path_buf(),
            message,
        })
    }

    fn write_manifest(&self, path: &Path, content: &str) -> LockfileResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Write to a sibling temp file, then rename over the target.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| LockfileError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn locate_prefers_uv_over_poetry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("poetry.lock"), "").unwrap();
        fs::write(dir.path().join("uv.lock"), "").unwrap();

        let repo = FsLockfileRepository::new();
        let found = repo.locate(dir.path(), None).unwrap();
        assert_eq!(found, dir.path().join("uv.lock"));
    }

    #[test]
    fn locate_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let repo = FsLockfileRepository::new();
        let err = repo
            .locate(dir.path(), Some(Path::new("locks/uv.lock")))
            .unwrap_err();
        assert!(matches!(err, LockfileError::NotFound(p) if p.ends_with("locks/uv.lock")));
    }

    #[test]
    fn locate_reports_missing_lockfile() {
        let dir = tempdir().unwrap();
        let err = FsLockfileRepository::new().locate(dir.path(), None).unwrap_err();
        assert!(matches!(err, LockfileError::NotFound(_)));
    }

    #[test]
    fn load_rejects_unknown_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Pipfile.lock");
        fs::write(&path, "{}").unwrap();
        let err = FsLockfileRepository::new().load(&path).unwrap_err();
        assert!(matches!(err, LockfileError::InvalidFormat { .. }));
    }

    #[test]
    fn write_manifest_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "stale==0.0.1\n").unwrap();

        FsLockfileRepository::new()
            .write_manifest(&path, "aiohttp==3.9.5\n")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "aiohttp==3.9.5\n");
    }
}
