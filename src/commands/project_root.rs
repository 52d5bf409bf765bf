use std::path::{Path, PathBuf};

use rankdeploy::config::PROJECT_CONFIG_FILE;

/// Discover the project root directory from an invocation directory.
///
/// Heuristics (first match wins, walking upward from `start`):
/// - `rankdeploy.toml`
/// - `.git/` or `.git` file (git repo root / worktree)
///
/// Falls back to `start` when no markers are found.
pub(crate) fn discover_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if dir.join(PROJECT_CONFIG_FILE).is_file() {
            return dir.to_path_buf();
        }
        if dir.join(".git").exists() {
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_project_root_prefers_nearest_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::create_dir_all(root.join("deploy/src")).unwrap();
        std::fs::write(root.join("deploy/rankdeploy.toml"), "").unwrap();

        let start = root.join("deploy/src");
        assert_eq!(discover_project_root(&start), root.join("deploy"));
    }

    #[test]
    fn discover_project_root_falls_back_to_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::create_dir_all(root.join("sub/src")).unwrap();

        let start = root.join("sub/src");
        assert_eq!(discover_project_root(&start), root.to_path_buf());
    }

    #[test]
    fn discover_project_root_defaults_to_start() {
        let dir = tempdir().unwrap();
        let start = dir.path().join("a/b");
        std::fs::create_dir_all(&start).unwrap();
        // tempdir itself may live inside a git checkout; only assert the walk stops somewhere above.
        assert!(start.starts_with(discover_project_root(&start)));
    }
}
