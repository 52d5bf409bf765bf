//! Python lockfile entity - packages pinned by uv or Poetry
//!
//! Pure data; parsing lives in `infrastructure::lockfiles`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which tool produced the lockfile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockFormat {
    Uv,
    Poetry,
}

impl LockFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Uv => "uv.lock",
            Self::Poetry => "poetry.lock",
        }
    }
}

impl fmt::Display for LockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Where a locked package is installed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// Package index (PyPI or a mirror)
    Registry,
    /// Git checkout at a resolved revision
    Git { url: String, rev: Option<String> },
    /// Direct archive URL
    Url(String),
    /// Local path relative to the lockfile
    Path(PathBuf),
    /// The project being locked (never exported)
    Project,
}

/// A dependency edge from one package to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub name: String,
    /// Disambiguates forked resolutions with several versions of one name
    pub version: Option<String>,
    /// Extras of the target package this edge activates
    pub extras: Vec<String>,
    pub marker: Option<String>,
}

impl DependencyEdge {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            extras: Vec::new(),
            marker: None,
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }
}

/// One `[[package]]` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    pub source: PackageSource,
    pub dependencies: Vec<DependencyEdge>,
    pub optional_dependencies: BTreeMap<String, Vec<DependencyEdge>>,
    /// Poetry dependency groups; empty when the lockfile does not record them
    pub groups: Vec<String>,
    /// Poetry: only installed through an extra
    pub optional: bool,
    /// Poetry: environment marker recorded on the package itself
    pub marker: Option<String>,
}

impl LockedPackage {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: PackageSource::Registry,
            dependencies: Vec::new(),
            optional_dependencies: BTreeMap::new(),
            groups: Vec::new(),
            optional: false,
            marker: None,
        }
    }

    pub fn is_project(&self) -> bool {
        self.source == PackageSource::Project
    }
}

/// A parsed lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonLock {
    pub format: LockFormat,
    pub packages: Vec<LockedPackage>,
    /// Poetry `[extras]`: extra name to package names
    pub extras: BTreeMap<String, Vec<String>>,
}

impl PythonLock {
    pub fn new(format: LockFormat, packages: Vec<LockedPackage>) -> Self {
        Self {
            format,
            packages,
            extras: BTreeMap::new(),
        }
    }

    /// Find a package by normalized name, optionally pinned to a version
    pub fn find(&self, name: &str, version: Option<&str>) -> Option<usize> {
        let wanted = normalize_name(name);
        let mut matches = self
            .packages
            .iter()
            .enumerate()
            .filter(|(_, p)| normalize_name(&p.name) == wanted);
        match version {
            Some(v) => matches.find(|(_, p)| p.version == v).map(|(i, _)| i),
            None => matches.next().map(|(i, _)| i),
        }
    }
}

/// PEP 503 name normalization
pub(crate) fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !last_was_sep {
                out.push('-');
            }
            last_was_sep = true;
        } else {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_names_per_pep_503() {
        assert_eq!(normalize_name("Google_Cloud.Storage"), "google-cloud-storage");
        assert_eq!(normalize_name("typing__extensions"), "typing-extensions");
        assert_eq!(normalize_name("aiohttp"), "aiohttp");
    }

    #[test]
    fn find_matches_normalized_name_and_version() {
        let lock = PythonLock::new(
            LockFormat::Uv,
            vec![
                LockedPackage::new("numpy", "1.26.4"),
                LockedPackage::new("numpy", "2.0.1"),
                LockedPackage::new("Typing_Extensions", "4.12.2"),
            ],
        );
        assert_eq!(lock.find("typing-extensions", None), Some(2));
        assert_eq!(lock.find("numpy", Some("2.0.1")), Some(1));
        assert_eq!(lock.find("numpy", None), Some(0));
        assert_eq!(lock.find("pandas", None), None);
    }
}
