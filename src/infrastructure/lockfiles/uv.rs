//! uv.lock parser

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::entities::{DependencyEdge, LockFormat, LockedPackage, PackageSource, PythonLock};

#[derive(Debug, Deserialize)]
struct UvLock {
    #[serde(default, rename = "package")]
    packages: Vec<UvPackage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UvPackage {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    source: Option<UvSource>,
    #[serde(default)]
    dependencies: Vec<UvEdge>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, Vec<UvEdge>>,
}

/// Registry sources carry no information the manifest needs
#[derive(Debug, Default, Deserialize)]
struct UvSource {
    git: Option<String>,
    url: Option<String>,
    path: Option<String>,
    directory: Option<String>,
    editable: Option<String>,
    #[serde(rename = "virtual")]
    virtual_: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UvEdge {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    extra: Vec<String>,
    #[serde(default)]
    marker: Option<String>,
}

impl From<UvEdge> for DependencyEdge {
    fn from(edge: UvEdge) -> Self {
        DependencyEdge {
            name: edge.name,
            version: edge.version,
            extras: edge.extra,
            marker: edge.marker,
        }
    }
}

/// Parse uv.lock content
///
/// `dev-dependencies` tables are ignored entirely; they never reach the manifest.
pub fn parse(content: &str) -> Result<PythonLock, String> {
    let lock: UvLock = toml::from_str(content).map_err(|e| e.to_string())?;

    let packages = lock
        .packages
        .into_iter()
        .map(|package| {
            let mut locked = LockedPackage::new(package.name, package.version.unwrap_or_default());
            locked.source = package.source.map(convert_source).unwrap_or(PackageSource::Registry);
            locked.dependencies = package.dependencies.into_iter().map(Into::into).collect();
            locked.optional_dependencies = package
                .optional_dependencies
                .into_iter()
                .map(|(extra, edges)| (extra, edges.into_iter().map(Into::into).collect()))
                .collect();
            locked
        })
        .collect();

    Ok(PythonLock::new(LockFormat::Uv, packages))
}

fn convert_source(source: UvSource) -> PackageSource {
    if let Some(root) = source.virtual_.as_deref().or(source.editable.as_deref()) {
        if is_project_root(root) {
            return PackageSource::Project;
        }
        return PackageSource::Path(PathBuf::from(root));
    }
    if let Some(git) = source.git {
        return parse_git(&git);
    }
    if let Some(url) = source.url {
        return PackageSource::Url(url);
    }
    if let Some(path) = source.path.or(source.directory) {
        return PackageSource::Path(PathBuf::from(path));
    }
    PackageSource::Registry
}

fn is_project_root(path: &str) -> bool {
    matches!(path.trim_end_matches('/'), "." | "")
}

/// `https://github.com/org/repo?rev=main#<commit>` pins to the commit
fn parse_git(raw: &str) -> PackageSource {
    let (location, commit) = match raw.split_once('#') {
        Some((location, commit)) => (location, Some(commit.to_string())),
        None => (raw, None),
    };
    let (url, query) = match location.split_once('?') {
        Some((url, query)) => (url, Some(query)),
        None => (location, None),
    };
    let rev = commit.or_else(|| {
        query.and_then(|q| {
            q.split('&').find_map(|pair| match pair.split_once('=') {
                Some(("rev" | "tag" | "branch", value)) => Some(value.to_string()),
                _ => None,
            })
        })
    });
    PackageSource::Git {
        url: url.to_string(),
        rev,
    }
}
