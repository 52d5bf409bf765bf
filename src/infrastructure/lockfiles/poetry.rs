//! poetry.lock parser

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::entities::{DependencyEdge, LockFormat, LockedPackage, PackageSource, PythonLock};

#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default, rename = "package")]
    packages: Vec<PoetryPackage>,
    #[serde(default)]
    extras: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PoetryPackage {
    name: String,
    version: String,
    #[serde(default)]
    optional: bool,
    /// Poetry 2
    #[serde(default)]
    groups: Vec<String>,
    /// Poetry 1
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    markers: Option<Markers>,
    #[serde(default)]
    dependencies: BTreeMap<String, toml::Value>,
    #[serde(default)]
    source: Option<PoetrySource>,
}

/// `markers` is a string, or a table keyed by group in Poetry 2
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Markers {
    Single(String),
    PerGroup(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct PoetrySource {
    #[serde(rename = "type")]
    kind: String,
    url: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    resolved_reference: Option<String>,
}

/// Parse poetry.lock content
pub fn parse(content: &str) -> Result<PythonLock, String> {
    let lock: PoetryLock = toml::from_str(content).map_err(|e| e.to_string())?;

    let packages = lock
        .packages
        .into_iter()
        .map(|package| {
            let mut locked = LockedPackage::new(package.name, package.version);
            locked.optional = package.optional;
            locked.groups = if package.groups.is_empty() {
                package.category.into_iter().collect()
            } else {
                package.groups
            };
            locked.marker = package.markers.and_then(|m| match m {
                Markers::Single(marker) => Some(marker),
                Markers::PerGroup(mut by_group) => by_group.remove("main"),
            });
            locked.source = package
                .source
                .map(convert_source)
                .unwrap_or(PackageSource::Registry);
            locked.dependencies = package
                .dependencies
                .into_iter()
                .map(|(name, spec)| dependency_edge(name, &spec))
                .collect();
            locked
        })
        .collect();

    let mut lock_out = PythonLock::new(LockFormat::Poetry, packages);
    lock_out.extras = lock.extras;
    Ok(lock_out)
}

fn convert_source(source: PoetrySource) -> PackageSource {
    match source.kind.as_str() {
        "git" => PackageSource::Git {
            url: source.url,
            rev: source.resolved_reference.or(source.reference),
        },
        "url" => PackageSource::Url(source.url),
        "file" | "directory" => PackageSource::Path(PathBuf::from(source.url)),
        // legacy / explicit / supplemental indexes
        _ => PackageSource::Registry,
    }
}

fn dependency_edge(name: String, spec: &toml::Value) -> DependencyEdge {
    let mut edge = DependencyEdge::new(name);
    if let Some(table) = spec.as_table() {
        if let Some(markers) = table.get("markers").and_then(toml::Value::as_str) {
            edge = edge.with_marker(markers);
        }
        if let Some(extras) = table.get("extras").and_then(toml::Value::as_array) {
            edge = edge.with_extras(
                extras
                    .iter()
                    .filter_map(toml::Value::as_str)
                    .map(str::to_string)
                    .collect(),
            );
        }
    }
    edge
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str = r#"
[[package]]
name = "aiohttp"
version = "3.9.5"
description = "Async http client/server framework"
optional = false
python-versions = ">=3.8"
groups = ["main"]

[package.dependencies]
yarl = ">=1.0,<2.0"
brotli = {version = "*", optional = true, markers = "platform_python_implementation == \"CPython\""}

[[package]]
name = "pytest"
version = "8.2.0"
optional = false
groups = ["dev"]

[[package]]
name = "brotli"
version = "1.1.0"
optional = true
groups = ["main"]

[[package]]
name = "ranklib"
version = "0.2.0"
optional = false
category = "main"

[package.source]
type = "git"
url = "https://github.com/org/ranklib.git"
reference = "main"
resolved_reference = "0f1e2d3c"

[extras]
speedups = ["brotli"]

[metadata]
lock-version = "2.0"
"#;

    #[test]
    fn parses_groups_sources_and_extras() {
        let lock = parse(LOCK).unwrap();
        assert_eq!(lock.format, LockFormat::Poetry);
        assert_eq!(lock.packages.len(), 4);
        assert_eq!(lock.packages[1].groups, vec!["dev".to_string()]);
        assert!(lock.packages[2].optional);
        assert_eq!(lock.packages[3].groups, vec!["main".to_string()]);
        assert_eq!(
            lock.packages[3].source,
            PackageSource::Git {
                url: "https://github.com/org/ranklib.git".to_string(),
                rev: Some("0f1e2d3c".to_string()),
            }
        );
        assert_eq!(lock.extras["speedups"], vec!["brotli".to_string()]);
    }

    #[test]
    fn inline_dependency_tables_keep_markers() {
        let lock = parse(LOCK).unwrap();
        let brotli = lock.packages[0]
            .dependencies
            .iter()
            .find(|d| d.name == "brotli")
            .unwrap();
        assert!(brotli.marker.as_deref().unwrap().contains("CPython"));
    }

    #[test]
    fn per_group_markers_use_main_group() {
        let lock = parse(
            r#"
[[package]]
name = "colorama"
version = "0.4.6"
groups = ["main", "dev"]
markers = {main = "sys_platform == \"win32\"", dev = "python_version >= \"3.8\""}
"#,
        )
        .unwrap();
        assert_eq!(
            lock.packages[0].marker.as_deref(),
            Some("sys_platform == \"win32\"")
        );
    }
}
