//! Manifest Resolver
//!
//! Flattens a Python lockfile into the runtime install set.
//!
//! - uv: transitive closure of the project's runtime dependencies, following
//!   extra edges; dev groups never enter the closure.
//! - Poetry: packages of the `main` group, plus optional packages named by a
//!   requested extra.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::{
    normalize_name, DependencyEdge, LockFormat, PythonLock, Requirement, RequirementsManifest,
};

/// Resolve the install manifest, activating the given project extras
pub fn resolve_manifest(
    lock: &PythonLock,
    extras: &[String],
) -> Result<RequirementsManifest, String> {
    let requirements = match lock.format {
        LockFormat::Uv => resolve_uv(lock, extras)?,
        LockFormat::Poetry => resolve_poetry(lock, extras)?,
    };
    Ok(RequirementsManifest::new(lock.format, requirements))
}

/// Every way a package was reached, as minimal sets of marker clauses; an
/// empty set means it is always installed
#[derive(Default)]
struct Reach {
    paths: Vec<BTreeSet<String>>,
    extras: BTreeSet<String>,
}

impl Reach {
    /// Record a new way of reaching the package; true when anything changed
    fn absorb(&mut self, clauses: &BTreeSet<String>, extras: &[String]) -> bool {
        let mut changed = false;
        if !self.paths.iter().any(|path| path.is_subset(clauses)) {
            self.paths.retain(|path| !clauses.is_subset(path));
            self.paths.push(clauses.clone());
            changed = true;
        }
        for extra in extras {
            changed |= self.extras.insert(extra.clone());
        }
        changed
    }

    fn marker(&self) -> Option<String> {
        // An empty path makes the package unconditional.
        let alternatives: BTreeSet<String> = self
            .paths
            .iter()
            .map(conjunction)
            .collect::<Option<_>>()?;
        match alternatives.len() {
            0 => None,
            1 => alternatives.into_iter().next(),
            _ => Some(
                alternatives
                    .iter()
                    .map(|m| format!("({m})"))
                    .collect::<Vec<_>>()
                    .join(" or "),
            ),
        }
    }
}

/// Render clauses that must all hold; `None` when there are none
fn conjunction(clauses: &BTreeSet<String>) -> Option<String> {
    match clauses.len() {
        0 => None,
        1 => clauses.iter().next().cloned(),
        _ => Some(
            clauses
                .iter()
                .map(|m| format!("({m})"))
                .collect::<Vec<_>>()
                .join(" and "),
        ),
    }
}

/// One path to a package; `clauses` are the edge markers along it
struct Visit {
    index: usize,
    clauses: BTreeSet<String>,
    extras: Vec<String>,
}

fn resolve_uv(lock: &PythonLock, extras: &[String]) -> Result<Vec<Requirement>, String> {
    let roots: Vec<usize> = lock
        .packages
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_project())
        .map(|(i, _)| i)
        .collect();
    if roots.is_empty() {
        return Err("no project package (source = { virtual = \".\" }) in uv.lock".to_string());
    }

    for extra in extras {
        let known = roots
            .iter()
            .any(|&r| lock.packages[r].optional_dependencies.contains_key(extra));
        if !known {
            return Err(format!("project has no extra named '{extra}'"));
        }
    }

    let mut reach: BTreeMap<usize, Reach> = BTreeMap::new();
    let mut queue: Vec<Visit> = roots
        .iter()
        .map(|&index| Visit {
            index,
            clauses: BTreeSet::new(),
            extras: extras.to_vec(),
        })
        .collect();

    while let Some(visit) = queue.pop() {
        let state = reach.entry(visit.index).or_default();
        if !state.absorb(&visit.clauses, &visit.extras) {
            continue;
        }

        let package = &lock.packages[visit.index];
        let mut edges: Vec<&DependencyEdge> = package.dependencies.iter().collect();
        for extra in &state.extras {
            if let Some(optional) = package.optional_dependencies.get(extra) {
                edges.extend(optional.iter());
            }
        }

        for edge in edges {
            let target = lock
                .find(&edge.name, edge.version.as_deref())
                .ok_or_else(|| {
                    format!(
                        "{} {} depends on '{}', which is not in the lockfile",
                        package.name, package.version, edge.name
                    )
                })?;
            let mut clauses = visit.clauses.clone();
            if let Some(marker) = &edge.marker {
                clauses.insert(marker.clone());
            }
            queue.push(Visit {
                index: target,
                clauses,
                extras: edge.extras.clone(),
            });
        }
    }

    Ok(reach
        .iter()
        .filter(|(&index, _)| !lock.packages[index].is_project())
        .map(|(&index, state)| {
            let package = &lock.packages[index];
            Requirement {
                name: package.name.clone(),
                version: package.version.clone(),
                source: package.source.clone(),
                marker: state.marker(),
            }
        })
        .collect())
}

fn resolve_poetry(lock: &PythonLock, extras: &[String]) -> Result<Vec<Requirement>, String> {
    let mut extra_packages = BTreeSet::new();
    for extra in extras {
        let names = lock
            .extras
            .get(extra)
            .ok_or_else(|| format!("project has no extra named '{extra}'"))?;
        extra_packages.extend(names.iter().map(|n| normalize_name(n)));
    }

    if lacks_group_data(lock) {
        tracing::warn!(
            packages = lock.packages.len(),
            "poetry.lock records no dependency groups; dev-only packages cannot be told apart and will be exported"
        );
    }

    Ok(lock
        .packages
        .iter()
        .filter(|p| p.groups.is_empty() || p.groups.iter().any(|g| g == "main"))
        .filter(|p| {
            !p.optional || extra_packages.contains(&normalize_name(&p.name))
        })
        .map(|p| Requirement {
            name: p.name.clone(),
            version: p.version.clone(),
            source: p.source.clone(),
            marker: p.marker.clone(),
        })
        .collect())
}

/// Poetry 1.5 to 1.8 write neither `category` nor `groups`
fn lacks_group_data(lock: &PythonLock) -> bool {
    !lock.packages.is_empty() && lock.packages.iter().all(|p| p.groups.is_empty())
}
