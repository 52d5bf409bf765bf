//! Requirements manifest entity - the flat install list shipped with the function

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use super::python_lock::{normalize_name, LockFormat, PackageSource};

/// One line of requirements.txt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version: String,
    pub source: PackageSource,
    pub marker: Option<String>,
}

impl Requirement {
    pub fn render(&self) -> String {
        let mut line = match &self.source {
            PackageSource::Registry | PackageSource::Project => {
                format!("{}=={}", self.name, self.version)
            }
            PackageSource::Git { url, rev } => match rev {
                Some(rev) => format!("{} @ git+{}@{}", self.name, url, rev),
                None => format!("{} @ git+{}", self.name, url),
            },
            PackageSource::Url(url) => format!("{} @ {}", self.name, url),
            PackageSource::Path(path) => {
                let path = path.to_string_lossy().replace('\\', "/");
                if path.starts_with('.') || path.starts_with('/') {
                    path
                } else {
                    format!("./{path}")
                }
            }
        };
        if let Some(marker) = &self.marker {
            let _ = write!(line, " ; {marker}");
        }
        line
    }
}

/// Flattened, sorted install manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementsManifest {
    format: LockFormat,
    requirements: Vec<Requirement>,
}

impl RequirementsManifest {
    /// Sorts requirements by normalized name, then version
    pub fn new(format: LockFormat, mut requirements: Vec<Requirement>) -> Self {
        requirements.sort_by(|a, b| {
            normalize_name(&a.name)
                .cmp(&normalize_name(&b.name))
                .then_with(|| a.version.cmp(&b.version))
        });
        Self {
            format,
            requirements,
        }
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "# This file was generated by rankdeploy from {}. Do not edit.\n",
            self.format.file_name()
        );
        for requirement in &self.requirements {
            out.push_str(&requirement.render());
            out.push('\n');
        }
        out
    }

    /// `sha256:<hex>` digest of the rendered manifest
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render().as_bytes());
        format!("sha256:{:x}", hasher.finalize())
    }
}
