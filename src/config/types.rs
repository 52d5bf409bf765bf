//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AttemptDeadline, CronSchedule, StorageMethod};
use crate::error::RankdeployResult;

use super::loader::{self, ConfigWarning};

/// How a run obtains credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Workload identity federation (CI default)
    #[default]
    WorkloadIdentity,
    /// Reuse the current gcloud login (local use)
    Ambient,
}

impl AuthMode {
    pub const VALID_VALUES: &'static [&'static str] = &["workload-identity", "ambient"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "workload-identity" | "workload_identity" | "wif" => Some(Self::WorkloadIdentity),
            "ambient" => Some(Self::Ambient),
            _ => None,
        }
    }
}

/// `[function]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    pub name: String,
    pub runtime: String,
    pub entry_point: String,
    pub region: String,
    /// Function source directory, relative to the project root
    pub source: PathBuf,
    pub storage_method: StorageMethod,
    pub allow_unauthenticated: bool,
    /// Explicit project id; derived from the service account when unset
    pub project: Option<String>,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: "crypto-rank-tracker".to_string(),
            runtime: "python311".to_string(),
            entry_point: "main".to_string(),
            region: "asia-northeast3".to_string(),
            source: PathBuf::from("."),
            storage_method: StorageMethod::Gcs,
            allow_unauthenticated: false,
            project: None,
        }
    }
}

/// `[scheduler]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub job: String,
    pub schedule: CronSchedule,
    pub time_zone: String,
    pub attempt_deadline: AttemptDeadline,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            job: "crypto-rank-tracker-job".to_string(),
            schedule: CronSchedule::every_ten_minutes(),
            time_zone: "Asia/Seoul".to_string(),
            attempt_deadline: AttemptDeadline::fifteen_minutes(),
        }
    }
}

/// `[auth]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub workload_identity_provider: Option<String>,
    pub service_account: Option<String>,
    /// Subject token file for CI systems other than GitHub Actions
    pub token_file: Option<PathBuf>,
}

/// `[manifest]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Explicit lockfile; otherwise uv.lock, then poetry.lock
    pub lockfile: Option<PathBuf>,
    /// Output path, relative to the function source
    pub output: PathBuf,
    /// Project extras to include
    pub extras: Vec<String>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            lockfile: None,
            output: PathBuf::from("requirements.txt"),
            extras: Vec::new(),
        }
    }
}

/// `[gcloud]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcloudConfig {
    pub binary: String,
}

impl Default for GcloudConfig {
    fn default() -> Self {
        Self {
            binary: "gcloud".to_string(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub function: FunctionConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub gcloud: GcloudConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> RankdeployResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> RankdeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Render as TOML (used by `rankdeploy check --show-config`)
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
