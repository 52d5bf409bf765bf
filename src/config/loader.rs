//! Configuration loading and environment overrides

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RankdeployError, RankdeployResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{AuthMode, Config};

/// Project configuration file name, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "rankdeploy.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> RankdeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| RankdeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from an explicit file, the project config, the user config, or defaults
///
/// An explicit path must exist and parse; implicit files are skipped when absent.
pub fn load_or_default(
    project_root: &Path,
    explicit: Option<&Path>,
) -> RankdeployResult<(Config, Vec<ConfigWarning>)> {
    if let Some(path) = explicit {
        return load_with_warnings(path);
    }

    let project_config = project_root.join(PROJECT_CONFIG_FILE);
    if project_config.exists() {
        return load_with_warnings(&project_config);
    }

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            return load_with_warnings(&user_config);
        }
    }

    Ok((Config::default(), Vec::new()))
}

/// Apply environment variable overrides from the process environment
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply environment variable overrides from an arbitrary lookup
pub fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> Config {
    let get = |key: &str| get_env(key).filter(|v| !v.trim().is_empty());

    if let Some(mode) = get("RANKDEPLOY_AUTH_MODE") {
        let validator = EnvVarValidator::new("RANKDEPLOY_AUTH_MODE", AuthMode::VALID_VALUES);
        config.auth.mode = validator.parse(&mode, AuthMode::parse, config.auth.mode);
    }

    if let Some(method) = get("STATE_STORAGE_METHOD") {
        let validator = EnvVarValidator::new(
            "STATE_STORAGE_METHOD",
            crate::domain::value_objects::StorageMethod::VALID_VALUES,
        );
        config.function.storage_method = validator.parse(
            &method,
            |s| s.parse().ok(),
            config.function.storage_method,
        );
    }

    if let Some(region) = get("RANKDEPLOY_REGION") {
        config.function.region = region.trim().to_string();
    }

    if let Some(binary) = get("RANKDEPLOY_GCLOUD") {
        config.gcloud.binary = binary;
    }

    if let Some(file) = get("RANKDEPLOY_OIDC_TOKEN_FILE") {
        config.auth.token_file = Some(PathBuf::from(file));
    }

    // Names match the CI secrets and variables.
    if let Some(provider) = get("WORKLOAD_IDENTITY_PROVIDER") {
        config.auth.workload_identity_provider = Some(provider.trim().to_string());
    }
    if let Some(account) = get("SERVICE_ACCOUNT") {
        config.auth.service_account = Some(account.trim().to_string());
    }
    if let Some(project) = get("GCP_PROJECT_ID") {
        config.function.project = Some(project.trim().to_string());
    }

    config
}

/// `$XDG_CONFIG_HOME/rankdeploy/config.toml`
fn user_config_path() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("rankdeploy").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "function",
        "name",
        "runtime",
        "entry_point",
        "region",
        "source",
        "storage_method",
        "allow_unauthenticated",
        "project",
        "scheduler",
        "job",
        "schedule",
        "time_zone",
        "attempt_deadline",
        "auth",
        "mode",
        "workload_identity_provider",
        "service_account",
        "token_file",
        "manifest",
        "lockfile",
        "output",
        "extras",
        "gcloud",
        "binary",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
