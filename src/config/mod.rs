//! Configuration module for rankdeploy
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (`RANKDEPLOY_*` plus the CI secrets/variables)
//! 3. Project config (`rankdeploy.toml` or `--config`)
//! 4. User config (`~/.config/rankdeploy/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod inputs;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use inputs::DeployInputs;
pub use loader::{
    load_or_default, load_with_warnings, with_env_overrides, with_env_overrides_from,
    ConfigWarning, PROJECT_CONFIG_FILE,
};
pub use types::{
    AuthConfig, AuthMode, Config, FunctionConfig, GcloudConfig, ManifestConfig, SchedulerConfig,
};
