//! Error types for rankdeploy
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::CloudError;
use crate::domain::value_objects::PipelineStep;

/// Result type alias for rankdeploy operations
pub type RankdeployResult<T> = Result<T, RankdeployError>;

/// Main error type for rankdeploy operations
#[derive(Error, Debug)]
pub enum RankdeployError {
    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Required secret or variable is missing
    #[error("{name} is not set")]
    MissingInput { name: String },

    /// A configured value failed validation
    #[error("invalid {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// No supported lockfile in the function source
    #[error("no uv.lock or poetry.lock found in {dir}")]
    LockfileNotFound { dir: PathBuf },

    /// Lockfile exists but cannot be turned into a manifest
    #[error("cannot read lockfile {path}: {message}")]
    Lockfile { path: PathBuf, message: String },

    /// Cloud operation failed outside of a pipeline step
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// A pipeline step failed; later steps did not run
    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: PipelineStep,
        #[source]
        source: Box<RankdeployError>,
    },

    /// Run was interrupted between steps
    #[error("interrupted before step '{next}'")]
    Interrupted { next: PipelineStep },

    /// Another run for the same function holds the run lock
    #[error("another run for '{function}' is in progress (lock: {lock})")]
    RunInProgress { function: String, lock: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RankdeployError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingInput { name: name.into() }
    }

    /// The step this error is attributed to, if any
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            Self::Interrupted { next } => Some(*next),
            _ => None,
        }
    }
}
