//! Cloud Provider Port
//!
//! One method per cloud-touching pipeline step. Implementations drive a real
//! cloud (via the gcloud CLI) or simulate one in memory.

use crate::domain::entities::{
    AuthMethod, FunctionSpec, JobDeletion, SchedulerJobDescription, SchedulerJobSpec,
};
use crate::domain::value_objects::FunctionUri;

/// Result type for cloud operations
pub type CloudResult<T> = Result<T, CloudError>;

/// Cloud operation errors
#[derive(Debug)]
pub enum CloudError {
    /// The CLI could not be started at all
    Spawn { program: String, message: String },
    /// The CLI ran and exited unsuccessfully
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// The resource does not exist
    NotFound { resource: String },
    /// The CLI succeeded but its output was not understood
    InvalidResponse(String),
    /// Credentials could not be prepared
    Credentials(String),
    /// Fault injected by a test double
    Injected(String),
}

impl CloudError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl std::fmt::Display for CloudError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn { program, message } => {
                write!(f, "failed to run '{}': {}", program, message)
            }
            Self::CommandFailed {
                command,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "'{}' exited with status {}", command, code)?,
                    None => write!(f, "'{}' was terminated by a signal", command)?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            Self::NotFound { resource } => write!(f, "{} not found", resource),
            Self::InvalidResponse(msg) => write!(f, "unexpected response: {}", msg),
            Self::Credentials(msg) => write!(f, "credentials error: {}", msg),
            Self::Injected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CloudError {}

/// Abstract cloud used by the deployment pipeline
pub trait CloudProvider: Send + Sync {
    /// Establish credentials; returns a description of the active identity
    fn authenticate(&self, auth: &AuthMethod) -> CloudResult<String>;

    /// Deploy the function, replacing any deployment with the same name
    fn deploy_function(&self, spec: &FunctionSpec) -> CloudResult<()>;

    /// Service URI of a deployed function
    fn function_uri(&self, name: &str, region: &str) -> CloudResult<FunctionUri>;

    /// Delete a scheduler job; a missing job is reported, not an error
    fn delete_scheduler_job(&self, name: &str, region: &str) -> CloudResult<JobDeletion>;

    /// Create a scheduler job (fails if one with the same name exists)
    fn create_scheduler_job(&self, spec: &SchedulerJobSpec) -> CloudResult<()>;

    /// Describe a scheduler job; `NotFound` when it does not exist
    fn describe_scheduler_job(&self, name: &str, region: &str)
        -> CloudResult<SchedulerJobDescription>;
}
