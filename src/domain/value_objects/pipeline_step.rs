//! Pipeline Step Value Object
//!
//! The seven ordered steps of a deployment run.

use std::fmt;

use serde::Serialize;

/// A single step of the deployment pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStep {
    /// Flatten the lockfile into requirements.txt
    ExportManifest,
    /// Obtain short-lived federated credentials
    Authenticate,
    /// Deploy (or overwrite) the function
    DeployFunction,
    /// Read the deployed function's service URI
    ResolveFunctionUri,
    /// Remove the previous scheduler job, if any
    DeleteSchedulerJob,
    /// Create the scheduler job bound to the function URI
    CreateSchedulerJob,
    /// Print the function URI and job description
    Verify,
}

impl PipelineStep {
    pub const ALL: [PipelineStep; 7] = [
        PipelineStep::ExportManifest,
        PipelineStep::Authenticate,
        PipelineStep::DeployFunction,
        PipelineStep::ResolveFunctionUri,
        PipelineStep::DeleteSchedulerJob,
        PipelineStep::CreateSchedulerJob,
        PipelineStep::Verify,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExportManifest => "export-manifest",
            Self::Authenticate => "authenticate",
            Self::DeployFunction => "deploy-function",
            Self::ResolveFunctionUri => "resolve-function-uri",
            Self::DeleteSchedulerJob => "delete-scheduler-job",
            Self::CreateSchedulerJob => "create-scheduler-job",
            Self::Verify => "verify",
        }
    }

    /// Human-readable title for console output
    pub fn title(self) -> &'static str {
        match self {
            Self::ExportManifest => "Export requirements manifest",
            Self::Authenticate => "Authenticate with workload identity",
            Self::DeployFunction => "Deploy function",
            Self::ResolveFunctionUri => "Resolve function URI",
            Self::DeleteSchedulerJob => "Delete previous scheduler job",
            Self::CreateSchedulerJob => "Create scheduler job",
            Self::Verify => "Verify deployment",
        }
    }

    /// 1-based position in the full pipeline
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
