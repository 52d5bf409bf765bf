//! Pipeline Result
//!
//! What a finished run produced.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::entities::SchedulerJobDescription;
use crate::domain::value_objects::{FunctionUri, PipelineStep};

/// The exported requirements manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestSummary {
    pub lockfile: PathBuf,
    pub path: PathBuf,
    pub packages: usize,
    pub digest: String,
}

/// One completed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepTiming {
    pub step: PipelineStep,
    pub elapsed_ms: u64,
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub steps: Vec<StepTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_uri: Option<FunctionUri>,
    /// Whether a previous scheduler job was found and deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_job: Option<bool>,
    /// Job as described by the Verify step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<SchedulerJobDescription>,
    pub elapsed_ms: u64,
}

impl PipelineReport {
    pub fn steps_run(&self) -> usize {
        self.steps.len()
    }

    pub fn ran(&self, step: PipelineStep) -> bool {
        self.steps.iter().any(|t| t.step == step)
    }
}
