//! Pipeline Event Port
//!
//! Provides an observable interface for pipeline runs.
//! Enables progress reporting, JSON event streams, and CI annotations.

use std::path::PathBuf;

use crate::domain::entities::SchedulerJobDescription;
use crate::domain::value_objects::{FunctionUri, PipelineStep};

/// Event emitted during a pipeline run
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Run started
    Started {
        function: String,
        region: String,
        steps: Vec<PipelineStep>,
    },

    /// A step is about to run
    StepStarted { step: PipelineStep },

    /// requirements.txt was written
    ManifestExported {
        lockfile: PathBuf,
        path: PathBuf,
        packages: usize,
        digest: String,
    },

    /// Credentials are active
    Authenticated { identity: String },

    /// Function deployment finished
    FunctionDeployed { name: String, region: String },

    /// Function URI was read back
    FunctionUriResolved { uri: FunctionUri },

    /// Previous job removed (or found absent)
    SchedulerJobDeleted { job: String, existed: bool },

    /// New job created
    SchedulerJobCreated {
        job: String,
        uri: FunctionUri,
        schedule: String,
    },

    /// Post-deploy state, informational only
    Verified {
        uri: Option<FunctionUri>,
        job: Option<SchedulerJobDescription>,
    },

    /// Step finished successfully
    StepCompleted { step: PipelineStep, elapsed_ms: u64 },

    /// Step failed; the run stops here
    StepFailed { step: PipelineStep, error: String },

    /// Run stopped by the user before `next`
    Interrupted { next: PipelineStep },

    /// Run finished
    Completed {
        success: bool,
        steps_run: usize,
        elapsed_ms: u64,
    },
}

/// Trait for receiving pipeline events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait PipelineEventSink: Send + Sync {
    /// Handle a pipeline event
    fn on_event(&self, event: PipelineEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl PipelineEventSink for NoopEventSink {
    fn on_event(&self, _event: PipelineEvent) {}
}
