//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployPipeline` - Runs the selected deployment steps in order, stopping at the first failure
//! - `CheckUseCase` - Diagnoses configuration, credentials and the lockfile without cloud calls

pub mod check;
pub mod pipeline;

pub use check::{CheckItem, CheckOptions, CheckResult, CheckStatus, CheckUseCase};

pub use pipeline::{
    resolve_auth, DeployPipeline, FunctionSettings, ManifestSettings, ManifestSummary,
    PipelineOptions, PipelineReport, SchedulerSettings, StepTiming, HTTP_METHOD,
};
