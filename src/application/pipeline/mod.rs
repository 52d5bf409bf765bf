//! Deployment Pipeline
//!
//! ## Structure
//!
//! - `options` - Resolved run inputs (`PipelineOptions`) and preflight checks
//! - `result` - Result types (`PipelineReport`)
//! - `use_case` - Step orchestration (`DeployPipeline`)
//!
//! ## Usage
//!
//! ```ignore
//! use rankdeploy::application::pipeline::{DeployPipeline, PipelineOptions};
//!
//! let pipeline = DeployPipeline::new(cloud, FsLockfileRepository::new());
//! let report = pipeline.execute(&options, &sink)?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::{
    resolve_auth, FunctionSettings, ManifestSettings, PipelineOptions, SchedulerSettings,
    HTTP_METHOD,
};
pub use result::{ManifestSummary, PipelineReport, StepTiming};
pub use use_case::DeployPipeline;
