//! rankdeploy - deployment pipeline for the crypto-rank-tracker Cloud Function
//!
//! rankdeploy exports a pinned `requirements.txt` from the function's lockfile,
//! deploys the function with workload identity credentials, and re-provisions
//! the Cloud Scheduler job that invokes it every ten minutes.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{DeployPipeline, PipelineOptions, PipelineReport};
pub use config::{Config, DeployInputs};
pub use domain::value_objects::PipelineStep;
pub use error::{RankdeployError, RankdeployResult};
