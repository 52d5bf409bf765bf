//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod cloud_provider;
pub mod command_runner;
pub mod lockfile_repository;
pub mod pipeline_events;

pub use cloud_provider::{CloudError, CloudProvider, CloudResult};
pub use command_runner::{CommandOutput, CommandRunner};
pub use lockfile_repository::{LockfileError, LockfileRepository};
pub use pipeline_events::{NoopEventSink, PipelineEvent, PipelineEventSink};
