//! gcloud CLI adapter
//!
//! - `commands` - argument builders (also used to render plans)
//! - `response` - output parsing
//! - `provider` - the `CloudProvider` implementation

pub mod commands;
mod provider;
mod response;

pub use commands::{GcloudCommand, JobParams};
pub use provider::GcloudProvider;
