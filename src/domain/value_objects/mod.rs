//! Domain Value Objects
//!
//! Immutable, validated values that describe a deployment.

mod cron;
mod deadline;
mod function_uri;
mod identity_provider;
mod pipeline_step;
mod service_account;
mod storage_method;

pub use cron::CronSchedule;
pub use deadline::AttemptDeadline;
pub use function_uri::FunctionUri;
pub use identity_provider::WorkloadIdentityProvider;
pub use pipeline_step::PipelineStep;
pub use service_account::ServiceAccountEmail;
pub use storage_method::StorageMethod;
