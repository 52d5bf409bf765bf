//! Domain Entities
//!
//! Core domain objects of a deployment run.

mod auth;
mod function;
mod manifest;
mod python_lock;
mod scheduler_job;

pub use auth::{AuthMethod, SubjectTokenSource};
pub use function::{FunctionEnv, FunctionSpec, DEFAULT_BUCKET_NAME};
pub use manifest::{Requirement, RequirementsManifest};
pub(crate) use python_lock::normalize_name;
pub use python_lock::{DependencyEdge, LockFormat, LockedPackage, PackageSource, PythonLock};
pub use scheduler_job::{JobDeletion, SchedulerJobDescription, SchedulerJobSpec};
