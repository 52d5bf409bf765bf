//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `gcloud/` - CloudProvider over the gcloud CLI
//! - `memory` - In-process CloudProvider for tests and rehearsals
//! - `process` - CommandRunner over `std::process`
//! - `lockfiles/` - LockfileRepository for uv.lock / poetry.lock
//! - `events/` - Event sinks (JSON)
//! - `run_lock`, `github`, `workflow` - run serialization and CI integration

pub mod events;
pub mod gcloud;
pub mod github;
pub mod lockfiles;
pub mod memory;
pub mod process;
pub mod run_lock;
pub mod workflow;

// Re-export for convenience
pub use events::JsonEventSink;
pub use gcloud::GcloudProvider;
pub use lockfiles::FsLockfileRepository;
pub use memory::{CloudOperation, InMemoryCloud};
pub use process::SystemCommandRunner;
pub use run_lock::RunLock;
pub use workflow::{render_workflow, WorkflowOptions};
