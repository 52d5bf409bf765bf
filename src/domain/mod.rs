//! Domain Layer
//!
//! Pure deployment logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Function, scheduler job, lockfile and manifest entities
//! - `value_objects/` - Validated values (cron schedule, deadline, identities)
//! - `services/` - Manifest resolution, credential configuration
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
