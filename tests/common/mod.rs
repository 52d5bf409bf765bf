//! Shared helpers for rankdeploy CLI tests.
//!
//! - `TestEnv`: isolated project directory, home and temp dir
//! - Fixtures: lockfiles and a scripted `gcloud` stand-in

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
