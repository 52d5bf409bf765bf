//! Event Sink Implementations
//!
//! - JsonEventSink: NDJSON output for CI/automation
//! - The console sink lives with the binary's UI code

mod json;

pub use json::{event_json, JsonEventSink};
