//! Domain Services
//!
//! Stateless logic over domain entities.

mod credentials;
mod manifest_resolver;

pub use credentials::{external_account_config, ExternalAccountConfig};
pub use manifest_resolver::resolve_manifest;
