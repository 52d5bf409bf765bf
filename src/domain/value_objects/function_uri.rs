//! Function URI Value Object

use std::fmt;

use serde::Serialize;
use url::Url;

/// Service URI reported by the cloud for a deployed function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FunctionUri(String);

impl FunctionUri {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let uri = raw.trim();
        if uri.is_empty() {
            return Err("function has no service URI".to_string());
        }
        let parsed = Url::parse(uri).map_err(|e| format!("'{uri}' is not a valid URL: {e}"))?;
        if parsed.scheme() != "https" {
            return Err(format!("'{uri}' is not an https URL"));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(format!("'{uri}' has no host"));
        }
        // Keep the text as reported; `Url` would normalize a trailing slash in.
        Ok(Self(uri.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
