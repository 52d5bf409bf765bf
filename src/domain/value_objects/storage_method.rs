//! Storage Method Value Object
//!
//! Selects where the deployed function keeps its state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// State-storage backend injected as `STATE_STORAGE_METHOD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMethod {
    /// Cloud Storage bucket (the deployed default)
    #[default]
    Gcs,
    /// Local directory next to the function source
    Local,
}

impl StorageMethod {
    pub const VALID_VALUES: &'static [&'static str] = &["gcs", "local"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gcs => "GCS",
            Self::Local => "LOCAL",
        }
    }
}

impl FromStr for StorageMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcs" => Ok(Self::Gcs),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown storage method '{other}' (expected GCS or LOCAL)")),
        }
    }
}

impl fmt::Display for StorageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StorageMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StorageMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
