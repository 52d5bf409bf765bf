//! Function entity - what gets deployed and how it is configured

use std::path::PathBuf;

use crate::domain::value_objects::StorageMethod;

/// Bucket used when `GCS_BUCKET_NAME` is unset or empty
pub const DEFAULT_BUCKET_NAME: &str = "storage";

/// Environment variables injected into the deployed function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEnv {
    storage_method: StorageMethod,
    bucket_name: String,
    webhook_url: String,
}

impl FunctionEnv {
    pub const STORAGE_METHOD_KEY: &'static str = "STATE_STORAGE_METHOD";
    pub const BUCKET_NAME_KEY: &'static str = "GCS_BUCKET_NAME";
    pub const WEBHOOK_URL_KEY: &'static str = "WEBHOOK_URL";

    /// Build the env, falling back to [`DEFAULT_BUCKET_NAME`] for a blank bucket
    pub fn new(
        storage_method: StorageMethod,
        bucket_name: Option<&str>,
        webhook_url: impl Into<String>,
    ) -> Self {
        let bucket_name = bucket_name
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BUCKET_NAME)
            .to_string();
        Self {
            storage_method,
            bucket_name,
            webhook_url: webhook_url.into(),
        }
    }

    pub fn storage_method(&self) -> StorageMethod {
        self.storage_method
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Key/value pairs in injection order
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (Self::STORAGE_METHOD_KEY, self.storage_method.as_str()),
            (Self::BUCKET_NAME_KEY, &self.bucket_name),
            (Self::WEBHOOK_URL_KEY, &self.webhook_url),
        ]
    }
}

/// A function deployment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub runtime: String,
    pub entry_point: String,
    pub region: String,
    /// Directory uploaded as the function source
    pub source_dir: PathBuf,
    pub allow_unauthenticated: bool,
    pub env: FunctionEnv,
}
