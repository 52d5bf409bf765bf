//! Deploy inputs - secrets and variables that never live in a config file

/// Values the CI job passes through the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployInputs {
    /// `WEBHOOK_URL` secret
    pub webhook_url: Option<String>,
    /// `GCS_BUCKET_NAME` variable; blank falls back to the default bucket
    pub bucket_name: Option<String>,
    /// `ACTIONS_ID_TOKEN_REQUEST_URL`
    pub oidc_request_url: Option<String>,
    /// `ACTIONS_ID_TOKEN_REQUEST_TOKEN`
    pub oidc_request_token: Option<String>,
    /// `GITHUB_OUTPUT` file for step outputs
    pub github_output: Option<String>,
}

impl DeployInputs {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with(get_env: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| get_env(key).filter(|v| !v.trim().is_empty());
        Self {
            webhook_url: get("WEBHOOK_URL").map(|v| v.trim().to_string()),
            bucket_name: get("GCS_BUCKET_NAME"),
            oidc_request_url: get("ACTIONS_ID_TOKEN_REQUEST_URL"),
            oidc_request_token: get("ACTIONS_ID_TOKEN_REQUEST_TOKEN"),
            github_output: get("GITHUB_OUTPUT"),
        }
    }
}
