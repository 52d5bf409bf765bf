//! Authentication entity - how a run obtains cloud credentials

use std::path::PathBuf;

use crate::domain::value_objects::{ServiceAccountEmail, WorkloadIdentityProvider};

/// Where the OIDC subject token for the STS exchange comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectTokenSource {
    /// GitHub Actions OIDC endpoint (`ACTIONS_ID_TOKEN_REQUEST_URL` / `_TOKEN`)
    GithubActions {
        request_url: String,
        request_token: String,
    },
    /// A file that already holds a subject token
    File(PathBuf),
}

/// Credentials strategy for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Use whatever gcloud is already logged in as
    Ambient,
    /// Short-lived federated credentials impersonating a service account
    WorkloadIdentity {
        provider: WorkloadIdentityProvider,
        service_account: ServiceAccountEmail,
        token_source: SubjectTokenSource,
    },
}

impl AuthMethod {
    pub fn describe(&self) -> String {
        match self {
            Self::Ambient => "ambient gcloud credentials".to_string(),
            Self::WorkloadIdentity {
                service_account, ..
            } => format!("workload identity as {service_account}"),
        }
    }
}
