//! External-account credential configuration
//!
//! Builds the JSON document gcloud uses to exchange an OIDC subject token for
//! a short-lived access token impersonating a service account.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::domain::entities::SubjectTokenSource;
use crate::domain::value_objects::{ServiceAccountEmail, WorkloadIdentityProvider};

const STS_TOKEN_URL: &str = "https://sts.googleapis.com/v1/token";
const JWT_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:jwt";

/// `type = external_account` credential configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalAccountConfig {
    #[serde(rename = "type")]
    kind: &'static str,
    audience: String,
    subject_token_type: &'static str,
    token_url: &'static str,
    service_account_impersonation_url: String,
    credential_source: CredentialSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
enum CredentialSource {
    Url {
        url: String,
        headers: BTreeMap<String, String>,
        format: TokenFormat,
    },
    File {
        file: String,
        format: TokenFormat,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TokenFormat {
    Json { subject_token_field_name: String },
    Text,
}

impl ExternalAccountConfig {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Build the credential configuration for a provider and service account
pub fn external_account_config(
    provider: &WorkloadIdentityProvider,
    service_account: &ServiceAccountEmail,
    source: &SubjectTokenSource,
) -> Result<ExternalAccountConfig, String> {
    let credential_source = match source {
        SubjectTokenSource::GithubActions {
            request_url,
            request_token,
        } => {
            // The OIDC token is requested for the provider's https audience.
            let audience = format!("https://iam.googleapis.com/{}", provider.as_str());
            let mut url = Url::parse(request_url)
                .map_err(|e| format!("invalid OIDC token request URL: {e}"))?;
            url.query_pairs_mut().append_pair("audience", &audience);
            let mut headers = BTreeMap::new();
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {request_token}"),
            );
            CredentialSource::Url {
                url: url.into(),
                headers,
                format: TokenFormat::Json {
                    subject_token_field_name: "value".to_string(),
                },
            }
        }
        SubjectTokenSource::File(path) => CredentialSource::File {
            file: path.to_string_lossy().into_owned(),
            format: TokenFormat::Text,
        },
    };

    Ok(ExternalAccountConfig {
        kind: "external_account",
        audience: provider.audience(),
        subject_token_type: JWT_TOKEN_TYPE,
        token_url: STS_TOKEN_URL,
        service_account_impersonation_url: format!(
            "https://iamcredentials.googleapis.com/v1/projects/-/serviceAccounts/{}:generateAccessToken",
            service_account.as_str()
        ),
        credential_source,
    })
}
