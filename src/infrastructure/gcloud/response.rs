//! gcloud output parsing

use serde::Deserialize;

use crate::domain::entities::SchedulerJobDescription;
use crate::domain::ports::CloudError;
use crate::domain::value_objects::FunctionUri;

/// Whether stderr says the resource does not exist
pub fn is_not_found(stderr: &str) -> bool {
    stderr.contains("NOT_FOUND") || stderr.to_lowercase().contains("not found")
}

/// Output of `--format=value(serviceConfig.uri)`
pub fn parse_function_uri(stdout: &str) -> Result<FunctionUri, CloudError> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty()).ok_or_else(|| {
        CloudError::InvalidResponse("function has no service URI yet".to_string())
    })?;
    FunctionUri::parse(line).map_err(CloudError::InvalidResponse)
}

/// First non-empty line of `gcloud auth list --format=value(account)`
pub fn parse_active_account(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobJson {
    name: String,
    #[serde(default)]
    schedule: String,
    #[serde(default)]
    time_zone: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    attempt_deadline: Option<String>,
    #[serde(default)]
    http_target: Option<HttpTargetJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpTargetJson {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    http_method: String,
    #[serde(default)]
    oidc_token: Option<OidcTokenJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OidcTokenJson {
    #[serde(default)]
    service_account_email: Option<String>,
}

/// Output of `gcloud scheduler jobs describe --format=json`
pub fn parse_job_description(stdout: &str) -> Result<SchedulerJobDescription, CloudError> {
    let job: JobJson = serde_json::from_str(stdout)
        .map_err(|e| CloudError::InvalidResponse(format!("scheduler job JSON: {e}")))?;

    // projects/<p>/locations/<l>/jobs/<name>
    let name = job
        .name
        .rsplit('/')
        .next()
        .unwrap_or(job.name.as_str())
        .to_string();
    let target = job.http_target;

    Ok(SchedulerJobDescription {
        name,
        schedule: job.schedule,
        time_zone: job.time_zone,
        state: job.state,
        uri: target.as_ref().map(|t| t.uri.clone()).unwrap_or_default(),
        http_method: target
            .as_ref()
            .map(|t| t.http_method.clone())
            .unwrap_or_default(),
        attempt_deadline: job.attempt_deadline,
        oidc_service_account: target
            .and_then(|t| t.oidc_token)
            .and_then(|o| o.service_account_email),
    })
}
