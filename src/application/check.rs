//! Check Use Case
//!
//! Diagnoses configuration, credentials and the function source without
//! touching the cloud. Each finding is a `CheckItem`; errors mean a deploy
//! would fail before or during its first steps.

use std::path::Path;

use serde::Serialize;
use url::Url;

use crate::config::{AuthMode, Config, DeployInputs};
use crate::domain::ports::LockfileRepository;
use crate::domain::services::resolve_manifest;
use crate::domain::value_objects::{AttemptDeadline, CronSchedule, ServiceAccountEmail, StorageMethod};

use super::pipeline::resolve_auth;

/// Options for the check operation
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Whether the configured gcloud binary can be started
    pub gcloud_available: bool,
    /// Treat warnings as errors
    pub strict_warnings: bool,
}

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckItem {
    /// Area being checked (e.g., "auth", "manifest")
    pub category: &'static str,
    /// Name of the check
    pub name: String,
    pub status: CheckStatus,
    /// Human-readable message
    pub message: String,
    /// Recommendation for fixing issues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Error,
}

/// Result of the check operation
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub items: Vec<CheckItem>,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl CheckResult {
    /// No errors
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// No errors and no warnings
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    /// Success under the given strictness
    pub fn passes(&self, strict_warnings: bool) -> bool {
        if strict_warnings {
            self.is_clean()
        } else {
            self.is_success()
        }
    }

    fn push(&mut self, item: CheckItem) {
        match item.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warning => self.warnings += 1,
            CheckStatus::Error => self.errors += 1,
        }
        self.items.push(item);
    }
}

fn item(category: &'static str, name: &str, status: CheckStatus, message: String) -> CheckItem {
    CheckItem {
        category,
        name: name.to_string(),
        status,
        message,
        recommendation: None,
    }
}

fn with_fix(mut item: CheckItem, fix: impl Into<String>) -> CheckItem {
    item.recommendation = Some(fix.into());
    item
}

/// Check Use Case
pub struct CheckUseCase<L: LockfileRepository> {
    lockfiles: L,
}

impl<L: LockfileRepository> CheckUseCase<L> {
    pub fn new(lockfiles: L) -> Self {
        Self { lockfiles }
    }

    /// Run every check, calling `on_check` as each one completes
    pub fn execute_with_callback<F>(
        &self,
        config: &Config,
        inputs: &DeployInputs,
        project_root: &Path,
        options: &CheckOptions,
        mut on_check: F,
    ) -> CheckResult
    where
        F: FnMut(&CheckItem),
    {
        let mut result = CheckResult::default();
        let mut record = |item: CheckItem| {
            on_check(&item);
            result.push(item);
        };

        record(check_gcloud(config, options.gcloud_available));
        record(check_auth(config, inputs, project_root));
        record(check_service_account(config));
        record(check_project(config));
        record(check_webhook(inputs));
        record(check_bucket(config, inputs));
        record(check_schedule(&config.scheduler.schedule));
        record(check_deadline(config.scheduler.attempt_deadline));
        record(self.check_manifest(config, project_root));

        result
    }

    /// Run every check
    pub fn execute(
        &self,
        config: &Config,
        inputs: &DeployInputs,
        project_root: &Path,
        options: &CheckOptions,
    ) -> CheckResult {
        self.execute_with_callback(config, inputs, project_root, options, |_| {})
    }

    fn check_manifest(&self, config: &Config, project_root: &Path) -> CheckItem {
        let source_dir = if config.function.source.is_absolute() {
            config.function.source.clone()
        } else {
            project_root.join(&config.function.source)
        };

        let outcome = self
            .lockfiles
            .locate(&source_dir, config.manifest.lockfile.as_deref())
            .map_err(|e| e.to_string())
            .and_then(|path| {
                let lock = self.lockfiles.load(&path).map_err(|e| e.to_string())?;
                let manifest = resolve_manifest(&lock, &config.manifest.extras)?;
                Ok((path, manifest.len()))
            });

        match outcome {
            Ok((path, packages)) => item(
                "manifest",
                "lockfile",
                CheckStatus::Pass,
                format!(
                    "{} resolves to {} packages",
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                    packages
                ),
            ),
            Err(message) => with_fix(
                item("manifest", "lockfile", CheckStatus::Error, message),
                "Run `uv lock` or `poetry lock` in the function source directory",
            ),
        }
    }
}

fn check_gcloud(config: &Config, available: bool) -> CheckItem {
    if available {
        item(
            "gcloud",
            "binary",
            CheckStatus::Pass,
            format!("'{}' is available", config.gcloud.binary),
        )
    } else {
        with_fix(
            item(
                "gcloud",
                "binary",
                CheckStatus::Error,
                format!("'{}' could not be started", config.gcloud.binary),
            ),
            "Install the Google Cloud SDK or set RANKDEPLOY_GCLOUD",
        )
    }
}

fn check_auth(config: &Config, inputs: &DeployInputs, project_root: &Path) -> CheckItem {
    if config.auth.mode == AuthMode::Ambient {
        return item(
            "auth",
            "credentials",
            CheckStatus::Pass,
            "ambient mode uses the current gcloud login".to_string(),
        );
    }

    match resolve_auth(config, inputs, project_root) {
        Ok(method) => item("auth", "credentials", CheckStatus::Pass, method.describe()),
        Err(err) => with_fix(
            item("auth", "credentials", CheckStatus::Error, err.to_string()),
            "Run inside GitHub Actions with `id-token: write`, set RANKDEPLOY_OIDC_TOKEN_FILE, \
             or use RANKDEPLOY_AUTH_MODE=ambient locally",
        ),
    }
}

fn check_service_account(config: &Config) -> CheckItem {
    match config.auth.service_account.as_deref() {
        None => with_fix(
            item(
                "auth",
                "service account",
                CheckStatus::Error,
                "SERVICE_ACCOUNT is not set".to_string(),
            ),
            "Set the SERVICE_ACCOUNT secret",
        ),
        Some(raw) => match ServiceAccountEmail::parse(raw) {
            Ok(sa) => item("auth", "service account", CheckStatus::Pass, sa.to_string()),
            Err(message) => item("auth", "service account", CheckStatus::Error, message),
        },
    }
}

fn check_project(config: &Config) -> CheckItem {
    if let Some(project) = &config.function.project {
        return item("function", "project", CheckStatus::Pass, project.clone());
    }
    let derived = config
        .auth
        .service_account
        .as_deref()
        .and_then(|raw| ServiceAccountEmail::parse(raw).ok())
        .and_then(|sa| sa.project_id().map(str::to_string));
    match derived {
        Some(project) => item(
            "function",
            "project",
            CheckStatus::Pass,
            format!("{project} (from the service account)"),
        ),
        None => with_fix(
            item(
                "function",
                "project",
                CheckStatus::Warning,
                "no project id; gcloud's default project will be used".to_string(),
            ),
            "Set GCP_PROJECT_ID or [function].project",
        ),
    }
}

fn check_webhook(inputs: &DeployInputs) -> CheckItem {
    match inputs.webhook_url.as_deref() {
        Some(url) if is_http_url(url) => item(
            "function",
            "webhook",
            CheckStatus::Pass,
            "WEBHOOK_URL is set".to_string(),
        ),
        Some(_) => item(
            "function",
            "webhook",
            CheckStatus::Warning,
            "WEBHOOK_URL does not look like an http(s) URL".to_string(),
        ),
        None => with_fix(
            item(
                "function",
                "webhook",
                CheckStatus::Error,
                "WEBHOOK_URL is not set".to_string(),
            ),
            "Set the WEBHOOK_URL secret",
        ),
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "https" | "http") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn check_bucket(config: &Config, inputs: &DeployInputs) -> CheckItem {
    match (&inputs.bucket_name, config.function.storage_method) {
        (Some(bucket), _) => item("function", "bucket", CheckStatus::Pass, bucket.clone()),
        (None, StorageMethod::Local) => item(
            "function",
            "bucket",
            CheckStatus::Pass,
            "not used with LOCAL storage".to_string(),
        ),
        (None, StorageMethod::Gcs) => with_fix(
            item(
                "function",
                "bucket",
                CheckStatus::Warning,
                format!(
                    "GCS_BUCKET_NAME is not set; '{}' will be used",
                    crate::domain::entities::DEFAULT_BUCKET_NAME
                ),
            ),
            "Set the GCS_BUCKET_NAME variable",
        ),
    }
}

fn check_schedule(schedule: &CronSchedule) -> CheckItem {
    if *schedule == CronSchedule::every_ten_minutes() {
        item("scheduler", "cadence", CheckStatus::Pass, schedule.describe())
    } else {
        item(
            "scheduler",
            "cadence",
            CheckStatus::Warning,
            format!("'{}' differs from the standard */10 * * * *", schedule),
        )
    }
}

fn check_deadline(deadline: AttemptDeadline) -> CheckItem {
    if deadline == AttemptDeadline::fifteen_minutes() {
        item(
            "scheduler",
            "attempt deadline",
            CheckStatus::Pass,
            deadline.to_string(),
        )
    } else {
        item(
            "scheduler",
            "attempt deadline",
            CheckStatus::Warning,
            format!("{} differs from the standard 15m", deadline),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::FsLockfileRepository;
    use std::fs;

    const UV_LOCK: &str = r#"
version = 1
requires-python = ">=3.11"

[[package]]
name = "crypto-rank-tracker"
version = "0.1.0"
source = { virtual = "." }
dependencies = [{ name = "requests" }]

[[package]]
name = "requests"
version = "2.32.3"
source = { registry = "https://pypi.org/simple" }
"#;

    fn ready_config() -> Config {
        let mut config = Config::default();
        config.auth.mode = AuthMode::Ambient;
        config.auth.service_account =
            Some("deployer@rank-prod.iam.gserviceaccount.com".to_string());
        config
    }

    fn ready_inputs() -> DeployInputs {
        DeployInputs {
            webhook_url: Some("https://hooks.example/abc".to_string()),
            bucket_name: Some("rank-state".to_string()),
            ..DeployInputs::default()
        }
    }

    fn project_with_lock() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join(&Config::default().function.source);
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("uv.lock"), UV_LOCK).unwrap();
        dir
    }

    fn options() -> CheckOptions {
        CheckOptions {
            gcloud_available: true,
            strict_warnings: false,
        }
    }

    #[test]
    fn ready_project_is_clean() {
        let dir = project_with_lock();
        let result = CheckUseCase::new(FsLockfileRepository::new()).execute(
            &ready_config(),
            &ready_inputs(),
            dir.path(),
            &options(),
        );

        assert!(result.is_clean(), "{:?}", result.items);
        let manifest = result.items.iter().find(|i| i.category == "manifest").unwrap();
        assert_eq!(manifest.message, "uv.lock resolves to 1 packages");
    }

    #[test]
    fn missing_webhook_and_gcloud_are_errors() {
        let dir = project_with_lock();
        let result = CheckUseCase::new(FsLockfileRepository::new()).execute(
            &ready_config(),
            &DeployInputs::default(),
            dir.path(),
            &CheckOptions {
                gcloud_available: false,
                strict_warnings: false,
            },
        );

        assert!(!result.is_success());
        let failing: Vec<_> = result
            .items
            .iter()
            .filter(|i| i.status == CheckStatus::Error)
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(failing, vec!["binary", "webhook"]);
    }

    #[test]
    fn webhook_must_parse_as_http_url() {
        assert!(is_http_url("https://hooks.example/abc?token=1"));
        assert!(is_http_url("http://localhost:8080/hook"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("hooks.example/abc"));
        assert!(!is_http_url("ftp://hooks.example/abc"));

        let dir = project_with_lock();
        let mut inputs = ready_inputs();
        inputs.webhook_url = Some("https//hooks.example".to_string());
        let result = CheckUseCase::new(FsLockfileRepository::new()).execute(
            &ready_config(),
            &inputs,
            dir.path(),
            &options(),
        );
        let webhook = result.items.iter().find(|i| i.name == "webhook").unwrap();
        assert_eq!(webhook.status, CheckStatus::Warning);
    }

    #[test]
    fn unset_bucket_warns_about_fallback() {
        let dir = project_with_lock();
        let mut inputs = ready_inputs();
        inputs.bucket_name = None;

        let result = CheckUseCase::new(FsLockfileRepository::new()).execute(
            &ready_config(),
            &inputs,
            dir.path(),
            &options(),
        );

        assert!(result.is_success());
        assert!(!result.passes(true));
        let bucket = result.items.iter().find(|i| i.name == "bucket").unwrap();
        assert_eq!(bucket.status, CheckStatus::Warning);
        assert!(bucket.message.contains("'storage'"));
    }

    #[test]
    fn workload_identity_outside_ci_is_an_error() {
        let dir = project_with_lock();
        let mut config = ready_config();
        config.auth.mode = AuthMode::WorkloadIdentity;
        config.auth.workload_identity_provider = Some(
            "projects/123/locations/global/workloadIdentityPools/gh/providers/gh".to_string(),
        );

        let result = CheckUseCase::new(FsLockfileRepository::new()).execute(
            &config,
            &ready_inputs(),
            dir.path(),
            &options(),
        );

        let auth = result.items.iter().find(|i| i.name == "credentials").unwrap();
        assert_eq!(auth.status, CheckStatus::Error);
        assert!(auth.message.contains("ACTIONS_ID_TOKEN_REQUEST_URL"));
    }

    #[test]
    fn missing_lockfile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut seen = Vec::new();
        let result = CheckUseCase::new(FsLockfileRepository::new()).execute_with_callback(
            &ready_config(),
            &ready_inputs(),
            dir.path(),
            &options(),
            |item| seen.push(item.name.clone()),
        );

        assert_eq!(seen.len(), result.items.len());
        let manifest = result.items.last().unwrap();
        assert_eq!(manifest.status, CheckStatus::Error);
        assert!(manifest.recommendation.is_some());
    }

    #[test]
    fn non_standard_cadence_warns() {
        let dir = project_with_lock();
        let mut config = ready_config();
        config.scheduler.schedule = CronSchedule::parse("0 * * * *").unwrap();

        let result = CheckUseCase::new(FsLockfileRepository::new()).execute(
            &config,
            &ready_inputs(),
            dir.path(),
            &options(),
        );
        let cadence = result.items.iter().find(|i| i.name == "cadence").unwrap();
        assert_eq!(cadence.status, CheckStatus::Warning);
    }
}
