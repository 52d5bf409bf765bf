//! gcloud-backed cloud provider

use std::fs;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::domain::entities::{
    AuthMethod, FunctionSpec, JobDeletion, SchedulerJobDescription, SchedulerJobSpec,
};
use crate::domain::ports::{CloudError, CloudProvider, CloudResult, CommandOutput, CommandRunner};
use crate::domain::services::external_account_config;
use crate::domain::value_objects::FunctionUri;

use super::commands::{self, GcloudCommand, JobParams};
use super::response;

/// Drives Cloud Functions and Cloud Scheduler through the gcloud CLI
pub struct GcloudProvider<R: CommandRunner> {
    runner: R,
    binary: String,
    project: Option<String>,
    /// Holds the credential configuration until the run ends
    credentials_dir: Mutex<Option<TempDir>>,
}

impl<R: CommandRunner> GcloudProvider<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            project: None,
            credentials_dir: Mutex::new(None),
        }
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Run a command, mapping a non-zero exit to `CommandFailed` or `NotFound`
    fn execute(&self, command: &GcloudCommand, resource: &str) -> CloudResult<CommandOutput> {
        let output = self.runner.run(&self.binary, command.args())?;
        if output.is_success() {
            return Ok(output);
        }
        if response::is_not_found(&output.stderr) {
            return Err(CloudError::NotFound {
                resource: resource.to_string(),
            });
        }
        Err(CloudError::CommandFailed {
            command: command.summary(&self.binary),
            code: output.code,
            stderr: output.stderr,
        })
    }

    fn login_with_workload_identity(&self, auth: &AuthMethod) -> CloudResult<()> {
        let AuthMethod::WorkloadIdentity {
            provider,
            service_account,
            token_source,
        } = auth
        else {
            return Ok(());
        };

        let config = external_account_config(provider, service_account, token_source)
            .map_err(CloudError::Credentials)?;
        let dir = tempfile::Builder::new()
            .prefix("rankdeploy-creds-")
            .tempdir()
            .map_err(|e| CloudError::Credentials(e.to_string()))?;
        let path = dir.path().join("credentials.json");
        fs::write(&path, config.to_json()).map_err(|e| CloudError::Credentials(e.to_string()))?;
        tracing::debug!(path = %path.display(), "wrote external account configuration");

        let result = self.execute(&commands::auth_login(&path, self.project()), "credentials");

        if let Ok(mut slot) = self.credentials_dir.lock() {
            *slot = Some(dir);
        }
        result.map(|_| ())
    }
}

impl<R: CommandRunner> CloudProvider for GcloudProvider<R> {
    fn authenticate(&self, auth: &AuthMethod) -> CloudResult<String> {
        match auth {
            AuthMethod::Ambient => {
                let output = self.execute(&commands::active_account(), "active account")?;
                response::parse_active_account(&output.stdout).ok_or_else(|| {
                    CloudError::Credentials(
                        "no active gcloud account; run `gcloud auth login` first".to_string(),
                    )
                })
            }
            AuthMethod::WorkloadIdentity { .. } => {
                self.login_with_workload_identity(auth)?;
                Ok(auth.describe())
            }
        }
    }

    fn deploy_function(&self, spec: &FunctionSpec) -> CloudResult<()> {
        let command = commands::deploy_function(spec, self.project());
        self.execute(&command, &format!("function {}", spec.name))
            .map(|_| ())
    }

    fn function_uri(&self, name: &str, region: &str) -> CloudResult<FunctionUri> {
        let command = commands::function_uri(name, region, self.project());
        let output = self.execute(&command, &format!("function {name}"))?;
        response::parse_function_uri(&output.stdout)
    }

    fn delete_scheduler_job(&self, name: &str, region: &str) -> CloudResult<JobDeletion> {
        let command = commands::delete_job(name, region, self.project());
        match self.execute(&command, &format!("scheduler job {name}")) {
            Ok(_) => Ok(JobDeletion::Deleted),
            Err(err) if err.is_not_found() => Ok(JobDeletion::NotFound),
            Err(err) => Err(err),
        }
    }

    fn create_scheduler_job(&self, spec: &SchedulerJobSpec) -> CloudResult<()> {
        let command =
            commands::create_job(&JobParams::from(spec), spec.target_uri.as_str(), self.project());
        self.execute(&command, &format!("scheduler job {}", spec.name))
            .map(|_| ())
    }

    fn describe_scheduler_job(
        &self,
        name: &str,
        region: &str,
    ) -> CloudResult<SchedulerJobDescription> {
        let command = commands::describe_job(name, region, self.project());
        let output = self.execute(&command, &format!("scheduler job {name}"))?;
        response::parse_job_description(&output.stdout)
    }
}
