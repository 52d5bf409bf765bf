//! Pipeline Options
//!
//! Resolved inputs for one pipeline run, built from configuration and the
//! CI environment.

use std::path::{Path, PathBuf};

use crate::config::{AuthMode, Config, DeployInputs};
use crate::domain::entities::{
    AuthMethod, FunctionEnv, FunctionSpec, SchedulerJobSpec, SubjectTokenSource,
};
use crate::domain::value_objects::{
    AttemptDeadline, CronSchedule, FunctionUri, PipelineStep, ServiceAccountEmail,
    StorageMethod, WorkloadIdentityProvider,
};
use crate::error::{RankdeployError, RankdeployResult};

/// Scheduler jobs always POST to the function
pub const HTTP_METHOD: &str = "POST";

/// What gets deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSettings {
    pub name: String,
    pub runtime: String,
    pub entry_point: String,
    pub region: String,
    /// Absolute function source directory
    pub source_dir: PathBuf,
    pub allow_unauthenticated: bool,
    pub storage_method: StorageMethod,
    pub bucket_name: Option<String>,
    pub webhook_url: Option<String>,
}

/// The recurring trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub job: String,
    pub schedule: CronSchedule,
    pub time_zone: String,
    pub attempt_deadline: AttemptDeadline,
    pub service_account: Option<ServiceAccountEmail>,
}

/// Manifest export settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSettings {
    /// Explicit lockfile, relative to the source directory unless absolute
    pub lockfile: Option<PathBuf>,
    /// Output path, relative to the source directory unless absolute
    pub output: PathBuf,
    pub extras: Vec<String>,
}

/// Options for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Steps to run; executed in pipeline order regardless of listing order
    pub steps: Vec<PipelineStep>,
    pub function: FunctionSettings,
    pub scheduler: SchedulerSettings,
    pub manifest: ManifestSettings,
    /// Required when `Authenticate` is among the steps
    pub auth: Option<AuthMethod>,
}

impl PipelineOptions {
    /// Resolve options from configuration and environment inputs
    ///
    /// Credentials are only resolved when the steps include `Authenticate`.
    pub fn from_config(
        config: &Config,
        inputs: &DeployInputs,
        project_root: &Path,
        steps: &[PipelineStep],
    ) -> RankdeployResult<Self> {
        let service_account = config
            .auth
            .service_account
            .as_deref()
            .map(|raw| {
                ServiceAccountEmail::parse(raw)
                    .map_err(|m| RankdeployError::invalid("SERVICE_ACCOUNT", m))
            })
            .transpose()?;

        let auth = if steps.contains(&PipelineStep::Authenticate) {
            Some(resolve_auth(config, inputs, project_root)?)
        } else {
            None
        };

        Ok(Self {
            steps: steps.to_vec(),
            function: FunctionSettings {
                name: config.function.name.clone(),
                runtime: config.function.runtime.clone(),
                entry_point: config.function.entry_point.clone(),
                region: config.function.region.clone(),
                source_dir: resolve(project_root, &config.function.source),
                allow_unauthenticated: config.function.allow_unauthenticated,
                storage_method: config.function.storage_method,
                bucket_name: inputs.bucket_name.clone(),
                webhook_url: inputs.webhook_url.clone(),
            },
            scheduler: SchedulerSettings {
                job: config.scheduler.job.clone(),
                schedule: config.scheduler.schedule.clone(),
                time_zone: config.scheduler.time_zone.clone(),
                attempt_deadline: config.scheduler.attempt_deadline,
                service_account,
            },
            manifest: ManifestSettings {
                lockfile: config.manifest.lockfile.clone(),
                output: config.manifest.output.clone(),
                extras: config.manifest.extras.clone(),
            },
            auth,
        })
    }

    /// Steps in execution order, without duplicates
    pub fn ordered_steps(&self) -> Vec<PipelineStep> {
        PipelineStep::ALL
            .into_iter()
            .filter(|step| self.steps.contains(step))
            .collect()
    }

    /// Check every required input before any step runs
    pub fn preflight(&self) -> RankdeployResult<()> {
        let steps = self.ordered_steps();
        let runs = |step| steps.contains(&step);

        if runs(PipelineStep::Authenticate) && self.auth.is_none() {
            return Err(RankdeployError::missing("WORKLOAD_IDENTITY_PROVIDER"));
        }
        if runs(PipelineStep::DeployFunction) && self.function.webhook_url.is_none() {
            return Err(RankdeployError::missing("WEBHOOK_URL"));
        }
        if runs(PipelineStep::CreateSchedulerJob) {
            if self.scheduler.service_account.is_none() {
                return Err(RankdeployError::missing("SERVICE_ACCOUNT"));
            }
            if !runs(PipelineStep::ResolveFunctionUri) {
                return Err(RankdeployError::invalid(
                    "steps",
                    "creating the scheduler job needs the function URI step",
                ));
            }
        }
        Ok(())
    }

    /// Deployment request for the function, env vars included
    pub fn function_spec(&self) -> RankdeployResult<FunctionSpec> {
        let webhook_url = self
            .function
            .webhook_url
            .as_deref()
            .ok_or_else(|| RankdeployError::missing("WEBHOOK_URL"))?;
        Ok(self.function_spec_with_webhook(webhook_url))
    }

    /// Deployment request with an explicit webhook value (plans print a placeholder)
    pub fn function_spec_with_webhook(&self, webhook_url: &str) -> FunctionSpec {
        let function = &self.function;
        FunctionSpec {
            name: function.name.clone(),
            runtime: function.runtime.clone(),
            entry_point: function.entry_point.clone(),
            region: function.region.clone(),
            source_dir: function.source_dir.clone(),
            allow_unauthenticated: function.allow_unauthenticated,
            env: FunctionEnv::new(
                function.storage_method,
                function.bucket_name.as_deref(),
                webhook_url,
            ),
        }
    }

    /// Scheduler job bound to `uri`
    pub fn job_spec(&self, uri: FunctionUri) -> RankdeployResult<SchedulerJobSpec> {
        let scheduler = &self.scheduler;
        let service_account = scheduler
            .service_account
            .clone()
            .ok_or_else(|| RankdeployError::missing("SERVICE_ACCOUNT"))?;

        Ok(SchedulerJobSpec {
            name: scheduler.job.clone(),
            region: self.function.region.clone(),
            schedule: scheduler.schedule.clone(),
            time_zone: scheduler.time_zone.clone(),
            target_uri: uri,
            http_method: HTTP_METHOD.to_string(),
            oidc_service_account: service_account,
            attempt_deadline: scheduler.attempt_deadline,
        })
    }

    /// Manifest output path, resolved against the source directory
    pub fn manifest_path(&self) -> PathBuf {
        resolve(&self.function.source_dir, &self.manifest.output)
    }

    /// Project id for cloud calls: explicit config, else the service account's project
    pub fn project_id(&self, config: &Config) -> Option<String> {
        config.function.project.clone().or_else(|| {
            self.scheduler
                .service_account
                .as_ref()
                .and_then(|sa| sa.project_id())
                .map(str::to_string)
        })
    }
}

/// Build the credentials strategy for the configured auth mode
pub fn resolve_auth(
    config: &Config,
    inputs: &DeployInputs,
    project_root: &Path,
) -> RankdeployResult<AuthMethod> {
    if config.auth.mode == AuthMode::Ambient {
        return Ok(AuthMethod::Ambient);
    }

    let provider = config
        .auth
        .workload_identity_provider
        .as_deref()
        .ok_or_else(|| RankdeployError::missing("WORKLOAD_IDENTITY_PROVIDER"))
        .and_then(|raw| {
            WorkloadIdentityProvider::parse(raw)
                .map_err(|m| RankdeployError::invalid("WORKLOAD_IDENTITY_PROVIDER", m))
        })?;

    let service_account = config
        .auth
        .service_account
        .as_deref()
        .ok_or_else(|| RankdeployError::missing("SERVICE_ACCOUNT"))
        .and_then(|raw| {
            ServiceAccountEmail::parse(raw)
                .map_err(|m| RankdeployError::invalid("SERVICE_ACCOUNT", m))
        })?;

    let token_source = match (&config.auth.token_file, &inputs.oidc_request_url) {
        (Some(file), _) => SubjectTokenSource::File(resolve(project_root, file)),
        (None, Some(request_url)) => SubjectTokenSource::GithubActions {
            request_url: request_url.clone(),
            request_token: inputs
                .oidc_request_token
                .clone()
                .ok_or_else(|| RankdeployError::missing("ACTIONS_ID_TOKEN_REQUEST_TOKEN"))?,
        },
        (None, None) => return Err(RankdeployError::missing("ACTIONS_ID_TOKEN_REQUEST_URL")),
    };

    Ok(AuthMethod::WorkloadIdentity {
        provider,
        service_account,
        token_source,
    })
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
