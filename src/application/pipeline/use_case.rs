//! Deployment Pipeline Use Case
//!
//! Runs the selected steps strictly in order:
//! 1. Export the requirements manifest from the lockfile
//! 2. Authenticate
//! 3. Deploy the function
//! 4. Resolve the function URI
//! 5. Delete the previous scheduler job (absent is fine)
//! 6. Create the scheduler job against the fresh URI
//! 7. Verify (report only)
//!
//! The first failing step stops the run. Nothing is rolled back.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::ports::{
    CloudError, CloudProvider, LockfileError, LockfileRepository, PipelineEvent,
    PipelineEventSink,
};
use crate::domain::services::resolve_manifest;
use crate::domain::value_objects::PipelineStep;
use crate::error::{RankdeployError, RankdeployResult};

use super::options::PipelineOptions;
use super::result::{ManifestSummary, PipelineReport, StepTiming};

/// Deployment pipeline - parameterized by its ports
pub struct DeployPipeline<C, L>
where
    C: CloudProvider,
    L: LockfileRepository,
{
    cloud: C,
    lockfiles: L,
    cancel: Option<Arc<AtomicBool>>,
}

impl<C, L> DeployPipeline<C, L>
where
    C: CloudProvider,
    L: LockfileRepository,
{
    pub fn new(cloud: C, lockfiles: L) -> Self {
        Self {
            cloud,
            lockfiles,
            cancel: None,
        }
    }

    /// Stop before the next step once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn cloud(&self) -> &C {
        &self.cloud
    }

    pub fn lockfiles(&self) -> &L {
        &self.lockfiles
    }

    /// Run the pipeline, reporting progress to `events`
    pub fn execute(
        &self,
        options: &PipelineOptions,
        events: &dyn PipelineEventSink,
    ) -> RankdeployResult<PipelineReport> {
        options.preflight()?;

        let started = Instant::now();
        let steps = options.ordered_steps();
        let mut report = PipelineReport::default();

        events.on_event(PipelineEvent::Started {
            function: options.function.name.clone(),
            region: options.function.region.clone(),
            steps: steps.clone(),
        });

        for step in steps {
            if self.cancelled() {
                tracing::info!(next = %step, "run interrupted");
                events.on_event(PipelineEvent::Interrupted { next: step });
                finish(events, &mut report, started, false);
                return Err(RankdeployError::Interrupted { next: step });
            }

            events.on_event(PipelineEvent::StepStarted { step });
            tracing::debug!(step = %step, "step started");
            let step_started = Instant::now();

            if let Err(err) = self.run_step(step, options, &mut report, events) {
                tracing::debug!(step = %step, error = %err, "step failed");
                events.on_event(PipelineEvent::StepFailed {
                    step,
                    error: err.to_string(),
                });
                finish(events, &mut report, started, false);
                return Err(RankdeployError::StepFailed {
                    step,
                    source: Box::new(err),
                });
            }

            let elapsed_ms = step_started.elapsed().as_millis() as u64;
            report.steps.push(StepTiming { step, elapsed_ms });
            events.on_event(PipelineEvent::StepCompleted { step, elapsed_ms });
        }

        finish(events, &mut report, started, true);
        Ok(report)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn run_step(
        &self,
        step: PipelineStep,
        options: &PipelineOptions,
        report: &mut PipelineReport,
        events: &dyn PipelineEventSink,
    ) -> RankdeployResult<()> {
        match step {
            PipelineStep::ExportManifest => {
                let summary = self.export_manifest(options)?;
                events.on_event(PipelineEvent::ManifestExported {
                    lockfile: summary.lockfile.clone(),
                    path: summary.path.clone(),
                    packages: summary.packages,
                    digest: summary.digest.clone(),
                });
                report.manifest = Some(summary);
            }

            PipelineStep::Authenticate => {
                let auth = options
                    .auth
                    .as_ref()
                    .ok_or_else(|| RankdeployError::missing("WORKLOAD_IDENTITY_PROVIDER"))?;
                let identity = self.cloud.authenticate(auth)?;
                events.on_event(PipelineEvent::Authenticated {
                    identity: identity.clone(),
                });
                report.identity = Some(identity);
            }

            PipelineStep::DeployFunction => {
                let spec = options.function_spec()?;
                self.cloud.deploy_function(&spec)?;
                events.on_event(PipelineEvent::FunctionDeployed {
                    name: spec.name,
                    region: spec.region,
                });
            }

            PipelineStep::ResolveFunctionUri => {
                let uri = self
                    .cloud
                    .function_uri(&options.function.name, &options.function.region)?;
                events.on_event(PipelineEvent::FunctionUriResolved { uri: uri.clone() });
                report.function_uri = Some(uri);
            }

            PipelineStep::DeleteSchedulerJob => {
                let outcome = self
                    .cloud
                    .delete_scheduler_job(&options.scheduler.job, &options.function.region)?;
                events.on_event(PipelineEvent::SchedulerJobDeleted {
                    job: options.scheduler.job.clone(),
                    existed: outcome.existed(),
                });
                report.replaced_job = Some(outcome.existed());
            }

            PipelineStep::CreateSchedulerJob => {
                let uri = report.function_uri.clone().ok_or_else(|| {
                    RankdeployError::invalid("function URI", "not resolved before job creation")
                })?;
                let spec = options.job_spec(uri)?;
                self.cloud.create_scheduler_job(&spec)?;
                events.on_event(PipelineEvent::SchedulerJobCreated {
                    job: spec.name.clone(),
                    uri: spec.target_uri.clone(),
                    schedule: spec.schedule.to_string(),
                });
            }

            PipelineStep::Verify => {
                let uri = absent_as_none(
                    self.cloud
                        .function_uri(&options.function.name, &options.function.region),
                )?;
                let job = absent_as_none(
                    self.cloud
                        .describe_scheduler_job(&options.scheduler.job, &options.function.region),
                )?;
                events.on_event(PipelineEvent::Verified {
                    uri: uri.clone(),
                    job: job.clone(),
                });
                if uri.is_some() {
                    report.function_uri = uri;
                }
                report.job = job;
            }
        }
        Ok(())
    }

    fn export_manifest(&self, options: &PipelineOptions) -> RankdeployResult<ManifestSummary> {
        let source_dir = &options.function.source_dir;
        let lockfile = self
            .lockfiles
            .locate(source_dir, options.manifest.lockfile.as_deref())
            .map_err(|e| lockfile_error(e, source_dir))?;
        let lock = self
            .lockfiles
            .load(&lockfile)
            .map_err(|e| lockfile_error(e, source_dir))?;

        let manifest = resolve_manifest(&lock, &options.manifest.extras).map_err(|message| {
            RankdeployError::Lockfile {
                path: lockfile.clone(),
                message,
            }
        })?;

        let output = options.manifest_path();
        self.lockfiles
            .write_manifest(&output, &manifest.render())
            .map_err(|e| lockfile_error(e, source_dir))?;

        Ok(ManifestSummary {
            lockfile,
            path: output,
            packages: manifest.len(),
            digest: manifest.digest(),
        })
    }
}

fn finish(
    events: &dyn PipelineEventSink,
    report: &mut PipelineReport,
    started: Instant,
    success: bool,
) {
    report.elapsed_ms = started.elapsed().as_millis() as u64;
    events.on_event(PipelineEvent::Completed {
        success,
        steps_run: report.steps_run(),
        elapsed_ms: report.elapsed_ms,
    });
}

fn absent_as_none<T>(result: Result<T, CloudError>) -> RankdeployResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn lockfile_error(err: LockfileError, source_dir: &Path) -> RankdeployError {
    match err {
        LockfileError::NotFound(path) if path == source_dir => RankdeployError::LockfileNotFound {
            dir: source_dir.to_path_buf(),
        },
        LockfileError::NotFound(path) => RankdeployError::Lockfile {
            path,
            message: "file does not exist".to_string(),
        },
        LockfileError::InvalidFormat { path, message } => {
            RankdeployError::Lockfile { path, message }
        }
        LockfileError::Io(err) => RankdeployError::Io(err),
    }
}
