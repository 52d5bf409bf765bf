pub mod check;
pub mod deploy;
pub mod plan;
pub mod project_root;
pub mod requirements;
pub mod schedule;
pub mod status;
pub mod workflow;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use rankdeploy::application::{DeployPipeline, PipelineOptions, PipelineReport};
use rankdeploy::config::{self, Config, DeployInputs};
use rankdeploy::domain::ports::PipelineEventSink;
use rankdeploy::domain::value_objects::PipelineStep;
use rankdeploy::infrastructure::github::append_output;
use rankdeploy::infrastructure::{
    FsLockfileRepository, GcloudProvider, JsonEventSink, RunLock, SystemCommandRunner,
};

use crate::ui::console::ConsoleEventSink;
use crate::ui::context::UiContext;
use crate::ui::output::print_config_warnings;

/// Everything a command needs: resolved root, layered config and CI inputs
pub struct Session {
    pub ui: UiContext,
    pub project_root: PathBuf,
    pub config: Config,
    pub inputs: DeployInputs,
    pub cancel: Arc<AtomicBool>,
}

impl Session {
    pub fn load(
        ui: UiContext,
        explicit_root: Option<&Path>,
        explicit_config: Option<&Path>,
        cancel: Arc<AtomicBool>,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot read the current directory")?;
        let project_root = match explicit_root {
            Some(root) => cwd.join(root),
            None => project_root::discover_project_root(&cwd),
        };
        let explicit_config = explicit_config.map(|p| cwd.join(p));

        let (config, warnings) = config::load_or_default(&project_root, explicit_config.as_deref())?;
        print_config_warnings(&warnings, &ui);
        let config = config::with_env_overrides(config);

        tracing::debug!(
            root = %project_root.display(),
            function = %config.function.name,
            region = %config.function.region,
            "session loaded"
        );

        Ok(Self {
            ui,
            project_root,
            config,
            inputs: DeployInputs::from_env(),
            cancel,
        })
    }

    pub fn options(&self, steps: &[PipelineStep]) -> Result<PipelineOptions> {
        Ok(PipelineOptions::from_config(
            &self.config,
            &self.inputs,
            &self.project_root,
            steps,
        )?)
    }

    pub fn event_sink(&self, command: &'static str) -> Box<dyn PipelineEventSink> {
        if self.ui.json {
            Box::new(JsonEventSink::stdout(command))
        } else {
            Box::new(ConsoleEventSink::stdout(&self.ui))
        }
    }

    /// Run `steps` against the real cloud
    ///
    /// Mutating runs take the per-function run lock first.
    pub fn run_pipeline(
        &self,
        command: &'static str,
        steps: &[PipelineStep],
        exclusive: bool,
    ) -> Result<PipelineReport> {
        let options = self.options(steps)?;
        self.run_with_options(command, &options, exclusive)
    }

    pub fn run_with_options(
        &self,
        command: &'static str,
        options: &PipelineOptions,
        exclusive: bool,
    ) -> Result<PipelineReport> {
        let _lock = if exclusive {
            let name = &options.function.name;
            Some(RunLock::acquire(name, &RunLock::default_path(name))?)
        } else {
            None
        };

        let cloud = GcloudProvider::new(SystemCommandRunner::new(), self.config.gcloud.binary.clone())
            .with_project(options.project_id(&self.config));
        let pipeline = DeployPipeline::new(cloud, FsLockfileRepository::new())
            .with_cancel_flag(self.cancel.clone());

        let events = self.event_sink(command);
        let report = pipeline.execute(options, events.as_ref())?;

        if let (Some(output), Some(uri)) = (&self.inputs.github_output, &report.function_uri) {
            append_output(Path::new(output), "function_uri", uri.as_str())
                .with_context(|| format!("cannot write GITHUB_OUTPUT file {output}"))?;
        }

        Ok(report)
    }

    /// Ask before changing cloud resources; non-interactive runs proceed
    pub fn confirm(&self, prompt: &str, yes: bool) -> Result<bool> {
        if yes || !self.ui.interactive() {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}
