//! `rankdeploy plan` - print the cloud commands a deploy would run

use std::path::Path;

use anyhow::Result;
use rankdeploy::application::PipelineOptions;
use rankdeploy::config::{AuthMode, Config};
use rankdeploy::domain::value_objects::PipelineStep;
use rankdeploy::infrastructure::gcloud::commands::{self, JobParams};
use rankdeploy::RankdeployError;

use super::Session;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

/// The job's URI is only known after the deploy step
pub const FUNCTION_URI_PLACEHOLDER: &str = "$FUNCTION_URI";
const WEBHOOK_PLACEHOLDER: &str = "$WEBHOOK_URL";
const CREDENTIALS_PLACEHOLDER: &str = "$RUNNER_TEMP/credentials.json";

/// One planned step and the command lines (or actions) it performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: PipelineStep,
    pub actions: Vec<String>,
}

pub fn build_plan(options: &PipelineOptions, config: &Config) -> Result<Vec<PlannedStep>> {
    let binary = config.gcloud.binary.as_str();
    let project = options.project_id(config);
    let project = project.as_deref();
    let function = &options.function;
    let scheduler = &options.scheduler;

    let service_account = scheduler
        .service_account
        .as_ref()
        .ok_or_else(|| RankdeployError::missing("SERVICE_ACCOUNT"))?;
    let job = JobParams {
        name: &scheduler.job,
        region: &function.region,
        schedule: &scheduler.schedule,
        time_zone: &scheduler.time_zone,
        http_method: rankdeploy::application::HTTP_METHOD,
        service_account,
        attempt_deadline: scheduler.attempt_deadline,
    };

    let lockfile = match &options.manifest.lockfile {
        Some(path) => path.display().to_string(),
        None => "uv.lock or poetry.lock".to_string(),
    };
    let webhook = function.webhook_url.as_deref().unwrap_or(WEBHOOK_PLACEHOLDER);
    let spec = options.function_spec_with_webhook(webhook);

    let authenticate = match config.auth.mode {
        AuthMode::Ambient => commands::active_account(),
        AuthMode::WorkloadIdentity => {
            commands::auth_login(Path::new(CREDENTIALS_PLACEHOLDER), project)
        }
    };

    Ok(vec![
        PlannedStep {
            step: PipelineStep::ExportManifest,
            actions: vec![format!(
                "write {} from {} in {}",
                options.manifest_path().display(),
                lockfile,
                function.source_dir.display()
            )],
        },
        PlannedStep {
            step: PipelineStep::Authenticate,
            actions: vec![authenticate.render(binary)],
        },
        PlannedStep {
            step: PipelineStep::DeployFunction,
            actions: vec![commands::deploy_function(&spec, project).render(binary)],
        },
        PlannedStep {
            step: PipelineStep::ResolveFunctionUri,
            actions: vec![commands::function_uri(&function.name, &function.region, project)
                .render(binary)],
        },
        PlannedStep {
            step: PipelineStep::DeleteSchedulerJob,
            actions: vec![commands::delete_job(&scheduler.job, &function.region, project)
                .render(binary)],
        },
        PlannedStep {
            step: PipelineStep::CreateSchedulerJob,
            actions: vec![commands::create_job(&job, FUNCTION_URI_PLACEHOLDER, project)
                .render(binary)],
        },
        PlannedStep {
            step: PipelineStep::Verify,
            actions: vec![
                commands::function_uri(&function.name, &function.region, project).render(binary),
                commands::describe_job(&scheduler.job, &function.region, project).render(binary),
            ],
        },
    ])
}

pub fn cmd_plan(session: &Session) -> Result<()> {
    let steps: Vec<PipelineStep> = PipelineStep::ALL
        .into_iter()
        .filter(|s| *s != PipelineStep::Authenticate)
        .collect();
    let options = session.options(&steps)?;
    let plan = build_plan(&options, &session.config)?;

    if session.ui.json {
        for planned in &plan {
            crate::ui::json::emit(serde_json::json!({
                "event": "plan_step",
                "command": "plan",
                "step": planned.step,
                "index": planned.step.number(),
                "actions": planned.actions,
            }))?;
        }
        return Ok(());
    }

    let color = session.ui.color;
    println!(
        "{}",
        strong(
            &format!(
                "Plan for {} ({})",
                options.function.name, options.function.region
            ),
            color
        )
    );
    for planned in &plan {
        println!();
        println!(
            "{} [{}/{}] {}",
            Icon::Pending.colored(color, session.ui.unicode),
            planned.step.number(),
            PipelineStep::ALL.len(),
            planned.step.title()
        );
        for action in &planned.actions {
            println!("  {}", paint(action, Tone::Info, color));
        }
    }
    println!();
    println!(
        "{}",
        paint(
            &format!("{FUNCTION_URI_PLACEHOLDER} is the URI read back in step 4. Nothing was run."),
            Tone::Dim,
            color
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankdeploy::config::DeployInputs;

    fn options(config: &Config, inputs: &DeployInputs) -> PipelineOptions {
        PipelineOptions::from_config(
            config,
            inputs,
            Path::new("/work"),
            &[PipelineStep::ExportManifest, PipelineStep::DeployFunction],
        )
        .unwrap()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.auth.service_account =
            Some("deployer@rank-prod.iam.gserviceaccount.com".to_string());
        config
    }

    #[test]
    fn plan_covers_every_step_in_order() {
        let config = config();
        let plan = build_plan(&options(&config, &DeployInputs::default()), &config).unwrap();
        let steps: Vec<_> = plan.iter().map(|p| p.step).collect();
        assert_eq!(steps, PipelineStep::ALL.to_vec());
    }

    #[test]
    fn job_creation_targets_placeholder_uri() {
        let config = config();
        let plan = build_plan(&options(&config, &DeployInputs::default()), &config).unwrap();
        let create = &plan[5].actions[0];
        assert!(create.contains("scheduler jobs create http crypto-rank-tracker-job"));
        assert!(create.contains("'--uri=$FUNCTION_URI'"));
        assert!(create.contains("'--oidc-token-audience=$FUNCTION_URI'"));
        assert!(create.contains("'--schedule=*/10 * * * *'"));
        assert!(create.contains("--attempt-deadline=900s"));
        assert!(create.contains("--project=rank-prod"));
    }

    #[test]
    fn unset_webhook_is_shown_as_placeholder() {
        let config = config();
        let plan = build_plan(&options(&config, &DeployInputs::default()), &config).unwrap();
        let deploy = &plan[2].actions[0];
        assert!(deploy.contains("WEBHOOK_URL=$WEBHOOK_URL"));
        assert!(deploy.contains("GCS_BUCKET_NAME=storage"));
    }

    #[test]
    fn ambient_auth_lists_the_active_account() {
        let mut config = config();
        config.auth.mode = AuthMode::Ambient;
        let plan = build_plan(&options(&config, &DeployInputs::default()), &config).unwrap();
        assert!(plan[1].actions[0].contains("auth list"));
    }

    #[test]
    fn missing_service_account_is_an_error() {
        let config = Config::default();
        let err = build_plan(&options(&config, &DeployInputs::default()), &config).unwrap_err();
        assert!(err.to_string().contains("SERVICE_ACCOUNT"));
    }
}
