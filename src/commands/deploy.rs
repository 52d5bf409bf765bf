//! `rankdeploy deploy` - the full seven-step pipeline

use anyhow::Result;
use rankdeploy::domain::value_objects::PipelineStep;

use super::{plan, Session};

pub fn cmd_deploy(session: &Session, yes: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        return plan::cmd_plan(session);
    }

    let config = &session.config;
    let prompt = format!(
        "Deploy {} to {} and replace scheduler job {}?",
        config.function.name, config.function.region, config.scheduler.job
    );
    if !session.confirm(&prompt, yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let report = session.run_pipeline("deploy", &PipelineStep::ALL, true)?;
    tracing::info!(
        steps = report.steps_run(),
        elapsed_ms = report.elapsed_ms,
        "deploy finished"
    );
    Ok(())
}
