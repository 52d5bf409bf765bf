//! `rankdeploy schedule` - re-create the scheduler job for the deployed function

use anyhow::Result;
use rankdeploy::domain::value_objects::PipelineStep;

use super::Session;

pub const SCHEDULE_STEPS: [PipelineStep; 5] = [
    PipelineStep::Authenticate,
    PipelineStep::ResolveFunctionUri,
    PipelineStep::DeleteSchedulerJob,
    PipelineStep::CreateSchedulerJob,
    PipelineStep::Verify,
];

pub fn cmd_schedule(session: &Session, yes: bool) -> Result<()> {
    let config = &session.config;
    let prompt = format!(
        "Replace scheduler job {} in {}?",
        config.scheduler.job, config.function.region
    );
    if !session.confirm(&prompt, yes)? {
        println!("Aborted.");
        return Ok(());
    }

    session.run_pipeline("schedule", &SCHEDULE_STEPS, true)?;
    Ok(())
}
