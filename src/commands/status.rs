//! `rankdeploy status` - read-only view of the deployed function and job

use anyhow::Result;
use rankdeploy::domain::value_objects::PipelineStep;

use super::Session;

pub const STATUS_STEPS: [PipelineStep; 3] = [
    PipelineStep::Authenticate,
    PipelineStep::ResolveFunctionUri,
    PipelineStep::Verify,
];

pub fn cmd_status(session: &Session) -> Result<()> {
    session.run_pipeline("status", &STATUS_STEPS, false)?;
    Ok(())
}
