//! `rankdeploy requirements` - export requirements.txt only

use std::path::PathBuf;

use anyhow::Result;
use rankdeploy::domain::value_objects::PipelineStep;

use super::Session;

#[derive(Debug, Clone, Default)]
pub struct RequirementsArgs {
    pub lockfile: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub extras: Vec<String>,
}

pub fn cmd_requirements(session: &Session, args: RequirementsArgs) -> Result<()> {
    let mut options = session.options(&[PipelineStep::ExportManifest])?;
    if let Some(lockfile) = args.lockfile {
        options.manifest.lockfile = Some(lockfile);
    }
    if let Some(output) = args.output {
        options.manifest.output = output;
    }
    if !args.extras.is_empty() {
        options.manifest.extras = args.extras;
    }

    session.run_with_options("requirements", &options, false)?;
    Ok(())
}
