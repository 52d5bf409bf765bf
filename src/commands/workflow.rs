//! `rankdeploy workflow` - render the GitHub Actions deploy workflow

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rankdeploy::infrastructure::{render_workflow, WorkflowOptions};

use super::Session;
use crate::ui::primitives::icon::Icon;

pub fn cmd_workflow(session: &Session, branch: String, output: Option<PathBuf>) -> Result<()> {
    let options = WorkflowOptions {
        branch,
        ..WorkflowOptions::default()
    };
    let yaml = render_workflow(&options).map_err(|e| anyhow!("cannot render workflow: {e}"))?;

    let Some(output) = output else {
        print!("{yaml}");
        return Ok(());
    };

    let path = if output.is_absolute() {
        output
    } else {
        session.project_root.join(output)
    };
    write_workflow(&path, &yaml)?;

    if session.ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "workflow_written",
            "command": "workflow",
            "path": path.display().to_string(),
            "branch": options.branch,
        }))?;
    } else {
        println!(
            "{} wrote {}",
            Icon::Success.colored(session.ui.color, session.ui.unicode),
            path.display()
        );
    }
    Ok(())
}

fn write_workflow(path: &Path, yaml: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(path, yaml).with_context(|| format!("cannot write {}", path.display()))
}
