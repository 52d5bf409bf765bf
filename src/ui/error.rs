use rankdeploy::domain::ports::CloudError;
use rankdeploy::RankdeployError;

use crate::ui::ci::{github_actions_annotation, AnnotationLevel};
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, Tone};
use crate::ui::terminal::detect_capabilities;

fn format_error_with(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        paint(&err.to_string(), Tone::Error, supports_color)
    );
    if let Some(fix) = err.downcast_ref::<RankdeployError>().and_then(fix_for) {
        out.push_str(&format!(
            "  {} FIX: {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            fix
        ));
    }
    out
}

/// A one-line remedy for errors the user can act on
fn fix_for(err: &RankdeployError) -> Option<String> {
    match err {
        RankdeployError::MissingInput { name } => Some(format!(
            "Set {name} in the environment (a repository secret or variable in CI)"
        )),
        RankdeployError::InvalidValue { field, .. } => {
            Some(format!("Correct {field} in rankdeploy.toml or the environment"))
        }
        RankdeployError::Config { file, .. } => Some(format!(
            "Fix {} or pass --config with a valid file",
            file.display()
        )),
        RankdeployError::LockfileNotFound { .. } => {
            Some("Run `uv lock` or `poetry lock` in the function source directory".to_string())
        }
        RankdeployError::RunInProgress { .. } => {
            Some("Wait for the other run to finish; its lock is released on exit".to_string())
        }
        RankdeployError::Cloud(cloud) => cloud_fix(cloud),
        RankdeployError::StepFailed { source, .. } => fix_for(source),
        _ => None,
    }
}

fn cloud_fix(err: &CloudError) -> Option<String> {
    match err {
        CloudError::Spawn { program, .. } => Some(format!(
            "Install the Google Cloud SDK or point RANKDEPLOY_GCLOUD at '{program}'"
        )),
        CloudError::Credentials(_) => Some(
            "Check WORKLOAD_IDENTITY_PROVIDER and SERVICE_ACCOUNT, or log in with `gcloud auth login`"
                .to_string(),
        ),
        CloudError::CommandFailed { .. } => {
            Some("Re-run with -v to log the gcloud command lines".to_string())
        }
        _ => None,
    }
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    let rankdeploy_err = err.downcast_ref::<RankdeployError>();

    if json {
        let mut output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
        });
        if let Some(step) = rankdeploy_err.and_then(RankdeployError::step) {
            output["step"] = serde_json::json!(step);
        }
        let _ = crate::ui::json::emit(output);
        return;
    }

    let caps = detect_capabilities();
    if caps.github_actions {
        let title = rankdeploy_err
            .and_then(RankdeployError::step)
            .map(|step| format!("rankdeploy: {}", step.title()));
        println!(
            "{}",
            github_actions_annotation(
                AnnotationLevel::Error,
                &err.to_string(),
                title.as_deref().or(Some("rankdeploy")),
            )
        );
    }

    eprint!("{}", format_error_with(err, caps.supports_color, caps.supports_unicode));
}
