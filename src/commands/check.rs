//! `rankdeploy check` - diagnose configuration before a deploy

use anyhow::Result;
use rankdeploy::application::{CheckItem, CheckOptions, CheckResult, CheckStatus, CheckUseCase};
use rankdeploy::infrastructure::{FsLockfileRepository, SystemCommandRunner};

use super::Session;
use crate::ui::ci::{self, AnnotationLevel};
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

pub fn cmd_check(session: &Session, strict_warnings: bool) -> Result<()> {
    let ui = &session.ui;
    let options = CheckOptions {
        gcloud_available: SystemCommandRunner::new().is_available(&session.config.gcloud.binary),
        strict_warnings,
    };

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "start",
            "command": "check",
            "strict_warnings": strict_warnings,
        }))?;
    } else {
        println!(
            "{} {}",
            Icon::Check.colored(ui.color, ui.unicode),
            strong("rankdeploy check", ui.color)
        );
        println!();
    }

    let use_case = CheckUseCase::new(FsLockfileRepository::new());
    let mut emit_error = None;
    let result = use_case.execute_with_callback(
        &session.config,
        &session.inputs,
        &session.project_root,
        &options,
        |item| {
            if ui.json {
                let event = serde_json::json!({
                    "event": "check",
                    "command": "check",
                    "category": item.category,
                    "name": item.name,
                    "status": item.status,
                    "message": item.message,
                    "recommendation": item.recommendation,
                });
                if let Err(e) = crate::ui::json::emit(event) {
                    emit_error.get_or_insert(e);
                }
            }
        },
    );
    if let Some(e) = emit_error {
        return Err(e.into());
    }

    let success = result.passes(strict_warnings);

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "complete",
            "command": "check",
            "strict_warnings": strict_warnings,
            "passes": result.passed,
            "warnings": result.warnings,
            "errors": result.errors,
            "success": success,
        }))?;
    } else {
        print!("{}", render_report(&result, ui.verbose, ui.color, ui.unicode));
        println!();
        println!("{}", render_summary(&result, success, ui.color));

        if ui.caps.github_actions {
            for item in &result.items {
                let level = match item.status {
                    CheckStatus::Pass => continue,
                    CheckStatus::Warning => AnnotationLevel::Warning,
                    CheckStatus::Error => AnnotationLevel::Error,
                };
                let title = format!("{} {}", item.category, item.name);
                println!(
                    "{}",
                    ci::github_actions_annotation(level, &item.message, Some(&title))
                );
            }
        }
    }

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn status_icon(status: CheckStatus) -> Icon {
    match status {
        CheckStatus::Pass => Icon::Success,
        CheckStatus::Warning => Icon::Warning,
        CheckStatus::Error => Icon::Error,
    }
}

fn render_item(item: &CheckItem, color: bool, unicode: bool) -> String {
    let mut out = format!(
        "  {} {} - {}\n",
        status_icon(item.status).colored(color, unicode),
        item.name,
        item.message
    );
    if let Some(fix) = &item.recommendation {
        out.push_str(&format!(
            "      {} {}\n",
            Icon::Arrow.render(unicode),
            paint(fix, Tone::Dim, color)
        ));
    }
    out
}

/// Group items by category in first-seen order
///
/// Passing checks are listed only with `-v`.
pub fn render_report(result: &CheckResult, verbose: u8, color: bool, unicode: bool) -> String {
    let mut categories: Vec<&'static str> = Vec::new();
    for item in &result.items {
        if !categories.contains(&item.category) {
            categories.push(item.category);
        }
    }

    let mut out = String::new();
    for category in categories {
        let items: Vec<&CheckItem> = result
            .items
            .iter()
            .filter(|i| i.category == category)
            .filter(|i| verbose > 0 || i.status != CheckStatus::Pass)
            .collect();
        let passed = result
            .items
            .iter()
            .filter(|i| i.category == category && i.status == CheckStatus::Pass)
            .count();

        if items.is_empty() {
            out.push_str(&format!(
                "{} {} ({} passed)\n",
                Icon::Success.colored(color, unicode),
                category,
                passed
            ));
            continue;
        }

        out.push_str(&format!("{}\n", strong(category, color)));
        for item in items {
            out.push_str(&render_item(item, color, unicode));
        }
    }
    out
}

pub fn render_summary(result: &CheckResult, success: bool, color: bool) -> String {
    let text = format!(
        "{} passed, {} warning{}, {} error{}",
        result.passed,
        result.warnings,
        if result.warnings == 1 { "" } else { "s" },
        result.errors,
        if result.errors == 1 { "" } else { "s" },
    );
    if success {
        paint(&text, Tone::Success, color)
    } else {
        paint(&text, Tone::Error, color)
    }
}
