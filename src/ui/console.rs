//! Console event sink
//!
//! Renders pipeline events as step-by-step progress. Under GitHub Actions each
//! step is wrapped in a collapsible log group and failures become `::error::`
//! annotations.

use std::io::{self, Write};
use std::sync::Mutex;

use rankdeploy::domain::ports::{PipelineEvent, PipelineEventSink};
use rankdeploy::domain::value_objects::PipelineStep;

use crate::ui::ci::{self, AnnotationLevel};
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

pub struct ConsoleEventSink {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
    unicode: bool,
    github_actions: bool,
}

impl ConsoleEventSink {
    pub fn stdout(ui: &UiContext) -> Self {
        Self::with_writer(ui, Box::new(io::stdout()))
    }

    pub fn with_writer(ui: &UiContext, out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            color: ui.color,
            unicode: ui.unicode,
            github_actions: ui.caps.github_actions,
        }
    }

    fn icon(&self, icon: Icon) -> String {
        icon.colored(self.color, self.unicode)
    }

    fn detail(&self, text: &str) -> String {
        format!("  {} {}", self.icon(Icon::Arrow), text)
    }

    fn render(&self, event: &PipelineEvent) -> Vec<String> {
        match event {
            PipelineEvent::Started {
                function,
                region,
                steps,
            } => vec![
                format!(
                    "{} {}",
                    self.icon(Icon::Deploy),
                    strong(&format!("rankdeploy: {function} ({region})"), self.color)
                ),
                paint(
                    &format!("  {} of {} steps", steps.len(), PipelineStep::ALL.len()),
                    Tone::Dim,
                    self.color,
                ),
                String::new(),
            ],

            PipelineEvent::StepStarted { step } => {
                if self.github_actions {
                    vec![ci::group_start(&step_label(*step))]
                } else {
                    vec![format!("{} {}", self.icon(Icon::Progress), step_label(*step))]
                }
            }

            PipelineEvent::ManifestExported {
                lockfile,
                path,
                packages,
                digest,
            } => vec![self.detail(&format!(
                "{} packages from {} -> {} (sha256 {})",
                packages,
                lockfile.display(),
                path.display(),
                short_digest(digest)
            ))],

            PipelineEvent::Authenticated { identity } => {
                vec![self.detail(&format!("authenticated: {identity}"))]
            }

            PipelineEvent::FunctionDeployed { name, region } => {
                vec![self.detail(&format!("deployed {name} to {region}"))]
            }

            PipelineEvent::FunctionUriResolved { uri } => {
                vec![self.detail(&format!("uri: {}", paint(uri.as_str(), Tone::Info, self.color)))]
            }

            PipelineEvent::SchedulerJobDeleted { job, existed } => {
                if *existed {
                    vec![self.detail(&format!("deleted previous job {job}"))]
                } else {
                    vec![self.detail(&format!("no previous job {job}"))]
                }
            }

            PipelineEvent::SchedulerJobCreated { job, uri, schedule } => vec![format!(
                "  {} created {job} ({schedule}) -> {uri}",
                self.icon(Icon::Schedule)
            )],

            PipelineEvent::Verified { uri, job } => {
                let mut lines = Vec::new();
                match uri {
                    Some(uri) => lines.push(self.detail(&format!(
                        "function: {}",
                        paint(uri.as_str(), Tone::Info, self.color)
                    ))),
                    None => lines.push(self.detail("function: not deployed")),
                }
                match job {
                    Some(job) => {
                        lines.push(self.detail(&format!("job: {} [{}]", job.name, job.state)));
                        lines.push(format!("      schedule: {} ({})", job.schedule, job.time_zone));
                        lines.push(format!("      target:   {} {}", job.http_method, job.uri));
                        if let Some(deadline) = &job.attempt_deadline {
                            lines.push(format!("      deadline: {deadline}"));
                        }
                        if let Some(account) = &job.oidc_service_account {
                            lines.push(format!("      oidc:     {account}"));
                        }
                    }
                    None => lines.push(self.detail("job: not found")),
                }
                lines
            }

            PipelineEvent::StepCompleted { step, elapsed_ms } => {
                let mut lines = Vec::new();
                if self.github_actions {
                    lines.push(ci::group_end().to_string());
                }
                lines.push(format!(
                    "{} {} {}",
                    self.icon(Icon::Success),
                    step_label(*step),
                    paint(&format!("({})", format_elapsed(*elapsed_ms)), Tone::Dim, self.color)
                ));
                lines
            }

            PipelineEvent::StepFailed { step, error } => {
                let mut lines = Vec::new();
                if self.github_actions {
                    lines.push(ci::group_end().to_string());
                    lines.push(ci::github_actions_annotation(
                        AnnotationLevel::Error,
                        error,
                        Some(&format!("rankdeploy: {}", step.title())),
                    ));
                }
                lines.push(format!(
                    "{} {}",
                    self.icon(Icon::Error),
                    paint(&step_label(*step), Tone::Error, self.color)
                ));
                lines.push(format!("  {error}"));
                lines
            }

            PipelineEvent::Interrupted { next } => {
                let mut lines = Vec::new();
                if self.github_actions {
                    lines.push(ci::github_actions_annotation(
                        AnnotationLevel::Warning,
                        &format!("interrupted before {}", next.title()),
                        None,
                    ));
                }
                lines.push(format!(
                    "{} interrupted before {}",
                    self.icon(Icon::Warning),
                    step_label(*next)
                ));
                lines
            }

            PipelineEvent::Completed {
                success,
                steps_run,
                elapsed_ms,
            } => {
                let summary = format!(
                    "{} step{} in {}",
                    steps_run,
                    if *steps_run == 1 { "" } else { "s" },
                    format_elapsed(*elapsed_ms)
                );
                if *success {
                    vec![
                        String::new(),
                        format!(
                            "{} {}",
                            self.icon(Icon::Success),
                            paint(&format!("Done: {summary}"), Tone::Success, self.color)
                        ),
                    ]
                } else {
                    vec![
                        String::new(),
                        format!(
                            "{} {}",
                            self.icon(Icon::Error),
                            paint(&format!("Stopped after {summary}"), Tone::Error, self.color)
                        ),
                    ]
                }
            }
        }
    }
}

impl PipelineEventSink for ConsoleEventSink {
    fn on_event(&self, event: PipelineEvent) {
        let lines = self.render(&event);
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}

fn step_label(step: PipelineStep) -> String {
    format!(
        "[{}/{}] {}",
        step.number(),
        PipelineStep::ALL.len(),
        step.title()
    )
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

pub fn format_elapsed(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}m{:02}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::terminal::TerminalCapabilities;
    use rankdeploy::domain::entities::SchedulerJobDescription;
    use rankdeploy::domain::value_objects::FunctionUri;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn ui(github_actions: bool) -> UiContext {
        UiContext {
            json: false,
            verbose: 0,
            caps: TerminalCapabilities {
                is_tty: false,
                stdin_tty: false,
                supports_color: false,
                supports_unicode: false,
                is_ci: github_actions,
                github_actions,
            },
            color: false,
            unicode: false,
        }
    }

    fn sink(github_actions: bool) -> (ConsoleEventSink, SharedBuf) {
        let buf = SharedBuf::default();
        let sink = ConsoleEventSink::with_writer(&ui(github_actions), Box::new(buf.clone()));
        (sink, buf)
    }

    #[test]
    fn renders_step_progress_in_ascii() {
        let (sink, buf) = sink(false);
        sink.on_event(PipelineEvent::StepStarted {
            step: PipelineStep::DeployFunction,
        });
        sink.on_event(PipelineEvent::StepCompleted {
            step: PipelineStep::DeployFunction,
            elapsed_ms: 1500,
        });

        let text = buf.text();
        assert!(text.contains("[..] [3/7] Deploy function"));
        assert!(text.contains("[OK] [3/7] Deploy function (1.5s)"));
        assert!(!text.contains("::group::"));
    }

    #[test]
    fn github_actions_groups_steps_and_annotates_failures() {
        let (sink, buf) = sink(true);
        sink.on_event(PipelineEvent::StepStarted {
            step: PipelineStep::CreateSchedulerJob,
        });
        sink.on_event(PipelineEvent::StepFailed {
            step: PipelineStep::CreateSchedulerJob,
            error: "permission denied".to_string(),
        });

        let text = buf.text();
        assert!(text.starts_with("::group::[6/7] Create scheduler job\n"));
        assert!(text.contains("::endgroup::\n"));
        assert!(text.contains("::error title=rankdeploy%3A Create scheduler job::permission denied"));
    }

    #[test]
    fn verified_prints_job_description() {
        let (sink, buf) = sink(false);
        sink.on_event(PipelineEvent::Verified {
            uri: Some(FunctionUri::parse("https://fn.a.run.app").unwrap()),
            job: Some(SchedulerJobDescription {
                name: "crypto-rank-tracker-job".to_string(),
                schedule: "*/10 * * * *".to_string(),
                time_zone: "Asia/Seoul".to_string(),
                state: "ENABLED".to_string(),
                uri: "https://fn.a.run.app".to_string(),
                http_method: "POST".to_string(),
                attempt_deadline: Some("900s".to_string()),
                oidc_service_account: None,
            }),
        });

        let text = buf.text();
        assert!(text.contains("function: https://fn.a.run.app"));
        assert!(text.contains("job: crypto-rank-tracker-job [ENABLED]"));
        assert!(text.contains("schedule: */10 * * * * (Asia/Seoul)"));
        assert!(text.contains("deadline: 900s"));
    }

    #[test]
    fn verified_reports_missing_job() {
        let (sink, buf) = sink(false);
        sink.on_event(PipelineEvent::Verified {
            uri: None,
            job: None,
        });
        let text = buf.text();
        assert!(text.contains("function: not deployed"));
        assert!(text.contains("job: not found"));
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(850), "850ms");
        assert_eq!(format_elapsed(12_340), "12.3s");
        assert_eq!(format_elapsed(125_000), "2m05s");
    }
}
