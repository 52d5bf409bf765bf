//! JSON Event Sink
//!
//! Outputs pipeline events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::domain::ports::{PipelineEvent, PipelineEventSink};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
    command: &'static str,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            command,
        }
    }

    fn write_event(&self, mut event: serde_json::Value) {
        if let Some(obj) = event.as_object_mut() {
            obj.insert("command".to_string(), json!(self.command));
            obj.insert(
                "timestamp".to_string(),
                json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON body of an event, without `command` and `timestamp`
pub fn event_json(event: &PipelineEvent) -> serde_json::Value {
    match event {
        PipelineEvent::Started {
            function,
            region,
            steps,
        } => json!({
            "event": "start",
            "function": function,
            "region": region,
            "steps": steps,
        }),

        PipelineEvent::StepStarted { step } => json!({
            "event": "step_start",
            "step": step,
            "index": step.number(),
        }),

        PipelineEvent::ManifestExported {
            lockfile,
            path,
            packages,
            digest,
        } => json!({
            "event": "manifest_exported",
            "lockfile": lockfile.display().to_string(),
            "path": path.display().to_string(),
            "packages": packages,
            "digest": digest,
        }),

        PipelineEvent::Authenticated { identity } => json!({
            "event": "authenticated",
            "identity": identity,
        }),

        PipelineEvent::FunctionDeployed { name, region } => json!({
            "event": "function_deployed",
            "name": name,
            "region": region,
        }),

        PipelineEvent::FunctionUriResolved { uri } => json!({
            "event": "function_uri",
            "uri": uri,
        }),

        PipelineEvent::SchedulerJobDeleted { job, existed } => json!({
            "event": "job_deleted",
            "job": job,
            "existed": existed,
        }),

        PipelineEvent::SchedulerJobCreated { job, uri, schedule } => json!({
            "event": "job_created",
            "job": job,
            "uri": uri,
            "schedule": schedule,
        }),

        PipelineEvent::Verified { uri, job } => json!({
            "event": "verified",
            "uri": uri,
            "job": job,
        }),

        PipelineEvent::StepCompleted { step, elapsed_ms } => json!({
            "event": "step_complete",
            "step": step,
            "elapsed_ms": elapsed_ms,
        }),

        PipelineEvent::StepFailed { step, error } => json!({
            "event": "step_failed",
            "step": step,
            "error": error,
        }),

        PipelineEvent::Interrupted { next } => json!({
            "event": "interrupted",
            "next": next,
        }),

        PipelineEvent::Completed {
            success,
            steps_run,
            elapsed_ms,
        } => json!({
            "event": "complete",
            "status": if *success { "success" } else { "failed" },
            "steps_run": steps_run,
            "elapsed_ms": elapsed_ms,
        }),
    }
}

impl PipelineEventSink for JsonEventSink {
    fn on_event(&self, event: PipelineEvent) {
        self.write_event(event_json(&event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FunctionUri, PipelineStep};
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_step_events_with_kebab_case_steps() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("deploy", writer);

        sink.on_event(PipelineEvent::StepStarted {
            step: PipelineStep::ResolveFunctionUri,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "step_start");
        assert_eq!(events[0]["step"], "resolve-function-uri");
        assert_eq!(events[0]["index"], 4);
        assert_eq!(events[0]["command"], "deploy");
        assert!(events[0]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn json_sink_outputs_job_created() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("deploy", writer);

        sink.on_event(PipelineEvent::SchedulerJobCreated {
            job: "crypto-rank-tracker-job".to_string(),
            uri: FunctionUri::parse("https://f.example.run.app").unwrap(),
            schedule: "*/10 * * * *".to_string(),
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["uri"], "https://f.example.run.app");
        assert_eq!(events[0]["schedule"], "*/10 * * * *");
    }

    #[test]
    fn json_sink_outputs_failed_status() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer("schedule", writer);

        sink.on_event(PipelineEvent::Completed {
            success: false,
            steps_run: 3,
            elapsed_ms: 1200,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["status"], "failed");
        assert_eq!(events[0]["steps_run"], 3);
    }
}
