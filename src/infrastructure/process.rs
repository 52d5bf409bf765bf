//! System Command Runner
//!
//! Implements the CommandRunner port with `std::process`.
//!
//! On unix each child gets its own process group, so a terminal Ctrl-C only
//! reaches rankdeploy. The run then stops between steps while an in-flight
//! gcloud call finishes.

use std::process::{Command, Stdio};
use std::time::Instant;

use crate::domain::ports::{CloudError, CommandOutput, CommandRunner};

/// Runs real programs, capturing stdout and stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

/// `Command` for `program`, detached from the caller's process group
fn command(program: &str) -> Command {
    let mut command = Command::new(program);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    command
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Whether `program --version` can be started and exits cleanly
    pub fn is_available(&self, program: &str) -> bool {
        command(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CloudError> {
        tracing::debug!(program, args = %args.join(" "), "running command");
        let started = Instant::now();

        let output = command(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CloudError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(
            program,
            code = ?result.code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );
        Ok(result)
    }
}
