//! Command Runner Port
//!
//! Abstracts process execution so cloud CLI adapters can be tested
//! without spawning real programs.

use super::cloud_provider::CloudError;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs and captures their output
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion
    ///
    /// Returns `Err` only when the program could not be started;
    /// a non-zero exit is reported through [`CommandOutput::code`].
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CloudError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_failure_constructors() {
        assert!(CommandOutput::success("ok").is_success());
        assert!(!CommandOutput::failure(1, "nope").is_success());
        assert!(!CommandOutput::default().is_success());
    }
}
