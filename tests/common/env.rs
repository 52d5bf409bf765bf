//! Isolated environment for running the rankdeploy binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Variables the binary reads; cleared so the host environment cannot leak in
const HOST_VARS: &[&str] = &[
    "WEBHOOK_URL",
    "GCS_BUCKET_NAME",
    "SERVICE_ACCOUNT",
    "WORKLOAD_IDENTITY_PROVIDER",
    "GCP_PROJECT_ID",
    "STATE_STORAGE_METHOD",
    "RANKDEPLOY_AUTH_MODE",
    "RANKDEPLOY_REGION",
    "RANKDEPLOY_GCLOUD",
    "RANKDEPLOY_OIDC_TOKEN_FILE",
    "ACTIONS_ID_TOKEN_REQUEST_URL",
    "ACTIONS_ID_TOKEN_REQUEST_TOKEN",
    "GITHUB_OUTPUT",
    "GITHUB_ACTIONS",
    "CI",
    "RUST_LOG",
];

/// Result of one CLI invocation
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn json_events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .unwrap_or_else(|e| panic!("not JSON: {l} ({e})\nstdout:\n{}", self.stdout))
            })
            .collect()
    }
}

/// Temp project plus isolated HOME / XDG config / TMPDIR
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
    envs: Vec<(String, String)>,
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Self {
            project_root: tempfile::tempdir().unwrap(),
            home_dir: tempfile::tempdir().unwrap(),
            envs: Vec::new(),
        };
        // Anchors project root discovery to the temp project.
        env.write_project_file("rankdeploy.toml", "");
        env
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read_project_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.project_path(relative))
            .unwrap_or_else(|e| panic!("cannot read {relative}: {e}"))
    }

    pub fn with_env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs
            .push((key.to_string(), value.as_ref().to_string_lossy().into_owned()));
        self
    }

    /// The inputs a CI deploy job provides, with ambient gcloud credentials
    pub fn with_deploy_inputs(self) -> Self {
        self.with_env("RANKDEPLOY_AUTH_MODE", "ambient")
            .with_env("SERVICE_ACCOUNT", "deployer@rank-prod.iam.gserviceaccount.com")
            .with_env("WEBHOOK_URL", "https://hooks.example/abc")
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rankdeploy"));
        for key in HOST_VARS {
            cmd.env_remove(key);
        }
        let home = self.home_dir.path();
        cmd.current_dir(self.project_root.path())
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("TMPDIR", home);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        TestResult::from_output(self.command().args(args).output().unwrap())
    }
}
