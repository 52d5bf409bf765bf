//! Lockfile fixtures and a scripted gcloud.

use std::path::{Path, PathBuf};

use super::TestEnv;

/// uv lock for a project depending on aiohttp, with pytest as a dev dependency
pub const UV_LOCK: &str = r#"version = 1
requires-python = ">=3.11"

[[package]]
name = "aiohttp"
version = "3.9.5"
source = { registry = "https://pypi.org/simple" }
dependencies = [{ name = "yarl" }]

[[package]]
name = "crypto-rank-tracker"
version = "0.1.0"
source = { virtual = "." }
dependencies = [{ name = "aiohttp" }]

[package.dev-dependencies]
dev = [{ name = "pytest" }]

[[package]]
name = "pytest"
version = "8.2.0"
source = { registry = "https://pypi.org/simple" }

[[package]]
name = "yarl"
version = "1.9.4"
source = { registry = "https://pypi.org/simple" }
"#;

/// Poetry lock with a main and a dev group
pub const POETRY_LOCK: &str = r#"[[package]]
name = "requests"
version = "2.32.3"
optional = false
python-versions = ">=3.8"
groups = ["main"]

[[package]]
name = "pytest"
version = "8.2.0"
optional = false
groups = ["dev"]

[metadata]
lock-version = "2.1"
python-versions = "^3.11"
content-hash = "abc"
"#;

pub const FUNCTION_URI: &str = "https://crypto-rank-tracker-abc123-du.a.run.app";

/// Shell script standing in for gcloud
///
/// Keeps function and job state as marker files in `$FAKE_GCLOUD_STATE`,
/// appends every invocation to `$FAKE_GCLOUD_STATE/calls.log`, and fails the
/// subcommand named by `$FAKE_GCLOUD_FAIL` (e.g. `create`).
const FAKE_GCLOUD: &str = r#"#!/bin/sh
state="$FAKE_GCLOUD_STATE"
echo "$*" >> "$state/calls.log"

if [ "$1" = "--version" ]; then
    echo "Google Cloud SDK 480.0.0"
    exit 0
fi

case "$*" in
    *"$FAKE_GCLOUD_FAIL"*)
        if [ -n "$FAKE_GCLOUD_FAIL" ]; then
            echo "ERROR: PERMISSION_DENIED: caller lacks permission" >&2
            exit 1
        fi
        ;;
esac

case "$1 $2 $3" in
    "auth list "*)
        echo "deployer@rank-prod.iam.gserviceaccount.com"
        ;;
    "functions deploy "*)
        touch "$state/function"
        echo "Deploying function..." >&2
        ;;
    "functions describe "*)
        if [ -f "$state/function" ]; then
            echo "__URI__"
        else
            echo "ERROR: (gcloud.functions.describe) NOT_FOUND: Resource not found" >&2
            exit 1
        fi
        ;;
    "scheduler jobs delete")
        if [ -f "$state/job" ]; then
            rm "$state/job"
        else
            echo "ERROR: (gcloud.scheduler.jobs.delete) NOT_FOUND: Job not found." >&2
            exit 1
        fi
        ;;
    "scheduler jobs create")
        if [ -f "$state/job" ]; then
            echo "ERROR: (gcloud.scheduler.jobs.create.http) ALREADY_EXISTS: Job exists." >&2
            exit 1
        fi
        touch "$state/job"
        ;;
    "scheduler jobs describe")
        if [ -f "$state/job" ]; then
            cat <<JSON
{"name": "projects/rank-prod/locations/asia-northeast3/jobs/crypto-rank-tracker-job",
 "schedule": "*/10 * * * *", "timeZone": "Asia/Seoul", "state": "ENABLED",
 "attemptDeadline": "900s",
 "httpTarget": {"uri": "__URI__", "httpMethod": "POST",
   "oidcToken": {"serviceAccountEmail": "deployer@rank-prod.iam.gserviceaccount.com"}}}
JSON
        else
            echo "ERROR: (gcloud.scheduler.jobs.describe) NOT_FOUND: Job not found." >&2
            exit 1
        fi
        ;;
    *)
        echo "unexpected gcloud call: $*" >&2
        exit 2
        ;;
esac
"#;

/// Install the scripted gcloud into the test home and point rankdeploy at it
#[cfg(unix)]
pub fn with_fake_gcloud(env: TestEnv) -> TestEnv {
    use std::os::unix::fs::PermissionsExt;

    let state = env.home_dir.path().join("gcloud-state");
    std::fs::create_dir_all(&state).unwrap();
    let script = env.home_dir.path().join("gcloud");
    std::fs::write(&script, FAKE_GCLOUD.replace("__URI__", FUNCTION_URI)).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    env.with_env("RANKDEPLOY_GCLOUD", &script)
        .with_env("FAKE_GCLOUD_STATE", &state)
}

pub fn gcloud_state(env: &TestEnv) -> PathBuf {
    env.home_dir.path().join("gcloud-state")
}

/// Every recorded gcloud invocation, one per line
pub fn gcloud_calls(env: &TestEnv) -> Vec<String> {
    let log = gcloud_state(env).join("calls.log");
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn job_exists(env: &TestEnv) -> bool {
    Path::new(&gcloud_state(env)).join("job").exists()
}
