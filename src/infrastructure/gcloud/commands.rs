//! gcloud argument builders
//!
//! Shared by the provider (to run them) and by `plan` (to print them).

use std::path::Path;

use crate::domain::entities::{FunctionEnv, FunctionSpec, SchedulerJobSpec};
use crate::domain::value_objects::{AttemptDeadline, CronSchedule, ServiceAccountEmail};

/// One gcloud invocation, without the binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcloudCommand {
    args: Vec<String>,
}

impl GcloudCommand {
    fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn flag(self, name: &str, value: impl AsRef<str>) -> Self {
        self.arg(format!("--{}={}", name, value.as_ref()))
    }

    fn project(self, project: Option<&str>) -> Self {
        match project {
            Some(project) => self.flag("project", project),
            None => self,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Short form for errors and logs (`gcloud functions deploy`)
    pub fn summary(&self, binary: &str) -> String {
        let mut words = vec![binary.to_string()];
        words.extend(
            self.args
                .iter()
                .take_while(|a| !a.starts_with("--"))
                .take(4)
                .cloned(),
        );
        words.join(" ")
    }

    /// Shell-quoted command line
    pub fn render(&self, binary: &str) -> String {
        std::iter::once(binary)
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Scheduler job fields that do not depend on the function URI
#[derive(Debug, Clone)]
pub struct JobParams<'a> {
    pub name: &'a str,
    pub region: &'a str,
    pub schedule: &'a CronSchedule,
    pub time_zone: &'a str,
    pub http_method: &'a str,
    pub service_account: &'a ServiceAccountEmail,
    pub attempt_deadline: AttemptDeadline,
}

impl<'a> From<&'a SchedulerJobSpec> for JobParams<'a> {
    fn from(spec: &'a SchedulerJobSpec) -> Self {
        Self {
            name: &spec.name,
            region: &spec.region,
            schedule: &spec.schedule,
            time_zone: &spec.time_zone,
            http_method: &spec.http_method,
            service_account: &spec.oidc_service_account,
            attempt_deadline: spec.attempt_deadline,
        }
    }
}

pub fn auth_login(cred_file: &Path, project: Option<&str>) -> GcloudCommand {
    GcloudCommand::new(["auth", "login"])
        .flag("cred-file", cred_file.to_string_lossy())
        .arg("--quiet")
        .project(project)
}

pub fn active_account() -> GcloudCommand {
    GcloudCommand::new(["auth", "list"])
        .flag("filter", "status:ACTIVE")
        .flag("format", "value(account)")
}

pub fn deploy_function(spec: &FunctionSpec, project: Option<&str>) -> GcloudCommand {
    let mut cmd = GcloudCommand::new(["functions", "deploy", spec.name.as_str()])
        .arg("--gen2")
        .flag("runtime", &spec.runtime)
        .flag("region", &spec.region)
        .flag("source", spec.source_dir.to_string_lossy())
        .flag("entry-point", &spec.entry_point)
        .arg("--trigger-http");
    if spec.allow_unauthenticated {
        cmd = cmd.arg("--allow-unauthenticated");
    }
    cmd.flag("set-env-vars", env_vars_value(&spec.env))
        .arg("--quiet")
        .project(project)
}

pub fn function_uri(name: &str, region: &str, project: Option<&str>) -> GcloudCommand {
    GcloudCommand::new(["functions", "describe", name])
        .arg("--gen2")
        .flag("region", region)
        .flag("format", "value(serviceConfig.uri)")
        .project(project)
}

pub fn delete_job(name: &str, region: &str, project: Option<&str>) -> GcloudCommand {
    GcloudCommand::new(["scheduler", "jobs", "delete", name])
        .flag("location", region)
        .arg("--quiet")
        .project(project)
}

pub fn create_job(job: &JobParams<'_>, uri: &str, project: Option<&str>) -> GcloudCommand {
    GcloudCommand::new(["scheduler", "jobs", "create", "http", job.name])
        .flag("location", job.region)
        .flag("schedule", job.schedule.as_str())
        .flag("time-zone", job.time_zone)
        .flag("uri", uri)
        .flag("http-method", job.http_method)
        .flag("oidc-service-account-email", job.service_account.as_str())
        .flag("oidc-token-audience", uri)
        .flag("attempt-deadline", job.attempt_deadline.to_gcloud())
        .project(project)
}

pub fn describe_job(name: &str, region: &str, project: Option<&str>) -> GcloudCommand {
    GcloudCommand::new(["scheduler", "jobs", "describe", name])
        .flag("location", region)
        .flag("format", "json")
        .project(project)
}

/// `--set-env-vars` value, switching delimiter when a value contains a comma
///
/// See `gcloud topic escaping`.
pub fn env_vars_value(env: &FunctionEnv) -> String {
    let pairs: Vec<String> = env
        .pairs()
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();

    if !pairs.iter().any(|p| p.contains(',')) {
        return pairs.join(",");
    }

    let delimiter = ['@', '|', ';', '~', '#']
        .into_iter()
        .find(|d| !pairs.iter().any(|p| p.contains(*d)))
        .unwrap_or('\u{1f}');
    let joined = pairs.join(&delimiter.to_string());
    format!("^{delimiter}^{joined}")
}

fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::StorageMethod;
    use std::path::PathBuf;

    fn function(env: FunctionEnv) -> FunctionSpec {
        FunctionSpec {
            name: "crypto-rank-tracker".to_string(),
            runtime: "python311".to_string(),
            entry_point: "main".to_string(),
            region: "asia-northeast3".to_string(),
            source_dir: PathBuf::from("."),
            allow_unauthenticated: false,
            env,
        }
    }

    #[test]
    fn deploy_injects_env_vars_and_project() {
        let env = FunctionEnv::new(StorageMethod::Gcs, None, "https://hooks.example/abc");
        let cmd = deploy_function(&function(env), Some("rank-prod"));
        assert_eq!(
            cmd.args(),
            &[
                "functions",
                "deploy",
                "crypto-rank-tracker",
                "--gen2",
                "--runtime=python311",
                "--region=asia-northeast3",
                "--source=.",
                "--entry-point=main",
                "--trigger-http",
                "--set-env-vars=STATE_STORAGE_METHOD=GCS,GCS_BUCKET_NAME=storage,WEBHOOK_URL=https://hooks.example/abc",
                "--quiet",
                "--project=rank-prod",
            ]
        );
    }

    #[test]
    fn env_vars_with_commas_use_alternate_delimiter() {
        let env = FunctionEnv::new(
            StorageMethod::Local,
            Some("b"),
            "https://hooks.example/a?x=1,2",
        );
        assert_eq!(
            env_vars_value(&env),
            "^@^STATE_STORAGE_METHOD=LOCAL@GCS_BUCKET_NAME=b@WEBHOOK_URL=https://hooks.example/a?x=1,2"
        );
    }

    #[test]
    fn create_job_uses_uri_as_audience() {
        let schedule = CronSchedule::every_ten_minutes();
        let account = ServiceAccountEmail::parse("deployer@rank-prod.iam.gserviceaccount.com").unwrap();
        let params = JobParams {
            name: "crypto-rank-tracker-job",
            region: "asia-northeast3",
            schedule: &schedule,
            time_zone: "Asia/Seoul",
            http_method: "POST",
            service_account: &account,
            attempt_deadline: AttemptDeadline::fifteen_minutes(),
        };
        let cmd = create_job(&params, "https://f.example.run.app", None);
        let args = cmd.args();
        assert!(args.contains(&"--schedule=*/10 * * * *".to_string()));
        assert!(args.contains(&"--uri=https://f.example.run.app".to_string()));
        assert!(args.contains(&"--oidc-token-audience=https://f.example.run.app".to_string()));
        assert!(args.contains(&"--attempt-deadline=900s".to_string()));
        assert!(args.contains(&"--http-method=POST".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--project")));
    }

    #[test]
    fn render_quotes_words_with_spaces() {
        let cmd = GcloudCommand::new(["scheduler"]).flag("schedule", "*/10 * * * *");
        assert_eq!(cmd.render("gcloud"), "gcloud scheduler '--schedule=*/10 * * * *'");
        assert_eq!(
            delete_job("j", "r", None).summary("gcloud"),
            "gcloud scheduler jobs delete j"
        );
    }
}
