//! CI workflow rendering
//!
//! Produces the GitHub Actions workflow that runs `rankdeploy deploy` on push,
//! pull request and manual dispatch.

use std::collections::BTreeMap;

use serde::Serialize;

/// Options for the generated workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    pub name: String,
    pub branch: String,
    pub runner: String,
    /// Shell command that installs rankdeploy on the runner
    pub install: String,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            name: "Deploy crypto-rank-tracker".to_string(),
            branch: "main".to_string(),
            runner: "ubuntu-latest".to_string(),
            install: "cargo install rankdeploy --locked".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Workflow {
    name: String,
    on: Triggers,
    permissions: BTreeMap<&'static str, &'static str>,
    jobs: BTreeMap<&'static str, Job>,
}

#[derive(Debug, Serialize)]
struct Triggers {
    push: BranchFilter,
    pull_request: BranchFilter,
    workflow_dispatch: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct BranchFilter {
    branches: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Job {
    #[serde(rename = "runs-on")]
    runs_on: String,
    steps: Vec<Step>,
}

#[derive(Debug, Serialize)]
struct Step {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    uses: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<&'static str, &'static str>,
}

impl Step {
    fn uses(name: &'static str, action: &'static str) -> Self {
        Self {
            name,
            uses: Some(action),
            run: None,
            env: BTreeMap::new(),
        }
    }

    fn run(name: &'static str, command: impl Into<String>) -> Self {
        Self {
            name,
            uses: None,
            run: Some(command.into()),
            env: BTreeMap::new(),
        }
    }
}

/// Secrets and variables passed to `rankdeploy deploy`
pub const WORKFLOW_ENV: &[(&str, &str)] = &[
    (
        "WORKLOAD_IDENTITY_PROVIDER",
        "${{ secrets.WORKLOAD_IDENTITY_PROVIDER }}",
    ),
    ("SERVICE_ACCOUNT", "${{ secrets.SERVICE_ACCOUNT }}"),
    ("WEBHOOK_URL", "${{ secrets.WEBHOOK_URL }}"),
    ("GCS_BUCKET_NAME", "${{ vars.GCS_BUCKET_NAME }}"),
];

/// Render the workflow as YAML
pub fn render_workflow(options: &WorkflowOptions) -> Result<String, String> {
    let branches = BranchFilter {
        branches: vec![options.branch.clone()],
    };

    let mut deploy = Step::run("Deploy function and scheduler job", "rankdeploy deploy --yes");
    deploy.env = WORKFLOW_ENV.iter().copied().collect();

    let job = Job {
        runs_on: options.runner.clone(),
        steps: vec![
            Step::uses("Checkout", "actions/checkout@v4"),
            Step::uses("Set up gcloud", "google-github-actions/setup-gcloud@v2"),
            Step::run("Install rankdeploy", options.install.clone()),
            deploy,
        ],
    };

    let workflow = Workflow {
        name: options.name.clone(),
        on: Triggers {
            push: BranchFilter {
                branches: branches.branches.clone(),
            },
            pull_request: branches,
            workflow_dispatch: BTreeMap::new(),
        },
        permissions: [("contents", "read"), ("id-token", "write")]
            .into_iter()
            .collect(),
        jobs: [("deploy", job)].into_iter().collect(),
    };

    serde_yaml_ng::to_string(&workflow).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml_ng::Value;

    fn rendered(branch: &str) -> Value {
        let yaml = render_workflow(&WorkflowOptions {
            branch: branch.to_string(),
            ..WorkflowOptions::default()
        })
        .unwrap();
        serde_yaml_ng::from_str(&yaml).unwrap()
    }

    #[test]
    fn triggers_on_push_pr_and_dispatch() {
        let doc = rendered("release");
        let on = &doc["on"];
        assert_eq!(on["push"]["branches"][0], Value::from("release"));
        assert_eq!(on["pull_request"]["branches"][0], Value::from("release"));
        assert!(on.get("workflow_dispatch").is_some());
    }

    #[test]
    fn requests_id_token_permission() {
        let doc = rendered("main");
        assert_eq!(doc["permissions"]["id-token"], Value::from("write"));
    }

    #[test]
    fn deploy_step_maps_secrets() {
        let doc = rendered("main");
        let steps = doc["jobs"]["deploy"]["steps"].as_sequence().unwrap();
        let deploy = steps.last().unwrap();
        assert_eq!(deploy["run"], Value::from("rankdeploy deploy --yes"));
        assert_eq!(
            deploy["env"]["WEBHOOK_URL"],
            Value::from("${{ secrets.WEBHOOK_URL }}")
        );
        assert_eq!(
            deploy["env"]["GCS_BUCKET_NAME"],
            Value::from("${{ vars.GCS_BUCKET_NAME }}")
        );
    }
}
