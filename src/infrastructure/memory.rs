//! In-memory cloud
//!
//! Deterministic stand-in for Cloud Functions and Cloud Scheduler with
//! per-operation fault injection. Every deploy produces a new revision and a
//! new URI, so tests can tell a fresh URI from a stale one.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{
    AuthMethod, FunctionSpec, JobDeletion, SchedulerJobDescription, SchedulerJobSpec,
};
use crate::domain::ports::{CloudError, CloudProvider, CloudResult};
use crate::domain::value_objects::FunctionUri;

/// Cloud operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CloudOperation {
    Authenticate,
    DeployFunction,
    FunctionUri,
    DeleteSchedulerJob,
    CreateSchedulerJob,
    DescribeSchedulerJob,
}

/// A function as stored by the in-memory cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedFunction {
    pub spec: FunctionSpec,
    pub revision: u32,
    pub uri: FunctionUri,
}

#[derive(Debug, Default)]
struct State {
    authenticated: bool,
    functions: BTreeMap<(String, String), DeployedFunction>,
    jobs: BTreeMap<(String, String), SchedulerJobSpec>,
    faults: BTreeSet<CloudOperation>,
    calls: Vec<CloudOperation>,
}

/// In-process cloud provider
#[derive(Debug, Default)]
pub struct InMemoryCloud {
    state: Mutex<State>,
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` fail until cleared
    pub fn fail_on(&self, operation: CloudOperation) {
        self.state().faults.insert(operation);
    }

    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    /// Seed a job as if created by an earlier run
    pub fn insert_job(&self, spec: SchedulerJobSpec) {
        self.state()
            .jobs
            .insert((spec.name.clone(), spec.region.clone()), spec);
    }

    pub fn functions(&self) -> Vec<DeployedFunction> {
        self.state().functions.values().cloned().collect()
    }

    pub fn jobs(&self) -> Vec<SchedulerJobSpec> {
        self.state().jobs.values().cloned().collect()
    }

    pub fn function(&self, name: &str, region: &str) -> Option<DeployedFunction> {
        self.state()
            .functions
            .get(&(name.to_string(), region.to_string()))
            .cloned()
    }

    pub fn job(&self, name: &str, region: &str) -> Option<SchedulerJobSpec> {
        self.state()
            .jobs
            .get(&(name.to_string(), region.to_string()))
            .cloned()
    }

    /// Operations invoked so far, in order
    pub fn calls(&self) -> Vec<CloudOperation> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the state from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, operation: CloudOperation) -> CloudResult<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(operation);
        if state.faults.contains(&operation) {
            return Err(CloudError::Injected(format!("injected failure in {operation:?}")));
        }
        Ok(state)
    }
}

impl CloudProvider for InMemoryCloud {
    fn authenticate(&self, auth: &AuthMethod) -> CloudResult<String> {
        let mut state = self.enter(CloudOperation::Authenticate)?;
        state.authenticated = true;
        Ok(auth.describe())
    }

    fn deploy_function(&self, spec: &FunctionSpec) -> CloudResult<()> {
        let mut state = self.enter(CloudOperation::DeployFunction)?;
        if !state.authenticated {
            return Err(CloudError::Credentials("not authenticated".to_string()));
        }
        let key = (spec.name.clone(), spec.region.clone());
        let revision = state.functions.get(&key).map_or(1, |f| f.revision + 1);
        let uri = FunctionUri::parse(&format!(
            "https://{}-r{}-{}.a.run.app",
            spec.name, revision, spec.region
        ))
        .map_err(CloudError::InvalidResponse)?;
        state.functions.insert(
            key,
            DeployedFunction {
                spec: spec.clone(),
                revision,
                uri,
            },
        );
        Ok(())
    }

    fn function_uri(&self, name: &str, region: &str) -> CloudResult<FunctionUri> {
        let state = self.enter(CloudOperation::FunctionUri)?;
        state
            .functions
            .get(&(name.to_string(), region.to_string()))
            .map(|f| f.uri.clone())
            .ok_or_else(|| CloudError::NotFound {
                resource: format!("function {name}"),
            })
    }

    fn delete_scheduler_job(&self, name: &str, region: &str) -> CloudResult<JobDeletion> {
        let mut state = self.enter(CloudOperation::DeleteSchedulerJob)?;
        Ok(
            match state.jobs.remove(&(name.to_string(), region.to_string())) {
                Some(_) => JobDeletion::Deleted,
                None => JobDeletion::NotFound,
            },
        )
    }

    fn create_scheduler_job(&self, spec: &SchedulerJobSpec) -> CloudResult<()> {
        let mut state = self.enter(CloudOperation::CreateSchedulerJob)?;
        let key = (spec.name.clone(), spec.region.clone());
        if state.jobs.contains_key(&key) {
            return Err(CloudError::CommandFailed {
                command: "scheduler jobs create http".to_string(),
                code: Some(1),
                stderr: format!("ALREADY_EXISTS: Job {} already exists", spec.name),
            });
        }
        state.jobs.insert(key, spec.clone());
        Ok(())
    }

    fn describe_scheduler_job(
        &self,
        name: &str,
        region: &str,
    ) -> CloudResult<SchedulerJobDescription> {
        let state = self.enter(CloudOperation::DescribeSchedulerJob)?;
        let job = state
            .jobs
            .get(&(name.to_string(), region.to_string()))
            .ok_or_else(|| CloudError::NotFound {
                resource: format!("scheduler job {name}"),
            })?;
        Ok(SchedulerJobDescription {
            name: job.name.clone(),
            schedule: job.schedule.to_string(),
            time_zone: job.time_zone.clone(),
            state: "ENABLED".to_string(),
            uri: job.target_uri.to_string(),
            http_method: job.http_method.clone(),
            attempt_deadline: Some(job.attempt_deadline.to_gcloud()),
            oidc_service_account: Some(job.oidc_service_account.to_string()),
        })
    }
}
