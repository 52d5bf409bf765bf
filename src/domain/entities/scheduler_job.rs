//! Scheduler job entity - the recurring trigger bound to the function

use serde::Serialize;

use crate::domain::value_objects::{
    AttemptDeadline, CronSchedule, FunctionUri, ServiceAccountEmail,
};

/// A scheduler job creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerJobSpec {
    pub name: String,
    pub region: String,
    pub schedule: CronSchedule,
    pub time_zone: String,
    pub target_uri: FunctionUri,
    pub http_method: String,
    /// Identity the OIDC token is minted for
    pub oidc_service_account: ServiceAccountEmail,
    pub attempt_deadline: AttemptDeadline,
}

impl SchedulerJobSpec {
    /// OIDC audience; always the target URI
    pub fn oidc_audience(&self) -> &str {
        self.target_uri.as_str()
    }
}

/// Outcome of deleting a job by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobDeletion {
    Deleted,
    NotFound,
}

impl JobDeletion {
    pub fn existed(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// A job as reported back by the cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerJobDescription {
    pub name: String,
    pub schedule: String,
    pub time_zone: String,
    pub state: String,
    pub uri: String,
    pub http_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_service_account: Option<String>,
}
