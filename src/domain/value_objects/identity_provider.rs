//! Workload Identity Provider Value Object

use std::fmt;

/// Full resource name of a workload identity pool provider
///
/// `projects/<number>/locations/global/workloadIdentityPools/<pool>/providers/<provider>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadIdentityProvider(String);

impl WorkloadIdentityProvider {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let name = raw.trim().trim_start_matches("//iam.googleapis.com/");
        let parts: Vec<&str> = name.split('/').collect();
        let shape_ok = parts.len() == 8
            && parts[0] == "projects"
            && parts[2] == "locations"
            && parts[4] == "workloadIdentityPools"
            && parts[6] == "providers"
            && parts.iter().all(|p| !p.is_empty());
        if !shape_ok {
            return Err(format!(
                "'{name}' is not of the form projects/<number>/locations/<location>/workloadIdentityPools/<pool>/providers/<provider>"
            ));
        }
        if !parts[1].chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "'{}' must be a project number, not a project id",
                parts[1]
            ));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// STS audience for the token exchange
    pub fn audience(&self) -> String {
        format!("//iam.googleapis.com/{}", self.0)
    }
}

impl fmt::Display for WorkloadIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
