//! Service Account Value Object

use std::fmt;

const SA_DOMAIN_SUFFIX: &str = ".iam.gserviceaccount.com";

/// Service-account email the scheduler and credentials act as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountEmail(String);

impl ServiceAccountEmail {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let email = raw.trim();
        let Some((name, domain)) = email.split_once('@') else {
            return Err(format!("'{email}' is not an email address"));
        };
        if name.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(format!("'{email}' is not an email address"));
        }
        Ok(Self(email.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project id for user-managed accounts (`name@<project>.iam.gserviceaccount.com`)
    pub fn project_id(&self) -> Option<&str> {
        let (_, domain) = self.0.split_once('@')?;
        domain
            .strip_suffix(SA_DOMAIN_SUFFIX)
            .filter(|project| !project.is_empty())
    }
}

impl fmt::Display for ServiceAccountEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
