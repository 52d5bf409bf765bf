//! Attempt Deadline Value Object
//!
//! How long Cloud Scheduler waits for one invocation of the function.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MIN_SECS: u64 = 15;
const MAX_SECS: u64 = 30 * 60;

/// Per-attempt deadline for HTTP scheduler targets (15s..=30m)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptDeadline(Duration);

impl AttemptDeadline {
    pub fn fifteen_minutes() -> Self {
        Self(Duration::from_secs(15 * 60))
    }

    pub fn from_secs(secs: u64) -> Result<Self, String> {
        if !(MIN_SECS..=MAX_SECS).contains(&secs) {
            return Err(format!(
                "{secs}s is outside the allowed range {MIN_SECS}s-{MAX_SECS}s"
            ));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    /// Parse `900`, `900s`, `15m` or `1h`-style values
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        let (number, unit) = raw.split_at(split);
        let number: u64 = number
            .parse()
            .map_err(|_| format!("'{raw}' is not a duration"))?;
        let multiplier = match unit {
            "" | "s" => 1,
            "m" => 60,
            "h" => 3600,
            other => return Err(format!("unknown duration unit '{other}'")),
        };
        let secs = number
            .checked_mul(multiplier)
            .ok_or_else(|| format!("'{raw}' is too large"))?;
        Self::from_secs(secs)
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }

    /// gcloud flag form, always in seconds (`900s`)
    pub fn to_gcloud(self) -> String {
        format!("{}s", self.0.as_secs())
    }
}

impl Default for AttemptDeadline {
    fn default() -> Self {
        Self::fifteen_minutes()
    }
}

impl fmt::Display for AttemptDeadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        if secs % 60 == 0 {
            write!(f, "{}m", secs / 60)
        } else {
            write!(f, "{secs}s")
        }
    }
}

impl Serialize for AttemptDeadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AttemptDeadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
