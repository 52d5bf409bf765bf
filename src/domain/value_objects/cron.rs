//! Cron Schedule Value Object
//!
//! Five-field unix cron expression as accepted by Cloud Scheduler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const FIELDS: [(&str, u32, u32); 5] = [
    ("minute", 0, 59),
    ("hour", 0, 23),
    ("day-of-month", 1, 31),
    ("month", 1, 12),
    ("day-of-week", 0, 7),
];

/// A validated cron expression (`minute hour dom month dow`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    expr: String,
}

impl CronSchedule {
    /// Every ten minutes, the tracker's cadence
    pub fn every_ten_minutes() -> Self {
        Self {
            expr: "*/10 * * * *".to_string(),
        }
    }

    pub fn parse(expr: &str) -> Result<Self, String> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != FIELDS.len() {
            return Err(format!(
                "expected 5 fields (minute hour day-of-month month day-of-week), got {}",
                fields.len()
            ));
        }

        for (raw, (name, min, max)) in fields.iter().zip(FIELDS) {
            validate_field(raw, min, max).map_err(|e| format!("{name} field '{raw}': {e}"))?;
        }

        Ok(Self {
            expr: fields.join(" "),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// Fixed cadence in minutes, for expressions of the form `*/n * * * *`
    pub fn interval_minutes(&self) -> Option<u32> {
        let mut fields = self.expr.split(' ');
        let minute = fields.next()?;
        if !fields.all(|f| f == "*") {
            return None;
        }
        match minute {
            "*" => Some(1),
            m => m.strip_prefix("*/")?.parse().ok(),
        }
    }

    /// Short description for console output
    pub fn describe(&self) -> String {
        match self.interval_minutes() {
            Some(1) => "every minute".to_string(),
            Some(n) => format!("every {n} minutes"),
            None => format!("cron '{}'", self.expr),
        }
    }
}

fn validate_field(raw: &str, min: u32, max: u32) -> Result<(), String> {
    for item in raw.split(',') {
        if item.is_empty() {
            return Err("empty list item".to_string());
        }

        let (range, step) = match item.split_once('/') {
            Some((range, step)) => (range, Some(step)),
            None => (item, None),
        };

        if let Some(step) = step {
            let step: u32 = step
                .parse()
                .map_err(|_| format!("step '{step}' is not a number"))?;
            if step == 0 || step > max {
                return Err(format!("step {step} out of range 1-{max}"));
            }
        }

        if range == "*" {
            continue;
        }

        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (parse_bound(start, min, max)?, parse_bound(end, min, max)?),
            None => {
                let value = parse_bound(range, min, max)?;
                (value, value)
            }
        };

        if start > end {
            return Err(format!("range {start}-{end} is reversed"));
        }
    }
    Ok(())
}

fn parse_bound(raw: &str, min: u32, max: u32) -> Result<u32, String> {
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value < min || value > max {
        return Err(format!("{value} out of range {min}-{max}"));
    }
    Ok(value)
}

impl Default for CronSchedule {
    fn default() -> Self {
        Self::every_ten_minutes()
    }
}

impl FromStr for CronSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

impl Serialize for CronSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expr)
    }
}

impl<'de> Deserialize<'de> for CronSchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
