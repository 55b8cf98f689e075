// src/aggregate/result.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Error => "ERROR",
        }
    }
}

/// Outcome of a whole check cycle. There is no degraded tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Ok,
    ServiceUnavailable,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Ok => "ok",
            OverallStatus::ServiceUnavailable => "service_unavailable",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, OverallStatus::Ok)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub message: String,
    pub status: CheckStatus,
}

impl CheckResult {
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: String::new(),
            status: CheckStatus::Ok,
        }
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            status: CheckStatus::Error,
        }
    }
}

/// The envelope returned for one check cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub results: Vec<CheckResult>,
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
}
