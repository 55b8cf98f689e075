// src/probe/error.rs
use std::time::Duration;

/// Message reported for failures that carry no diagnosable message.
pub const EXCEPTION_MESSAGE: &str = "Exception";

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Expected failure; the message is shown verbatim.
    #[error("{0}")]
    Failed(String),

    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// Anything the probe did not anticipate (I/O errors, panics).
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ProbeError {
    pub fn failed(message: impl Into<String>) -> Self {
        ProbeError::Failed(message.into())
    }

    /// Message placed in the result record for this failure.
    pub fn result_message(&self) -> String {
        match self {
            ProbeError::Failed(message) if !message.is_empty() => message.clone(),
            ProbeError::TimedOut(_) => self.to_string(),
            _ => EXCEPTION_MESSAGE.to_string(),
        }
    }

    pub fn is_expected(&self) -> bool {
        !matches!(self, ProbeError::Unexpected(_))
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        ProbeError::Unexpected(err.into())
    }
}

/// Error replies from the server are expected failures and keep their text;
/// connection and protocol errors are unexpected.
impl From<redis::RedisError> for ProbeError {
    fn from(err: redis::RedisError) -> Self {
        match (err.code(), err.detail()) {
            (Some(code), Some(detail)) => ProbeError::Failed(format!("{code} {detail}")),
            (Some(code), None) => ProbeError::Failed(code.to_string()),
            _ => ProbeError::Unexpected(err.into()),
        }
    }
}

/// What the error callback receives for each failing probe.
#[derive(Debug)]
pub struct ProbeFailure {
    pub provider: String,
    pub error: ProbeError,
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} probe failed: {}", self.provider, self.error)
    }
}

impl std::error::Error for ProbeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
