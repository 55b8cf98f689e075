// src/registry/error.rs

/// Registration-time misuse, surfaced to whoever is configuring the monitor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown provider '{key}'")]
    UnknownProvider { key: String },

    #[error("invalid provider '{name}': {reason}")]
    InvalidProvider { name: String, reason: String },
}
