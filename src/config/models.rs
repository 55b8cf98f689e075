// src/config/models.rs
use crate::monitor::BasicAuthCredentials;
use crate::registry::BuiltinProvider;
use crate::runner::RunnerOptions;
use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub checks: ChecksConfig,
    pub metrics: MetricsConfig,
    /// Built-in provider keys to activate at startup, in order.
    pub providers: Vec<String>,
    /// Provider key -> endpoint for built-in probes.
    pub endpoints: HashMap<String, String>,
    pub basic_auth: Option<BasicAuthCredentials>,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !self.server.path.starts_with('/') {
            bail!("server.path must start with '/', got '{}'", self.server.path);
        }

        if !self.metrics.path.starts_with('/') {
            bail!("metrics.path must start with '/', got '{}'", self.metrics.path);
        }

        if self.metrics.enabled && self.metrics.port == self.server.listen.port() {
            bail!(
                "metrics.port {} clashes with the status listener",
                self.metrics.port
            );
        }

        for key in &self.providers {
            if BuiltinProvider::from_key(key).is_none() {
                bail!("unknown provider '{}' in providers", key);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            path: "/status".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Per-probe timeout; 0 disables it.
    pub timeout_ms: u64,
    pub parallel: bool,
}

impl ChecksConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            timeout: self.timeout(),
            parallel: self.parallel,
        }
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9090,
            path: "/metrics".to_string(),
        }
    }
}
