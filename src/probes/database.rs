// src/probes/database.rs
use anyhow::Context;
use async_trait::async_trait;
use tokio::net::TcpStream;
use url::Url;

use crate::probe::{Probe, ProbeError};

const DEFAULT_PORT: u16 = 5432;

/// Checks that the database accepts TCP connections.
pub struct DatabaseProbe {
    endpoint: String,
}

impl DatabaseProbe {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    // Accepts either `host:port` or a `scheme://host[:port]/...` url.
    fn address(&self) -> anyhow::Result<(String, u16)> {
        if self.endpoint.contains("://") {
            let url = Url::parse(&self.endpoint).context("invalid database url")?;
            let host = url.host_str().context("database url has no host")?;
            return Ok((host.to_string(), url.port().unwrap_or(DEFAULT_PORT)));
        }

        match self.endpoint.rsplit_once(':') {
            Some((host, port)) => Ok((host.to_string(), port.parse().context("invalid database port")?)),
            None => Ok((self.endpoint.clone(), DEFAULT_PORT)),
        }
    }
}

#[async_trait]
impl Probe for DatabaseProbe {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let (host, port) = self.address()?;
        TcpStream::connect((host.as_str(), port))
            .await
            .with_context(|| format!("database unreachable at {host}:{port}"))?;
        Ok(())
    }
}
