// src/probes/http.rs
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

use crate::probe::{Probe, ProbeError};

/// GETs an HTTP endpoint and expects a 2xx.
pub struct HttpProbe {
    endpoint: String,
    client: Client,
}

impl HttpProbe {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn name(&self) -> &str {
        "http"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.endpoint))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeError::Failed(format!("HTTP {}", status)))
        }
    }
}
