// src/probes/resque.rs
use async_trait::async_trait;

use super::connection::{connect, ping};
use crate::probe::{Probe, ProbeError};

/// Resque is healthy as long as its redis answers.
pub struct ResqueProbe {
    endpoint: String,
}

impl ResqueProbe {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Probe for ResqueProbe {
    fn name(&self) -> &str {
        "resque"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let mut conn = connect(&self.endpoint).await?;
        ping(&mut conn).await
    }
}
