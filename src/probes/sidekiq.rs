// src/probes/sidekiq.rs
use async_trait::async_trait;

use super::connection::{connect, ping};
use crate::probe::{Probe, ProbeError};

/// Sidekiq workers register themselves in this set while alive.
const PROCESSES_KEY: &str = "processes";

pub struct SidekiqProbe {
    endpoint: String,
}

impl SidekiqProbe {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Probe for SidekiqProbe {
    fn name(&self) -> &str {
        "sidekiq"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let mut conn = connect(&self.endpoint).await?;
        ping(&mut conn).await?;

        let processes: i64 = redis::cmd("SCARD")
            .arg(PROCESSES_KEY)
            .query_async(&mut conn)
            .await?;
        if processes == 0 {
            return Err(ProbeError::failed("no sidekiq processes running"));
        }
        Ok(())
    }
}
