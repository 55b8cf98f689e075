// src/probes/redis.rs
use async_trait::async_trait;
use std::sync::Arc;

use super::connection::{connect, write_then_read};
use crate::clock::{Clock, SystemClock};
use crate::probe::{Probe, ProbeError};

const HEALTH_KEY: &str = "status-monitor:health";

/// Same layout as `to_s(:db)` timestamps.
const DB_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write + read round trip of the current time.
pub struct RedisProbe {
    endpoint: String,
    clock: Arc<dyn Clock>,
}

impl RedisProbe {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl Probe for RedisProbe {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let now = self.clock.now().format(DB_TIME_FORMAT).to_string();
        let mut conn = connect(&self.endpoint).await?;
        write_then_read(&mut conn, HEALTH_KEY, &now, None).await
    }
}
