// src/probes/cache.rs
use async_trait::async_trait;
use std::sync::Arc;

use super::connection::{connect, write_then_read};
use crate::clock::{Clock, SystemClock};
use crate::probe::{Probe, ProbeError};

const CACHE_KEY: &str = "status-monitor:cache";
const CACHE_TTL_SECS: u64 = 60;

/// Write + read round trip against a Redis-protocol cache. The entry expires on its
/// own so the check never leaves state behind.
pub struct CacheProbe {
    endpoint: String,
    clock: Arc<dyn Clock>,
}

impl CacheProbe {
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
impl Probe for CacheProbe {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let now = self.clock.now().timestamp_millis().to_string();
        let mut conn = connect(&self.endpoint).await?;
        write_then_read(&mut conn, CACHE_KEY, &now, Some(CACHE_TTL_SECS)).await
    }
}
