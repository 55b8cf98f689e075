// src/registry/builtin.rs
use crate::clock::Clock;
use crate::probe::Probe;
use crate::probes::{CacheProbe, DatabaseProbe, HttpProbe, RedisProbe, ResqueProbe, SidekiqProbe};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::ConfigurationError;

/// The fixed vocabulary of providers that can be registered by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinProvider {
    Database,
    Redis,
    Cache,
    Sidekiq,
    Resque,
    Http,
}

impl BuiltinProvider {
    pub const ALL: [BuiltinProvider; 6] = [
        BuiltinProvider::Database,
        BuiltinProvider::Redis,
        BuiltinProvider::Cache,
        BuiltinProvider::Sidekiq,
        BuiltinProvider::Resque,
        BuiltinProvider::Http,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BuiltinProvider::Database => "database",
            BuiltinProvider::Redis => "redis",
            BuiltinProvider::Cache => "cache",
            BuiltinProvider::Sidekiq => "sidekiq",
            BuiltinProvider::Resque => "resque",
            BuiltinProvider::Http => "http",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            BuiltinProvider::Database => "127.0.0.1:5432",
            BuiltinProvider::Redis | BuiltinProvider::Sidekiq | BuiltinProvider::Resque => {
                "redis://127.0.0.1:6379"
            }
            BuiltinProvider::Cache => "redis://127.0.0.1:6379/1",
            BuiltinProvider::Http => "http://127.0.0.1:8080/health",
        }
    }

    /// Builds a fresh probe pointed at `endpoint`. Round-trip probes write the
    /// clock's current time.
    pub(crate) fn instantiate(self, endpoint: &str, clock: Arc<dyn Clock>) -> Box<dyn Probe> {
        match self {
            BuiltinProvider::Database => Box::new(DatabaseProbe::new(endpoint)),
            BuiltinProvider::Redis => Box::new(RedisProbe::new(endpoint).with_clock(clock)),
            BuiltinProvider::Cache => Box::new(CacheProbe::new(endpoint).with_clock(clock)),
            BuiltinProvider::Sidekiq => Box::new(SidekiqProbe::new(endpoint)),
            BuiltinProvider::Resque => Box::new(ResqueProbe::new(endpoint)),
            BuiltinProvider::Http => Box::new(HttpProbe::new(endpoint)),
        }
    }
}

impl fmt::Display for BuiltinProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BuiltinProvider {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ConfigurationError::UnknownProvider { key: s.to_string() })
    }
}
