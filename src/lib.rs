// src/lib.rs
pub mod aggregate;
pub mod clock;
pub mod config;
pub mod metrics;
pub mod monitor;
pub mod probe;
pub mod probes;
pub mod registry;
pub mod runner;
pub mod server;

pub use aggregate::{CheckResult, CheckStatus, OverallStatus, StatusReport};
pub use monitor::{Configuration, Monitor, RequestContext};
pub use probe::{Probe, ProbeError, ProbeFailure};
pub use registry::{ConfigurationError, ProviderType};
