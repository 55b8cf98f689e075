// src/monitor/mod.rs
mod configuration;
mod context;
mod monitor;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use configuration::{BasicAuthCredentials, Configuration};
pub use context::RequestContext;
pub use monitor::{Monitor, MonitorState};
