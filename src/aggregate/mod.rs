// src/aggregate/mod.rs
mod aggregator;
mod result;

pub use aggregator::ResultAggregator;
pub use result::{CheckResult, CheckStatus, OverallStatus, StatusReport};
