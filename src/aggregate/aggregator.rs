// src/aggregate/aggregator.rs
use super::{CheckResult, CheckStatus, OverallStatus};

/// Folds per-probe results into the overall status.
pub struct ResultAggregator;

impl ResultAggregator {
    /// `ok` only when every result is `OK`; an empty list is `ok`.
    pub fn aggregate(results: &[CheckResult]) -> OverallStatus {
        if results.iter().all(|r| r.status == CheckStatus::Ok) {
            OverallStatus::Ok
        } else {
            OverallStatus::ServiceUnavailable
        }
    }
}
