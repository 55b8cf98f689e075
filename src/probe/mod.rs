// src/probe/mod.rs
mod error;

pub use error::{ProbeError, ProbeFailure, EXCEPTION_MESSAGE};

use async_trait::async_trait;

/// A single dependency check.
///
/// `check` returns `Ok(())` when the dependency is healthy. Diagnosable conditions
/// should be reported as [`ProbeError::Failed`] so their message reaches the status
/// output; anything else is flattened to a generic message.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Lower-case identifier used in the results list.
    fn name(&self) -> &str;

    async fn check(&self) -> Result<(), ProbeError>;
}
