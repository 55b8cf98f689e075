// src/runner/runner.rs
use crate::aggregate::{CheckResult, CheckStatus};
use crate::clock::{Clock, SystemClock};
use crate::metrics::{MetricsCollector, Timer};
use crate::probe::{ProbeError, ProbeFailure};
use crate::registry::{ProviderSet, ProviderType};
use anyhow::anyhow;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Invoked once per failing probe with that probe's error.
pub type ErrorCallback = Arc<dyn Fn(&ProbeFailure) + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    /// Per-probe limit; `None` lets probes run unbounded.
    pub timeout: Option<Duration>,
    /// Start every probe before awaiting any of them.
    pub parallel: bool,
}

pub struct CheckRunner {
    options: RunnerOptions,
    metrics: Option<Arc<MetricsCollector>>,
    clock: Arc<dyn Clock>,
}

struct ProbeRun {
    name: String,
    timer: Timer,
    handle: JoinHandle<Result<(), ProbeError>>,
}

impl CheckRunner {
    pub fn new(options: RunnerOptions) -> Self {
        Self {
            options,
            metrics: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Clock handed to built-in probes that write timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Runs every provider once and returns one result per provider, in set order.
    /// Probe failures never escape this call.
    pub async fn run(
        &self,
        providers: &ProviderSet,
        error_callback: Option<&ErrorCallback>,
    ) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(providers.len());

        if self.options.parallel {
            let runs: Vec<ProbeRun> = providers.iter().map(|p| self.launch(p)).collect();
            // join_all yields in input order, whatever order the probes finish in.
            let outcomes = futures::future::join_all(runs.into_iter().map(|run| async move {
                let outcome = Self::join(run.handle).await;
                (run.name, outcome, run.timer.elapsed())
            }))
            .await;

            for (name, outcome, elapsed) in outcomes {
                self.record(&name, &outcome, elapsed);
                results.push(self.settle(name, outcome, error_callback));
            }
        } else {
            for provider in providers {
                let run = self.launch(provider);
                let outcome = Self::join(run.handle).await;
                self.record(&run.name, &outcome, run.timer.elapsed());
                results.push(self.settle(run.name, outcome, error_callback));
            }
        }

        let failed = results.iter().filter(|r| r.status == CheckStatus::Error).count();
        info!(
            "Status check complete: {} ok, {} failed",
            results.len() - failed,
            failed
        );

        results
    }

    fn launch(&self, provider: &ProviderType) -> ProbeRun {
        // Registration guarantees the key equals the probe's name.
        let name = provider.key().to_string();
        let provider = provider.clone();
        let clock = self.clock.clone();
        let limit = self.options.timeout;

        // Each probe is built and run in its own task so a panic in either stays inside it.
        let handle = tokio::spawn(async move {
            let probe = provider.instantiate_with(clock);
            match limit {
                Some(limit) => tokio::time::timeout(limit, probe.check())
                    .await
                    .unwrap_or(Err(ProbeError::TimedOut(limit))),
                None => probe.check().await,
            }
        });

        ProbeRun {
            name,
            timer: Timer::new(),
            handle,
        }
    }

    async fn join(handle: JoinHandle<Result<(), ProbeError>>) -> Result<(), ProbeError> {
        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ProbeError::Unexpected(anyhow!("probe task failed: {}", e))),
        }
    }

    fn record(&self, name: &str, outcome: &Result<(), ProbeError>, elapsed: Duration) {
        if let Some(metrics) = &self.metrics {
            let status = if outcome.is_ok() {
                CheckStatus::Ok
            } else {
                CheckStatus::Error
            };
            metrics.record_probe(name, status, elapsed);
        }
    }

    fn settle(
        &self,
        name: String,
        outcome: Result<(), ProbeError>,
        error_callback: Option<&ErrorCallback>,
    ) -> CheckResult {
        match outcome {
            Ok(()) => {
                debug!("Probe {} is healthy", name);
                CheckResult::ok(name)
            }
            Err(error) => {
                let message = error.result_message();
                warn!("Probe {} failed: {}", name, error);

                if let Some(callback) = error_callback {
                    let failure = ProbeFailure {
                        provider: name.clone(),
                        error,
                    };
                    invoke_callback(callback, &failure);
                }

                CheckResult::error(name, message)
            }
        }
    }
}

fn invoke_callback(callback: &ErrorCallback, failure: &ProbeFailure) {
    if catch_unwind(AssertUnwindSafe(|| callback(failure))).is_err() {
        error!("Error callback panicked while handling {} failure", failure.provider);
    }
}
