// src/monitor/monitor.rs
use crate::aggregate::{ResultAggregator, StatusReport};
use crate::config::Settings;
use crate::metrics::MetricsCollector;
use crate::registry::ConfigurationError;
use crate::runner::{CheckRunner, RunnerOptions};
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, info_span, Instrument};

use super::{Clock, Configuration, RequestContext, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Unconfigured,
    Configured,
}

/// Owns the live configuration and runs check cycles against it.
///
/// Each cycle works on one configuration snapshot, so a concurrent `configure`
/// never exposes a half-updated provider set to a running check.
pub struct Monitor {
    configuration: ArcSwap<Configuration>,
    // Serialises writers; readers never take it.
    write_lock: Mutex<()>,
    runner: CheckRunner,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Monitor {
    pub fn new(options: RunnerOptions) -> Self {
        Self {
            configuration: ArcSwap::from_pointee(Configuration::new()),
            write_lock: Mutex::new(()),
            runner: CheckRunner::new(options),
            clock: Arc::new(SystemClock),
            metrics: None,
        }
    }

    /// Builds a monitor with the providers, endpoints and credentials from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigurationError> {
        let monitor = Self::new(settings.checks.runner_options());

        monitor.configure(|config| {
            for (key, endpoint) in &settings.endpoints {
                config.set_endpoint(key.clone(), endpoint.clone());
            }
            for key in &settings.providers {
                config.use_provider(key)?;
            }
            config.basic_auth_credentials = settings.basic_auth.clone();
            Ok(())
        })?;

        Ok(monitor)
    }

    /// Clock used for report timestamps and for the values round-trip probes write.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.runner = self.runner.with_clock(clock.clone());
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.runner = self.runner.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    /// Applies `f` to a copy of the live configuration and publishes it if `f`
    /// succeeds. Provider registrations accumulate across calls.
    pub fn configure<F>(&self, f: F) -> Result<(), ConfigurationError>
    where
        F: FnOnce(&mut Configuration) -> Result<(), ConfigurationError>,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = Configuration::clone(&self.configuration.load());
        f(&mut next)?;
        next.configured = true;

        info!(
            "Monitor configured with {} provider(s): {:?}",
            next.providers().len(),
            next.providers().keys()
        );
        self.configuration.store(Arc::new(next));
        Ok(())
    }

    /// Drops every provider, the callback and the credentials.
    pub fn reset(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.configuration.store(Arc::new(Configuration::new()));
        info!("Monitor configuration reset");
    }

    /// Current configuration snapshot.
    pub fn configuration(&self) -> Arc<Configuration> {
        self.configuration.load_full()
    }

    pub fn state(&self) -> MonitorState {
        if self.configuration.load().configured {
            MonitorState::Configured
        } else {
            MonitorState::Unconfigured
        }
    }

    /// Runs every active probe once. Probe failures end up in the report, never
    /// in an `Err`.
    pub async fn check(&self, context: &RequestContext) -> StatusReport {
        let span = info_span!("status_check", request_id = %context.request_id);

        async {
            let timestamp = self.clock.now();
            let configuration = self.configuration.load_full();

            let results = self
                .runner
                .run(
                    configuration.providers(),
                    configuration.error_callback.as_ref(),
                )
                .await;
            let status = ResultAggregator::aggregate(&results);

            if let Some(metrics) = &self.metrics {
                metrics.record_cycle(status, results.len());
            }

            StatusReport {
                results,
                status,
                timestamp,
            }
        }
        .instrument(span)
        .await
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(RunnerOptions::default())
    }
}
