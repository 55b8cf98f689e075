// src/metrics/collector.rs
use crate::aggregate::{CheckStatus, OverallStatus};
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Probe metrics
    pub probe_checks_total: IntCounterVec,
    pub probe_check_duration_seconds: HistogramVec,
    pub probe_up: IntGaugeVec,

    // Cycle metrics
    pub checks_total: IntCounterVec,
    pub active_providers: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let probe_checks_total = IntCounterVec::new(
            Opts::new("status_probe_checks_total", "Total probe executions"),
            &["provider", "status"],
        )?;
        registry.register(Box::new(probe_checks_total.clone()))?;

        let probe_check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "status_probe_check_duration_seconds",
                "Probe duration in seconds",
            ),
            &["provider"],
        )?;
        registry.register(Box::new(probe_check_duration_seconds.clone()))?;

        let probe_up = IntGaugeVec::new(
            Opts::new(
                "status_probe_up",
                "Last probe outcome (1=ok, 0=error)",
            ),
            &["provider"],
        )?;
        registry.register(Box::new(probe_up.clone()))?;

        let checks_total = IntCounterVec::new(
            Opts::new("status_checks_total", "Total check cycles by overall status"),
            &["status"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let active_providers =
            IntGauge::new("status_active_providers", "Providers run on the last check")?;
        registry.register(Box::new(active_providers.clone()))?;

        Ok(Self {
            probe_checks_total,
            probe_check_duration_seconds,
            probe_up,
            checks_total,
            active_providers,
        })
    }

    pub fn record_probe(&self, provider: &str, status: CheckStatus, duration: std::time::Duration) {
        self.probe_checks_total
            .with_label_values(&[provider, status.as_str()])
            .inc();

        self.probe_check_duration_seconds
            .with_label_values(&[provider])
            .observe(duration.as_secs_f64());

        let value = if status == CheckStatus::Ok { 1 } else { 0 };
        self.probe_up.with_label_values(&[provider]).set(value);
    }

    pub fn record_cycle(&self, status: OverallStatus, providers: usize) {
        self.checks_total.with_label_values(&[status.as_str()]).inc();
        self.active_providers.set(providers as i64);
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
