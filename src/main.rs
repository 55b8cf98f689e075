// src/main.rs
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use status_monitor::{
    config,
    metrics::MetricsRegistry,
    monitor::Monitor,
    server::{MetricsHandler, RequestHandler, ServerBuilder},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("status_monitor=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let settings = config::load_config(&config_path)?;

    // Initialize metrics
    let metrics_registry = Arc::new(MetricsRegistry::new()?);

    let monitor = Arc::new(
        Monitor::from_settings(&settings)?.with_metrics(metrics_registry.collector()),
    );
    info!(
        "Monitoring {} provider(s): {:?}",
        monitor.configuration().providers().len(),
        monitor.configuration().providers().keys()
    );

    if settings.metrics.enabled {
        let metrics_addr: SocketAddr = ([0, 0, 0, 0], settings.metrics.port).into();
        let handler = MetricsHandler::new(metrics_registry, settings.metrics.path.as_str());
        info!(
            "Metrics server listening on http://{}{}",
            metrics_addr, settings.metrics.path
        );

        tokio::spawn(async move {
            if let Err(e) = ServerBuilder::new(metrics_addr).with_handler(handler).serve().await {
                error!("Metrics server error: {}", e);
            }
        });
    }

    let handler = RequestHandler::new(monitor, settings.server.path.as_str());
    info!(
        "Serving status on http://{}{}",
        settings.server.listen, settings.server.path
    );

    tokio::select! {
        result = ServerBuilder::new(settings.server.listen).with_handler(handler).serve() => result?,
        _ = shutdown_signal() => {},
    }

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
