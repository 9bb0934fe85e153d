//! Aurum Sentinel
//!
//! Runs a refresh cycle on a fixed interval and serves the latest snapshot,
//! health and Prometheus metrics over HTTP.

use aurum::aggregator::Aggregator;
use aurum::config::{self, Settings, StoreBackend};
use aurum::core::http::{start_server, AppState};
use aurum::core::{CycleRunner, CycleScheduler};
use aurum::db::{MemoryStore, PostgresStore, TimeSeriesStore};
use aurum::logging;
use aurum::metrics::Metrics;
use aurum::services;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let settings = Settings::from_env()?;
    let env = config::get_environment();
    info!("Starting Aurum Sentinel");
    info!(environment = %env, "Environment");
    info!(
        interval = settings.refresh_interval_seconds,
        history_limit = settings.history_limit,
        backend = ?settings.store_backend,
        "Refresh: every {} seconds",
        settings.refresh_interval_seconds
    );

    let metrics = Arc::new(Metrics::new()?);

    let store: Arc<dyn TimeSeriesStore> = match settings.store_backend {
        StoreBackend::Postgres => Arc::new(
            PostgresStore::new(settings.database_url.clone(), settings.schema_retry)
                .with_connect_timeout(settings.db_connect_timeout),
        ),
        StoreBackend::Memory => {
            warn!("Using in-memory store; history is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    info!("Initializing schema...");
    if store.ensure_schema().await {
        metrics.database_connected.set(1.0);
    } else {
        warn!("Schema initialisation abandoned; cycles continue without persistence until the store recovers");
    }

    let client = services::build_client(settings.sources.timeout)?;
    let adapters = services::default_adapters(&settings.sources, client);
    info!(adapters = adapters.len(), "Source adapters registered");

    let runner = Arc::new(
        CycleRunner::new(Aggregator::new(adapters), store, settings.history_limit)
            .with_metrics(metrics.clone()),
    );

    // First cycle right away so the snapshot endpoint has data
    runner.run().await;

    let scheduler = CycleScheduler::new(runner.clone(), settings.refresh_interval_seconds)
        .map_err(|e| format!("Failed to create scheduler: {}", e))?;
    scheduler.start().await;

    let state = AppState {
        metrics: metrics.clone(),
        start_time: Arc::new(Instant::now()),
        runner,
    };
    let port = settings.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Sentinel started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down sentinel...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }
    scheduler.stop().await;
    info!("Sentinel stopped");

    Ok(())
}
