//! HTTP surface: health, metrics and the latest snapshot

use crate::test_utils::{static_adapters, UnreachableStore};
use aurum::aggregator::Aggregator;
use aurum::core::http::{create_router, AppState};
use aurum::core::CycleRunner;
use aurum::db::{MemoryStore, TimeSeriesStore};
use aurum::metrics::Metrics;
use aurum::models::Indicator;
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

struct TestApiServer {
    server: TestServer,
    runner: Arc<CycleRunner>,
}

impl TestApiServer {
    fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    fn with_store(store: Arc<dyn TimeSeriesStore>) -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let runner = Arc::new(
            CycleRunner::new(
                Aggregator::new(static_adapters(&[
                    (Indicator::YieldCurve, -0.35),
                    (Indicator::GoldPrice, 2000.0),
                ])),
                store,
                1440,
            )
            .with_metrics(metrics.clone()),
        );
        let state = AppState {
            metrics,
            start_time: Arc::new(Instant::now()),
            runner: runner.clone(),
        };

        let server = TestServer::new(create_router(state)).expect("start test server");
        Self { server, runner }
    }
}

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new();
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "aurum-sentinel");
    assert_eq!(body["database"], "unknown");
}

#[tokio::test]
async fn health_follows_latest_append() {
    let app = TestApiServer::new();
    app.runner.run().await;
    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    let app = TestApiServer::with_store(Arc::new(UnreachableStore));
    app.runner.run().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unreachable");

    let metrics = app.server.get("/metrics").await.text();
    assert!(metrics.contains("database_connected 0"), "{}", metrics);
}

#[tokio::test]
async fn snapshot_unavailable_before_first_cycle() {
    let app = TestApiServer::new();
    let response = app.server.get("/api/snapshot").expect_failure().await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn snapshot_served_after_cycle() {
    let app = TestApiServer::new();
    app.runner.run().await;

    let response = app.server.get("/api/snapshot").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let indicators = body["indicators"].as_array().unwrap();
    assert_eq!(indicators.len(), Indicator::COUNT);
    assert_eq!(indicators[0]["indicator"], "yield_curve");
    assert_eq!(indicators[0]["state"], "WARNING");
    assert_eq!(body["history"].as_array().unwrap().len(), 1);
    assert!(body["debt_to_gold"].as_f64().is_some());
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new();
    app.runner.run().await;
    let _ = app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "cycles_total",
        "store_appends_total",
        "source_fallbacks_total",
    ] {
        assert!(body.contains(name), "missing {name}");
    }
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApiServer::new();
    let response = app.server.get("/api/unknown").expect_failure().await;
    assert_eq!(response.status_code(), 404);
}
