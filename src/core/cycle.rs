//! One refresh cycle: fetch → aggregate → persist → classify → snapshot

use crate::aggregator::Aggregator;
use crate::db::{AppendOutcome, TimeSeriesStore};
use crate::metrics::Metrics;
use crate::snapshot::{self, Snapshot};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Runs cycles one at a time and keeps the latest snapshot.
///
/// Concurrent callers queue on an internal mutex, so records are appended in
/// timestamp order.
pub struct CycleRunner {
    aggregator: Aggregator,
    store: Arc<dyn TimeSeriesStore>,
    history_limit: usize,
    metrics: Option<Arc<Metrics>>,
    last_timestamp: Mutex<Option<DateTime<Utc>>>,
    latest: RwLock<Option<Arc<Snapshot>>>,
    last_append: RwLock<Option<AppendOutcome>>,
}

impl CycleRunner {
    pub fn new(
        aggregator: Aggregator,
        store: Arc<dyn TimeSeriesStore>,
        history_limit: usize,
    ) -> Self {
        Self {
            aggregator,
            store,
            history_limit,
            metrics: None,
            last_timestamp: Mutex::new(None),
            latest: RwLock::new(None),
            last_append: RwLock::new(None),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &Arc<dyn TimeSeriesStore> {
        &self.store
    }

    pub async fn run(&self) -> Arc<Snapshot> {
        self.run_at(Utc::now()).await
    }

    /// Run a cycle stamped `now`. A clock that moved backwards is clamped to
    /// the previous cycle's timestamp, which the store then skips as a
    /// duplicate.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Arc<Snapshot> {
        let mut last_timestamp = self.last_timestamp.lock().await;
        let start = Instant::now();

        let timestamp = match *last_timestamp {
            Some(last) if now < last => {
                warn!(now = %now, last = %last, "Clock moved backwards, reusing previous timestamp");
                last
            }
            _ => now,
        };

        let collection = self.aggregator.collect_at(timestamp).await;
        let record = collection.record;
        *last_timestamp = Some(record.timestamp);

        let outcome = self.store.append(&record).await;
        let history = self.store.recent(self.history_limit).await;
        let snapshot = Arc::new(snapshot::build(&record, history));

        if let Some(ref metrics) = self.metrics {
            for indicator in &collection.fallbacks {
                metrics
                    .source_fallbacks_total
                    .with_label_values(&[indicator.name()])
                    .inc();
            }
            metrics
                .store_appends_total
                .with_label_values(&[outcome.as_str()])
                .inc();
            metrics
                .database_connected
                .set(if outcome == AppendOutcome::Failed { 0.0 } else { 1.0 });
            metrics.cycles_total.inc();
            metrics
                .cycle_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        if outcome == AppendOutcome::Failed {
            warn!(timestamp = %record.timestamp, "Cycle record was not persisted");
        }
        info!(
            timestamp = %record.timestamp,
            fallbacks = collection.fallbacks.len(),
            append = outcome.as_str(),
            history = snapshot.history.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Cycle complete"
        );

        *self.latest.write().await = Some(snapshot.clone());
        *self.last_append.write().await = Some(outcome);
        snapshot
    }

    /// Snapshot of the most recent completed cycle
    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.read().await.clone()
    }

    /// How the most recent cycle's append went; `None` before the first cycle
    pub async fn last_append(&self) -> Option<AppendOutcome> {
        *self.last_append.read().await
    }
}
