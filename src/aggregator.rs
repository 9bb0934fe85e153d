//! Runs every source adapter for one cycle and assembles a [`Record`].

use crate::models::{Indicator, Reading, Record};
use crate::services::{FetchOutcome, SourceAdapter};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A cycle's record plus the indicators that fell back
#[derive(Debug, Clone)]
pub struct Collection {
    pub record: Record,
    pub fallbacks: Vec<Indicator>,
}

pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Fetch everything and stamp the record with the current time
    pub async fn run_cycle(&self) -> Record {
        self.run_cycle_at(Utc::now()).await
    }

    pub async fn run_cycle_at(&self, timestamp: DateTime<Utc>) -> Record {
        self.collect_at(timestamp).await.record
    }

    /// Fetch all adapters concurrently and fill gaps with fallbacks.
    ///
    /// An indicator without an adapter falls back too. When two adapters feed
    /// the same indicator the last fresh reading wins.
    pub async fn collect_at(&self, timestamp: DateTime<Utc>) -> Collection {
        let outcomes = join_all(self.adapters.iter().map(|adapter| async move {
            (adapter.indicator(), adapter.fetch().await)
        }))
        .await;

        let fresh: HashMap<Indicator, f64> = outcomes
            .into_iter()
            .filter_map(|(indicator, outcome)| match outcome {
                FetchOutcome::Fresh(value) => Some((indicator, value)),
                FetchOutcome::Unavailable => None,
            })
            .collect();

        let mut fallbacks = Vec::new();
        let record = Record::from_fn(timestamp, |indicator| match fresh.get(&indicator) {
            Some(value) => Reading::Known(*value),
            None => {
                fallbacks.push(indicator);
                indicator.fallback()
            }
        });

        if fallbacks.is_empty() {
            debug!(timestamp = %record.timestamp, "All sources fresh");
        } else {
            info!(
                timestamp = %record.timestamp,
                fallbacks = ?fallbacks,
                "Cycle used fallback values for {} of {} indicators",
                fallbacks.len(),
                Indicator::COUNT
            );
        }

        Collection { record, fallbacks }
    }
}
