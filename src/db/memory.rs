//! In-process store with the same semantics as the Postgres table

use crate::db::{AppendOutcome, TimeSeriesStore};
use crate::models::Record;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<DateTime<Utc>, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TimeSeriesStore for MemoryStore {
    async fn ensure_schema(&self) -> bool {
        true
    }

    async fn append(&self, record: &Record) -> AppendOutcome {
        let mut records = self.records.write().await;
        match records.entry(record.timestamp) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                AppendOutcome::Inserted
            }
            Entry::Occupied(_) => {
                debug!(timestamp = %record.timestamp, "Record already stored, skipping");
                AppendOutcome::DuplicateSkipped
            }
        }
    }

    async fn recent(&self, limit: usize) -> Vec<Record> {
        let records = self.records.read().await;
        let mut window: Vec<Record> = records.values().rev().take(limit).cloned().collect();
        window.reverse();
        window
    }
}
