//! Append-only time-series persistence of cycle records.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::models::Record;
use async_trait::async_trait;

/// Result of appending one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    /// A record with the same timestamp already exists
    DuplicateSkipped,
    /// The store could not be written; already logged
    Failed,
}

impl AppendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppendOutcome::Inserted => "inserted",
            AppendOutcome::DuplicateSkipped => "duplicate_skipped",
            AppendOutcome::Failed => "failed",
        }
    }
}

/// Persisted history of records, keyed by timestamp.
///
/// No method fails: storage problems are logged and turned into a `false`,
/// [`AppendOutcome::Failed`] or an empty window, so a refresh cycle always
/// completes.
#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Create the persisted structure if absent. Returns `false` when the
    /// store could not be reached within the retry budget.
    async fn ensure_schema(&self) -> bool;

    async fn append(&self, record: &Record) -> AppendOutcome;

    /// Up to `limit` most recent records, oldest first
    async fn recent(&self, limit: usize) -> Vec<Record>;
}
