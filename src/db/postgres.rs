//! Postgres-backed time-series store (`metrics` table)

use crate::config::SchemaRetry;
use crate::db::{AppendOutcome, TimeSeriesStore};
use crate::error::StoreError;
use crate::models::{Indicator, Reading, Record};
use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config, NoTls, Row};
use tracing::{debug, error, info, warn};

pub const TABLE: &str = "metrics";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct PostgresStore {
    url: String,
    retry: SchemaRetry,
    connect_timeout: Duration,
    client: Mutex<Option<Client>>,
    create_sql: String,
    insert_sql: String,
    select_sql: String,
}

impl PostgresStore {
    /// No connection is opened until the first call
    pub fn new(url: impl Into<String>, retry: SchemaRetry) -> Self {
        let columns: Vec<&str> = Indicator::ALL.iter().map(|i| i.name()).collect();

        let create_sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                timestamp TIMESTAMP PRIMARY KEY,
                {}
            )",
            TABLE,
            columns
                .iter()
                .map(|c| format!("{} FLOAT", c))
                .collect::<Vec<_>>()
                .join(",\n                ")
        );
        let placeholders = (1..=columns.len() + 1)
            .map(|n| format!("${}", n))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_sql = format!(
            "INSERT INTO {} (timestamp, {}) VALUES ({}) ON CONFLICT (timestamp) DO NOTHING",
            TABLE,
            columns.join(", "),
            placeholders
        );
        let select_sql = format!(
            "SELECT timestamp, {} FROM {} ORDER BY timestamp DESC LIMIT $1",
            columns.join(", "),
            TABLE
        );

        Self {
            url: url.into(),
            retry,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            client: Mutex::new(None),
            create_sql,
            insert_sql,
            select_sql,
        }
    }

    /// Bound on each connection attempt, handshake included. A
    /// `connect_timeout` in the URL still applies to the TCP connect itself.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    async fn connect(&self) -> Result<Client, StoreError> {
        let mut config: Config = self.url.parse().map_err(StoreError::Connect)?;
        if config.get_connect_timeout().is_none() {
            config.connect_timeout(self.connect_timeout);
        }

        let (client, connection) = tokio::time::timeout(self.connect_timeout, config.connect(NoTls))
            .await
            .map_err(|_| StoreError::ConnectTimeout(self.connect_timeout))?
            .map_err(StoreError::Connect)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "Postgres connection error");
            }
        });

        debug!("Postgres connection established");
        Ok(client)
    }

    /// Take the cached client, reconnecting when it is missing or closed
    async fn checkout(&self, slot: &mut Option<Client>) -> Result<Client, StoreError> {
        match slot.take() {
            Some(client) if !client.is_closed() => Ok(client),
            _ => self.connect().await,
        }
    }

    /// Put the client back unless the connection itself failed
    fn checkin<T>(slot: &mut Option<Client>, client: Client, result: &Result<T, StoreError>) {
        match result {
            Err(e) if e.is_connectivity() => drop(client),
            _ => *slot = Some(client),
        }
    }

    async fn try_ensure_schema(&self) -> Result<(), StoreError> {
        let mut slot = self.client.lock().await;
        let client = self.checkout(&mut slot).await?;
        let result = client
            .batch_execute(&self.create_sql)
            .await
            .map_err(StoreError::Query);
        Self::checkin(&mut slot, client, &result);
        result
    }

    async fn try_append(&self, record: &Record) -> Result<AppendOutcome, StoreError> {
        let timestamp = record.timestamp.naive_utc();
        let values: Vec<Option<f64>> = record.readings().map(|(_, r)| r.value()).collect();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(values.len() + 1);
        params.push(&timestamp);
        params.extend(values.iter().map(|v| v as &(dyn ToSql + Sync)));

        let mut slot = self.client.lock().await;
        let client = self.checkout(&mut slot).await?;
        let result = client
            .execute(self.insert_sql.as_str(), &params)
            .await
            .map_err(StoreError::Query);
        Self::checkin(&mut slot, client, &result);

        Ok(match result? {
            0 => AppendOutcome::DuplicateSkipped,
            _ => AppendOutcome::Inserted,
        })
    }

    async fn try_recent(&self, limit: usize) -> Result<Vec<Record>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut slot = self.client.lock().await;
        let client = self.checkout(&mut slot).await?;
        let result = client
            .query(self.select_sql.as_str(), &[&limit])
            .await
            .map_err(StoreError::Query);
        Self::checkin(&mut slot, client, &result);

        let mut records = result?
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        // Reverse to get oldest first
        records.reverse();
        Ok(records)
    }
}

fn record_from_row(row: &Row) -> Result<Record, StoreError> {
    let timestamp_naive: NaiveDateTime = row.try_get(0).map_err(StoreError::Query)?;
    let timestamp = DateTime::from_naive_utc_and_offset(timestamp_naive, Utc);

    let mut values = [Reading::Unavailable; Indicator::COUNT];
    for indicator in Indicator::ALL {
        let value: Option<f64> = row
            .try_get(indicator.index() + 1)
            .map_err(StoreError::Query)?;
        values[indicator.index()] = Reading::from(value);
    }

    Ok(Record::from_fn(timestamp, |indicator| values[indicator.index()]))
}

#[async_trait]
impl TimeSeriesStore for PostgresStore {
    async fn ensure_schema(&self) -> bool {
        let backoff = ConstantBuilder::default()
            .with_delay(self.retry.delay)
            .with_max_times(self.retry.attempts.saturating_sub(1));

        let result = (|| async { self.try_ensure_schema().await })
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(StoreError::is_connectivity)
            .notify(|e: &StoreError, delay: Duration| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Schema init failed, retrying");
            })
            .await;

        match result {
            Ok(()) => {
                info!(table = TABLE, "Schema ready");
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    attempts = self.retry.attempts,
                    "Giving up on schema initialisation"
                );
                false
            }
        }
    }

    async fn append(&self, record: &Record) -> AppendOutcome {
        match self.try_append(record).await {
            Ok(AppendOutcome::DuplicateSkipped) => {
                debug!(timestamp = %record.timestamp, "Record already stored, skipping");
                AppendOutcome::DuplicateSkipped
            }
            Ok(outcome) => outcome,
            Err(e) => {
                error!(timestamp = %record.timestamp, error = %e, "Failed to append record");
                AppendOutcome::Failed
            }
        }
    }

    async fn recent(&self, limit: usize) -> Vec<Record> {
        if limit == 0 {
            return Vec::new();
        }
        match self.try_recent(limit).await {
            Ok(records) => records,
            Err(e) => {
                error!(limit, error = %e, "Failed to query recent records");
                Vec::new()
            }
        }
    }
}
