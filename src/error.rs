//! Error types for the fallible internals.
//!
//! None of these escape a refresh cycle: sources turn them into
//! `FetchOutcome::Unavailable` and stores into logged no-ops.

use thiserror::Error;

/// Failure while retrieving or parsing one provider response
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Unparsable value '{0}'")]
    InvalidValue(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure talking to the time-series store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] tokio_postgres::Error),

    #[error("Timed out connecting to database after {0:?}")]
    ConnectTimeout(std::time::Duration),

    #[error("Database query failed: {0}")]
    Query(#[source] tokio_postgres::Error),
}

impl StoreError {
    /// Whether the error stems from reaching the database rather than from
    /// the statement itself
    pub fn is_connectivity(&self) -> bool {
        match self {
            StoreError::Connect(_) | StoreError::ConnectTimeout(_) => true,
            StoreError::Query(e) => e.is_closed(),
        }
    }
}

/// Invalid configuration value
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid URL for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Unknown store backend '{0}' (expected 'postgres' or 'memory')")]
    UnknownBackend(String),
}
