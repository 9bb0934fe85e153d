//! Source adapter interface shared by every external data provider.

use crate::error::SourceError;
use crate::models::Indicator;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Result of one best-effort fetch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchOutcome {
    Fresh(f64),
    Unavailable,
}

impl FetchOutcome {
    pub fn is_fresh(&self) -> bool {
        matches!(self, FetchOutcome::Fresh(_))
    }
}

/// One external provider feeding one indicator.
///
/// `fetch` performs a single retrieval and never fails: every error is
/// logged and reported as [`FetchOutcome::Unavailable`]. Implementations must
/// be safe to call concurrently with each other.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn indicator(&self) -> Indicator;

    /// Provider label used in logs
    fn source(&self) -> String;

    async fn fetch(&self) -> FetchOutcome;
}

/// Collapse a fallible retrieval into a [`FetchOutcome`], logging the failure.
pub(crate) fn settle(
    indicator: Indicator,
    source: &str,
    result: Result<f64, SourceError>,
) -> FetchOutcome {
    match result {
        Ok(value) => {
            debug!(indicator = %indicator, source = %source, value, "Fetched reading");
            FetchOutcome::Fresh(value)
        }
        Err(e) => {
            warn!(indicator = %indicator, source = %source, error = %e, "Source unavailable");
            FetchOutcome::Unavailable
        }
    }
}

/// Parse a provider number, rejecting NaN and infinities
pub(crate) fn parse_number(raw: &str) -> Result<f64, SourceError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SourceError::InvalidValue(trimmed.to_string())),
    }
}

/// Adapter returning a fixed outcome, for offline runs and tests
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    indicator: Indicator,
    outcome: FetchOutcome,
}

impl StaticAdapter {
    pub fn new(indicator: Indicator, outcome: FetchOutcome) -> Self {
        Self { indicator, outcome }
    }

    pub fn fresh(indicator: Indicator, value: f64) -> Self {
        Self::new(indicator, FetchOutcome::Fresh(value))
    }

    pub fn unavailable(indicator: Indicator) -> Self {
        Self::new(indicator, FetchOutcome::Unavailable)
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    fn indicator(&self) -> Indicator {
        self.indicator
    }

    fn source(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> FetchOutcome {
        self.outcome
    }
}
