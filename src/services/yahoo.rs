//! Yahoo Finance chart API adapter for futures quotes

use crate::error::SourceError;
use crate::models::Indicator;
use crate::services::source::{settle, FetchOutcome, SourceAdapter};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

pub const GOLD_FUTURES: &str = "GC=F";
pub const WTI_CRUDE_FUTURES: &str = "CL=F";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Latest daily close of one Yahoo Finance symbol
pub struct YahooQuoteAdapter {
    indicator: Indicator,
    symbol: String,
    base_url: Url,
    client: reqwest::Client,
}

impl YahooQuoteAdapter {
    pub fn new(
        indicator: Indicator,
        symbol: impl Into<String>,
        base_url: Url,
        client: reqwest::Client,
    ) -> Self {
        Self {
            indicator,
            symbol: symbol.into(),
            base_url,
            client,
        }
    }

    async fn latest_close(&self) -> Result<f64, SourceError> {
        let mut url = self
            .base_url
            .join(&format!("v8/finance/chart/{}", self.symbol))?;
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }
        let body = response.bytes().await?;
        parse_latest_close(&body)
    }
}

#[async_trait]
impl SourceAdapter for YahooQuoteAdapter {
    fn indicator(&self) -> Indicator {
        self.indicator
    }

    fn source(&self) -> String {
        format!("yahoo:{}", self.symbol)
    }

    async fn fetch(&self) -> FetchOutcome {
        settle(self.indicator, &self.source(), self.latest_close().await)
    }
}

/// Last non-null close, or the regular market price when the session has no
/// bars yet
pub fn parse_latest_close(body: &[u8]) -> Result<f64, SourceError> {
    let response: ChartResponse = serde_json::from_slice(body)?;
    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or(SourceError::MissingField("chart.result"))?;

    let close = result
        .indicators
        .and_then(|ind| ind.quote.into_iter().next())
        .and_then(|quote| quote.close.into_iter().rev().flatten().next());

    close
        .or_else(|| result.meta.and_then(|m| m.regular_market_price))
        .filter(|v| v.is_finite())
        .ok_or(SourceError::MissingField("close"))
}
