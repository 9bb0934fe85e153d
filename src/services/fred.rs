//! FRED (Federal Reserve Economic Data) CSV series adapter

use crate::error::SourceError;
use crate::models::Indicator;
use crate::services::source::{parse_number, settle, FetchOutcome, SourceAdapter};
use async_trait::async_trait;
use csv::ReaderBuilder;
use url::Url;

pub const YIELD_CURVE_SERIES: &str = "T10Y2Y";
pub const REAL_RATES_SERIES: &str = "DFII10";
pub const CREDIT_SPREAD_SERIES: &str = "BAMLC0A0CM";
pub const M2_SUPPLY_SERIES: &str = "M2SL";
pub const PMI_SERIES: &str = "NAPM";

/// Reads the latest observation of one FRED series from the graph CSV export
pub struct FredSeriesAdapter {
    indicator: Indicator,
    series_id: String,
    base_url: Url,
    client: reqwest::Client,
}

impl FredSeriesAdapter {
    pub fn new(
        indicator: Indicator,
        series_id: impl Into<String>,
        base_url: Url,
        client: reqwest::Client,
    ) -> Self {
        Self {
            indicator,
            series_id: series_id.into(),
            base_url,
            client,
        }
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    async fn latest_observation(&self) -> Result<f64, SourceError> {
        let mut url = self.base_url.join("graph/fredgraph.csv")?;
        url.query_pairs_mut().append_pair("id", &self.series_id);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }
        let body = response.text().await?;
        parse_last_value(&body)
    }
}

#[async_trait]
impl SourceAdapter for FredSeriesAdapter {
    fn indicator(&self) -> Indicator {
        self.indicator
    }

    fn source(&self) -> String {
        format!("fred:{}", self.series_id)
    }

    async fn fetch(&self) -> FetchOutcome {
        settle(self.indicator, &self.source(), self.latest_observation().await)
    }
}

/// Value column of the last well-formed row.
///
/// Rows whose width differs from the header are skipped. FRED writes `.` for
/// a missing observation, which fails to parse.
pub fn parse_last_value(body: &str) -> Result<f64, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());
    let width = reader.headers()?.len();

    let mut last = None;
    for row in reader.records() {
        let row = row?;
        if row.len() == width {
            last = Some(row);
        }
    }

    let row = last.ok_or(SourceError::MissingField("observation row"))?;
    let raw = row.get(1).ok_or(SourceError::MissingField("value column"))?;
    parse_number(raw)
}
