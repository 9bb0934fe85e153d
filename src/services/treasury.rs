//! US Treasury Fiscal Data "Debt to the Penny" adapter

use crate::error::SourceError;
use crate::models::Indicator;
use crate::services::source::{parse_number, settle, FetchOutcome, SourceAdapter};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

const DEBT_TO_PENNY_PATH: &str = "services/api/fiscal_service/v2/accounting/od/debt_to_penny";

#[derive(Debug, Deserialize)]
struct DebtResponse {
    #[serde(default)]
    data: Vec<DebtEntry>,
}

#[derive(Debug, Deserialize)]
struct DebtEntry {
    tot_pub_debt_out_amt: Option<String>,
}

/// Total public debt outstanding from the most recent record date
pub struct TreasuryDebtAdapter {
    base_url: Url,
    client: reqwest::Client,
}

impl TreasuryDebtAdapter {
    pub fn new(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    async fn latest_total(&self) -> Result<f64, SourceError> {
        let mut url = self.base_url.join(DEBT_TO_PENNY_PATH)?;
        url.query_pairs_mut()
            .append_pair("sort", "-record_date")
            .append_pair("page[size]", "1");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }
        let body = response.bytes().await?;
        parse_total_debt(&body)
    }
}

#[async_trait]
impl SourceAdapter for TreasuryDebtAdapter {
    fn indicator(&self) -> Indicator {
        Indicator::UsDebt
    }

    fn source(&self) -> String {
        "treasury:debt_to_penny".to_string()
    }

    async fn fetch(&self) -> FetchOutcome {
        settle(Indicator::UsDebt, &self.source(), self.latest_total().await)
    }
}

pub fn parse_total_debt(body: &[u8]) -> Result<f64, SourceError> {
    let response: DebtResponse = serde_json::from_slice(body)?;
    let raw = response
        .data
        .into_iter()
        .next()
        .and_then(|entry| entry.tot_pub_debt_out_amt)
        .ok_or(SourceError::MissingField("data[0].tot_pub_debt_out_amt"))?;
    parse_number(&raw)
}
