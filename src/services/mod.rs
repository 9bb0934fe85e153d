//! External data providers.

pub mod fred;
pub mod source;
pub mod treasury;
pub mod yahoo;

pub use fred::FredSeriesAdapter;
pub use source::{FetchOutcome, SourceAdapter, StaticAdapter};
pub use treasury::TreasuryDebtAdapter;
pub use yahoo::YahooQuoteAdapter;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::models::Indicator;
use std::sync::Arc;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; aurum-sentinel/0.1)";

/// HTTP client shared by all adapters; `timeout` bounds each request
pub fn build_client(timeout: std::time::Duration) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Production adapter set, one per indicator
pub fn default_adapters(
    config: &SourceConfig,
    client: reqwest::Client,
) -> Vec<Arc<dyn SourceAdapter>> {
    let fred_series = |indicator: Indicator, series: &str| -> Arc<dyn SourceAdapter> {
        Arc::new(FredSeriesAdapter::new(
            indicator,
            series,
            config.fred_base_url.clone(),
            client.clone(),
        ))
    };
    let yahoo_quote = |indicator: Indicator, symbol: &str| -> Arc<dyn SourceAdapter> {
        Arc::new(YahooQuoteAdapter::new(
            indicator,
            symbol,
            config.yahoo_base_url.clone(),
            client.clone(),
        ))
    };

    vec![
        fred_series(Indicator::YieldCurve, fred::YIELD_CURVE_SERIES),
        fred_series(Indicator::RealRates, fred::REAL_RATES_SERIES),
        fred_series(Indicator::HygSpread, fred::CREDIT_SPREAD_SERIES),
        fred_series(Indicator::M2Supply, fred::M2_SUPPLY_SERIES),
        fred_series(Indicator::PmiIndex, fred::PMI_SERIES),
        yahoo_quote(Indicator::GoldPrice, yahoo::GOLD_FUTURES),
        yahoo_quote(Indicator::OilPrice, yahoo::WTI_CRUDE_FUTURES),
        Arc::new(TreasuryDebtAdapter::new(
            config.treasury_base_url.clone(),
            client.clone(),
        )) as Arc<dyn SourceAdapter>,
    ]
}
