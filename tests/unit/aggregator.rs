//! Unit tests for the aggregator

use async_trait::async_trait;
use aurum::aggregator::Aggregator;
use aurum::models::{Indicator, Reading, US_DEBT_ESTIMATE};
use aurum::services::{FetchOutcome, SourceAdapter, StaticAdapter};
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CountingAdapter {
    indicator: Indicator,
    calls: AtomicUsize,
}

#[async_trait]
impl SourceAdapter for CountingAdapter {
    fn indicator(&self) -> Indicator {
        self.indicator
    }

    fn source(&self) -> String {
        "counting".to_string()
    }

    async fn fetch(&self) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FetchOutcome::Fresh(42.0)
    }
}

fn all_unavailable() -> Vec<Arc<dyn SourceAdapter>> {
    Indicator::ALL
        .into_iter()
        .map(|i| Arc::new(StaticAdapter::unavailable(i)) as Arc<dyn SourceAdapter>)
        .collect()
}

#[tokio::test]
async fn test_total_failure_yields_documented_fallbacks() {
    let aggregator = Aggregator::new(all_unavailable());
    let record = aggregator.run_cycle().await;

    assert_eq!(record.get(Indicator::UsDebt), Reading::Known(US_DEBT_ESTIMATE));
    assert_eq!(record.get(Indicator::PmiIndex), Reading::Unavailable);
    for indicator in [
        Indicator::YieldCurve,
        Indicator::RealRates,
        Indicator::HygSpread,
        Indicator::M2Supply,
        Indicator::GoldPrice,
        Indicator::OilPrice,
    ] {
        assert_eq!(record.get(indicator), Reading::Known(0.0));
    }
    assert_eq!(record.readings().count(), Indicator::COUNT);
}

#[tokio::test]
async fn test_fresh_values_win_over_fallbacks() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(StaticAdapter::fresh(Indicator::YieldCurve, -0.35)),
        Arc::new(StaticAdapter::fresh(Indicator::PmiIndex, 48.7)),
        Arc::new(StaticAdapter::unavailable(Indicator::OilPrice)),
    ];
    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let collection = Aggregator::new(adapters).collect_at(ts).await;

    assert_eq!(collection.record.timestamp, ts);
    assert_eq!(collection.record.get(Indicator::YieldCurve), Reading::Known(-0.35));
    assert_eq!(collection.record.get(Indicator::PmiIndex), Reading::Known(48.7));
    assert_eq!(collection.record.get(Indicator::OilPrice), Reading::Known(0.0));

    // Unregistered indicators fall back as well
    assert_eq!(collection.fallbacks.len(), Indicator::COUNT - 2);
    assert!(collection.fallbacks.contains(&Indicator::OilPrice));
    assert!(collection.fallbacks.contains(&Indicator::UsDebt));
    assert!(!collection.fallbacks.contains(&Indicator::YieldCurve));
}

#[tokio::test]
async fn test_one_failure_does_not_affect_others() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(StaticAdapter::unavailable(Indicator::GoldPrice)),
        Arc::new(StaticAdapter::fresh(Indicator::OilPrice, 104.5)),
    ];
    let record = Aggregator::new(adapters).run_cycle().await;
    assert_eq!(record.get(Indicator::OilPrice), Reading::Known(104.5));
    assert_eq!(record.get(Indicator::GoldPrice), Reading::Known(0.0));
}

#[tokio::test]
async fn test_each_adapter_called_once_per_cycle() {
    let counters: Vec<Arc<CountingAdapter>> = Indicator::ALL
        .into_iter()
        .map(|indicator| {
            Arc::new(CountingAdapter {
                indicator,
                calls: AtomicUsize::new(0),
            })
        })
        .collect();
    let adapters: Vec<Arc<dyn SourceAdapter>> = counters
        .iter()
        .map(|c| c.clone() as Arc<dyn SourceAdapter>)
        .collect();
    let aggregator = Aggregator::new(adapters);

    aggregator.run_cycle().await;
    aggregator.run_cycle().await;

    for counter in &counters {
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
    }
}
