//! Packages the latest record, its risk states and the history window for a
//! presentation layer.

use crate::models::{Indicator, Layer, Reading, Record, SignalState};
use crate::signals::SignalEngine;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorStatus {
    pub indicator: Indicator,
    pub unit: &'static str,
    pub layer: Layer,
    pub value: Reading,
    /// `None` for indicators without a risk threshold
    pub state: Option<SignalState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub indicators: Vec<IndicatorStatus>,
    /// Total public debt per USD of gold price
    pub debt_to_gold: Option<f64>,
    /// Oldest first
    pub history: Vec<Record>,
}

impl Snapshot {
    pub fn status(&self, indicator: Indicator) -> Option<&IndicatorStatus> {
        self.indicators.iter().find(|s| s.indicator == indicator)
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &IndicatorStatus> {
        self.indicators.iter().filter(move |s| s.layer == layer)
    }
}

pub fn build(latest: &Record, history: Vec<Record>) -> Snapshot {
    let indicators = latest
        .readings()
        .map(|(indicator, value)| IndicatorStatus {
            indicator,
            unit: indicator.unit(),
            layer: indicator.layer(),
            value,
            state: SignalEngine::classify(indicator, value),
        })
        .collect();

    Snapshot {
        timestamp: latest.timestamp,
        indicators,
        debt_to_gold: debt_to_gold(latest),
        history,
    }
}

fn debt_to_gold(record: &Record) -> Option<f64> {
    let debt = record.get(Indicator::UsDebt).value()?;
    let gold = record.get(Indicator::GoldPrice).value()?;
    (gold > 0.0).then(|| debt / gold)
}
