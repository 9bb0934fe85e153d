use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::indicators::{Indicator, Reading};

/// One aggregation cycle: a timestamp plus exactly one reading per indicator.
///
/// Only [`Record::from_fn`] builds a record, so every indicator is always
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    yield_curve: Reading,
    real_rates: Reading,
    us_debt: Reading,
    hyg_spread: Reading,
    m2_supply: Reading,
    gold_price: Reading,
    pmi_index: Reading,
    oil_price: Reading,
}

impl Record {
    /// Build a record by asking `reading` for every indicator.
    ///
    /// The timestamp is truncated to microseconds, the resolution the
    /// `metrics` table stores.
    pub fn from_fn<F>(timestamp: DateTime<Utc>, mut reading: F) -> Self
    where
        F: FnMut(Indicator) -> Reading,
    {
        Self {
            timestamp: timestamp.trunc_subsecs(6),
            yield_curve: reading(Indicator::YieldCurve),
            real_rates: reading(Indicator::RealRates),
            us_debt: reading(Indicator::UsDebt),
            hyg_spread: reading(Indicator::HygSpread),
            m2_supply: reading(Indicator::M2Supply),
            gold_price: reading(Indicator::GoldPrice),
            pmi_index: reading(Indicator::PmiIndex),
            oil_price: reading(Indicator::OilPrice),
        }
    }

    /// Record carrying every indicator's fallback
    pub fn fallback(timestamp: DateTime<Utc>) -> Self {
        Self::from_fn(timestamp, |indicator| indicator.fallback())
    }

    pub fn get(&self, indicator: Indicator) -> Reading {
        match indicator {
            Indicator::YieldCurve => self.yield_curve,
            Indicator::RealRates => self.real_rates,
            Indicator::UsDebt => self.us_debt,
            Indicator::HygSpread => self.hyg_spread,
            Indicator::M2Supply => self.m2_supply,
            Indicator::GoldPrice => self.gold_price,
            Indicator::PmiIndex => self.pmi_index,
            Indicator::OilPrice => self.oil_price,
        }
    }

    /// Readings in [`Indicator::ALL`] order
    pub fn readings(&self) -> impl Iterator<Item = (Indicator, Reading)> + '_ {
        Indicator::ALL.into_iter().map(move |i| (i, self.get(i)))
    }
}
