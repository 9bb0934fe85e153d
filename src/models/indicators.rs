use serde::{Deserialize, Serialize};

/// The fixed set of tracked macro and market indicators.
///
/// The order of [`Indicator::ALL`] is the display order used by snapshots and
/// the column order used by the `metrics` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    YieldCurve,
    RealRates,
    UsDebt,
    HygSpread,
    M2Supply,
    GoldPrice,
    PmiIndex,
    OilPrice,
}

/// Dashboard layer an indicator is grouped under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Recession prediction
    Sovereign,
    /// Financial plumbing
    Systemic,
    /// Real world
    Physical,
}

impl Indicator {
    pub const COUNT: usize = 8;

    pub const ALL: [Indicator; Indicator::COUNT] = [
        Indicator::YieldCurve,
        Indicator::RealRates,
        Indicator::UsDebt,
        Indicator::HygSpread,
        Indicator::M2Supply,
        Indicator::GoldPrice,
        Indicator::PmiIndex,
        Indicator::OilPrice,
    ];

    /// Stable identifier, also the column name in the `metrics` table
    pub fn name(&self) -> &'static str {
        match self {
            Indicator::YieldCurve => "yield_curve",
            Indicator::RealRates => "real_rates",
            Indicator::UsDebt => "us_debt",
            Indicator::HygSpread => "hyg_spread",
            Indicator::M2Supply => "m2_supply",
            Indicator::GoldPrice => "gold_price",
            Indicator::PmiIndex => "pmi_index",
            Indicator::OilPrice => "oil_price",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Indicator::YieldCurve | Indicator::RealRates | Indicator::HygSpread => "percent",
            Indicator::UsDebt | Indicator::GoldPrice | Indicator::OilPrice => "usd",
            Indicator::M2Supply => "usd_billion",
            Indicator::PmiIndex => "index",
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            Indicator::YieldCurve | Indicator::RealRates | Indicator::UsDebt => Layer::Sovereign,
            Indicator::HygSpread | Indicator::M2Supply | Indicator::GoldPrice => Layer::Systemic,
            Indicator::PmiIndex | Indicator::OilPrice => Layer::Physical,
        }
    }

    /// Value substituted when the indicator's source cannot supply a reading.
    ///
    /// The PMI falls back to [`Reading::Unavailable`] rather than zero, since
    /// zero is not a meaningful index level.
    pub fn fallback(&self) -> Reading {
        match self {
            Indicator::UsDebt => Reading::Known(US_DEBT_ESTIMATE),
            Indicator::PmiIndex => Reading::Unavailable,
            _ => Reading::Known(0.0),
        }
    }

    /// Position in [`Indicator::ALL`], which follows declaration order
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Last-known total public debt outstanding, in USD
pub const US_DEBT_ESTIMATE: f64 = 38_000_000_000_000.0;

/// An indicator value as carried by a [`Record`](super::Record).
///
/// Serialized as a plain number, or `null` when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Reading {
    Known(f64),
    Unavailable,
}

impl Reading {
    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Known(v) => Some(*v),
            Reading::Unavailable => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Reading::Known(_))
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Reading::Known(v),
            None => Reading::Unavailable,
        }
    }
}

impl From<Reading> for Option<f64> {
    fn from(reading: Reading) -> Self {
        reading.value()
    }
}
