//! Maps raw indicator readings to risk states.

use super::thresholds::{
    CREDIT_SPREAD_CEILING, OIL_PRICE_CEILING, PMI_CONTRACTION, REAL_RATE_CEILING,
    YIELD_CURVE_INVERSION,
};
use crate::models::{Indicator, Reading, SignalState};

pub struct SignalEngine;

impl SignalEngine {
    /// Risk state for one reading, or `None` for indicators without a
    /// threshold (debt, M2, gold). A classified indicator with no reading is
    /// [`SignalState::NoData`].
    pub fn classify(indicator: Indicator, reading: Reading) -> Option<SignalState> {
        let value = reading.value();
        let state = match indicator {
            Indicator::PmiIndex => classify_pmi(reading),
            Indicator::YieldCurve => value.map_or(SignalState::NoData, classify_yield_curve),
            Indicator::RealRates => value.map_or(SignalState::NoData, classify_real_rates),
            Indicator::HygSpread => value.map_or(SignalState::NoData, classify_credit_spread),
            Indicator::OilPrice => value.map_or(SignalState::NoData, classify_oil_price),
            Indicator::UsDebt | Indicator::M2Supply | Indicator::GoldPrice => return None,
        };
        Some(state)
    }
}

pub fn classify_yield_curve(spread: f64) -> SignalState {
    warn_if(spread < YIELD_CURVE_INVERSION)
}

pub fn classify_real_rates(rate: f64) -> SignalState {
    warn_if(rate > REAL_RATE_CEILING)
}

pub fn classify_credit_spread(spread: f64) -> SignalState {
    warn_if(spread > CREDIT_SPREAD_CEILING)
}

pub fn classify_pmi(reading: Reading) -> SignalState {
    match reading {
        Reading::Unavailable => SignalState::NoData,
        Reading::Known(pmi) => warn_if(pmi < PMI_CONTRACTION),
    }
}

pub fn classify_oil_price(price: f64) -> SignalState {
    warn_if(price > OIL_PRICE_CEILING)
}

fn warn_if(breached: bool) -> SignalState {
    if breached {
        SignalState::Warning
    } else {
        SignalState::Nominal
    }
}
