//! Unit tests for the signal engine

use aurum::models::{Indicator, Reading, SignalState};
use aurum::signals::engine::{
    classify_credit_spread, classify_oil_price, classify_pmi, classify_real_rates,
    classify_yield_curve, SignalEngine,
};
use aurum::signals::thresholds;

#[test]
fn test_inverted_yield_curve_warns() {
    assert_eq!(classify_yield_curve(-0.35), SignalState::Warning);
    assert_eq!(classify_yield_curve(1.10), SignalState::Nominal);
    assert_eq!(classify_yield_curve(0.0), SignalState::Nominal);
}

#[test]
fn test_real_rates_ceiling_is_exclusive() {
    assert_eq!(classify_real_rates(2.01), SignalState::Warning);
    assert_eq!(classify_real_rates(2.0), SignalState::Nominal);
    assert_eq!(classify_real_rates(-0.5), SignalState::Nominal);
}

#[test]
fn test_credit_spread_and_oil_thresholds() {
    assert_eq!(classify_credit_spread(6.25), SignalState::Warning);
    assert_eq!(classify_oil_price(104.50), SignalState::Warning);

    assert_eq!(classify_credit_spread(3.0), SignalState::Nominal);
    assert_eq!(classify_oil_price(80.0), SignalState::Nominal);

    // Boundaries are nominal: comparisons are strict
    assert_eq!(classify_credit_spread(5.0), SignalState::Nominal);
    assert_eq!(classify_oil_price(100.0), SignalState::Nominal);
}

#[test]
fn test_pmi_states() {
    assert_eq!(classify_pmi(Reading::Unavailable), SignalState::NoData);
    assert_eq!(classify_pmi(Reading::Known(48.7)), SignalState::Warning);
    assert_eq!(classify_pmi(Reading::Known(50.0)), SignalState::Nominal);
    assert_eq!(classify_pmi(Reading::Known(53.2)), SignalState::Nominal);
}

#[test]
fn test_zero_pmi_is_a_reading_not_missing_data() {
    assert_eq!(classify_pmi(Reading::Known(0.0)), SignalState::Warning);
}

#[test]
fn test_thresholds_match_documented_values() {
    assert_eq!(thresholds::YIELD_CURVE_INVERSION, 0.0);
    assert_eq!(thresholds::REAL_RATE_CEILING, 2.0);
    assert_eq!(thresholds::CREDIT_SPREAD_CEILING, 5.0);
    assert_eq!(thresholds::PMI_CONTRACTION, 50.0);
    assert_eq!(thresholds::OIL_PRICE_CEILING, 100.0);
}

#[test]
fn test_classify_dispatch() {
    assert_eq!(
        SignalEngine::classify(Indicator::YieldCurve, Reading::Known(-0.35)),
        Some(SignalState::Warning)
    );
    assert_eq!(
        SignalEngine::classify(Indicator::PmiIndex, Reading::Unavailable),
        Some(SignalState::NoData)
    );
    assert_eq!(
        SignalEngine::classify(Indicator::OilPrice, Reading::Unavailable),
        Some(SignalState::NoData)
    );
    for unclassified in [Indicator::UsDebt, Indicator::M2Supply, Indicator::GoldPrice] {
        assert_eq!(SignalEngine::classify(unclassified, Reading::Known(1.0)), None);
    }
}

#[test]
fn test_classify_is_deterministic() {
    let inputs = [-3.0, -0.35, 0.0, 1.10, 2.0, 4.99, 5.0, 6.25, 49.9, 50.0, 100.0, 104.5];
    for indicator in Indicator::ALL {
        for value in inputs {
            let first = SignalEngine::classify(indicator, Reading::Known(value));
            for _ in 0..3 {
                assert_eq!(SignalEngine::classify(indicator, Reading::Known(value)), first);
            }
        }
    }
}
