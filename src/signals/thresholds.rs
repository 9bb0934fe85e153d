//! Fixed risk thresholds. All comparisons are strict, so a reading exactly on
//! a threshold is nominal.

/// Yield curve (10Y-2Y, percent) below this is inverted
pub const YIELD_CURVE_INVERSION: f64 = 0.0;

/// Real interest rate (10Y TIPS, percent) above this is restrictive
pub const REAL_RATE_CEILING: f64 = 2.0;

/// Corporate credit spread (percent) above this signals stress
pub const CREDIT_SPREAD_CEILING: f64 = 5.0;

/// ISM manufacturing PMI below this signals contraction
pub const PMI_CONTRACTION: f64 = 50.0;

/// WTI crude (USD per barrel) above this signals a supply shock
pub const OIL_PRICE_CEILING: f64 = 100.0;
