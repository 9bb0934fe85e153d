//! Threshold-based risk classification.

pub mod engine;
pub mod thresholds;

pub use engine::*;
