//! Shared data models spanning the pipeline stages.

pub mod indicators;
pub mod record;
pub mod signal;

pub use indicators::{Indicator, Layer, Reading, US_DEBT_ESTIMATE};
pub use record::Record;
pub use signal::SignalState;
