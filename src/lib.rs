//! Aurum Sentinel: periodic macro/market indicator collection, time-series
//! persistence and threshold-based risk signals.

pub mod aggregator;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod snapshot;
