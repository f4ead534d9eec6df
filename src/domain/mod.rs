//! Core domain types and logic. Pure: no I/O and no logging.

pub mod prices;
pub mod indicator;
pub mod strategy;
pub mod signal;
pub mod backtest;
pub mod metrics;
pub mod options;
pub mod sampling;
pub mod pipeline;
pub mod date_range;
pub mod config_validation;
pub mod error;
