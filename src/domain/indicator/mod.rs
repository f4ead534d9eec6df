//! Rolling-window indicators consumed by the signal rules.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: values parallel-indexed to the price series, `None`
//!   during warmup

pub mod rsi;
pub mod sma;

use crate::domain::error::QuantError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

pub(crate) fn check_window(period: usize) -> Result<(), QuantError> {
    if period == 0 {
        return Err(QuantError::parameter("window", "window must be positive"));
    }
    Ok(())
}
