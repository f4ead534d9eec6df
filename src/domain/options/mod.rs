//! American option pricing on a Cox-Ross-Rubinstein lattice.

pub mod greeks;
pub mod lattice;

use crate::domain::error::QuantError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub use greeks::{Greeks, calculate_greeks};
pub use lattice::{BinomialTree, price_american_option};

pub const DEFAULT_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Exercise value at underlying price `spot`.
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.write_str("call"),
            OptionType::Put => f.write_str("put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = QuantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            _ => Err(QuantError::contract(format!(
                "option_type must be 'call' or 'put', got '{s}'"
            ))),
        }
    }
}

/// Contract terms plus lattice resolution. Validated when a tree is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionContract {
    pub spot: f64,
    pub strike: f64,
    /// Years to expiry.
    pub expiry: f64,
    pub rate: f64,
    pub volatility: f64,
    pub dividend_yield: f64,
    pub steps: usize,
    pub option_type: OptionType,
}

impl OptionContract {
    pub fn new(
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        OptionContract {
            spot,
            strike,
            expiry,
            rate,
            volatility,
            dividend_yield: 0.0,
            steps: DEFAULT_STEPS,
            option_type,
        }
    }

    pub fn with_dividend_yield(self, dividend_yield: f64) -> Self {
        OptionContract {
            dividend_yield,
            ..self
        }
    }

    pub fn with_steps(self, steps: usize) -> Self {
        OptionContract { steps, ..self }
    }

    pub fn intrinsic_value(&self) -> f64 {
        self.option_type.payoff(self.spot, self.strike)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionQuote {
    pub price: f64,
    pub intrinsic_value: f64,
}
