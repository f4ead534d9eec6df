//! Signal generation: strategy rules driving a long/flat position machine.
//!
//! Every rule feeds the same two-state machine. A rule only decides whether the
//! entry or exit predicate holds at a given index; the machine owns the state.
//! Signals are not lagged here; the simulator applies the one-step lag.

use crate::domain::error::QuantError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::strategy::{Params, Strategy};
use serde::{Deserialize, Serialize};

/// Target exposure for one step. Serialized as 0 (flat) or 1 (long).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    /// Fraction of equity exposed to the period return.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    /// Apply one step of entry/exit predicates.
    pub fn transition(self, enter: bool, exit: bool) -> Position {
        match self {
            Position::Flat if enter => Position::Long,
            Position::Long if exit => Position::Flat,
            unchanged => unchanged,
        }
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> u8 {
        match position {
            Position::Flat => 0,
            Position::Long => 1,
        }
    }
}

impl TryFrom<u8> for Position {
    type Error = QuantError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Position::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for Position {
    type Error = QuantError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Position::Flat),
            1 => Ok(Position::Long),
            other => Err(QuantError::input(format!(
                "signal values must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// Convert raw integer signals, rejecting anything outside {0, 1}.
pub fn positions_from_raw(raw: &[i64]) -> Result<Vec<Position>, QuantError> {
    raw.iter().map(|&value| Position::try_from(value)).collect()
}

/// Generate signals for a catalog strategy name with optional overrides.
pub fn generate_signals(
    prices: &[f64],
    strategy_name: &str,
    params: Option<&Params>,
) -> Result<Vec<Position>, QuantError> {
    let strategy = Strategy::from_name(strategy_name, params)?;
    signals_for(prices, &strategy)
}

/// Generate signals for an already-resolved strategy.
pub fn signals_for(prices: &[f64], strategy: &Strategy) -> Result<Vec<Position>, QuantError> {
    match *strategy {
        Strategy::SmaCrossover {
            fast_window,
            slow_window,
        } => {
            let fast = calculate_sma(prices, fast_window)?;
            let slow = calculate_sma(prices, slow_window)?;
            Ok(run_machine(prices.len(), |i| {
                let above = matches!((fast.get(i), slow.get(i)), (Some(f), Some(s)) if f > s);
                Some((above, !above))
            }))
        }
        Strategy::RsiReversion {
            window,
            oversold,
            overbought,
        } => {
            let rsi = calculate_rsi(prices, window)?;
            Ok(run_machine(prices.len(), |i| {
                rsi.get(i).map(|value| (value <= oversold, value >= overbought))
            }))
        }
        Strategy::ChannelBreakout { lookback } => Ok(run_machine(prices.len(), |i| {
            if i < lookback {
                return None;
            }
            let window = &prices[i - lookback..i];
            let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let low = window.iter().copied().fold(f64::INFINITY, f64::min);
            Some((prices[i] > high, prices[i] < low))
        })),
    }
}

/// Drive the position machine over `len` steps.
///
/// `predicates(i)` returns `(enter, exit)`, or `None` where the rule has no
/// opinion yet (warmup); such steps emit Flat without touching the state.
fn run_machine<F>(len: usize, mut predicates: F) -> Vec<Position>
where
    F: FnMut(usize) -> Option<(bool, bool)>,
{
    let mut state = Position::Flat;
    (0..len)
        .map(|i| match predicates(i) {
            Some((enter, exit)) => {
                state = state.transition(enter, exit);
                state
            }
            None => Position::Flat,
        })
        .collect()
}
