//! Long/flat backtest replay.
//!
//! The position held over step i is the signal observed at step i-1. On a
//! position change the fee is charged against the equity carried into the step,
//! and that same step's return is earned under the new position. Recorded
//! equity points are never rewritten; `equity_curve[0]` is always `start_cash`.

use crate::domain::error::QuantError;
use crate::domain::metrics::Metrics;
use crate::domain::signal::Position;
use serde::Serialize;

const BPS: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestConfig {
    pub start_cash: f64,
    pub fee_bps: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            start_cash: 10_000.0,
            fee_bps: 1.0,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), QuantError> {
        if !(self.start_cash.is_finite() && self.start_cash > 0.0) {
            return Err(QuantError::parameter(
                "start_cash",
                format!("start_cash must be positive, got {}", self.start_cash),
            ));
        }
        if !(self.fee_bps.is_finite() && self.fee_bps >= 0.0) {
            return Err(QuantError::parameter(
                "fee_bps",
                format!("fee_bps must be non-negative, got {}", self.fee_bps),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub index: usize,
    pub price: f64,
    pub action: TradeAction,
    pub fee: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub equity_curve: Vec<f64>,
    pub positions: Vec<Position>,
    pub trades: Vec<Trade>,
    /// Absent for an empty price series.
    pub metrics: Option<Metrics>,
}

pub fn run_backtest(
    prices: &[f64],
    signals: &[Position],
    config: &BacktestConfig,
) -> Result<BacktestResult, QuantError> {
    if prices.len() != signals.len() {
        return Err(QuantError::LengthMismatch {
            prices: prices.len(),
            signals: signals.len(),
        });
    }
    config.validate()?;

    if prices.is_empty() {
        return Ok(BacktestResult {
            equity_curve: Vec::new(),
            positions: Vec::new(),
            trades: Vec::new(),
            metrics: None,
        });
    }

    let mut equity_curve = Vec::with_capacity(prices.len());
    let mut positions = Vec::with_capacity(prices.len());
    let mut trades = Vec::new();

    equity_curve.push(config.start_cash);
    positions.push(Position::Flat);
    let mut position = Position::Flat;

    for i in 1..prices.len() {
        let mut carried = equity_curve[i - 1];
        let desired = signals[i - 1];

        if desired != position {
            let fee = carried * config.fee_bps / BPS;
            carried -= fee;
            position = desired;
            trades.push(Trade {
                index: i,
                price: prices[i],
                action: match position {
                    Position::Long => TradeAction::Buy,
                    Position::Flat => TradeAction::Sell,
                },
                fee,
            });
        }

        let period_return = prices[i] / prices[i - 1] - 1.0;
        equity_curve.push(carried * (1.0 + position.exposure() * period_return));
        positions.push(position);
    }

    let metrics = Metrics::compute(&equity_curve, config.start_cash);
    Ok(BacktestResult {
        equity_curve,
        positions,
        trades,
        metrics: Some(metrics),
    })
}
