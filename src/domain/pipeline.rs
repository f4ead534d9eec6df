//! One-call strategy evaluation: validate, generate signals, replay.

use crate::domain::backtest::{BacktestConfig, BacktestResult, run_backtest};
use crate::domain::error::QuantError;
use crate::domain::prices::{PriceCandidate, validate_prices};
use crate::domain::signal::{Position, generate_signals};
use crate::domain::strategy::Params;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRun {
    pub prices: Vec<f64>,
    pub signals: Vec<Position>,
    #[serde(flatten)]
    pub backtest: BacktestResult,
}

pub fn run_strategy<I>(
    raw: I,
    strategy_name: &str,
    params: Option<&Params>,
    config: &BacktestConfig,
) -> Result<StrategyRun, QuantError>
where
    I: IntoIterator,
    I::Item: PriceCandidate,
{
    let prices = validate_prices(raw)?;
    let signals = generate_signals(&prices, strategy_name, params)?;
    let backtest = run_backtest(&prices, &signals, config)?;
    Ok(StrategyRun {
        prices,
        signals,
        backtest,
    })
}
