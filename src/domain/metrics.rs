//! Performance metrics derived from an equity curve.

use crate::domain::error::QuantError;
use serde::Serialize;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

const MIN_YEARS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    pub total_return: f64,
    pub cagr: f64,
    pub volatility: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
}

impl Metrics {
    /// Compute metrics for a curve whose first point was funded with `start_cash`.
    ///
    /// Curves shorter than two points yield all-zero metrics. `start_cash` must
    /// already be known positive; see [`compute_metrics`] for the checked entry.
    pub fn compute(equity_curve: &[f64], start_cash: f64) -> Self {
        if equity_curve.len() < 2 {
            return Metrics::default();
        }

        let final_equity = equity_curve[equity_curve.len() - 1];
        let growth = final_equity / start_cash;
        let total_return = growth - 1.0;

        let periods = (equity_curve.len() - 1) as f64;
        let years = (periods / TRADING_DAYS_PER_YEAR).max(MIN_YEARS);
        let cagr = if growth > 0.0 {
            growth.powf(1.0 / years) - 1.0
        } else {
            -1.0
        };

        let (volatility, sharpe) = compute_risk_adjusted(equity_curve);

        Metrics {
            total_return,
            cagr,
            volatility,
            sharpe,
            max_drawdown: compute_drawdown(equity_curve),
        }
    }
}

/// Checked variant of [`Metrics::compute`] for externally supplied curves.
pub fn compute_metrics(equity_curve: &[f64], start_cash: f64) -> Result<Metrics, QuantError> {
    if !(start_cash.is_finite() && start_cash > 0.0) {
        return Err(QuantError::parameter(
            "start_cash",
            format!("start_cash must be positive, got {start_cash}"),
        ));
    }
    Ok(Metrics::compute(equity_curve, start_cash))
}

/// Largest peak-to-trough decline as a positive fraction of the running peak.
fn compute_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        } else if peak > 0.0 {
            let dd = (peak - equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Annualized volatility (sample stdev) and Sharpe of simple period returns.
fn compute_risk_adjusted(equity_curve: &[f64]) -> (f64, f64) {
    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0];
            let curr = w[1];
            if prev > 0.0 { curr / prev - 1.0 } else { 0.0 }
        })
        .collect();

    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let denominator = (n - 1.0).max(1.0);
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / denominator;
    let volatility = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();

    let sharpe = if volatility > 0.0 {
        mean * TRADING_DAYS_PER_YEAR / volatility
    } else {
        0.0
    };

    (volatility, sharpe)
}
