//! Recombining binomial lattice with early-exercise backward induction.

use super::{OptionContract, OptionQuote};
use crate::domain::error::QuantError;
use crate::domain::prices::round_dp;

const OUTPUT_DP: i32 = 4;

/// A validated contract with its derived lattice parameters.
#[derive(Debug, Clone, Copy)]
pub struct BinomialTree {
    contract: OptionContract,
    up: f64,
    down: f64,
    prob_up: f64,
    discount: f64,
}

impl BinomialTree {
    pub fn new(contract: &OptionContract) -> Result<Self, QuantError> {
        let sigma = contract.volatility;
        let expiry = contract.expiry;
        let steps = contract.steps;

        positive("volatility", sigma)?;
        positive("expiry", expiry)?;
        if steps < 1 {
            return Err(QuantError::contract("steps must be at least 1"));
        }

        let dt = expiry / steps as f64;
        let up = (sigma * dt.sqrt()).exp();
        let down = 1.0 / up;
        let growth = ((contract.rate - contract.dividend_yield) * dt).exp();
        let prob_up = (growth - down) / (up - down);
        let discount = (-contract.rate * dt).exp();

        positive("spot", contract.spot)?;
        positive("strike", contract.strike)?;
        if !(contract.dividend_yield.is_finite() && contract.dividend_yield >= 0.0) {
            return Err(QuantError::contract(format!(
                "dividend_yield must be non-negative, got {}",
                contract.dividend_yield
            )));
        }
        if !contract.rate.is_finite() {
            return Err(QuantError::contract("rate must be finite"));
        }
        if !(prob_up > 0.0 && prob_up < 1.0) {
            return Err(QuantError::contract(format!(
                "risk-neutral probability {prob_up:.6} outside (0, 1); \
                 reduce rate - dividend_yield or increase steps"
            )));
        }

        Ok(BinomialTree {
            contract: *contract,
            up,
            down,
            prob_up,
            discount,
        })
    }

    /// Root value of the lattice at full precision.
    pub fn price(&self) -> f64 {
        let c = &self.contract;
        let n = c.steps;
        let node_price = |step: usize, i: usize| c.spot * self.up.powi(step as i32 - 2 * i as i32);

        let mut values: Vec<f64> = (0..=n)
            .map(|i| c.option_type.payoff(node_price(n, i), c.strike))
            .collect();

        for step in (0..n).rev() {
            for i in 0..=step {
                let continuation =
                    self.discount * (self.prob_up * values[i] + (1.0 - self.prob_up) * values[i + 1]);
                let exercise = c.option_type.payoff(node_price(step, i), c.strike);
                values[i] = continuation.max(exercise);
            }
        }

        values[0]
    }

    pub fn intrinsic(&self) -> f64 {
        self.contract.intrinsic_value()
    }
}

fn positive(name: &str, value: f64) -> Result<(), QuantError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(QuantError::contract(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Price an American option; both fields rounded to 4 decimals.
pub fn price_american_option(contract: &OptionContract) -> Result<OptionQuote, QuantError> {
    let tree = BinomialTree::new(contract)?;
    Ok(OptionQuote {
        price: round_dp(tree.price(), OUTPUT_DP),
        intrinsic_value: round_dp(tree.intrinsic(), OUTPUT_DP),
    })
}
