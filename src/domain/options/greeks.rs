//! Finite-difference sensitivities from re-pricing bumped contracts.

use super::OptionContract;
use super::lattice::BinomialTree;
use crate::domain::error::QuantError;
use crate::domain::prices::round_dp;
use serde::Serialize;

const SPOT_BUMP: f64 = 0.01;
const VOL_BUMP: f64 = 0.01;
const RATE_BUMP: f64 = 0.01;
const ONE_DAY: f64 = 1.0 / 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    /// Per year; negative means the option loses value as time passes.
    pub theta: f64,
    /// Per 0.01 absolute change in volatility.
    pub vega: f64,
    /// Per 0.01 absolute change in rate.
    pub rho: f64,
}

fn reprice(contract: OptionContract) -> Result<f64, QuantError> {
    Ok(BinomialTree::new(&contract)?.price())
}

/// Delta, gamma, theta, vega and rho, rounded to 4 decimals.
pub fn calculate_greeks(contract: &OptionContract) -> Result<Greeks, QuantError> {
    let base = reprice(*contract)?;

    let ds = SPOT_BUMP * contract.spot;
    let up = reprice(OptionContract {
        spot: contract.spot + ds,
        ..*contract
    })?;
    let down = reprice(OptionContract {
        spot: contract.spot - ds,
        ..*contract
    })?;
    let delta = (up - down) / (2.0 * ds);
    let gamma = (up - 2.0 * base + down) / (ds * ds);

    let theta = if contract.expiry <= ONE_DAY {
        0.0
    } else {
        let earlier = reprice(OptionContract {
            expiry: contract.expiry - ONE_DAY,
            ..*contract
        })?;
        -(base - earlier) / ONE_DAY
    };

    let vega = reprice(OptionContract {
        volatility: contract.volatility + VOL_BUMP,
        ..*contract
    })? - base;
    let rho = reprice(OptionContract {
        rate: contract.rate + RATE_BUMP,
        ..*contract
    })? - base;

    Ok(Greeks {
        delta: round_dp(delta, 4),
        gamma: round_dp(gamma, 4),
        theta: round_dp(theta, 4),
        vega: round_dp(vega, 4),
        rho: round_dp(rho, 4),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::OptionType;

    fn atm(option_type: OptionType) -> OptionContract {
        OptionContract::new(100.0, 100.0, 1.0, 0.05, 0.2, option_type)
    }

    #[test]
    fn atm_call_signs() {
        let greeks = calculate_greeks(&atm(OptionType::Call)).unwrap();
        assert!(greeks.delta > 0.4 && greeks.delta < 0.7, "{greeks:?}");
        assert!(greeks.gamma > 0.0);
        assert!(greeks.theta < 0.0);
        assert!(greeks.vega > 0.0);
        assert!(greeks.rho > 0.0);
    }

    #[test]
    fn atm_put_signs() {
        let greeks = calculate_greeks(&atm(OptionType::Put)).unwrap();
        assert!(greeks.delta < 0.0, "{greeks:?}");
        assert!(greeks.gamma > 0.0);
        assert!(greeks.theta < 0.0);
        assert!(greeks.vega > 0.0);
        assert!(greeks.rho < 0.0);
    }

    #[test]
    fn theta_zero_inside_one_day() {
        let contract = OptionContract {
            expiry: 1.0 / 400.0,
            ..atm(OptionType::Call)
        };
        assert_eq!(calculate_greeks(&contract).unwrap().theta, 0.0);
    }

    #[test]
    fn contract_left_untouched() {
        let contract = atm(OptionType::Call);
        let copy = contract;
        calculate_greeks(&contract).unwrap();
        assert_eq!(contract, copy);
    }

    #[test]
    fn invalid_contract_propagates() {
        let contract = OptionContract {
            volatility: 0.0,
            ..atm(OptionType::Put)
        };
        assert!(matches!(
            calculate_greeks(&contract),
            Err(QuantError::InvalidContract { .. })
        ));
    }

    #[test]
    fn bumped_rate_can_invalidate() {
        // p sits just below 1 at the base rate; the rho bump pushes it over
        let dt: f64 = 1.0;
        let sigma: f64 = 0.05;
        let u = (sigma * dt.sqrt()).exp();
        let rate = u.ln() - 0.005;
        let contract = OptionContract {
            rate,
            volatility: sigma,
            ..atm(OptionType::Call)
        }
        .with_steps(1);
        assert!(BinomialTree::new(&contract).is_ok());
        assert!(matches!(
            calculate_greeks(&contract),
            Err(QuantError::InvalidContract { .. })
        ));
    }
}
