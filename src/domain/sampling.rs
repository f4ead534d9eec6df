//! Synthetic price series: a seeded Gaussian-shock random walk.
//!
//! price[0] = round2(start); price[i] = max(round2(price[i-1] * (1 + N(drift, vol))), 0.01).
//! A shock below -100% lands on the one-cent floor instead of a non-positive price.
//! The generator is created per call from the seed, never shared.

use crate::domain::error::QuantError;
use crate::domain::prices::round_dp;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Smallest price the walk can reach: one cent.
const MIN_PRICE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub length: usize,
    pub start: f64,
    pub drift: f64,
    pub vol: f64,
    /// `None` draws a fresh entropy seed.
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        SampleConfig {
            length: 240,
            start: 100.0,
            drift: 0.0005,
            vol: 0.01,
            seed: Some(7),
        }
    }
}

pub fn sample_price_series(config: &SampleConfig) -> Result<Vec<f64>, QuantError> {
    if config.length == 0 {
        return Err(QuantError::parameter("length", "length must be at least 1"));
    }
    if !(config.start.is_finite() && config.start > 0.0) {
        return Err(QuantError::parameter(
            "start",
            format!("start must be positive, got {}", config.start),
        ));
    }
    if !config.drift.is_finite() {
        return Err(QuantError::parameter("drift", "drift must be finite"));
    }
    if !(config.vol.is_finite() && config.vol >= 0.0) {
        return Err(QuantError::parameter(
            "vol",
            format!("vol must be finite and non-negative, got {}", config.vol),
        ));
    }
    let shocks = Normal::new(config.drift, config.vol)
        .map_err(|e| QuantError::parameter("vol", e.to_string()))?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut prices = Vec::with_capacity(config.length);
    let mut last = round_dp(config.start, 2);
    prices.push(last);
    for _ in 1..config.length {
        let shock = shocks.sample(&mut rng);
        last = round_dp(last * (1.0 + shock), 2).max(MIN_PRICE);
        prices.push(last);
    }
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = SampleConfig::default();
        assert_eq!(config.length, 240);
        assert_eq!(config.start, 100.0);
        assert_eq!(config.drift, 0.0005);
        assert_eq!(config.vol, 0.01);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn same_seed_same_series() {
        let config = SampleConfig::default();
        let a = sample_price_series(&config).unwrap();
        let b = sample_price_series(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 240);
        assert_eq!(a[0], 100.0);
    }

    #[test]
    fn different_seeds_differ() {
        let a = sample_price_series(&SampleConfig::default()).unwrap();
        let b = sample_price_series(&SampleConfig {
            seed: Some(8),
            ..SampleConfig::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn values_are_rounded_to_cents() {
        let prices = sample_price_series(&SampleConfig::default()).unwrap();
        for price in prices {
            assert!((price * 100.0 - (price * 100.0).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_vol_is_pure_drift() {
        let config = SampleConfig {
            length: 3,
            start: 100.0,
            drift: 0.01,
            vol: 0.0,
            seed: Some(1),
        };
        assert_eq!(sample_price_series(&config).unwrap(), vec![100.0, 101.0, 102.01]);
    }

    #[test]
    fn start_is_rounded() {
        let config = SampleConfig {
            length: 1,
            start: 99.999,
            ..SampleConfig::default()
        };
        assert_eq!(sample_price_series(&config).unwrap(), vec![100.0]);
    }

    #[test]
    fn unseeded_still_produces_series() {
        let config = SampleConfig {
            seed: None,
            length: 10,
            ..SampleConfig::default()
        };
        assert_eq!(sample_price_series(&config).unwrap().len(), 10);
    }

    #[test]
    fn invalid_parameters() {
        let cases = [
            SampleConfig {
                length: 0,
                ..SampleConfig::default()
            },
            SampleConfig {
                start: -1.0,
                ..SampleConfig::default()
            },
            SampleConfig {
                vol: -0.1,
                ..SampleConfig::default()
            },
            SampleConfig {
                vol: f64::INFINITY,
                ..SampleConfig::default()
            },
            SampleConfig {
                drift: f64::NAN,
                ..SampleConfig::default()
            },
        ];
        for config in cases {
            let err = sample_price_series(&config).unwrap_err();
            assert!(matches!(err, QuantError::InvalidParameter { .. }), "{config:?}");
        }
    }

    #[test]
    fn negative_vol_rejected() {
        let config = SampleConfig {
            vol: -0.1,
            ..SampleConfig::default()
        };
        match sample_price_series(&config).unwrap_err() {
            QuantError::InvalidParameter { name, .. } => assert_eq!(name, "vol"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn high_vol_walk_stays_positive() {
        let config = SampleConfig {
            length: 500,
            vol: 0.6,
            seed: Some(7),
            ..SampleConfig::default()
        };
        let prices = sample_price_series(&config).unwrap();
        assert_eq!(prices.len(), 500);
        assert!(prices.iter().all(|&p| p >= MIN_PRICE), "{prices:?}");
    }
}
