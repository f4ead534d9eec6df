//! Simple moving average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]), maintained as a running sum.
//! Warmup: first (n-1) values are undefined.

use crate::domain::error::QuantError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, check_window};

pub fn calculate_sma(prices: &[f64], period: usize) -> Result<IndicatorSeries, QuantError> {
    check_window(period)?;

    let mut values = vec![None; prices.len()];
    let mut running = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        running += price;
        if i >= period {
            running -= prices[i - period];
        }
        if i + 1 >= period {
            values[i] = Some(running / period as f64);
        }
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warmup_and_values() {
        let series = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(series.values[0], None);
        assert_eq!(series.values[1], None);
        assert!((series.get(2).unwrap() - 2.0).abs() < 1e-12);
        assert!((series.get(3).unwrap() - 3.0).abs() < 1e-12);
        assert!((series.get(4).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn sma_window_one_is_identity() {
        let prices = [10.0, 11.5, 9.25];
        let series = calculate_sma(&prices, 1).unwrap();
        for (value, price) in series.values.iter().zip(prices) {
            assert!((value.unwrap() - price).abs() < 1e-12);
        }
    }

    #[test]
    fn sma_window_longer_than_series() {
        let series = calculate_sma(&[1.0, 2.0], 5).unwrap();
        assert_eq!(series.values, vec![None, None]);
    }

    #[test]
    fn sma_empty_input() {
        let series = calculate_sma(&[], 3).unwrap();
        assert!(series.values.is_empty());
    }

    #[test]
    fn sma_zero_window() {
        let err = calculate_sma(&[1.0, 2.0], 0).unwrap_err();
        assert!(matches!(err, QuantError::InvalidParameter { .. }));
    }

    #[test]
    fn sma_matches_naive_mean() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = calculate_sma(&prices, 7).unwrap();
        for i in 6..prices.len() {
            let naive = prices[i - 6..=i].iter().sum::<f64>() / 7.0;
            assert!((series.get(i).unwrap() - naive).abs() < 1e-9);
        }
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&[1.0], 4).unwrap();
        assert_eq!(series.indicator_type, IndicatorType::Sma(4));
    }
}
