//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n values are undefined (need n price changes for the seed).

use crate::domain::error::QuantError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, check_window};

pub fn calculate_rsi(prices: &[f64], period: usize) -> Result<IndicatorSeries, QuantError> {
    check_window(period)?;

    let mut values = vec![None; prices.len()];
    if prices.len() < period + 1 {
        return Ok(IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        });
    }

    let (mut avg_gain, mut avg_loss) = prices[..=period]
        .windows(2)
        .map(|w| split_change(w[1] - w[0]))
        .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    values[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    let smoothing = (period - 1) as f64;
    for i in period + 1..prices.len() {
        let (gain, loss) = split_change(prices[i] - prices[i - 1]);
        avg_gain = (avg_gain * smoothing + gain) / period as f64;
        avg_loss = (avg_loss * smoothing + loss) / period as f64;
        values[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    })
}

fn split_change(change: f64) -> (f64, f64) {
    (change.max(0.0), (-change).max(0.0))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_prices() {
        let series = calculate_rsi(&[], 14).unwrap();
        assert_eq!(series.values.len(), 0);
    }

    #[test]
    fn rsi_too_short_is_all_undefined() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        assert_eq!(series.values.len(), 14);
        assert!(series.values.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&prices, 14).unwrap();

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert!(series.values[i].is_none(), "index {} should be undefined", i);
        }
        assert!(series.values[14].is_some(), "index 14 should be defined");
    }

    #[test]
    fn rsi_all_gains_saturates_at_100() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        for i in 14..20 {
            assert!((series.get(i).unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn rsi_flat_prices_saturate_at_100() {
        let series = calculate_rsi(&[50.0; 10], 3).unwrap();
        assert_eq!(series.get(3), Some(100.0));
        assert_eq!(series.get(9), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        assert!(series.get(14).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        for value in series.values.iter().flatten() {
            assert!((0.0..=100.0).contains(value), "RSI {} out of range", value);
        }
    }

    #[test]
    fn rsi_known_calculation() {
        // window 2: changes +2, -1 seed avg_gain=1.0 avg_loss=0.5 -> RSI 66.67
        // next change +1: avg_gain=(1.0+1)/2=1.0, avg_loss=(0.5+0)/2=0.25 -> RSI 80
        let series = calculate_rsi(&[10.0, 12.0, 11.0, 12.0], 2).unwrap();
        assert_eq!(series.values[0], None);
        assert_eq!(series.values[1], None);
        assert!((series.get(2).unwrap() - 200.0 / 3.0).abs() < 1e-9);
        assert!((series.get(3).unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_zero_period() {
        let err = calculate_rsi(&[100.0, 101.0], 0).unwrap_err();
        assert!(matches!(err, QuantError::InvalidParameter { .. }));
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&[100.0], 14).unwrap();
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }
}
