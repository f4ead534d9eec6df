//! Price series cleaning and validation.
//!
//! Every raw sequence, whether it came from a CSV file, the command line or the
//! synthetic sampler, passes through [`validate_prices`] before any indicator or
//! simulation step sees it.

use crate::domain::error::QuantError;

/// Minimum number of usable prices after cleaning.
pub const MIN_PRICES: usize = 5;

/// Round half away from zero to `places` decimals.
pub fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A raw value that may or may not hold a usable price.
pub trait PriceCandidate {
    /// The numeric reading of this value, if it has one.
    fn as_price(&self) -> Option<f64>;
}

impl PriceCandidate for f64 {
    fn as_price(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl PriceCandidate for f32 {
    fn as_price(&self) -> Option<f64> {
        f64::from(*self).as_price()
    }
}

impl PriceCandidate for i64 {
    fn as_price(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl PriceCandidate for i32 {
    fn as_price(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl PriceCandidate for str {
    fn as_price(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()?.as_price()
    }
}

impl PriceCandidate for String {
    fn as_price(&self) -> Option<f64> {
        self.as_str().as_price()
    }
}

impl PriceCandidate for serde_json::Value {
    fn as_price(&self) -> Option<f64> {
        match self {
            serde_json::Value::Number(n) => n.as_f64()?.as_price(),
            serde_json::Value::String(s) => s.as_price(),
            _ => None,
        }
    }
}

impl<T: PriceCandidate> PriceCandidate for Option<T> {
    fn as_price(&self) -> Option<f64> {
        self.as_ref()?.as_price()
    }
}

impl<T: PriceCandidate + ?Sized> PriceCandidate for &T {
    fn as_price(&self) -> Option<f64> {
        (**self).as_price()
    }
}

/// Drop non-numeric and non-positive values, round survivors to cents.
///
/// Fails with [`QuantError::InvalidInput`] when fewer than [`MIN_PRICES`]
/// values survive.
pub fn validate_prices<I>(raw: I) -> Result<Vec<f64>, QuantError>
where
    I: IntoIterator,
    I::Item: PriceCandidate,
{
    let cleaned: Vec<f64> = raw
        .into_iter()
        .filter_map(|candidate| candidate.as_price())
        .filter(|&price| price > 0.0)
        .map(|price| round_dp(price, 2))
        .collect();

    if cleaned.len() < MIN_PRICES {
        return Err(QuantError::input(format!(
            "need at least {MIN_PRICES} positive price points, got {}",
            cleaned.len()
        )));
    }
    Ok(cleaned)
}

/// Parse a comma- or whitespace-separated list of prices.
pub fn parse_price_list(text: &str) -> Result<Vec<f64>, QuantError> {
    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty());
    validate_prices(tokens)
}
