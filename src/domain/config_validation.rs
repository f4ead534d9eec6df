//! Up-front validation of configuration values.
//!
//! Only keys that are present are checked; absent keys take built-in defaults
//! later. A present key that does not parse is an error rather than a silent
//! fallback.

use crate::domain::error::QuantError;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    if let Some(cash) = number(config, "backtest", "start_cash")? {
        ensure(cash > 0.0, "backtest", "start_cash", "start_cash must be positive")?;
    }
    if let Some(fee) = number(config, "backtest", "fee_bps")? {
        ensure(fee >= 0.0, "backtest", "fee_bps", "fee_bps must be non-negative")?;
    }
    if let Some(name) = config
        .get_string("backtest", "strategy")
        .filter(|name| !name.trim().is_empty())
    {
        if name.trim().parse::<StrategyKind>().is_err() {
            return Err(invalid(
                "backtest",
                "strategy",
                format!("unknown strategy '{}'", name.trim()),
            ));
        }
    }
    Ok(())
}

pub fn validate_sample_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    if let Some(length) = number(config, "sample", "length")? {
        ensure(
            length >= 1.0 && length.fract() == 0.0,
            "sample",
            "length",
            "length must be a positive integer",
        )?;
    }
    if let Some(start) = number(config, "sample", "start")? {
        ensure(start > 0.0, "sample", "start", "start must be positive")?;
    }
    number(config, "sample", "drift")?;
    if let Some(vol) = number(config, "sample", "vol")? {
        ensure(vol >= 0.0, "sample", "vol", "vol must be non-negative")?;
    }
    if let Some(seed) = config.get_string("sample", "seed") {
        let seed = seed.trim();
        if !seed.is_empty() && !seed.eq_ignore_ascii_case("none") && seed.parse::<u64>().is_err() {
            return Err(invalid(
                "sample",
                "seed",
                "seed must be a non-negative integer or 'none'",
            ));
        }
    }
    Ok(())
}

pub fn validate_options_config(config: &dyn ConfigPort) -> Result<(), QuantError> {
    let steps = number(config, "options", "steps")?;
    if let Some(steps) = steps {
        ensure(
            steps >= 1.0 && steps.fract() == 0.0,
            "options",
            "steps",
            "steps must be a positive integer",
        )?;
    }
    if let Some(q) = number(config, "options", "dividend_yield")? {
        ensure(q >= 0.0, "options", "dividend_yield", "dividend_yield must be non-negative")?;
    }
    if let Some(max_steps) = number(config, "options", "max_steps")? {
        ensure(
            max_steps >= 1.0 && max_steps.fract() == 0.0,
            "options",
            "max_steps",
            "max_steps must be a positive integer",
        )?;
        if let Some(steps) = steps {
            ensure(
                steps <= max_steps,
                "options",
                "steps",
                format!("steps must not exceed max_steps ({max_steps})"),
            )?;
        }
    }
    Ok(())
}

/// Parse a present key as a finite number.
fn number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<f64>, QuantError> {
    if !config.has(section, key) {
        return Ok(None);
    }
    let raw = config.get_string(section, key).unwrap_or_default();
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(invalid(section, key, format!("'{}' is not a number", raw.trim()))),
    }
}

fn ensure(
    condition: bool,
    section: &str,
    key: &str,
    reason: impl Into<String>,
) -> Result<(), QuantError> {
    if condition {
        Ok(())
    } else {
        Err(invalid(section, key, reason))
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> QuantError {
    QuantError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
