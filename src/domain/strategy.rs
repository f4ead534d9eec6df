//! Strategy catalog and parameter resolution.
//!
//! The catalog is closed: each [`StrategyKind`] has a fixed parameter schema and
//! default values, and [`Strategy`] carries the resolved, validated parameters
//! for one run.

use crate::domain::error::QuantError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Parameter overrides keyed by parameter name.
pub type Params = BTreeMap<String, f64>;

/// Immutable catalog entry: name, description and default parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySpec {
    pub name: String,
    pub description: String,
    pub params: Params,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    SmaCrossover,
    RsiReversion,
    ChannelBreakout,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::SmaCrossover,
        StrategyKind::RsiReversion,
        StrategyKind::ChannelBreakout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::SmaCrossover => "sma_crossover",
            StrategyKind::RsiReversion => "rsi_reversion",
            StrategyKind::ChannelBreakout => "channel_breakout",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::SmaCrossover => "Long when fast SMA is above slow SMA; flat otherwise.",
            StrategyKind::RsiReversion => {
                "Long when RSI drops below oversold; exit when above overbought."
            }
            StrategyKind::ChannelBreakout => {
                "Long on new highs; exit on new lows over a lookback channel."
            }
        }
    }

    pub fn default_params(self) -> &'static [(&'static str, f64)] {
        match self {
            StrategyKind::SmaCrossover => &[("fast_window", 10.0), ("slow_window", 30.0)],
            StrategyKind::RsiReversion => {
                &[("window", 14.0), ("oversold", 30.0), ("overbought", 70.0)]
            }
            StrategyKind::ChannelBreakout => &[("lookback", 20.0)],
        }
    }

    pub fn spec(self) -> StrategySpec {
        StrategySpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            params: self
                .default_params()
                .iter()
                .map(|&(key, value)| (key.to_string(), value))
                .collect(),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = QuantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| QuantError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

/// All catalog entries, in catalog order.
pub fn list_strategies() -> Vec<StrategySpec> {
    StrategyKind::ALL.into_iter().map(StrategyKind::spec).collect()
}

/// The catalog entry for one strategy name.
pub fn strategy_schema(name: &str) -> Result<StrategySpec, QuantError> {
    Ok(name.parse::<StrategyKind>()?.spec())
}

/// A strategy with resolved parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    SmaCrossover {
        fast_window: usize,
        slow_window: usize,
    },
    RsiReversion {
        window: usize,
        oversold: f64,
        overbought: f64,
    },
    ChannelBreakout {
        lookback: usize,
    },
}

impl Strategy {
    /// Merge `overrides` onto the defaults for `kind` and validate the result.
    ///
    /// Unknown override keys are ignored. Window-like parameters are truncated
    /// toward zero.
    pub fn resolve(kind: StrategyKind, overrides: Option<&Params>) -> Result<Self, QuantError> {
        let lookup = ParamLookup { kind, overrides };
        match kind {
            StrategyKind::SmaCrossover => {
                let fast = lookup.integer("fast_window")?;
                let slow = lookup.integer("slow_window")?;
                if fast >= slow {
                    return Err(QuantError::parameter(
                        "fast_window",
                        "fast_window must be smaller than slow_window",
                    ));
                }
                Ok(Strategy::SmaCrossover {
                    fast_window: positive_window("fast_window", fast)?,
                    slow_window: positive_window("slow_window", slow)?,
                })
            }
            StrategyKind::RsiReversion => {
                let window = lookup.integer("window")?;
                let oversold = lookup.number("oversold")?;
                let overbought = lookup.number("overbought")?;
                if oversold >= overbought {
                    return Err(QuantError::parameter(
                        "oversold",
                        "oversold must be less than overbought",
                    ));
                }
                Ok(Strategy::RsiReversion {
                    window: positive_window("window", window)?,
                    oversold,
                    overbought,
                })
            }
            StrategyKind::ChannelBreakout => {
                let lookback = lookup.integer("lookback")?;
                if lookback <= 1 {
                    return Err(QuantError::parameter(
                        "lookback",
                        "lookback must be greater than 1",
                    ));
                }
                Ok(Strategy::ChannelBreakout {
                    lookback: positive_window("lookback", lookback)?,
                })
            }
        }
    }

    /// Resolve by catalog name.
    pub fn from_name(name: &str, overrides: Option<&Params>) -> Result<Self, QuantError> {
        Strategy::resolve(name.parse()?, overrides)
    }
}

struct ParamLookup<'a> {
    kind: StrategyKind,
    overrides: Option<&'a Params>,
}

impl ParamLookup<'_> {
    fn number(&self, key: &str) -> Result<f64, QuantError> {
        let value = self
            .overrides
            .and_then(|params| params.get(key).copied())
            .or_else(|| {
                self.kind
                    .default_params()
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|&(_, value)| value)
            })
            .ok_or_else(|| QuantError::parameter(key, "missing parameter"))?;
        if !value.is_finite() {
            return Err(QuantError::parameter(key, "must be a finite number"));
        }
        Ok(value)
    }

    fn integer(&self, key: &str) -> Result<i64, QuantError> {
        Ok(self.number(key)?.trunc() as i64)
    }
}

fn positive_window(name: &str, value: i64) -> Result<usize, QuantError> {
    usize::try_from(value)
        .ok()
        .filter(|&window| window > 0)
        .ok_or_else(|| QuantError::parameter(name, "window must be positive"))
}
