//! quantkit: long/flat strategy backtesting and binomial option pricing.
//!
//! Hexagonal architecture: pure numeric logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], and the command-line
//! front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
