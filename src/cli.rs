//! CLI definition and dispatch.
//!
//! Results go to stdout as pretty JSON (or to `-o FILE`); progress and errors go
//! to stderr. Settings resolve as flag, then config file, then built-in default.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::BacktestConfig;
use crate::domain::config_validation::{
    validate_backtest_config, validate_options_config, validate_sample_config,
};
use crate::domain::date_range::resolve_date_range;
use crate::domain::error::QuantError;
use crate::domain::options::{
    DEFAULT_STEPS, OptionContract, OptionType, calculate_greeks, price_american_option,
};
use crate::domain::pipeline::{StrategyRun, run_strategy};
use crate::domain::prices::parse_price_list;
use crate::domain::sampling::{SampleConfig, sample_price_series};
use crate::domain::strategy::{Params, StrategyKind, list_strategies, strategy_schema};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

pub const DEFAULT_MAX_STEPS: usize = 1000;
pub const DEFAULT_DATA_DIR: &str = "data";
/// Window used for `--ticker` when neither a start date nor a range is given.
pub const DEFAULT_RANGE: &str = "1y";

#[derive(Parser, Debug)]
#[command(
    name = "quantkit",
    about = "Long/flat strategy backtester and American option pricer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog strategies and their default parameters
    List,
    /// Show the parameter schema of one strategy
    Schema { name: String },
    /// List tickers available in a CSV data directory
    Tickers {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Generate a synthetic price series
    Sample(SampleArgs),
    /// Run a strategy over a price series
    Backtest(BacktestArgs),
    /// Price an American option on a binomial lattice
    PriceOption(OptionArgs),
    /// Estimate Greeks for an American option
    Greeks(OptionArgs),
}

#[derive(Args, Debug, Default)]
pub struct SampleArgs {
    #[arg(long)]
    pub length: Option<usize>,
    #[arg(long)]
    pub start: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub drift: Option<f64>,
    #[arg(long)]
    pub vol: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Draw a fresh seed instead of the configured one
    #[arg(long, conflicts_with = "seed")]
    pub random: bool,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct BacktestArgs {
    #[arg(short, long)]
    pub strategy: Option<String>,
    /// Parameter overrides as a JSON object, e.g. '{"fast_window": 5}'
    #[arg(long)]
    pub params: Option<String>,
    /// Comma or whitespace separated prices
    #[arg(long, conflicts_with_all = ["ticker", "sample_length"])]
    pub prices: Option<String>,
    #[arg(long, conflicts_with = "sample_length")]
    pub ticker: Option<String>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long, requires = "ticker")]
    pub start_date: Option<String>,
    #[arg(long, requires = "ticker")]
    pub end_date: Option<String>,
    #[arg(long, requires = "ticker")]
    pub range: Option<String>,
    /// Length of the synthetic series used when no prices or ticker are given
    #[arg(long)]
    pub sample_length: Option<usize>,
    #[arg(long)]
    pub start_cash: Option<f64>,
    #[arg(long)]
    pub fee_bps: Option<f64>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OptionArgs {
    #[arg(long)]
    pub spot: f64,
    #[arg(long)]
    pub strike: f64,
    /// Years to expiry
    #[arg(long)]
    pub expiry: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub rate: f64,
    #[arg(long)]
    pub volatility: f64,
    /// call or put
    #[arg(long = "type")]
    pub option_type: String,
    #[arg(long)]
    pub dividend_yield: Option<f64>,
    #[arg(long)]
    pub steps: Option<usize>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::List => emit(&list_strategies(), None),
        Command::Schema { name } => strategy_schema(&name).and_then(|spec| emit(&spec, None)),
        Command::Tickers { data_dir, config } => run_tickers(data_dir.as_ref(), config.as_ref()),
        Command::Sample(args) => run_sample(&args),
        Command::Backtest(args) => run_backtest(&args),
        Command::PriceOption(args) => run_price_option(&args),
        Command::Greeks(args) => run_greeks(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load an INI file, or an empty config when no path was given.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, QuantError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Print `value` as pretty JSON on stdout, or write it to `output`.
pub fn emit<T: Serialize + ?Sized>(value: &T, output: Option<&PathBuf>) -> Result<(), QuantError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")?;
            eprintln!("Output written to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    start_cash: Option<f64>,
    fee_bps: Option<f64>,
) -> BacktestConfig {
    let defaults = BacktestConfig::default();
    BacktestConfig {
        start_cash: start_cash
            .unwrap_or_else(|| adapter.get_double("backtest", "start_cash", defaults.start_cash)),
        fee_bps: fee_bps
            .unwrap_or_else(|| adapter.get_double("backtest", "fee_bps", defaults.fee_bps)),
    }
}

pub fn build_sample_config(adapter: &dyn ConfigPort, args: &SampleArgs) -> SampleConfig {
    let defaults = SampleConfig::default();
    let configured_length = usize::try_from(adapter.get_int(
        "sample",
        "length",
        defaults.length as i64,
    ))
    .unwrap_or(defaults.length);

    let seed = if args.random {
        None
    } else if args.seed.is_some() {
        args.seed
    } else {
        match adapter.get_string("sample", "seed") {
            Some(raw) if raw.trim().eq_ignore_ascii_case("none") => None,
            Some(raw) => raw.trim().parse().ok().or(defaults.seed),
            None => defaults.seed,
        }
    };

    SampleConfig {
        length: args.length.unwrap_or(configured_length),
        start: args
            .start
            .unwrap_or_else(|| adapter.get_double("sample", "start", defaults.start)),
        drift: args
            .drift
            .unwrap_or_else(|| adapter.get_double("sample", "drift", defaults.drift)),
        vol: args
            .vol
            .unwrap_or_else(|| adapter.get_double("sample", "vol", defaults.vol)),
        seed,
    }
}

/// Build the contract from flags and `[options]`, enforcing the step ceiling.
pub fn build_option_contract(
    adapter: &dyn ConfigPort,
    args: &OptionArgs,
) -> Result<OptionContract, QuantError> {
    let option_type: OptionType = args.option_type.parse()?;
    let max_steps = usize::try_from(adapter.get_int(
        "options",
        "max_steps",
        DEFAULT_MAX_STEPS as i64,
    ))
    .unwrap_or(DEFAULT_MAX_STEPS);
    let steps = match args.steps {
        Some(steps) => steps,
        None => usize::try_from(adapter.get_int("options", "steps", DEFAULT_STEPS as i64))
            .unwrap_or(DEFAULT_STEPS),
    };
    if steps > max_steps {
        return Err(QuantError::InvalidContract {
            reason: format!("steps {steps} exceeds the configured maximum of {max_steps}"),
        });
    }
    let dividend_yield = args
        .dividend_yield
        .unwrap_or_else(|| adapter.get_double("options", "dividend_yield", 0.0));

    Ok(OptionContract::new(
        args.spot,
        args.strike,
        args.expiry,
        args.rate,
        args.volatility,
        option_type,
    )
    .with_dividend_yield(dividend_yield)
    .with_steps(steps))
}

/// Parse `--params` JSON into numeric overrides.
pub fn parse_params(text: &str) -> Result<Params, QuantError> {
    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)
        .map_err(|e| QuantError::InvalidInput {
            reason: format!("params must be a JSON object: {e}"),
        })?;
    raw.into_iter()
        .map(|(key, value)| match value.as_f64() {
            Some(number) => Ok((key, number)),
            None => Err(QuantError::InvalidInput {
                reason: format!("param {key} must be a number, got {value}"),
            }),
        })
        .collect()
}

/// Strategy name from the flag, then `[backtest] strategy`, then the first catalog entry.
pub fn resolve_strategy_name(adapter: &dyn ConfigPort, flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| {
            adapter
                .get_string("backtest", "strategy")
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| StrategyKind::ALL[0].name().to_string())
}

pub fn data_dir(adapter: &dyn ConfigPort, flag: Option<&PathBuf>) -> PathBuf {
    flag.cloned()
        .or_else(|| adapter.get_string("data", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Raw prices for a backtest: `--prices`, else `--ticker`, else a synthetic series.
pub fn load_prices(
    args: &BacktestArgs,
    adapter: &dyn ConfigPort,
    port: &dyn PricePort,
    today: NaiveDate,
) -> Result<Vec<f64>, QuantError> {
    if let Some(text) = &args.prices {
        eprintln!("Using prices from the command line");
        return parse_price_list(text);
    }
    if let Some(ticker) = &args.ticker {
        let range = match (&args.start_date, &args.range) {
            (None, None) => Some(DEFAULT_RANGE),
            (_, range) => range.as_deref(),
        };
        let window = resolve_date_range(
            args.start_date.as_deref(),
            args.end_date.as_deref(),
            range,
            today,
        )?;
        eprintln!("Fetching {} closes from {} to {}", ticker, window.start, window.end);
        return port.fetch_closes(ticker, window.start, window.end);
    }

    validate_sample_config(adapter)?;
    let mut sample = build_sample_config(adapter, &SampleArgs::default());
    if let Some(length) = args.sample_length {
        sample.length = length;
    }
    eprintln!(
        "Generating {} synthetic prices (seed {})",
        sample.length,
        sample
            .seed
            .map_or_else(|| "random".to_string(), |seed| seed.to_string())
    );
    sample_price_series(&sample)
}

/// Stages after config: prices, params, pipeline, summary, output.
pub fn run_backtest_pipeline(
    args: &BacktestArgs,
    adapter: &dyn ConfigPort,
    port: &dyn PricePort,
    today: NaiveDate,
) -> Result<StrategyRun, QuantError> {
    let config = build_backtest_config(adapter, args.start_cash, args.fee_bps);
    config.validate()?;

    let strategy = resolve_strategy_name(adapter, args.strategy.as_deref());
    let params = args.params.as_deref().map(parse_params).transpose()?;
    let raw = load_prices(args, adapter, port, today)?;

    eprintln!(
        "Running backtest: {} over {} prices, start cash {:.2}, fee {} bps",
        strategy,
        raw.len(),
        config.start_cash,
        config.fee_bps
    );
    run_strategy(raw, &strategy, params.as_ref(), &config)
}

fn print_summary(run: &StrategyRun) {
    let Some(metrics) = run.backtest.metrics else {
        return;
    };
    let final_equity = run.backtest.equity_curve.last().copied().unwrap_or_default();
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Final Equity:     {:.2}", final_equity);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("CAGR:             {:.2}%", metrics.cagr * 100.0);
    eprintln!("Volatility:       {:.2}%", metrics.volatility * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", run.backtest.trades.len());
}

fn run_backtest(args: &BacktestArgs) -> Result<(), QuantError> {
    let adapter = load_config(args.config.as_ref())?;
    validate_backtest_config(&adapter)?;

    let port = CsvPriceAdapter::new(data_dir(&adapter, args.data_dir.as_ref()));
    let today = Local::now().date_naive();
    let run = run_backtest_pipeline(args, &adapter, &port, today)?;

    print_summary(&run);
    emit(&run, args.output.as_ref())
}

fn run_tickers(flag: Option<&PathBuf>, config: Option<&PathBuf>) -> Result<(), QuantError> {
    let adapter = load_config(config)?;
    let dir = data_dir(&adapter, flag);
    eprintln!("Scanning {}", dir.display());
    let tickers = CsvPriceAdapter::new(dir).list_tickers()?;
    emit(&tickers, None)
}

fn run_sample(args: &SampleArgs) -> Result<(), QuantError> {
    let adapter = load_config(args.config.as_ref())?;
    validate_sample_config(&adapter)?;
    let sample = build_sample_config(&adapter, args);
    let prices = sample_price_series(&sample)?;
    eprintln!("Generated {} prices", prices.len());
    emit(&prices, args.output.as_ref())
}

fn option_contract(args: &OptionArgs) -> Result<OptionContract, QuantError> {
    let adapter = load_config(args.config.as_ref())?;
    validate_options_config(&adapter)?;
    let contract = build_option_contract(&adapter, args)?;
    eprintln!(
        "Pricing {} S={} K={} T={} r={} sigma={} q={} on {} steps",
        contract.option_type,
        contract.spot,
        contract.strike,
        contract.expiry,
        contract.rate,
        contract.volatility,
        contract.dividend_yield,
        contract.steps
    );
    Ok(contract)
}

fn run_price_option(args: &OptionArgs) -> Result<(), QuantError> {
    let contract = option_contract(args)?;
    let quote = price_american_option(&contract)?;
    emit(&quote, args.output.as_ref())
}

fn run_greeks(args: &OptionArgs) -> Result<(), QuantError> {
    let contract = option_contract(args)?;
    let greeks = calculate_greeks(&contract)?;
    emit(&greeks, args.output.as_ref())
}

