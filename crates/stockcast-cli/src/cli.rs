//! CLI argument definitions for stockcast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Resolve, load, forecast and export one ticker |
//! | `exchanges` | List the supported exchanges |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--offline` | `false` | Use the synthetic price source |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--retries` | `0` | Retries for transient source failures |
//!
//! # Examples
//!
//! ```bash
//! # Forecast Apple for the default 91 days
//! stockcast run --ticker AAPL --pretty
//!
//! # Toyota on the Tokyo exchange, six months ahead, no network
//! stockcast --offline run --country JAPAN --ticker 7203 --forecast-days 180
//!
//! # Re-run on a previously exported history
//! stockcast run --ticker AAPL --from-csv AAPL_price_trend.csv --no-charts
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stockcast_core::DEFAULT_FORECAST_DAYS;

/// Stock price forecasting from daily closes.
///
/// Resolves a ticker on one of twelve exchanges, downloads its daily
/// history, fits an additive trend + seasonality model and exports
/// CSV files, charts and a JSON report.
#[derive(Debug, Parser)]
#[command(
    name = "stockcast",
    author,
    version,
    about = "Stock price forecasting from daily closes",
    long_about = "stockcast resolves a ticker on one of twelve exchanges, downloads its daily \
price history and forecasts the close with an additive trend and seasonality model.\n\
\n\
Each run exports the price history and forecast as CSV, trend, forecast and variance \
charts as PNG, and an interactive variance chart as HTML.\n\
\n\
Use 'stockcast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for the report.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Generate deterministic synthetic prices instead of calling Yahoo.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Retries for rate-limited or unavailable responses.
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast one ticker and export its artifacts.
    ///
    /// # Examples
    ///
    ///   stockcast run --ticker AAPL
    ///   stockcast run --country INDIA --ticker RELIANCE --forecast-days 365
    Run(RunArgs),

    /// List the supported exchanges with their ticker suffix and currency.
    Exchanges,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Exchange country (case-insensitive), e.g. USA, JAPAN, INDIA.
    #[arg(long, default_value = "USA")]
    pub country: String,

    /// Base ticker without exchange suffix.
    #[arg(long, default_value = "AAPL")]
    pub ticker: String,

    /// First date of the history, YYYY-MM-DD.
    #[arg(long, default_value = "2020-01-01")]
    pub start: String,

    /// End of the history (exclusive), YYYY-MM-DD. Defaults to today (UTC).
    #[arg(long)]
    pub end: Option<String>,

    /// Days to forecast past the last observed date (30..=365).
    #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
    pub forecast_days: u32,

    /// Directory receiving the exported files.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Read the history from a CSV export instead of a remote source.
    #[arg(long)]
    pub from_csv: Option<PathBuf>,

    /// Export CSV files only.
    #[arg(long, default_value_t = false)]
    pub no_charts: bool,

    /// Forecast rows echoed in the report.
    #[arg(long, default_value_t = 5)]
    pub tail_rows: usize,
}
