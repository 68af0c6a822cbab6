//! # Stockcast Core
//!
//! Resolve a ticker on one of twelve exchanges, load its daily price
//! history, fit an additive forecast model to the closes and derive the
//! presentation data for charts, ROI and CSV exports.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Exchange table, tickers, price bars and series, run parameters |
//! | [`error`] | Stage error types |
//! | [`http_client`] | HTTP transport abstraction (reqwest or fake) |
//! | [`retry`] | Opt-in bounded retry with backoff |
//! | [`data_source`] | [`PriceSource`] trait and request/error types |
//! | [`adapters`] | Yahoo chart, synthetic and static sources |
//! | [`loader`] | [`DataLoader`], the "no data" gate |
//! | [`forecast`] | Additive model, uncertainty bands, decomposition |
//! | [`present`] | Views, ROI, forecast table, CSV exports |
//! | [`pipeline`] | [`Pipeline`], one full run |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockcast_core::{DataLoader, Pipeline, RunParameters, SyntheticSource};
//!
//! let params = RunParameters::new("USA", "AAPL", start, end, 91)?;
//! let pipeline = Pipeline::new(DataLoader::new(Arc::new(SyntheticSource)));
//! let output = pipeline.run(&params).await?;
//! println!("{}", output.roi?);
//! ```
//!
//! ## Error Handling
//!
//! Each stage returns its own error type; [`PipelineError`] aggregates the
//! ones that halt a run and exposes a stable [`PipelineError::code`]:
//!
//! ```rust
//! use stockcast_core::{resolve, PipelineError};
//!
//! let error = PipelineError::from(resolve("ATLANTIS", "AAPL").unwrap_err());
//! assert_eq!(error.code(), "run.unsupported_exchange");
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod http_client;
pub mod loader;
pub mod pipeline;
pub mod present;
pub mod retry;

// Adapter implementations
pub use adapters::{StaticSource, SyntheticSource, YahooChartSource};

// Data source trait and types
pub use data_source::{HistoryRequest, PriceSource, SourceError, SourceErrorKind};

// Domain models
pub use domain::{
    resolve, supported_countries, ExchangeEntry, PriceBar, PriceSeries, ResolvedTicker,
    RunParameters, Ticker, TimeSeriesPoint, DEFAULT_FORECAST_DAYS, EXCHANGES, MAX_FORECAST_DAYS,
    MIN_FORECAST_DAYS,
};

// Error types
pub use error::{
    ExportError, FitError, LoadError, PipelineError, RoiError, UnsupportedExchangeError,
    ValidationError,
};

// Forecast engine
pub use forecast::{
    forecast, AdditiveModel, Decomposition, FittedModel, ForecastConfig, ForecastPoint,
    ForecastResult,
};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};

// Loading and orchestration
pub use loader::DataLoader;
pub use pipeline::{Pipeline, RunOutput};

// Presentation
pub use present::{
    forecast_csv, price_csv, read_price_csv, ArtifactNames, ForecastTable, ForecastView,
    RoiSummary, TrendView, VarianceView,
};

// Retry logic
pub use retry::{Backoff, RetryConfig};
