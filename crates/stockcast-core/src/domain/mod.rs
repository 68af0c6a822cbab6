//! # Domain Models
//!
//! Canonical domain types for a single stockcast run.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ExchangeEntry`] | One row of the fixed exchange table |
//! | [`ResolvedTicker`] | Exchange-qualified ticker plus currency |
//! | [`Ticker`] | Validated user-entered base ticker |
//! | [`PriceBar`] | Daily OHLCV record |
//! | [`PriceSeries`] | Ascending, one-bar-per-date daily history |
//! | [`TimeSeriesPoint`] | `(ds, y)` projection consumed by the forecast model |
//! | [`RunParameters`] | Validated user configuration for one run |
//!
//! Every type validates its invariants at construction time and is never
//! mutated afterwards; a run builds fresh instances of all of them.

pub mod dates;
mod exchange;
mod params;
mod series;
mod ticker;

pub use exchange::{resolve, supported_countries, ExchangeEntry, ResolvedTicker, EXCHANGES};
pub use params::{RunParameters, DEFAULT_FORECAST_DAYS, MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
pub use series::{PriceBar, PriceSeries, TimeSeriesPoint};
pub use ticker::Ticker;
