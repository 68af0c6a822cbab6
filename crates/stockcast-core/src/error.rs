use thiserror::Error;

use crate::data_source::SourceError;

/// Validation and contract errors exposed by `stockcast-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: String, end: String },
    #[error("forecast horizon {days} is outside the supported range {min}..={max}")]
    HorizonOutOfRange { days: u32, min: u32, max: u32 },
    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}

/// The selected country has no entry in the exchange table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("the stock exchange for '{country}' is not supported")]
pub struct UnsupportedExchangeError {
    pub country: String,
}

/// Retrieval failures surfaced by the data loader.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("no data found for ticker '{ticker}'")]
    NoData { ticker: String },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Reasons the additive model refuses to fit a series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("model requires at least {required} non-null points, found {found}")]
    InsufficientData { found: usize, required: usize },

    #[error("history spans a single date; the trend cannot be scaled")]
    DegenerateSpan,

    #[error("optimizer produced a non-finite estimate")]
    NonFinite,

    #[error("forecast horizon must be greater than zero")]
    InvalidHorizon,
}

/// Return-on-investment guard failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoiError {
    #[error("ROI requires at least one price record")]
    EmptySeries,

    #[error("first close price on {date} is zero; ROI is undefined")]
    DivideByZero { date: String },
}

/// CSV encoding/decoding failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv writer error: {0}")]
    Flush(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl<W> From<csv::IntoInnerError<W>> for ExportError {
    fn from(error: csv::IntoInnerError<W>) -> Self {
        Self::Flush(error.error().to_string())
    }
}

/// Top-level error for a full forecast run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnsupportedExchange(#[from] UnsupportedExchangeError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Fit(#[from] FitError),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "run.invalid_parameters",
            Self::UnsupportedExchange(_) => "run.unsupported_exchange",
            Self::Load(LoadError::NoData { .. }) => "run.no_data",
            Self::Load(LoadError::Source(error)) => error.code(),
            Self::Load(LoadError::Validation(_)) => "run.invalid_parameters",
            Self::Fit(_) => "run.fit_failed",
        }
    }
}
