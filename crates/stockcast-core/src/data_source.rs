//! Price-source trait and request/error types.
//!
//! A [`PriceSource`] answers one question: the daily bars of a qualified
//! ticker inside a date window. An empty answer is not an error at this
//! layer; the loader decides what "no data" means.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`crate::adapters::YahooChartSource`] | Yahoo chart API over [`crate::http_client::HttpClient`] |
//! | [`crate::adapters::SyntheticSource`] | Deterministic offline generator |
//! | [`crate::adapters::StaticSource`] | Fixed bar list (tests, CSV replay) |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::domain::dates::format_date;
use crate::PriceBar;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error; `retryable` drives [`crate::retry::RetryConfig::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    /// Same classification, but never retried.
    pub fn terminal(mut self) -> Self {
        self.retryable = false;
        self
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Daily-history request for one qualified ticker over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub ticker: String,
    pub start: Date,
    pub end: Date,
}

impl HistoryRequest {
    pub fn new(ticker: impl Into<String>, start: Date, end: Date) -> Result<Self, SourceError> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(SourceError::invalid_request(
                "history request must include a ticker",
            ));
        }
        if start >= end {
            return Err(SourceError::invalid_request(format!(
                "history window start {} must precede end {}",
                format_date(start),
                format_date(end)
            )));
        }
        Ok(Self { ticker, start, end })
    }
}

/// Market-data provider contract.
pub trait PriceSource: Send + Sync {
    /// Stable identifier used in logs and run reports.
    fn id(&self) -> &'static str;

    /// Daily bars for `req.ticker`, ascending or not; possibly empty.
    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, SourceError>> + Send + 'a>>;
}
