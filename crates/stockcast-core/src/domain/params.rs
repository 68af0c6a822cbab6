use serde::{Deserialize, Serialize};
use time::Date;

use super::dates::{self, iso_date};
use super::Ticker;
use crate::ValidationError;

pub const DEFAULT_FORECAST_DAYS: u32 = 91;
pub const MIN_FORECAST_DAYS: u32 = 30;
pub const MAX_FORECAST_DAYS: u32 = 365;

/// Validated user configuration for one run.
///
/// The country is kept as typed (trimmed, uppercase); whether it names a
/// supported exchange is decided later by [`crate::domain::resolve`] so the
/// two failure modes stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    pub country: String,
    pub ticker: Ticker,
    #[serde(with = "iso_date")]
    pub start: Date,
    #[serde(with = "iso_date")]
    pub end: Date,
    pub forecast_days: u32,
}

impl RunParameters {
    pub fn new(
        country: &str,
        base_ticker: &str,
        start: Date,
        end: Date,
        forecast_days: u32,
    ) -> Result<Self, ValidationError> {
        let ticker = Ticker::parse(base_ticker)?;

        if start >= end {
            return Err(ValidationError::InvalidDateRange {
                start: dates::format_date(start),
                end: dates::format_date(end),
            });
        }

        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&forecast_days) {
            return Err(ValidationError::HorizonOutOfRange {
                days: forecast_days,
                min: MIN_FORECAST_DAYS,
                max: MAX_FORECAST_DAYS,
            });
        }

        Ok(Self {
            country: country.trim().to_uppercase(),
            ticker,
            start,
            end,
            forecast_days,
        })
    }
}
