use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::Date;

use crate::domain::dates::{format_date, iso_date};
use crate::{PriceSeries, RoiError};

/// Percentage change between the first and last close of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiSummary {
    pub ticker: String,
    pub roi_percent: f64,
    #[serde(with = "iso_date")]
    pub first_date: Date,
    #[serde(with = "iso_date")]
    pub last_date: Date,
    pub first_close: f64,
    pub last_close: f64,
}

impl RoiSummary {
    /// `(close[last] - close[first]) / close[first] * 100`.
    pub fn compute(ticker: &str, series: &PriceSeries) -> Result<Self, RoiError> {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return Err(RoiError::EmptySeries);
        };

        if first.close == 0.0 {
            return Err(RoiError::DivideByZero {
                date: format_date(first.date),
            });
        }

        Ok(Self {
            ticker: ticker.to_owned(),
            roi_percent: (last.close - first.close) / first.close * 100.0,
            first_date: first.date,
            last_date: last.date,
            first_close: first.close,
            last_close: last.close,
        })
    }
}

impl Display for RoiSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ROI for {}: {:.2}% from {} to {}",
            self.ticker,
            self.roi_percent,
            format_date(self.first_date),
            format_date(self.last_date)
        )
    }
}
