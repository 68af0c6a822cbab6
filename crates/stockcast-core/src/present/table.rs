use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::dates::iso_date;
use crate::forecast::ForecastResult;

/// One displayed forecast row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    #[serde(with = "iso_date")]
    pub ds: Date,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Trailing window of a forecast, as shown and exported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    /// Last `n` rows of `forecast`; with the run horizon as `n` this is
    /// exactly the predicted future.
    pub fn tail(forecast: &ForecastResult, n: usize) -> Self {
        let rows = forecast
            .tail(n)
            .iter()
            .map(|point| ForecastRow {
                ds: point.ds,
                yhat: point.yhat,
                yhat_lower: point.yhat_lower,
                yhat_upper: point.yhat_upper,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
