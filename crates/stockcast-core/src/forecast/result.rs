use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::dates::iso_date;
use crate::TimeSeriesPoint;

use super::config::Seasonality;

/// One predicted date.
///
/// `yhat_lower <= yhat <= yhat_upper` holds for every point the model emits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(with = "iso_date")]
    pub ds: Date,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
}

/// Predictions over the full history followed by the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    history_len: usize,
}

impl ForecastResult {
    pub(crate) fn new(points: Vec<ForecastPoint>, history_len: usize) -> Self {
        Self {
            points,
            history_len,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of leading points that fall on observed dates.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Points past the last observed date.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len.min(self.points.len())..]
    }

    /// Last `n` points, or all of them when fewer exist.
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        &self.points[self.points.len().saturating_sub(n)..]
    }
}

/// One value of a seasonal profile, `offset` days into its period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub offset: f64,
    pub value: f64,
}

/// Seasonal component over one period, in price units.
///
/// Weekly profiles start on a Sunday, yearly ones on January 1st and daily
/// ones at midnight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalProfile {
    pub seasonality: Seasonality,
    pub points: Vec<ProfilePoint>,
}

/// Everything the forecast chart draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    pub forecast: Vec<ForecastPoint>,
    pub history: Vec<TimeSeriesPoint>,
    #[serde(with = "iso_date_vec")]
    pub changepoints: Vec<Date>,
    pub seasonal: Vec<SeasonalProfile>,
}

mod iso_date_vec {
    use serde::ser::SerializeSeq;
    use serde::Serializer;
    use time::Date;

    use crate::domain::dates::format_date;

    pub fn serialize<S: Serializer>(dates: &[Date], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(dates.len()))?;
        for date in dates {
            seq.serialize_element(&format_date(*date))?;
        }
        seq.end()
    }
}
