use crate::forecast::{Decomposition, FittedModel, ForecastPoint, ForecastResult};
use crate::{PriceSeries, ResolvedTicker, TimeSeriesPoint};

/// Close-price line of the raw history.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl TrendView {
    pub fn new(resolved: &ResolvedTicker, series: &PriceSeries) -> Self {
        Self {
            title: format!("{} Price Trend", resolved.ticker),
            x_label: "Date",
            y_label: format!("Close Price ({})", resolved.currency),
            points: series.to_time_series(),
        }
    }
}

/// Forecast band, history and component profiles of a fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: String,
    pub decomposition: Decomposition,
}

impl ForecastView {
    pub fn new(resolved: &ResolvedTicker, model: &FittedModel, forecast: &ForecastResult) -> Self {
        Self {
            title: format!("{} Stock Price Forecast", resolved.ticker),
            x_label: "Date",
            y_label: format!("{} Stock Price ({})", resolved.ticker, resolved.currency),
            decomposition: model.decomposition(forecast),
        }
    }
}

/// Actual closes against the predicted band.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceView {
    pub title: String,
    pub interactive_title: String,
    pub x_label: &'static str,
    pub y_label: String,
    pub actual: Vec<TimeSeriesPoint>,
    pub predicted: Vec<ForecastPoint>,
}

impl VarianceView {
    pub fn new(resolved: &ResolvedTicker, series: &PriceSeries, forecast: &ForecastResult) -> Self {
        Self {
            title: format!("{} Stock Price with Prediction Variance", resolved.ticker),
            interactive_title: format!("{} Forecast (interactive)", resolved.ticker),
            x_label: "Date",
            y_label: format!("{} Price ({})", resolved.ticker, resolved.currency),
            actual: series.to_time_series(),
            predicted: forecast.points().to_vec(),
        }
    }
}
