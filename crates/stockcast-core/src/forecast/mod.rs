//! # Forecast Engine
//!
//! Additive time-series model fitted to the closing-price series:
//!
//! ```text
//! y(t) = g(t) + s_yearly(t) + s_weekly(t) + s_daily(t) + noise
//! ```
//!
//! `g` is a piecewise-linear trend whose changepoints carry a Laplace prior
//! (scale `changepoint_prior_scale`), each `s` a Fourier series with a
//! Gaussian prior. Parameters are the maximum a posteriori estimate on scaled
//! data; uncertainty bands come from seeded simulation, so identical input
//! always yields identical output.
//!
//! | Module | Role |
//! |--------|------|
//! | `config` | [`ForecastConfig`] and the seasonality table |
//! | `features` | Design rows, changepoint placement |
//! | `solver` | Coordinate-descent MAP solver |
//! | `model` | [`AdditiveModel`] / [`FittedModel`] |
//! | `uncertainty` | Monte Carlo bands |
//! | `result` | [`ForecastResult`], [`Decomposition`] |

mod config;
mod features;
mod model;
mod result;
mod solver;
mod uncertainty;

pub use config::{ForecastConfig, Seasonality, SeasonalityMode, DAILY, WEEKLY, YEARLY};
pub use model::{AdditiveModel, FittedModel};
pub use result::{Decomposition, ForecastPoint, ForecastResult, ProfilePoint, SeasonalProfile};

use crate::{FitError, PriceSeries};

/// Fit the default model to the closes of `series` and predict `horizon_days`
/// beyond its last date.
pub fn forecast(series: &PriceSeries, horizon_days: u32) -> Result<(FittedModel, ForecastResult), FitError> {
    forecast_with(&ForecastConfig::default(), series, horizon_days)
}

pub fn forecast_with(
    config: &ForecastConfig,
    series: &PriceSeries,
    horizon_days: u32,
) -> Result<(FittedModel, ForecastResult), FitError> {
    if horizon_days == 0 {
        return Err(FitError::InvalidHorizon);
    }

    let model = AdditiveModel::new(config.clone()).fit(&series.to_time_series())?;
    let result = model.forecast(horizon_days)?;
    Ok((model, result))
}
