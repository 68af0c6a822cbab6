use std::time::Instant;

use time::Date;

use crate::domain::dates::{date_from_epoch_days, days_since_epoch};
use crate::{FitError, TimeSeriesPoint};

use super::config::{ForecastConfig, Seasonality};
use super::features::{self, design_row, place_changepoints, Layout, OFFSET, SLOPE};
use super::result::{Decomposition, ForecastPoint, ForecastResult, ProfilePoint, SeasonalProfile};
use super::solver::{Gram, Penalty};
use super::uncertainty::{self, SamplingPlan};

const MIN_POINTS: usize = 2;
const MAX_NOISE_ROUNDS: usize = 25;
const SIGMA2_FLOOR: f64 = 1e-6;
const TREND_PRIOR_SCALE: f64 = 5.0;
// 2017-01-01, a Sunday.
const PROFILE_ANCHOR_DAY: f64 = 17_167.0;
const DAILY_PROFILE_STEPS: usize = 96;

/// Unfitted additive model: piecewise-linear trend plus Fourier seasonalities.
#[derive(Debug, Clone, Default)]
pub struct AdditiveModel {
    config: ForecastConfig,
}

impl AdditiveModel {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fit on every finite point of `history`.
    pub fn fit(&self, history: &[TimeSeriesPoint]) -> Result<FittedModel, FitError> {
        let started = Instant::now();
        let mut points: Vec<TimeSeriesPoint> =
            history.iter().filter(|point| point.y.is_finite()).copied().collect();
        if points.len() < MIN_POINTS {
            return Err(FitError::InsufficientData {
                found: points.len(),
                required: MIN_POINTS,
            });
        }
        points.sort_by_key(|point| point.ds);

        let days: Vec<f64> = points.iter().map(|point| days_since_epoch(point.ds) as f64).collect();
        let start_day = days[0];
        let span_days = days[days.len() - 1] - start_day;
        if span_days <= 0.0 {
            return Err(FitError::DegenerateSpan);
        }

        let y_scale = match points.iter().map(|point| point.y.abs()).fold(0.0, f64::max) {
            max if max > 0.0 => max,
            _ => 1.0,
        };
        let y: Vec<f64> = points.iter().map(|point| point.y / y_scale).collect();
        let t: Vec<f64> = days.iter().map(|day| (day - start_day) / span_days).collect();

        let min_spacing = days
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|gap| *gap > 0.0)
            .fold(f64::INFINITY, f64::min);
        let seasonalities = self.config.active_seasonalities(span_days, min_spacing);
        let changepoints = place_changepoints(&t, self.config.n_changepoints, self.config.changepoint_range);
        let layout = Layout::new(changepoints.len(), &seasonalities);

        let mut gram = Gram::new(layout.width);
        let mut row = vec![0.0; layout.width];
        for ((&ti, &day), &yi) in t.iter().zip(&days).zip(&y) {
            design_row(ti, day, &layout, &changepoints, &mut row);
            gram.add_row(&row, yi);
        }
        gram.finish();

        let mut beta = vec![0.0; layout.width];
        beta[SLOPE] = y[y.len() - 1] - y[0];
        beta[OFFSET] = y[0];

        let mean = y.iter().sum::<f64>() / y.len() as f64;
        let mut sigma2 = (y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / y.len() as f64)
            .max(SIGMA2_FLOOR);
        let mut sweeps = 0;

        for _ in 0..MAX_NOISE_ROUNDS {
            let penalties = self.penalties(&layout, sigma2);
            sweeps += gram.descend(&penalties, &mut beta);

            let updated = (gram.residual_sum_of_squares(&beta) / gram.rows() as f64).max(SIGMA2_FLOOR);
            let settled = (updated - sigma2).abs() <= 1e-6 * sigma2;
            sigma2 = updated;
            if settled {
                break;
            }
        }

        if beta.iter().any(|value| !value.is_finite()) || !sigma2.is_finite() {
            return Err(FitError::NonFinite);
        }

        tracing::debug!(
            rows = points.len(),
            changepoints = changepoints.len(),
            seasonalities = seasonalities.len(),
            sweeps,
            sigma = sigma2.sqrt() * y_scale,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "additive model fitted"
        );

        Ok(FittedModel {
            config: self.config.clone(),
            history: points,
            start_day,
            span_days,
            y_scale,
            layout,
            changepoints,
            beta,
            sigma: sigma2.sqrt(),
        })
    }

    fn penalties(&self, layout: &Layout, sigma2: f64) -> Vec<Penalty> {
        let mut penalties = vec![Penalty::ridge(0.0); layout.width];
        let trend = Penalty::ridge(sigma2 / TREND_PRIOR_SCALE.powi(2));
        penalties[SLOPE] = trend;
        penalties[OFFSET] = trend;

        let delta = Penalty::lasso(sigma2 / self.config.changepoint_prior_scale);
        for penalty in &mut penalties[layout.deltas.clone()] {
            *penalty = delta;
        }

        let seasonal = Penalty::ridge(sigma2 / self.config.seasonality_prior_scale.powi(2));
        for (_, range) in &layout.seasonal {
            for penalty in &mut penalties[range.clone()] {
                *penalty = seasonal;
            }
        }
        penalties
    }
}

/// Fitted parameters plus the history they were fitted on.
#[derive(Debug, Clone)]
pub struct FittedModel {
    config: ForecastConfig,
    history: Vec<TimeSeriesPoint>,
    start_day: f64,
    span_days: f64,
    y_scale: f64,
    layout: Layout,
    changepoints: Vec<f64>,
    beta: Vec<f64>,
    sigma: f64,
}

impl FittedModel {
    pub fn history(&self) -> &[TimeSeriesPoint] {
        &self.history
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn seasonalities(&self) -> Vec<Seasonality> {
        self.layout.seasonal.iter().map(|(seasonality, _)| *seasonality).collect()
    }

    /// Changepoint locations mapped back to calendar dates.
    pub fn changepoint_dates(&self) -> Vec<Date> {
        self.changepoints
            .iter()
            .filter_map(|t| date_from_epoch_days((self.start_day + t * self.span_days).round() as i64))
            .collect()
    }

    /// Observation noise in price units.
    pub fn noise_std(&self) -> f64 {
        self.sigma * self.y_scale
    }

    /// History dates followed by `horizon` contiguous calendar days.
    pub fn make_future_dates(&self, horizon: u32) -> Result<Vec<Date>, FitError> {
        if horizon == 0 {
            return Err(FitError::InvalidHorizon);
        }

        let last_day = self.start_day + self.span_days;
        let mut dates: Vec<Date> = self.history.iter().map(|point| point.ds).collect();
        for step in 1..=i64::from(horizon) {
            let date = date_from_epoch_days(last_day as i64 + step).ok_or(FitError::InvalidHorizon)?;
            dates.push(date);
        }
        Ok(dates)
    }

    /// Point forecasts and uncertainty bounds for arbitrary dates.
    pub fn predict(&self, dates: &[Date]) -> Result<Vec<ForecastPoint>, FitError> {
        let mut t = Vec::with_capacity(dates.len());
        let mut trend = Vec::with_capacity(dates.len());
        let mut yhat = Vec::with_capacity(dates.len());

        for date in dates {
            let day = days_since_epoch(*date) as f64;
            let ti = (day - self.start_day) / self.span_days;
            let trend_value = self.trend_at(ti);
            let seasonal: f64 = self
                .layout
                .seasonal
                .iter()
                .map(|(seasonality, _)| self.seasonal_at(day, seasonality))
                .sum();
            t.push(ti);
            trend.push(trend_value);
            yhat.push(trend_value + seasonal);
        }

        let bounds = uncertainty::intervals(&self.sampling_plan(), &t, &yhat)?;

        let points: Vec<ForecastPoint> = dates
            .iter()
            .zip(trend.iter().zip(&yhat))
            .zip(bounds)
            .map(|((ds, (trend, yhat)), (lower, upper))| ForecastPoint {
                ds: *ds,
                yhat: yhat * self.y_scale,
                yhat_lower: lower * self.y_scale,
                yhat_upper: upper * self.y_scale,
                trend: trend * self.y_scale,
            })
            .collect();

        if points
            .iter()
            .any(|point| !(point.yhat.is_finite() && point.yhat_lower.is_finite() && point.yhat_upper.is_finite()))
        {
            return Err(FitError::NonFinite);
        }
        Ok(points)
    }

    /// Predict over the history plus `horizon` calendar days.
    pub fn forecast(&self, horizon: u32) -> Result<ForecastResult, FitError> {
        let dates = self.make_future_dates(horizon)?;
        let points = self.predict(&dates)?;
        Ok(ForecastResult::new(points, self.history.len()))
    }

    /// Data for the component chart of `forecast`.
    pub fn decomposition(&self, forecast: &ForecastResult) -> Decomposition {
        let seasonal = self
            .layout
            .seasonal
            .iter()
            .map(|(seasonality, _)| self.profile(seasonality))
            .collect();

        Decomposition {
            forecast: forecast.points().to_vec(),
            history: self.history.clone(),
            changepoints: self.changepoint_dates(),
            seasonal,
        }
    }

    fn trend_at(&self, t: f64) -> f64 {
        features::piecewise_linear(
            t,
            self.beta[SLOPE],
            self.beta[OFFSET],
            &self.beta[self.layout.deltas.clone()],
            &self.changepoints,
        )
    }

    fn seasonal_at(&self, day: f64, seasonality: &Seasonality) -> f64 {
        let Some((_, range)) = self
            .layout
            .seasonal
            .iter()
            .find(|(candidate, _)| candidate.name == seasonality.name)
        else {
            return 0.0;
        };

        let mut terms = vec![0.0; range.len()];
        features::fourier_terms(day, seasonality, &mut terms);
        terms
            .iter()
            .zip(&self.beta[range.clone()])
            .map(|(term, coefficient)| term * coefficient)
            .sum()
    }

    fn profile(&self, seasonality: &Seasonality) -> SeasonalProfile {
        let steps = if seasonality.period <= 1.0 {
            DAILY_PROFILE_STEPS
        } else {
            seasonality.period.floor() as usize
        };
        let step = seasonality.period / steps as f64;

        let points = (0..steps)
            .map(|i| {
                let offset = i as f64 * step;
                ProfilePoint {
                    offset,
                    value: self.seasonal_at(PROFILE_ANCHOR_DAY + offset, seasonality) * self.y_scale,
                }
            })
            .collect();

        SeasonalProfile {
            seasonality: *seasonality,
            points,
        }
    }

    fn sampling_plan(&self) -> SamplingPlan {
        let deltas = &self.beta[self.layout.deltas.clone()];
        let mean_abs_delta = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|delta| delta.abs()).sum::<f64>() / deltas.len() as f64
        };

        SamplingPlan {
            samples: self.config.uncertainty_samples,
            interval_width: self.config.interval_width,
            seed: self.config.seed,
            sigma: self.sigma,
            n_changepoints: self.changepoints.len(),
            mean_abs_delta,
        }
    }
}
