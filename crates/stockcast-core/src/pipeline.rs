//! One forecast run: resolve, load, forecast, derive.
//!
//! ```text
//! resolve ──▶ load ──┬──▶ trend view, ROI
//!                    └──▶ forecast ──▶ forecast view, variance view, table
//! ```
//!
//! A stage failure halts everything downstream of it. ROI is the exception:
//! it sits on its own branch, so its failure is reported in [`RunOutput::roi`]
//! without stopping the forecast.

use std::time::Instant;

use crate::forecast::{forecast_with, FittedModel, ForecastConfig, ForecastResult};
use crate::loader::DataLoader;
use crate::present::{ArtifactNames, ForecastTable, ForecastView, RoiSummary, TrendView, VarianceView};
use crate::{resolve, PipelineError, PriceSeries, ResolvedTicker, RoiError, RunParameters};

/// Stateless orchestrator; every call to [`Pipeline::run`] builds fresh values.
#[derive(Clone)]
pub struct Pipeline {
    loader: DataLoader,
    config: ForecastConfig,
}

impl Pipeline {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ForecastConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn run(&self, params: &RunParameters) -> Result<RunOutput, PipelineError> {
        let started = Instant::now();

        let resolved = resolve(&params.country, params.ticker.as_str())?;
        tracing::info!(
            country = resolved.country,
            ticker = %resolved.ticker,
            currency = resolved.currency,
            "ticker resolved"
        );

        let series = self
            .loader
            .load(&resolved.ticker, params.start, params.end)
            .await?;

        let roi = RoiSummary::compute(&resolved.ticker, &series);
        if let Err(error) = &roi {
            tracing::warn!(ticker = %resolved.ticker, error = %error, "roi undefined");
        }

        let fit_started = Instant::now();
        let (model, forecast) = forecast_with(&self.config, &series, params.forecast_days)?;
        tracing::info!(
            ticker = %resolved.ticker,
            rows = series.len(),
            horizon = params.forecast_days,
            points = forecast.len(),
            elapsed_ms = fit_started.elapsed().as_millis() as u64,
            "forecast fitted"
        );

        let table = ForecastTable::tail(&forecast, params.forecast_days as usize);

        tracing::info!(
            ticker = %resolved.ticker,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run complete"
        );

        Ok(RunOutput {
            params: params.clone(),
            resolved,
            source: self.loader.source_id(),
            series,
            roi,
            model,
            forecast,
            table,
        })
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub params: RunParameters,
    pub resolved: ResolvedTicker,
    pub source: &'static str,
    pub series: PriceSeries,
    pub roi: Result<RoiSummary, RoiError>,
    pub model: FittedModel,
    pub forecast: ForecastResult,
    pub table: ForecastTable,
}

impl RunOutput {
    pub fn artifact_names(&self) -> ArtifactNames {
        ArtifactNames::for_ticker(&self.resolved.ticker)
    }

    pub fn trend_view(&self) -> TrendView {
        TrendView::new(&self.resolved, &self.series)
    }

    pub fn forecast_view(&self) -> ForecastView {
        ForecastView::new(&self.resolved, &self.model, &self.forecast)
    }

    pub fn variance_view(&self) -> VarianceView {
        VarianceView::new(&self.resolved, &self.series, &self.forecast)
    }
}
