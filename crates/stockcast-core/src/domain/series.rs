use serde::{Deserialize, Serialize};
use time::Date;

use super::dates::iso_date;
use crate::ValidationError;

/// Daily OHLCV record.
///
/// Prices may be negative; futures contracts have settled below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_finite("open", open)?;
        validate_finite("high", high)?;
        validate_finite("low", low)?;
        validate_finite("close", close)?;

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// `(ds, y)` pair fed to the forecast model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(with = "iso_date")]
    pub ds: Date,
    pub y: f64,
}

/// Ascending daily history with at most one bar per date.
///
/// An empty series is representable; the loader turns it into
/// [`crate::LoadError::NoData`] before anything downstream sees it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Sort by date and collapse duplicate dates, keeping the later bar.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        // Stable sort keeps input order among equal dates, so the last
        // duplicate in the input is the last one in its run.
        bars.sort_by_key(|bar| bar.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(previous) if previous.date == bar.date => *previous = bar,
                _ => deduped.push(bar),
            }
        }

        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// The last `n` bars, oldest first.
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    pub fn to_time_series(&self) -> Vec<TimeSeriesPoint> {
        self.bars
            .iter()
            .map(|bar| TimeSeriesPoint {
                ds: bar.date,
                y: bar.close,
            })
            .collect()
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}
