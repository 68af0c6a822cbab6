//! CSV encoding of price histories and forecast tables.
//!
//! Dates are written as `YYYY-MM-DD` and floats in their shortest
//! round-tripping form, so identical inputs always encode to identical bytes.

use serde::{Deserialize, Serialize};

use crate::domain::dates::{format_date, parse_date};
use crate::{ExportError, PriceBar, PriceSeries};

use super::ForecastTable;

#[derive(Debug, Serialize, Deserialize)]
struct PriceRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

#[derive(Debug, Serialize)]
struct ForecastRecord {
    ds: String,
    yhat: f64,
    yhat_lower: f64,
    yhat_upper: f64,
}

/// `Date,Open,High,Low,Close,Volume`, one row per bar.
pub fn price_csv(series: &PriceSeries) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for bar in series.bars() {
        writer.serialize(PriceRecord {
            date: format_date(bar.date),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })?;
    }
    Ok(writer.into_inner()?)
}

/// Parse a price CSV written by [`price_csv`].
///
/// Columns are matched by header name and extra columns (such as
/// `Adj Close`) are ignored.
pub fn read_price_csv(bytes: &[u8]) -> Result<PriceSeries, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut bars = Vec::new();
    for record in reader.deserialize::<PriceRecord>() {
        let record = record?;
        bars.push(PriceBar::new(
            parse_date(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        )?);
    }
    Ok(PriceSeries::new(bars))
}

/// `ds,yhat,yhat_lower,yhat_upper`, one row per table row.
pub fn forecast_csv(table: &ForecastTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in table.rows() {
        writer.serialize(ForecastRecord {
            ds: format_date(row.ds),
            yhat: row.yhat,
            yhat_lower: row.yhat_lower,
            yhat_upper: row.yhat_upper,
        })?;
    }
    Ok(writer.into_inner()?)
}
