//! User journeys through a full forecast run.
//!
//! These tests drive [`Pipeline::run`] end to end on fixed histories and
//! check what a user would see: the ROI line, the forecast table and the
//! exported CSV bytes.

use std::sync::Arc;

use stockcast_core::{
    forecast_csv, price_csv, read_price_csv, DataLoader, FitError, LoadError, Pipeline,
    PipelineError, RoiError, RunParameters, SyntheticSource,
};
use stockcast_tests::{bars, date, static_loader, trading_year};

fn params(country: &str, ticker: &str, days: u32) -> RunParameters {
    RunParameters::new(country, ticker, date("2020-01-01"), date("2021-01-01"), days)
        .expect("valid parameters")
}

// =============================================================================
// Journey: Happy Path
// =============================================================================

#[tokio::test]
async fn user_runs_a_forecast_and_gets_roi_table_and_views() {
    // Given: a year of history for AAPL
    let pipeline = Pipeline::new(static_loader(trading_year()));

    // When: the user asks for the default 91-day horizon
    let output = pipeline.run(&params("usa", "aapl", 91)).await.expect("run succeeds");

    // Then: the ticker is resolved and priced in dollars
    assert_eq!(output.resolved.ticker, "AAPL");
    assert_eq!(output.source, "static");

    // And: the table holds the last 91 forecast rows, ending on the horizon
    assert_eq!(output.table.len(), 91);
    let last_row = output.table.rows().last().expect("rows");
    let last_point = output.forecast.points().last().expect("points");
    assert_eq!(last_row.ds, last_point.ds);
    assert_eq!(output.forecast.len(), output.series.len() + 91);

    // And: the ROI summary reads naturally
    let roi = output.roi.as_ref().expect("first close is positive");
    assert!(roi.to_string().starts_with("ROI for AAPL: "));

    // And: the views carry ticker-specific labels
    assert_eq!(output.trend_view().title, "AAPL Price Trend");
    assert_eq!(output.trend_view().y_label, "Close Price (USD)");
    assert_eq!(output.forecast_view().title, "AAPL Stock Price Forecast");
    assert_eq!(output.variance_view().actual.len(), output.series.len());
    assert_eq!(output.artifact_names().forecast_csv, "AAPL_forecast.csv");
}

#[tokio::test]
async fn roi_of_two_closes_is_fifty_percent() {
    // Given: closes of 100 then 150
    let pipeline = Pipeline::new(static_loader(bars(&[("2020-01-01", 100.0), ("2020-01-02", 150.0)])));

    // When: the run completes
    let output = pipeline.run(&params("USA", "AAPL", 30)).await.expect("run succeeds");

    // Then: the ROI is exactly 50%
    let roi = output.roi.expect("defined");
    assert_eq!(roi.roi_percent, 50.0);
    assert_eq!(roi.to_string(), "ROI for AAPL: 50.00% from 2020-01-01 to 2020-01-02");
}

// =============================================================================
// Journey: Exports
// =============================================================================

#[tokio::test]
async fn identical_runs_export_byte_identical_csv() {
    // Given: two runs over the same offline history
    let pipeline = Pipeline::new(DataLoader::new(Arc::new(SyntheticSource)));
    let request = params("JAPAN", "7203", 60);

    // When: both complete
    let first = pipeline.run(&request).await.expect("first run");
    let second = pipeline.run(&request).await.expect("second run");

    // Then: both CSV exports match byte for byte
    assert_eq!(
        price_csv(&first.series).expect("encodes"),
        price_csv(&second.series).expect("encodes")
    );
    assert_eq!(
        forecast_csv(&first.table).expect("encodes"),
        forecast_csv(&second.table).expect("encodes")
    );
    assert_eq!(first.artifact_names().price_csv, "7203.T_price_trend.csv");
}

#[tokio::test]
async fn exported_history_reloads_with_the_same_closes() {
    // Given: a completed run
    let output = Pipeline::new(static_loader(trading_year()))
        .run(&params("USA", "MSFT", 30))
        .await
        .expect("run succeeds");

    // When: its price CSV is written to disk and read back
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(output.artifact_names().price_csv);
    std::fs::write(&path, price_csv(&output.series).expect("encodes")).expect("written");
    let reloaded = read_price_csv(&std::fs::read(&path).expect("readable")).expect("decodes");

    // Then: (date, close) pairs survive in order
    let pairs = |series: &stockcast_core::PriceSeries| -> Vec<_> {
        series.bars().iter().map(|bar| (bar.date, bar.close)).collect()
    };
    assert_eq!(pairs(&reloaded), pairs(&output.series));

    // And: the forecast CSV has one header plus one line per table row
    let forecast = String::from_utf8(forecast_csv(&output.table).expect("encodes")).expect("utf-8");
    let mut lines = forecast.lines();
    assert_eq!(lines.next(), Some("ds,yhat,yhat_lower,yhat_upper"));
    assert_eq!(lines.count(), 30);
}

// =============================================================================
// Journey: Halting Failures
// =============================================================================

#[tokio::test]
async fn empty_history_halts_with_no_data() {
    // Given: a source with nothing in the window
    let pipeline = Pipeline::new(static_loader(Vec::new()));

    // When: the run starts
    let error = pipeline.run(&params("USA", "AAPL", 30)).await.expect_err("no data");

    // Then: the loader stage reports it
    assert!(matches!(error, PipelineError::Load(LoadError::NoData { .. })));
    assert_eq!(error.code(), "run.no_data");
}

#[tokio::test]
async fn single_record_halts_with_fit_error() {
    // Given: one bar of history
    let pipeline = Pipeline::new(static_loader(bars(&[("2020-06-01", 100.0)])));

    // When: the run starts
    let error = pipeline.run(&params("USA", "AAPL", 30)).await.expect_err("too short");

    // Then: the forecast stage reports it
    assert!(matches!(
        error,
        PipelineError::Fit(FitError::InsufficientData { found: 1, .. })
    ));
}

#[tokio::test]
async fn zero_first_close_keeps_the_forecast_but_not_the_roi() {
    // Given: a history whose first close is zero
    let pipeline = Pipeline::new(static_loader(bars(&[
        ("2020-01-02", 0.0),
        ("2020-01-03", 10.0),
        ("2020-01-06", 12.0),
    ])));

    // When: the run completes
    let output = pipeline.run(&params("USA", "AAPL", 30)).await.expect("forecast still runs");

    // Then: ROI is undefined while the forecast is present
    assert_eq!(
        output.roi,
        Err(RoiError::DivideByZero {
            date: String::from("2020-01-02")
        })
    );
    assert_eq!(output.forecast.len(), 33);
}
