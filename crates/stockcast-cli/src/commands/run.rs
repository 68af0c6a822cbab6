//! The `run` command: one full forecast plus file exports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use stockcast_core::domain::dates::{parse_date, today_utc};
use stockcast_core::present::ForecastRow;
use stockcast_core::{
    forecast_csv, price_csv, read_price_csv, DataLoader, HttpClient, Pipeline, PriceBar,
    PriceSource, ReqwestHttpClient, RetryConfig, RoiSummary, RunOutput, RunParameters,
    StaticSource, SyntheticSource, YahooChartSource,
};
use stockcast_render::{render_forecast_png, render_trend_png, render_variance_png, variance_html};

use crate::cli::{Cli, RunArgs};
use crate::error::CliError;

use super::CommandResult;

const RAW_TAIL_ROWS: usize = 5;

#[derive(Debug, Serialize)]
struct RunResponseData<'a> {
    params: &'a RunParameters,
    ticker: &'a str,
    currency: &'static str,
    rows: usize,
    tail: &'a [PriceBar],
    roi: Option<&'a RoiSummary>,
    roi_message: Option<String>,
    forecast_points: usize,
    forecast_tail: &'a [ForecastRow],
    artifacts: Vec<PathBuf>,
}

pub async fn run(cli: &Cli, args: &RunArgs) -> Result<CommandResult, CliError> {
    let mut warnings = Vec::new();

    let start = parse_date(&args.start)?;
    let end = match &args.end {
        Some(raw) => parse_date(raw)?,
        None => today_utc(),
    };
    let params = RunParameters::new(&args.country, &args.ticker, start, end, args.forecast_days)?;

    let retry = if cli.retries > 0 {
        RetryConfig::exponential(cli.retries)
    } else {
        RetryConfig::no_retry()
    };
    let loader = DataLoader::new(build_source(cli, args, &mut warnings)?).with_retry(retry);

    let output = Pipeline::new(loader).run(&params).await?;

    let roi_message = match &output.roi {
        Ok(summary) => Some(summary.to_string()),
        Err(error) => {
            warnings.push(format!("roi unavailable: {error}"));
            None
        }
    };
    if args.no_charts {
        warnings.push(String::from("charts skipped (--no-charts)"));
    }

    let artifacts = write_artifacts(&output, &args.out_dir, !args.no_charts)?;

    let rows = output.table.rows();
    let data = serde_json::to_value(RunResponseData {
        params: &output.params,
        ticker: &output.resolved.ticker,
        currency: output.resolved.currency,
        rows: output.series.len(),
        tail: output.series.tail(RAW_TAIL_ROWS),
        roi: output.roi.as_ref().ok(),
        roi_message,
        forecast_points: output.forecast.len(),
        forecast_tail: &rows[rows.len().saturating_sub(args.tail_rows)..],
        artifacts,
    })?;

    Ok(CommandResult::ok(data)
        .with_warnings(warnings)
        .with_source(output.source))
}

fn build_source(
    cli: &Cli,
    args: &RunArgs,
    warnings: &mut Vec<String>,
) -> Result<Arc<dyn PriceSource>, CliError> {
    if let Some(path) = &args.from_csv {
        if cli.offline {
            warnings.push(String::from("--offline ignored: history read from --from-csv"));
        }
        let series = read_price_csv(&std::fs::read(path)?)?;
        tracing::info!(path = %path.display(), rows = series.len(), "history read from csv");
        return Ok(Arc::new(StaticSource::new(series.bars().to_vec())));
    }

    if cli.offline {
        return Ok(Arc::new(SyntheticSource));
    }

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    Ok(Arc::new(
        YahooChartSource::new(http_client).with_timeout_ms(cli.timeout_ms),
    ))
}

/// Writes every export of `output` into `out_dir`, in [`ArtifactNames::all`]
/// order, and returns the written paths.
///
/// [`ArtifactNames::all`]: stockcast_core::ArtifactNames::all
fn write_artifacts(output: &RunOutput, out_dir: &Path, charts: bool) -> Result<Vec<PathBuf>, CliError> {
    publish(out_dir, |staging| stage_artifacts(output, staging, charts))
}

/// Runs `stage` against a scratch directory inside `out_dir` and moves the
/// files it names into `out_dir` once it succeeds.
///
/// The scratch directory is removed on every path, so a failed stage leaves
/// `out_dir` as it was.
fn publish<F>(out_dir: &Path, stage: F) -> Result<Vec<PathBuf>, CliError>
where
    F: FnOnce(&Path) -> Result<Vec<String>, CliError>,
{
    std::fs::create_dir_all(out_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(".stockcast-")
        .tempdir_in(out_dir)?;

    let names = stage(staging.path())?;

    let mut written = Vec::with_capacity(names.len());
    for name in names {
        let target = out_dir.join(&name);
        std::fs::rename(staging.path().join(&name), &target)?;
        tracing::info!(path = %target.display(), "artifact written");
        written.push(target);
    }
    Ok(written)
}

fn stage_artifacts(output: &RunOutput, dir: &Path, charts: bool) -> Result<Vec<String>, CliError> {
    let names = output.artifact_names();
    let mut staged = Vec::new();

    std::fs::write(dir.join(&names.price_csv), price_csv(&output.series)?)?;
    staged.push(names.price_csv);

    if charts {
        render_trend_png(&output.trend_view(), &dir.join(&names.price_png))?;
        staged.push(names.price_png);
    }

    std::fs::write(dir.join(&names.forecast_csv), forecast_csv(&output.table)?)?;
    staged.push(names.forecast_csv);

    if charts {
        render_forecast_png(&output.forecast_view(), &dir.join(&names.forecast_png))?;
        staged.push(names.forecast_png);

        let variance = output.variance_view();
        render_variance_png(&variance, &dir.join(&names.variance_png))?;
        staged.push(names.variance_png);

        std::fs::write(dir.join(&names.variance_html), variance_html(&variance)?)?;
        staged.push(names.variance_html);
    }

    Ok(staged)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use stockcast_core::domain::dates::format_date;
    use stockcast_render::RenderError;

    use super::*;
    use crate::cli::Command;

    fn parse(args: &[&str]) -> (Cli, RunArgs) {
        let cli = Cli::try_parse_from(args).expect("parses");
        let Command::Run(run_args) = &cli.command else {
            panic!("expected run");
        };
        let run_args = run_args.clone();
        (cli, run_args)
    }

    #[tokio::test]
    async fn offline_run_writes_csv_exports_and_reports_roi() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out_dir = dir.path().to_string_lossy().into_owned();
        let (cli, args) = parse(&[
            "stockcast",
            "--offline",
            "run",
            "--start",
            "2020-01-01",
            "--end",
            "2020-07-01",
            "--forecast-days",
            "30",
            "--no-charts",
            "--out-dir",
            &out_dir,
        ]);

        let result = run(&cli, &args).await.expect("offline run succeeds");

        assert_eq!(result.source, Some("synthetic"));
        assert_eq!(result.data["ticker"], "AAPL");
        assert_eq!(result.data["tail"].as_array().map(Vec::len), Some(RAW_TAIL_ROWS));
        let exported = read_price_csv(
            &std::fs::read(dir.path().join("AAPL_price_trend.csv")).expect("price csv readable"),
        )
        .expect("price csv parses");
        assert!(exported.len() > RAW_TAIL_ROWS);
        let last_date = exported.last().map(|bar| format_date(bar.date));
        assert_eq!(result.data["tail"][RAW_TAIL_ROWS - 1]["date"].as_str(), last_date.as_deref());
        let first_date = exported.first().map(|bar| format_date(bar.date));
        assert_ne!(result.data["tail"][0]["date"].as_str(), first_date.as_deref());
        assert_eq!(result.data["forecast_tail"].as_array().map(Vec::len), Some(5));
        assert!(result.data["roi_message"]
            .as_str()
            .is_some_and(|message| message.starts_with("ROI for AAPL: ")));
        assert!(dir.path().join("AAPL_price_trend.csv").exists());
        assert!(dir.path().join("AAPL_forecast.csv").exists());
        assert!(!dir.path().join("AAPL_price_trend.png").exists());
        assert!(result.warnings.iter().any(|warning| warning.contains("--no-charts")));
    }

    #[tokio::test]
    async fn unsupported_exchange_halts_before_any_export() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out_dir = dir.path().join("out").to_string_lossy().into_owned();
        let (cli, args) = parse(&[
            "stockcast",
            "--offline",
            "run",
            "--country",
            "ATLANTIS",
            "--end",
            "2020-07-01",
            "--out-dir",
            &out_dir,
        ]);

        let error = run(&cli, &args).await.expect_err("unsupported");
        assert_eq!(error.exit_code(), 2);
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn csv_history_replays_a_previous_export() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv_path = dir.path().join("history.csv");
        std::fs::write(
            &csv_path,
            "Date,Open,High,Low,Close,Volume\n\
             2020-01-02,1,1,1,100,10\n\
             2020-01-03,1,1,1,120,10\n\
             2020-01-06,1,1,1,150,10\n",
        )
        .expect("fixture written");
        let out_dir = dir.path().to_string_lossy().into_owned();
        let csv_arg = csv_path.to_string_lossy().into_owned();
        let (cli, args) = parse(&[
            "stockcast",
            "run",
            "--end",
            "2020-02-01",
            "--forecast-days",
            "30",
            "--from-csv",
            &csv_arg,
            "--no-charts",
            "--out-dir",
            &out_dir,
        ]);

        let result = run(&cli, &args).await.expect("replayed run succeeds");

        assert_eq!(result.source, Some("static"));
        assert_eq!(result.data["rows"], 3);
        assert_eq!(result.data["roi"]["roi_percent"], 50.0);
        assert_eq!(result.data["forecast_points"], 33);
        assert_eq!(result.data["tail"][0]["close"], 100.0);
        assert_eq!(result.data["tail"][2]["close"], 150.0);
    }

    #[test]
    fn failed_export_leaves_no_partial_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out_dir = dir.path().join("out");

        let error = publish(&out_dir, |staging| {
            std::fs::write(staging.join("AAPL_price_trend.csv"), "Date\n")?;
            Err(CliError::from(RenderError::EmptyChart { chart: "trend" }))
        })
        .expect_err("staging failed");

        assert_eq!(error.exit_code(), 11);
        let leftovers: Vec<_> = std::fs::read_dir(&out_dir).expect("out dir exists").collect();
        assert!(leftovers.is_empty(), "leftovers: {leftovers:?}");
    }

    #[test]
    fn successful_export_moves_staged_files_into_place() {
        let dir = tempfile::tempdir().expect("tempdir");

        let written = publish(dir.path(), |staging| {
            std::fs::write(staging.join("AAPL_forecast.csv"), "ds\n")?;
            Ok(vec![String::from("AAPL_forecast.csv")])
        })
        .expect("staging succeeded");

        assert_eq!(written, vec![dir.path().join("AAPL_forecast.csv")]);
        let entries = std::fs::read_dir(dir.path()).expect("readable").count();
        assert_eq!(entries, 1);
    }
}
