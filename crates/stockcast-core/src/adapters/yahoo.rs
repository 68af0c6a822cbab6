use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::domain::dates::unix_midnight;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_MS};
use crate::PriceBar;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const NOT_FOUND_CODE: &str = "Not Found";

/// Daily history from the Yahoo chart endpoint.
///
/// Bars are dated in the exchange's local calendar (`timestamp + gmtoffset`)
/// and, unless disabled, back-adjusted for splits and dividends by the
/// `adjclose / close` ratio.
#[derive(Clone)]
pub struct YahooChartSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    auto_adjust: bool,
}

impl YahooChartSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            auto_adjust: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_auto_adjust(mut self, auto_adjust: bool) -> Self {
        self.auto_adjust = auto_adjust;
        self
    }

    fn endpoint(&self, req: &HistoryRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events={}",
            self.base_url,
            urlencoding::encode(&req.ticker),
            unix_midnight(req.start),
            unix_midnight(req.end),
            urlencoding::encode("div,splits"),
        )
    }

    async fn fetch(&self, req: HistoryRequest) -> Result<Vec<PriceBar>, SourceError> {
        let request = HttpRequest::get(self.endpoint(&req))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            let source_error =
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()));
            if error.retryable() {
                source_error
            } else {
                source_error.terminal()
            }
        })?;

        if response.status == 404 {
            tracing::debug!(ticker = %req.ticker, "yahoo chart returned 404");
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(status_error(&response));
        }

        parse_chart(&response.body, self.auto_adjust)
    }
}

impl PriceSource for YahooChartSource {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch(req))
    }
}

fn status_error(response: &HttpResponse) -> SourceError {
    let detail = chart_error_description(&response.body)
        .unwrap_or_else(|| format!("yahoo returned status {}", response.status));

    match response.status {
        429 => SourceError::rate_limited(detail),
        408 | 500..=599 => SourceError::unavailable(detail),
        400..=499 => SourceError::invalid_request(detail),
        _ => SourceError::unavailable(detail).terminal(),
    }
}

fn chart_error_description(body: &str) -> Option<String> {
    let parsed: YahooChartResponse = serde_json::from_str(body).ok()?;
    let error = parsed.chart.error?;
    Some(format!("yahoo chart error {}: {}", error.code, error.description))
}

fn parse_chart(body: &str, auto_adjust: bool) -> Result<Vec<PriceBar>, SourceError> {
    let parsed: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = parsed.chart.error {
        if error.code == NOT_FOUND_CODE {
            return Ok(Vec::new());
        }
        return Err(SourceError::invalid_request(format!(
            "yahoo chart error {}: {}",
            error.code, error.description
        )));
    }

    let Some(result) = parsed.chart.result.and_then(|results| results.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };
    let adjclose = result
        .indicators
        .adjclose
        .and_then(|series| series.into_iter().next())
        .map(|series| series.adjclose)
        .unwrap_or_default();
    let gmtoffset = result.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            continue;
        };

        let date = OffsetDateTime::from_unix_timestamp(ts + gmtoffset)
            .map_err(|e| SourceError::internal(format!("invalid yahoo timestamp {ts}: {e}")))?
            .date();
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|volume| u64::try_from(volume).ok())
            .unwrap_or(0);

        let ratio = match value_at(&adjclose, i) {
            Some(adjusted) if auto_adjust && close > 0.0 => adjusted / close,
            _ => 1.0,
        };

        let bar = PriceBar::new(
            date,
            open * ratio,
            high * ratio,
            low * ratio,
            close * ratio,
            volume,
        )
        .map_err(|e| SourceError::internal(format!("yahoo bar on index {i} is invalid: {e}")))?;
        bars.push(bar);
    }

    Ok(bars)
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten().filter(|value| value.is_finite())
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Option<Vec<YahooAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::domain::dates::parse_date;
    use crate::http_client::HttpError;
    use std::sync::Mutex;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1577975400, 1578061800, 1578321000],
                "indicators": {
                    "quote": [{
                        "open": [74.06, 74.29, null],
                        "high": [75.15, 75.14, 74.99],
                        "low": [73.80, 74.13, 73.19],
                        "close": [75.09, 74.36, 74.95],
                        "volume": [135480400, 146322800, 118387200]
                    }],
                    "adjclose": [{"adjclose": [37.545, 37.18, 37.475]}]
                }
            }],
            "error": null
        }
    }"#;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn responding(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn request() -> HistoryRequest {
        HistoryRequest::new(
            "AAPL",
            parse_date("2020-01-01").expect("valid"),
            parse_date("2020-01-07").expect("valid"),
        )
        .expect("valid request")
    }

    #[tokio::test]
    async fn builds_chart_url_for_the_window() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            CHART_FIXTURE,
        ))));
        let source = YahooChartSource::new(client.clone()).with_base_url("https://chart.test/");

        source.daily_history(request()).await.expect("fixture parses");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://chart.test/v8/finance/chart/AAPL?period1=1577836800&period2=1578355200&interval=1d&events=div%2Csplits"
        );
    }

    #[tokio::test]
    async fn drops_incomplete_rows_and_uses_exchange_local_dates() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            CHART_FIXTURE,
        ))));
        let bars = YahooChartSource::new(client)
            .with_auto_adjust(false)
            .daily_history(request())
            .await
            .expect("fixture parses");

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, parse_date("2020-01-02").expect("valid"));
        assert_eq!(bars[1].date, parse_date("2020-01-03").expect("valid"));
        assert_eq!(bars[0].close, 75.09);
        assert_eq!(bars[0].volume, 135_480_400);
    }

    #[tokio::test]
    async fn auto_adjust_scales_ohlc_by_adjusted_close() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            CHART_FIXTURE,
        ))));
        let bars = YahooChartSource::new(client)
            .daily_history(request())
            .await
            .expect("fixture parses");

        assert!((bars[0].close - 37.545).abs() < 1e-9);
        let ratio = 37.545 / 75.09;
        assert!((bars[0].open - 74.06 * ratio).abs() < 1e-9);
    }

    #[tokio::test]
    async fn not_found_chart_error_is_an_empty_history() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::new(
            404, body,
        ))));
        let bars = YahooChartSource::new(client)
            .daily_history(request())
            .await
            .expect("404 is not an error");
        assert!(bars.is_empty());

        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            body,
        ))));
        let bars = YahooChartSource::new(client)
            .daily_history(request())
            .await
            .expect("not-found payload is not an error");
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn maps_http_statuses_to_source_errors() {
        let cases = [
            (429, SourceErrorKind::RateLimited, true),
            (408, SourceErrorKind::Unavailable, true),
            (503, SourceErrorKind::Unavailable, true),
            (400, SourceErrorKind::InvalidRequest, false),
            (403, SourceErrorKind::InvalidRequest, false),
        ];

        for (status, kind, retryable) in cases {
            let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::new(
                status, "",
            ))));
            let error = YahooChartSource::new(client)
                .daily_history(request())
                .await
                .expect_err("non-2xx must fail");
            assert_eq!(error.kind(), kind, "status {status}");
            assert_eq!(error.retryable(), retryable, "status {status}");
        }
    }

    #[tokio::test]
    async fn transport_failures_are_unavailable() {
        let client = Arc::new(RecordingHttpClient::responding(Err(HttpError::new(
            "connection reset",
        ))));
        let error = YahooChartSource::new(client)
            .daily_history(request())
            .await
            .expect_err("transport failure");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn malformed_body_is_internal() {
        let client = Arc::new(RecordingHttpClient::responding(Ok(HttpResponse::ok_json(
            "<html>",
        ))));
        let error = YahooChartSource::new(client)
            .daily_history(request())
            .await
            .expect_err("html is not a chart");
        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }
}
