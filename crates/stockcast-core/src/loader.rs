use std::sync::Arc;
use std::time::Instant;

use time::Date;

use crate::data_source::{HistoryRequest, PriceSource};
use crate::retry::RetryConfig;
use crate::{LoadError, PriceSeries};

/// Fetches a daily price history and turns an empty answer into [`LoadError::NoData`].
#[derive(Clone)]
pub struct DataLoader {
    source: Arc<dyn PriceSource>,
    retry: RetryConfig,
}

impl DataLoader {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            retry: RetryConfig::no_retry(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn source_id(&self) -> &'static str {
        self.source.id()
    }

    /// Load `[start, end)` for an exchange-qualified ticker.
    pub async fn load(&self, ticker: &str, start: Date, end: Date) -> Result<PriceSeries, LoadError> {
        let request = HistoryRequest::new(ticker, start, end)?;
        let started = Instant::now();

        let bars = self
            .retry
            .run(|| self.source.daily_history(request.clone()))
            .await
            .inspect_err(|error| {
                tracing::warn!(
                    source = self.source.id(),
                    ticker,
                    code = error.code(),
                    error = %error,
                    "price history retrieval failed"
                );
            })?;

        let series = PriceSeries::new(bars);
        tracing::info!(
            source = self.source.id(),
            ticker,
            rows = series.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "price history loaded"
        );

        if series.is_empty() {
            return Err(LoadError::NoData {
                ticker: ticker.to_owned(),
            });
        }

        Ok(series)
    }
}
