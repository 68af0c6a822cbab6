use std::f64::consts::TAU;
use std::future::Future;
use std::pin::Pin;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use time::{Duration, Weekday};

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::domain::dates::days_since_epoch;
use crate::PriceBar;

const DAILY_VOLATILITY: f64 = 0.015;
const ANNUAL_DRIFT: f64 = 0.08;
const SEASONAL_AMPLITUDE: f64 = 0.04;
// 2000-01-01
const DRIFT_ANCHOR_DAY: i64 = 10_957;

/// Offline price generator.
///
/// Each ticker maps to a drifting, yearly-seasonal price level with seeded
/// daily noise. The noise is seeded per `(ticker, date)`, so a bar never
/// depends on the requested window. Weekends are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

impl SyntheticSource {
    pub fn generate(&self, req: &HistoryRequest) -> Result<Vec<PriceBar>, SourceError> {
        let seed = ticker_seed(&req.ticker);
        let base_price = 20.0 + (seed % 480) as f64;
        let noise = Normal::new(0.0, DAILY_VOLATILITY)
            .map_err(|e| SourceError::internal(format!("invalid synthetic noise: {e}")))?;

        let mut bars = Vec::new();
        let mut date = req.start;
        while date < req.end {
            if !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
                let day = days_since_epoch(date);
                let mut rng = StdRng::seed_from_u64(seed ^ (day as u64).wrapping_mul(0x9E37_79B9));

                let years = (day - DRIFT_ANCHOR_DAY) as f64 / 365.25;
                let level = base_price
                    * (ANNUAL_DRIFT * years).exp()
                    * (1.0 + SEASONAL_AMPLITUDE * (TAU * years).sin());
                let close = level * (1.0 + noise.sample(&mut rng));
                let open = close * (1.0 + noise.sample(&mut rng) / 2.0);
                let spread = close * DAILY_VOLATILITY * rng.gen::<f64>();
                let high = open.max(close) + spread;
                let low = (open.min(close) - spread).max(0.0);
                let volume = rng.gen_range(1_000_000..10_000_000);

                let bar = PriceBar::new(date, open, high, low, close, volume)
                    .map_err(|e| SourceError::internal(format!("synthetic bar is invalid: {e}")))?;
                bars.push(bar);
            }

            date = date
                .checked_add(Duration::days(1))
                .ok_or_else(|| SourceError::invalid_request("history window overflows the calendar"))?;
        }

        Ok(bars)
    }
}

impl PriceSource for SyntheticSource {
    fn id(&self) -> &'static str {
        "synthetic"
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, SourceError>> + Send + 'a>> {
        let result = self.generate(&req);
        Box::pin(async move { result })
    }
}

fn ticker_seed(ticker: &str) -> u64 {
    ticker.bytes().fold(5381_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}
