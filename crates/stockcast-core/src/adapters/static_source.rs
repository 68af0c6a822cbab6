use std::future::Future;
use std::pin::Pin;

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::PriceBar;

/// Serves a fixed bar list, filtered to the requested window.
///
/// Backs `--from-csv` replays and tests that need exact prices.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    bars: Vec<PriceBar>,
}

impl StaticSource {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }
}

impl PriceSource for StaticSource {
    fn id(&self) -> &'static str {
        "static"
    }

    fn daily_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PriceBar>, SourceError>> + Send + 'a>> {
        let bars = self
            .bars
            .iter()
            .filter(|bar| bar.date >= req.start && bar.date < req.end)
            .cloned()
            .collect();
        Box::pin(async move { Ok(bars) })
    }
}
