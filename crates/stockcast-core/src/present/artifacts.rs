use serde::Serialize;

/// File names of everything a run exports, keyed by qualified ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactNames {
    pub price_csv: String,
    pub price_png: String,
    pub forecast_csv: String,
    pub forecast_png: String,
    pub variance_png: String,
    pub variance_html: String,
}

impl ArtifactNames {
    pub fn for_ticker(ticker: &str) -> Self {
        Self {
            price_csv: format!("{ticker}_price_trend.csv"),
            price_png: format!("{ticker}_price_trend.png"),
            forecast_csv: format!("{ticker}_forecast.csv"),
            forecast_png: format!("{ticker}_forecast.png"),
            variance_png: format!("{ticker}_variance.png"),
            variance_html: format!("{ticker}_variance.html"),
        }
    }

    /// Every name, in export order.
    pub fn all(&self) -> [&str; 6] {
        [
            self.price_csv.as_str(),
            self.price_png.as_str(),
            self.forecast_csv.as_str(),
            self.forecast_png.as_str(),
            self.variance_png.as_str(),
            self.variance_html.as_str(),
        ]
    }
}
