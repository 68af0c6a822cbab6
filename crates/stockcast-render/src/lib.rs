//! # Stockcast Render
//!
//! Turns the presentation views of `stockcast-core` into files:
//!
//! | Function | View | Output |
//! |----------|------|--------|
//! | [`render_trend_png`] | [`TrendView`] | Close-price line |
//! | [`render_forecast_png`] | [`ForecastView`] | Band, history and component panels |
//! | [`render_variance_png`] | [`VarianceView`] | Actual against predicted bounds |
//! | [`variance_html`] | [`VarianceView`] | Interactive Plotly page |
//!
//! PNG output goes through the plotters bitmap backend with an embedded font,
//! so rendering needs no system fonts or display.
//!
//! [`TrendView`]: stockcast_core::TrendView
//! [`ForecastView`]: stockcast_core::ForecastView
//! [`VarianceView`]: stockcast_core::VarianceView

mod axis;
mod error;
mod fonts;
mod forecast;
mod interactive;
mod trend;
mod variance;

pub use error::RenderError;
pub use forecast::render_forecast_png;
pub use interactive::variance_html;
pub use trend::render_trend_png;
pub use variance::render_variance_png;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use stockcast_core::domain::dates::parse_date;
    use stockcast_core::{forecast, resolve, PriceBar, PriceSeries, TrendView, VarianceView, ForecastView};

    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn series() -> PriceSeries {
        let start = parse_date("2020-01-01").expect("valid");
        let bars = (0..120)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5 + (i as f64 / 5.0).sin() * 3.0;
                PriceBar::new(start + time::Duration::days(i), close, close + 1.0, close - 1.0, close, 1_000)
                    .expect("valid bar")
            })
            .collect();
        PriceSeries::new(bars)
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).expect("written");
        assert!(bytes.len() > PNG_SIGNATURE.len());
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    fn renders_every_chart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = resolve("USA", "AAPL").expect("supported");
        let series = series();
        let (model, result) = forecast(&series, 30).expect("fits");

        let trend = dir.path().join("AAPL_price.png");
        render_trend_png(&TrendView::new(&resolved, &series), &trend).expect("trend renders");
        assert_png(&trend);

        let chart = dir.path().join("AAPL_forecast.png");
        render_forecast_png(&ForecastView::new(&resolved, &model, &result), &chart)
            .expect("forecast renders");
        assert_png(&chart);

        let variance = VarianceView::new(&resolved, &series, &result);
        let static_chart = dir.path().join("AAPL_variance.png");
        render_variance_png(&variance, &static_chart).expect("variance renders");
        assert_png(&static_chart);

        let html = variance_html(&variance).expect("html renders");
        assert!(html.contains("AAPL Forecast (interactive)"));
    }

    #[test]
    fn empty_trend_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = resolve("USA", "AAPL").expect("supported");
        let view = TrendView::new(&resolved, &PriceSeries::default());

        let error = render_trend_png(&view, &dir.path().join("empty.png")).expect_err("nothing to draw");
        assert_eq!(error.code(), "render.empty_chart");
        assert!(!dir.path().join("empty.png").exists());
    }
}
