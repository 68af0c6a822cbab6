//! Forecast chart: the prediction band over the observed closes, followed by
//! one panel per model component (trend, then each active seasonality).

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use stockcast_core::forecast::SeasonalProfile;
use stockcast_core::{ForecastPoint, ForecastView};

use crate::axis::{self, date_label};
use crate::fonts::{self, FAMILY};
use crate::RenderError;

const WIDTH: u32 = 1000;
const MAIN_HEIGHT: u32 = 520;
const PANEL_HEIGHT: u32 = 300;

const FORECAST: RGBColor = RGBColor(0, 114, 178);
const CHANGEPOINT: RGBColor = RGBColor(214, 39, 40);

pub fn render_forecast_png(view: &ForecastView, path: &Path) -> Result<(), RenderError> {
    let decomposition = &view.decomposition;
    if decomposition.forecast.is_empty() {
        return Err(RenderError::EmptyChart { chart: "forecast" });
    }
    fonts::ensure_registered()?;

    let panels = 1 + decomposition.seasonal.len() as u32;
    let root = BitMapBackend::new(path, (WIDTH, MAIN_HEIGHT + PANEL_HEIGHT * panels)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(&view.title, (FAMILY, 26))?;

    let (main, components) = root.split_vertically(MAIN_HEIGHT - 40);
    draw_band(view, &main)?;

    let areas = components.split_evenly((panels as usize, 1));
    if let Some((trend_area, seasonal_areas)) = areas.split_first() {
        draw_trend(&decomposition.forecast, trend_area)?;
        for (profile, area) in decomposition.seasonal.iter().zip(seasonal_areas) {
            draw_profile(profile, area)?;
        }
    }

    root.present()?;
    tracing::debug!(
        path = %path.display(),
        components = panels,
        "forecast chart written"
    );
    Ok(())
}

fn draw_band<DB: DrawingBackend>(
    view: &ForecastView,
    area: &DrawingArea<DB, Shift>,
) -> Result<(), RenderError> {
    let decomposition = &view.decomposition;
    let xs = axis::padded(
        decomposition
            .forecast
            .iter()
            .map(|point| axis::x(point.ds))
            .chain(decomposition.history.iter().map(|point| axis::x(point.ds))),
    );
    let ys = axis::padded(
        decomposition
            .forecast
            .iter()
            .flat_map(|point| [point.yhat_lower, point.yhat_upper])
            .chain(decomposition.history.iter().map(|point| point.y)),
    );

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(72)
        .build_cartesian_2d(xs, ys.clone())?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .x_desc(view.x_label)
        .y_desc(view.y_label.as_str())
        .draw()?;

    let band: Vec<(f64, f64)> = decomposition
        .forecast
        .iter()
        .map(|point| (axis::x(point.ds), point.yhat_upper))
        .chain(
            decomposition
                .forecast
                .iter()
                .rev()
                .map(|point| (axis::x(point.ds), point.yhat_lower)),
        )
        .collect();
    chart
        .draw_series(std::iter::once(Polygon::new(band, FORECAST.mix(0.2).filled())))?
        .label("Uncertainty interval")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], FORECAST.mix(0.2).filled()));

    for changepoint in &decomposition.changepoints {
        let at = axis::x(*changepoint);
        chart.draw_series(LineSeries::new(
            [(at, ys.start), (at, ys.end)],
            CHANGEPOINT.mix(0.4).stroke_width(1),
        ))?;
    }

    chart
        .draw_series(LineSeries::new(
            decomposition
                .forecast
                .iter()
                .map(|point| (axis::x(point.ds), point.yhat)),
            FORECAST.stroke_width(2),
        ))?
        .label("Forecast")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FORECAST.stroke_width(2)));

    chart
        .draw_series(
            decomposition
                .history
                .iter()
                .map(|point| Circle::new((axis::x(point.ds), point.y), 2, BLACK.filled())),
        )?
        .label("Observed")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLACK.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FAMILY, 14))
        .draw()?;

    Ok(())
}

fn draw_trend<DB: DrawingBackend>(
    forecast: &[ForecastPoint],
    area: &DrawingArea<DB, Shift>,
) -> Result<(), RenderError> {
    let xs = axis::padded(forecast.iter().map(|point| axis::x(point.ds)));
    let ys = axis::padded(forecast.iter().map(|point| point.trend));

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(72)
        .build_cartesian_2d(xs, ys)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .y_desc("trend")
        .draw()?;

    chart.draw_series(LineSeries::new(
        forecast.iter().map(|point| (axis::x(point.ds), point.trend)),
        FORECAST.stroke_width(2),
    ))?;

    Ok(())
}

fn draw_profile<DB: DrawingBackend>(
    profile: &SeasonalProfile,
    area: &DrawingArea<DB, Shift>,
) -> Result<(), RenderError> {
    let period = profile.seasonality.period;
    let ys = axis::padded(profile.points.iter().map(|point| point.value));
    let formatter = axis::profile_label(period);
    let ticks = if period > 7.0 { 12 } else { 7 };

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(72)
        .build_cartesian_2d(0.0..period, ys)?;

    chart
        .configure_mesh()
        .x_labels(ticks)
        .x_label_formatter(&formatter)
        .y_desc(profile.seasonality.name)
        .draw()?;

    chart.draw_series(LineSeries::new(
        profile.points.iter().map(|point| (point.offset, point.value)),
        FORECAST.stroke_width(2),
    ))?;

    Ok(())
}
