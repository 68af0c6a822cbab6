use std::path::Path;

use plotters::prelude::*;
use stockcast_core::TrendView;

use crate::axis::{self, date_label};
use crate::fonts::{self, FAMILY};
use crate::RenderError;

const SIZE: (u32, u32) = (1400, 500);
const LINE: RGBColor = RGBColor(31, 119, 180);

/// Close-price line with grid and legend, written as PNG to `path`.
pub fn render_trend_png(view: &TrendView, path: &Path) -> Result<(), RenderError> {
    if view.points.is_empty() {
        return Err(RenderError::EmptyChart { chart: "trend" });
    }
    fonts::ensure_registered()?;

    let xs = axis::padded(view.points.iter().map(|point| axis::x(point.ds)));
    let ys = axis::padded(view.points.iter().map(|point| point.y));

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&view.title, (FAMILY, 24))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(xs, ys)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&date_label)
        .x_desc(view.x_label)
        .y_desc(view.y_label.as_str())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            view.points.iter().map(|point| (axis::x(point.ds), point.y)),
            LINE.stroke_width(2),
        ))?
        .label("Close Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FAMILY, 14))
        .draw()?;

    root.present()?;
    tracing::debug!(path = %path.display(), points = view.points.len(), "trend chart written");
    Ok(())
}
