use std::path::Path;

use plotters::prelude::*;
use stockcast_core::VarianceView;

use crate::axis::{self, date_label};
use crate::fonts::{self, FAMILY};
use crate::RenderError;

const SIZE: (u32, u32) = (1800, 700);
const LOWER: RGBColor = RGBColor(0, 128, 0);
const UPPER: RGBColor = RGBColor(214, 39, 40);

/// Actual closes (black) against the lower (green) and upper (red)
/// prediction bounds, written as PNG to `path`.
pub fn render_variance_png(view: &VarianceView, path: &Path) -> Result<(), RenderError> {
    if view.actual.is_empty() && view.predicted.is_empty() {
        return Err(RenderError::EmptyChart { chart: "variance" });
    }
    fonts::ensure_registered()?;

    let xs = axis::padded(
        view.actual
            .iter()
            .map(|point| axis::x(point.ds))
            .chain(view.predicted.iter().map(|point| axis::x(point.ds))),
    );
    let ys = axis::padded(
        view.actual.iter().map(|point| point.y).chain(
            view.predicted
                .iter()
                .flat_map(|point| [point.yhat_lower, point.yhat_upper]),
        ),
    );

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&view.title, (FAMILY, 26))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(80)
        .build_cartesian_2d(xs, ys)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&date_label)
        .x_desc(view.x_label)
        .y_desc(view.y_label.as_str())
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            view.actual.iter().map(|point| (axis::x(point.ds), point.y)),
            BLACK.stroke_width(2),
        ))?
        .label("Actual Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            view.predicted
                .iter()
                .map(|point| (axis::x(point.ds), point.yhat_lower)),
            LOWER.stroke_width(1),
        ))?
        .label("Predicted Lower Bound")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LOWER.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            view.predicted
                .iter()
                .map(|point| (axis::x(point.ds), point.yhat_upper)),
            UPPER.stroke_width(1),
        ))?
        .label("Predicted Upper Bound")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], UPPER.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FAMILY, 16))
        .draw()?;

    root.present()?;
    tracing::debug!(path = %path.display(), "variance chart written");
    Ok(())
}
