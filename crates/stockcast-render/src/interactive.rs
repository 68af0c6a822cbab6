//! Interactive variance chart as a standalone HTML page.
//!
//! The page embeds a Plotly figure (`data` + `layout`) serialized with
//! serde; plotly.js itself is loaded from its CDN.

use serde::Serialize;
use stockcast_core::domain::dates::format_date;
use stockcast_core::VarianceView;

use crate::RenderError;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Serialize)]
struct Figure<'a> {
    data: Vec<Trace<'a>>,
    layout: Layout<'a>,
}

#[derive(Debug, Serialize)]
struct Trace<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    x: Vec<String>,
    y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Marker {
    color: &'static str,
    size: u32,
}

#[derive(Debug, Serialize)]
struct Line {
    color: &'static str,
    width: u32,
}

#[derive(Debug, Serialize)]
struct Layout<'a> {
    title: Title<'a>,
    xaxis: Axis<'a>,
    yaxis: Axis<'a>,
    hovermode: &'static str,
}

#[derive(Debug, Serialize)]
struct Title<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Axis<'a> {
    title: Title<'a>,
}

impl<'a> Trace<'a> {
    fn scatter(name: &'a str, mode: &'static str, x: Vec<String>, y: Vec<f64>) -> Self {
        Self {
            name,
            kind: "scatter",
            mode,
            x,
            y,
            marker: None,
            line: None,
            fill: None,
        }
    }
}

fn figure(view: &VarianceView) -> Figure<'_> {
    let predicted_x: Vec<String> = view.predicted.iter().map(|point| format_date(point.ds)).collect();

    let actual = Trace {
        marker: Some(Marker {
            color: "black",
            size: 4,
        }),
        ..Trace::scatter(
            "Actual Price",
            "markers",
            view.actual.iter().map(|point| format_date(point.ds)).collect(),
            view.actual.iter().map(|point| point.y).collect(),
        )
    };
    let trend = Trace {
        line: Some(Line {
            color: "red",
            width: 3,
        }),
        ..Trace::scatter(
            "Trend",
            "lines",
            predicted_x.clone(),
            view.predicted.iter().map(|point| point.yhat).collect(),
        )
    };
    let lower = Trace {
        line: Some(Line {
            color: "#1705ff",
            width: 1,
        }),
        ..Trace::scatter(
            "Lower Band",
            "lines",
            predicted_x.clone(),
            view.predicted.iter().map(|point| point.yhat_lower).collect(),
        )
    };
    // Filled down to the previous trace, shading the band.
    let upper = Trace {
        line: Some(Line {
            color: "#57b88f",
            width: 1,
        }),
        fill: Some("tonexty"),
        ..Trace::scatter(
            "Upper Band",
            "lines",
            predicted_x,
            view.predicted.iter().map(|point| point.yhat_upper).collect(),
        )
    };

    Figure {
        data: vec![actual, trend, lower, upper],
        layout: Layout {
            title: Title {
                text: &view.interactive_title,
            },
            xaxis: Axis {
                title: Title { text: view.x_label },
            },
            yaxis: Axis {
                title: Title { text: &view.y_label },
            },
            hovermode: "x unified",
        },
    }
}

/// Self-contained HTML page with the interactive variance figure.
pub fn variance_html(view: &VarianceView) -> Result<String, RenderError> {
    if view.actual.is_empty() && view.predicted.is_empty() {
        return Err(RenderError::EmptyChart { chart: "variance" });
    }

    // `</` inside an inline script would end it early.
    let figure = serde_json::to_string(&figure(view))?.replace("</", "<\\/");
    let title = escape_html(&view.interactive_title);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcast_core::domain::dates::parse_date;
    use stockcast_core::{ForecastPoint, TimeSeriesPoint};

    fn view() -> VarianceView {
        let ds = parse_date("2020-01-02").expect("valid");
        VarianceView {
            title: String::from("AAPL Stock Price with Prediction Variance"),
            interactive_title: String::from("AAPL Forecast (interactive)"),
            x_label: "Date",
            y_label: String::from("AAPL Price (USD)"),
            actual: vec![TimeSeriesPoint { ds, y: 100.0 }],
            predicted: vec![ForecastPoint {
                ds,
                yhat: 101.0,
                yhat_lower: 99.0,
                yhat_upper: 103.0,
                trend: 100.5,
            }],
        }
    }

    #[test]
    fn traces_are_ordered_and_styled() {
        let value = serde_json::to_value(figure(&view())).expect("serializable");
        let data = value["data"].as_array().expect("traces");

        let names: Vec<&str> = data.iter().filter_map(|trace| trace["name"].as_str()).collect();
        assert_eq!(names, ["Actual Price", "Trend", "Lower Band", "Upper Band"]);
        assert_eq!(data[0]["marker"]["color"], "black");
        assert_eq!(data[1]["line"]["width"], 3);
        assert_eq!(data[2]["line"]["color"], "#1705ff");
        assert_eq!(data[3]["fill"], "tonexty");
        assert_eq!(data[3]["x"][0], "2020-01-02");
        assert!(data[0].get("fill").is_none());
    }

    #[test]
    fn page_embeds_figure_and_title() {
        let html = variance_html(&view()).expect("renders");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>AAPL Forecast (interactive)</title>"));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"Upper Band\""));
    }

    #[test]
    fn empty_view_is_rejected() {
        let mut empty = view();
        empty.actual.clear();
        empty.predicted.clear();
        assert!(matches!(
            variance_html(&empty),
            Err(RenderError::EmptyChart { chart: "variance" })
        ));
    }

    #[test]
    fn html_escaping_covers_markup() {
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
