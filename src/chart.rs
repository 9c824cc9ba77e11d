//! Line-chart rendering for metric series.
//!
//! Charts are rendered to standalone SVG strings through plotters. Every call
//! builds its own drawing surface, so rendering is stateless and reentrant:
//! nothing leaks between charts even when several requests render concurrently.
//! The SVG string is the artifact; encoding it for a web page is the caller's
//! concern.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::error::{FundvizError, Result};
use crate::series::MetricSeries;

const MARKER_SIZE: u32 = 3;
const LINE_WIDTH: u32 = 2;

/// Display options for a rendered chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    /// Y-axis label, typically "<metric> (<unit>)".
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl ChartOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: String::new(),
            width: 1000,
            height: 600,
        }
    }

    pub fn with_y_label(mut self, y_label: impl Into<String>) -> Self {
        self.y_label = y_label.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

fn chart_err(e: impl std::fmt::Display) -> FundvizError {
    FundvizError::ChartError(e.to_string())
}

/// Renders a metric series as an SVG line chart with point markers.
///
/// The x-axis spans the series' period-end dates; undefined points (for example
/// EPS periods with a zero share count) break the line into segments and get no
/// marker, leaving a visible gap instead of interpolating through bad data.
///
/// # Errors
///
/// `ChartError` when the series is empty or has no defined points, and for any
/// backend drawing fault. Both are scoped to the one metric being charted.
pub fn render_line_chart(series: &MetricSeries, options: &ChartOptions) -> Result<String> {
    let defined: Vec<(NaiveDate, f64)> = series.defined().collect();
    if defined.is_empty() {
        return Err(FundvizError::ChartError(format!(
            "no data points to render for '{}'",
            options.title
        )));
    }

    // Axis bounds: dates come from every point so gaps keep their place on the
    // axis, values only from defined points.
    let first_date = series.points.first().map(|p| p.end).unwrap_or(defined[0].0);
    let last_date = series.points.last().map(|p| p.end).unwrap_or(defined[0].0);
    let (x_min, x_max) = if first_date == last_date {
        (first_date - Duration::days(1), last_date + Duration::days(1))
    } else {
        (first_date, last_date)
    };

    let (y_min, y_max) = defined.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)),
    );
    let span = y_max - y_min;
    let pad = if span == 0.0 {
        y_max.abs().max(1.0) * 0.05
    } else {
        span * 0.05
    };

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, (y_min - pad)..(y_max + pad))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Period End Date")
            .y_desc(&options.y_label)
            .light_line_style(&BLACK.mix(0.1))
            .draw()
            .map_err(chart_err)?;

        // Each run of consecutive defined points becomes one polyline segment.
        let mut segment: Vec<(NaiveDate, f64)> = Vec::new();
        for point in &series.points {
            match point.value {
                Some(value) => segment.push((point.end, value)),
                None => {
                    if segment.len() > 1 {
                        chart
                            .draw_series(LineSeries::new(
                                segment.iter().copied(),
                                BLUE.stroke_width(LINE_WIDTH),
                            ))
                            .map_err(chart_err)?;
                    }
                    segment.clear();
                }
            }
        }
        if segment.len() > 1 {
            chart
                .draw_series(LineSeries::new(
                    segment.iter().copied(),
                    BLUE.stroke_width(LINE_WIDTH),
                ))
                .map_err(chart_err)?;
        }

        chart
            .draw_series(
                defined
                    .iter()
                    .map(|&(end, value)| Circle::new((end, value), MARKER_SIZE, BLUE.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesPoint;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(points: Vec<(&str, Option<f64>)>) -> MetricSeries {
        MetricSeries {
            points: points
                .into_iter()
                .map(|(end, value)| SeriesPoint {
                    end: date(end),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn renders_svg_with_title() {
        let s = series(vec![
            ("2021-12-31", Some(100.0)),
            ("2022-12-31", Some(200.0)),
            ("2023-12-31", Some(150.0)),
        ]);
        let options = ChartOptions::new("Revenue Over Time").with_y_label("Revenue (USD)");

        let svg = render_line_chart(&s, &options).unwrap();
        assert!(svg.starts_with("<svg") || svg.contains("<svg"));
        assert!(svg.contains("Revenue Over Time"));
    }

    #[test]
    fn empty_series_is_an_error() {
        let s = MetricSeries::default();
        let result = render_line_chart(&s, &ChartOptions::new("Empty"));
        assert!(matches!(result, Err(FundvizError::ChartError(_))));
    }

    #[test]
    fn all_undefined_series_is_an_error() {
        let s = series(vec![("2022-12-31", None), ("2023-12-31", None)]);
        let result = render_line_chart(&s, &ChartOptions::new("Undefined"));
        assert!(matches!(result, Err(FundvizError::ChartError(_))));
    }

    #[test]
    fn single_point_series_renders() {
        let s = series(vec![("2023-12-31", Some(42.0))]);
        let svg = render_line_chart(&s, &ChartOptions::new("One Point")).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn flat_series_renders() {
        // Zero value span exercises the y-axis padding fallback.
        let s = series(vec![
            ("2022-12-31", Some(5.0)),
            ("2023-12-31", Some(5.0)),
        ]);
        let svg = render_line_chart(&s, &ChartOptions::new("Flat")).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn gap_in_series_renders() {
        let s = series(vec![
            ("2021-12-31", Some(10.0)),
            ("2022-12-31", None),
            ("2023-12-31", Some(30.0)),
        ]);
        let svg = render_line_chart(&s, &ChartOptions::new("EPS Over Time")).unwrap();
        assert!(svg.contains("<svg"));
    }
}
