//! Plotters-powered trend chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! X values are day offsets from the view's first date; tick labels map them
//! back to calendar dates.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Metric;

/// A render-only chart description. All series and bounds are computed
/// outside the render call.
pub struct TrendChart<'a> {
    /// One line per metric, `(day offset, count)`.
    pub series: &'a [(Metric, Vec<(f64, f64)>)],
    /// Date at x = 0.
    pub origin: NaiveDate,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Line colour per metric (cases blue, recovered green, deaths red, vaccinations purple).
pub fn metric_rgb(metric: Metric) -> (u8, u8, u8) {
    match metric {
        Metric::Cases => (80, 140, 255),
        Metric::Recovered => (0, 220, 0),
        Metric::Deaths => (255, 60, 60),
        Metric::Vaccinations => (200, 80, 255),
    }
}

pub fn metric_color(metric: Metric) -> Color {
    let (r, g, b) = metric_rgb(metric);
    Color::Rgb(r, g, b)
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let origin = self.origin;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_day_offset(origin, *v))
                .y_label_formatter(&|v| fmt_count_compact(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (metric, points) in self.series {
                let (r, g, b) = metric_rgb(*metric);
                let color = RGBColor(r, g, b);
                if points.len() == 1 {
                    // A single day has no line to draw.
                    chart.draw_series(points.iter().map(|&p| Pixel::new(p, color)))?;
                } else {
                    chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Day offset -> `YYYY-MM-DD`.
pub fn fmt_day_offset(origin: NaiveDate, v: f64) -> String {
    let days = v.round() as i64;
    origin
        .checked_add_signed(Duration::days(days))
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// Short count labels for narrow axes: `950`, `12.5K`, `3.2M`, `1.1B`.
pub fn fmt_count_compact(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}
