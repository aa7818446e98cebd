//! Plotters-powered actual-vs-forecast chart widget for Ratatui.
//!
//! Plotters handles axes, ticks and labels; `plotters-ratatui-backend` draws
//! the result into the Ratatui buffer.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only chart description. All series and bounds are computed outside
/// the render call (see `chart_series`).
pub struct ForecastPlottersChart<'a> {
    /// Actual values, one polyline per run of present points.
    pub actual: &'a [Vec<(f64, f64)>],
    /// Forecast values, one polyline per run of present points.
    pub forecast: &'a [Vec<(f64, f64)>],
    /// X position of the history/forecast divider, if both regions exist.
    pub boundary: Option<f64>,
    /// Label axis; x values are indices into this.
    pub labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
}

impl<'a> Widget for ForecastPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| label_at(self.labels, *v))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let actual_color = WHITE;
            let forecast_color = RGBColor(0, 255, 255); // cyan
            let divider_color = RGBColor(128, 128, 128);

            if let Some(x) = self.boundary {
                chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &divider_color))?;
            }

            for segment in self.actual {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &actual_color))?;
            }
            for segment in self.forecast {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &forecast_color))?;
            }

            // Single-point runs draw no line; mark them so they stay visible.
            for segment in self.actual.iter().filter(|s| s.len() == 1) {
                chart.draw_series(segment.iter().map(|&p| Pixel::new(p, actual_color)))?;
            }
            for segment in self.forecast.iter().filter(|s| s.len() == 1) {
                chart.draw_series(segment.iter().map(|&p| Pixel::new(p, forecast_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label for a (possibly fractional) tick position; blank between indices.
pub fn label_at(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
