//! Chart Plotter Module
//! Draws interactive charts using egui_plot.

use crate::charts::{ChartData, Geometry};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Primary series colour
pub const SERIES_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
/// KDE curve colour
pub const KDE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Label for a category axis tick; empty between categories.
    pub fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    fn to_bars(bars: &[crate::charts::BarSpec]) -> Vec<Bar> {
        bars.iter()
            .map(|b| Bar::new(b.center, b.height).width(b.width))
            .collect()
    }

    /// Draw a chart filling the available width
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        let mut plot = Plot::new(format!("chart_{}_{}", chart.x_label, chart.y_label))
            .height(height)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_scroll(false);

        if let Some(labels) = chart.x_categories.clone() {
            plot = plot.x_axis_formatter(move |mark, _range| {
                Self::category_label(&labels, mark.value)
            });
        }
        if let Some(labels) = chart.y_categories.clone() {
            plot = plot.y_axis_formatter(move |mark, _range| {
                Self::category_label(&labels, mark.value)
            });
        }

        plot.show(ui, |plot_ui| match &chart.geometry {
            Geometry::Points(points) => {
                plot_ui.points(
                    Points::new(PlotPoints::from(points.clone()))
                        .radius(3.0)
                        .color(SERIES_COLOR.gamma_multiply(0.8))
                        .name(&chart.y_label),
                );
            }
            Geometry::Line(points) => {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .color(SERIES_COLOR)
                        .width(2.0)
                        .name(&chart.y_label),
                );
            }
            Geometry::Bars(bars) => {
                plot_ui.bar_chart(
                    BarChart::new(Self::to_bars(bars))
                        .color(SERIES_COLOR)
                        .name(&chart.y_label),
                );
            }
            Geometry::Histogram { bins, kde } => {
                plot_ui.bar_chart(
                    BarChart::new(Self::to_bars(bins))
                        .color(SERIES_COLOR)
                        .name("Count"),
                );
                if !kde.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(kde.clone()))
                            .color(KDE_COLOR)
                            .width(2.0)
                            .name("KDE"),
                    );
                }
            }
        });
    }
}
