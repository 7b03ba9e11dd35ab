//! Static Chart Renderer
//! Renders chart data to PNG images with plotters, matching the on-screen chart:
//! title on top, column names on the axes, category labels on categorical axes.

use crate::charts::{BarSpec, ChartData, ChartPlotter, Geometry};
use anyhow::{anyhow, Context};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;

const SERIES: RGBColor = RGBColor(52, 152, 219); // Blue
const KDE: RGBColor = RGBColor(231, 76, 60); // Red

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart to PNG bytes
    pub fn render_png(chart: &ChartData, width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
        let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            Self::draw(&root, chart)?;
            root.present()?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| anyhow!("chart buffer does not match {width}x{height}"))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Render a chart and write it to `path`
    pub fn save_png(chart: &ChartData, path: &Path, width: u32, height: u32) -> anyhow::Result<()> {
        let png = Self::render_png(chart, width, height)?;
        std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Chart saved to {}", path.display());
        Ok(())
    }

    /// Axis range with 5% padding; degenerate ranges widen by 0.5 each side.
    fn padded(lo: f64, hi: f64) -> (f64, f64) {
        if hi <= lo {
            return (lo - 0.5, hi + 0.5);
        }
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }

    fn format_tick(value: f64) -> String {
        let formatted = format!("{:.2}", value);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }

    fn bar_rect(bar: &BarSpec) -> Rectangle<(f64, f64)> {
        Rectangle::new(
            [
                (bar.center - bar.width / 2.0, 0.0),
                (bar.center + bar.width / 2.0, bar.height),
            ],
            SERIES.mix(0.8).filled(),
        )
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let Some((x0, x1, y0, y1)) = chart.bounds() else {
            root.titled(chart.title(), ("sans-serif", 28))?;
            return Ok(());
        };
        let (x_min, x_max) = Self::padded(x0, x1);
        let (y_min, y_max) = Self::padded(y0, y1);

        let mut ctx = ChartBuilder::on(root)
            .caption(chart.title(), ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let x_fmt = |v: &f64| match &chart.x_categories {
            Some(labels) => ChartPlotter::category_label(labels, *v),
            None => Self::format_tick(*v),
        };
        let y_fmt = |v: &f64| match &chart.y_categories {
            Some(labels) => ChartPlotter::category_label(labels, *v),
            None => Self::format_tick(*v),
        };

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .draw()?;

        match &chart.geometry {
            Geometry::Points(points) => {
                ctx.draw_series(
                    points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), 3, SERIES.mix(0.8).filled())),
                )?;
            }
            Geometry::Line(points) => {
                ctx.draw_series(LineSeries::new(
                    points.iter().map(|p| (p[0], p[1])),
                    SERIES.stroke_width(2),
                ))?;
            }
            Geometry::Bars(bars) => {
                ctx.draw_series(bars.iter().map(Self::bar_rect))?;
            }
            Geometry::Histogram { bins, kde } => {
                ctx.draw_series(bins.iter().map(Self::bar_rect))?;
                ctx.draw_series(LineSeries::new(
                    kde.iter().map(|p| (p[0], p[1])),
                    KDE.stroke_width(2),
                ))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_ranges() {
        assert_eq!(StaticChartRenderer::padded(2.0, 2.0), (1.5, 2.5));
        let (lo, hi) = StaticChartRenderer::padded(0.0, 10.0);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_format_tick_trims_zeros() {
        assert_eq!(StaticChartRenderer::format_tick(2.0), "2");
        assert_eq!(StaticChartRenderer::format_tick(2.5), "2.5");
        assert_eq!(StaticChartRenderer::format_tick(0.126), "0.13");
        assert_eq!(StaticChartRenderer::format_tick(0.0), "0");
    }
}
