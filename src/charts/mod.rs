//! Charts module - Chart data, interactive plotting and static rendering

mod chart_data;
mod plotter;
mod renderer;

pub use chart_data::{build_chart, BarSpec, ChartData, ChartKind, Geometry};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
