//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod filter_view;
mod preprocess_view;
mod summary_view;
mod widgets;

pub use app::ExplorerApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use filter_view::FilterView;
pub use preprocess_view::PreprocessView;
pub use summary_view::SummaryView;
