//! CSV Explorer - upload a CSV file, then filter, visualize, clean and
//! summarize it in a desktop window.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use config::ExplorerConfig;
use eframe::egui;
use gui::ExplorerApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ExplorerConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title("CSV Explorer"),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Explorer",
        options,
        Box::new(|cc| Ok(Box::new(ExplorerApp::new(cc, config)))),
    )
}
