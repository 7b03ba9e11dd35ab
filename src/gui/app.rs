//! CSV Explorer Main Application
//! Main window with the control panel and the page views.

use crate::config::{CsvOptions, ExplorerConfig};
use crate::data::DataLoader;
use crate::gui::control_panel::Page;
use crate::gui::widgets::{show_dataframe, show_notice, subheader, Notice};
use crate::gui::{
    ChartViewer, ControlPanel, ControlPanelAction, FilterView, PreprocessView, SummaryView,
};
use egui::{RichText, SidePanel};
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Where an upload comes from.
enum CsvSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

impl CsvSource {
    fn name(&self) -> String {
        match self {
            CsvSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            CsvSource::Bytes { name, .. } => name.clone(),
        }
    }

    fn read(self, options: &CsvOptions) -> Result<DataFrame, String> {
        let result = match self {
            CsvSource::Path(path) => DataLoader::load_csv(&path, options),
            CsvSource::Bytes { bytes, .. } => DataLoader::parse_csv(bytes, options),
        };
        result.map_err(|e| e.to_string())
    }
}

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete { df: DataFrame, name: String },
    Error(String),
}

/// Main application window.
pub struct ExplorerApp {
    config: ExplorerConfig,
    loader: DataLoader,
    control_panel: ControlPanel,

    filter_view: FilterView,
    chart_viewer: ChartViewer,
    preprocess_view: PreprocessView,
    summary_view: SummaryView,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ExplorerConfig) -> Self {
        Self {
            config,
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            filter_view: FilterView::new(),
            chart_viewer: ChartViewer::new(),
            preprocess_view: PreprocessView::new(),
            summary_view: SummaryView::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Forget all page state so every page starts from its defaults.
    fn reset_views(&mut self) {
        self.filter_view = FilterView::new();
        self.chart_viewer = ChartViewer::new();
        self.preprocess_view = PreprocessView::new();
        self.summary_view = SummaryView::new();
    }

    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(CsvSource::Path(path));
        }
    }

    /// Pick up a `.csv` file dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if self.is_loading {
            return;
        }

        for file in dropped {
            let source = match (file.path, file.bytes) {
                (Some(path), _) => CsvSource::Path(path),
                (None, Some(bytes)) => CsvSource::Bytes {
                    name: file.name,
                    bytes: bytes.to_vec(),
                },
                (None, None) => continue,
            };

            if !source.name().to_lowercase().ends_with(".csv") {
                self.control_panel
                    .set_status(&format!("Error: {} is not a CSV file", source.name()));
                continue;
            }

            self.start_loading(source);
            break;
        }
    }

    /// Parse the upload on a background thread.
    fn start_loading(&mut self, source: CsvSource) {
        let name = source.name();
        log::info!("Loading {name}");

        self.control_panel.file_name = Some(name.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let options = self.config.csv.clone();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            let result = match source.read(&options) {
                Ok(df) => LoadResult::Complete { df, name },
                Err(e) => LoadResult::Error(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_status(&status);
                }
                LoadResult::Complete { df, name } => {
                    self.loader.set_dataframe(df, name);
                    let status = format!(
                        "Loaded {} rows, {} columns",
                        self.loader.get_row_count(),
                        self.loader.get_columns().len()
                    );
                    log::info!(
                        "{status} from {}",
                        self.loader.source_name().unwrap_or_default()
                    );

                    self.control_panel.set_status(&status);
                    self.control_panel.has_data = true;
                    self.control_panel.page = Page::default();
                    self.reset_views();
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
                LoadResult::Error(error) => {
                    log::error!("CSV load failed: {error}");
                    self.control_panel.set_status(&format!("Error: {error}"));
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    fn show_page(&mut self, ui: &mut egui::Ui) {
        let Some(df) = self.loader.get_dataframe() else {
            show_notice(
                ui,
                &Notice::Info("Please upload a CSV file to get started.".to_string()),
            );
            return;
        };
        let table_height = self.config.table_max_height;

        subheader(ui, "📋 Full Dataset");
        show_dataframe(ui, "full_dataset", df, table_height);
        ui.add_space(10.0);
        ui.separator();

        match self.control_panel.page {
            Page::Filter => self.filter_view.show(ui, df, table_height),
            Page::Visualize => self.chart_viewer.show(ui, df, &self.config),
            Page::Preprocess => self.preprocess_view.show(ui, df, table_height),
            Page::Summary => self.summary_view.show(ui, df),
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui, self.is_loading) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::PageChanged => {
                            log::debug!("Switched to {}", self.control_panel.page.label());
                            self.reset_views();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - current page
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("page")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.label(
                        RichText::new("📂✨ CSV Explorer: Upload, Filter & Visualize 📊🔍")
                            .size(24.0)
                            .strong(),
                    );
                    ui.add_space(10.0);
                    self.show_page(ui);
                });
        });
    }
}
