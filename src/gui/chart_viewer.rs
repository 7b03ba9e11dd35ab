//! Chart Viewer Widget
//! Visualize page: pick X/Y columns and a chart kind, draw the chart with
//! egui_plot and export it as PNG.

use crate::charts::{build_chart, ChartData, ChartKind, ChartPlotter, StaticChartRenderer};
use crate::config::ExplorerConfig;
use crate::data::loader::column_names;
use crate::gui::widgets::{show_notice, subheader, Notice};
use egui::{ComboBox, RichText};
use polars::prelude::DataFrame;

const CHART_HEIGHT: f32 = 380.0;
const LABEL_WIDTH: f32 = 110.0;
const COMBO_WIDTH: f32 = 200.0;

/// Widget state of the visualize page. Dropped when the page is left.
#[derive(Default)]
pub struct ChartViewer {
    x_col: Option<String>,
    y_col: Option<String>,
    kind: ChartKind,
    chart: Option<Result<ChartData, String>>,
    export_notice: Option<Notice>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    fn column_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        columns: &[String],
        current: &mut Option<String>,
    ) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(COMBO_WIDTH)
                .selected_text(current.clone().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for col in columns {
                        if ui
                            .selectable_label(current.as_deref() == Some(col.as_str()), col)
                            .clicked()
                            && current.as_deref() != Some(col.as_str())
                        {
                            *current = Some(col.clone());
                            changed = true;
                        }
                    }
                });
        });
        changed
    }

    /// Keep a selection valid for the current columns; defaults to the first.
    fn ensure_selection(current: &mut Option<String>, columns: &[String]) -> bool {
        let valid = current.as_ref().is_some_and(|c| columns.contains(c));
        if !valid {
            *current = columns.first().cloned();
        }
        !valid
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame, config: &ExplorerConfig) {
        ui.heading("📈 Visualize Data");

        let columns = column_names(df);
        if columns.is_empty() {
            show_notice(
                ui,
                &Notice::Warning("No columns available for visualization.".to_string()),
            );
            return;
        }

        let mut changed = Self::ensure_selection(&mut self.x_col, &columns);
        changed |= Self::ensure_selection(&mut self.y_col, &columns);

        ui.add_space(6.0);
        changed |= Self::column_combo(ui, "x_col", "Choose X-axis", &columns, &mut self.x_col);
        ui.add_space(4.0);
        changed |= Self::column_combo(ui, "y_col", "Choose Y-axis", &columns, &mut self.y_col);

        subheader(ui, "Select Chart Type");
        ui.horizontal(|ui| {
            for kind in ChartKind::ALL {
                if ui.radio_value(&mut self.kind, kind, kind.title()).changed() {
                    changed = true;
                }
            }
        });
        if !self.kind.uses_y() {
            ui.label(
                RichText::new("The Y-axis column is not used by histograms.")
                    .size(11.0)
                    .color(egui::Color32::GRAY),
            );
        }

        if changed || self.chart.is_none() {
            let x = self.x_col.clone().unwrap_or_default();
            let y = self.y_col.clone().unwrap_or_default();
            log::debug!("Building {} for x={x}, y={y}", self.kind.title());
            self.chart = Some(build_chart(df, &x, &y, self.kind).map_err(|e| e.to_string()));
            self.export_notice = None;
        }

        ui.add_space(8.0);
        match &self.chart {
            Some(Ok(chart)) => {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(chart.title()).size(16.0).strong());
                });
                ChartPlotter::draw_chart(ui, chart, CHART_HEIGHT);

                ui.add_space(6.0);
                if ui.button("💾 Save PNG").clicked() {
                    self.export_notice = Self::export_png(chart, config);
                }
            }
            Some(Err(e)) => show_notice(ui, &Notice::Error(e.clone())),
            None => {}
        }

        if let Some(notice) = &self.export_notice {
            show_notice(ui, notice);
        }
    }

    /// Ask for a target file and render the chart there.
    fn export_png(chart: &ChartData, config: &ExplorerConfig) -> Option<Notice> {
        let file_name = format!("{}.png", chart.title().to_lowercase().replace(' ', "_"));
        let path = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name)
            .save_file()?;

        match StaticChartRenderer::save_png(
            chart,
            &path,
            config.export_width,
            config.export_height,
        ) {
            Ok(()) => Some(Notice::Success(format!("Chart saved to {}", path.display()))),
            Err(e) => {
                log::error!("PNG export failed: {e:#}");
                Some(Notice::Error(format!("{e:#}")))
            }
        }
    }
}
