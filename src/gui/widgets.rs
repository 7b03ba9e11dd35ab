//! Shared widgets: DataFrame tables, record tables and status notices.

use crate::data::filter::MISSING_LABEL;
use egui::{Color32, RichText};
use egui_extras::{Column as TableColumn, TableBuilder};
use polars::prelude::{AnyValue, Column, DataFrame};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

/// A user-facing message from a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

pub fn show_notice(ui: &mut egui::Ui, notice: &Notice) {
    let (icon, text, color) = match notice {
        Notice::Info(t) => ("ℹ", t, Color32::from_rgb(100, 149, 237)),
        Notice::Success(t) => ("✔", t, Color32::from_rgb(40, 167, 69)),
        Notice::Warning(t) => ("⚠", t, Color32::from_rgb(243, 156, 18)),
        Notice::Error(t) => ("✖", t, Color32::from_rgb(220, 53, 69)),
    };

    egui::Frame::none()
        .fill(color.gamma_multiply(0.15))
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(format!("{icon} {text}")).color(color));
        });
}

pub fn subheader(ui: &mut egui::Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(text).size(16.0).strong());
    ui.add_space(4.0);
}

/// Text of one cell; missing cells use the missing label.
pub fn cell_text(column: &Column, row: usize) -> String {
    match column.get(row) {
        Ok(AnyValue::Null) => MISSING_LABEL.to_string(),
        Ok(AnyValue::String(s)) => s.to_string(),
        Ok(value) => value.to_string().trim_matches('"').to_string(),
        Err(_) => String::new(),
    }
}

/// Float formatting used by the summary tables.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        MISSING_LABEL.to_string()
    } else {
        format!("{value:.6}")
    }
}

/// Scrollable, virtualised view of a whole DataFrame with a row index.
pub fn show_dataframe(ui: &mut egui::Ui, id_salt: &str, df: &DataFrame, max_height: f32) {
    let columns = df.get_columns();

    ui.push_id(id_salt, |ui| {
        egui::ScrollArea::horizontal().show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(TableColumn::auto().at_least(40.0))
                .columns(TableColumn::auto().at_least(70.0), columns.len())
                .min_scrolled_height(0.0)
                .max_scroll_height(max_height)
                .header(HEADER_HEIGHT, |mut header| {
                    header.col(|ui| {
                        ui.strong("");
                    });
                    for column in columns {
                        header.col(|ui| {
                            ui.strong(column.name().as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, df.height(), |mut row| {
                        let index = row.index();
                        row.col(|ui| {
                            ui.label(RichText::new(index.to_string()).color(Color32::GRAY));
                        });
                        for column in columns {
                            row.col(|ui| {
                                ui.label(cell_text(column, index));
                            });
                        }
                    });
                });
        });
    });

    ui.label(
        RichText::new(format!("{} rows × {} columns", df.height(), df.width()))
            .size(11.0)
            .color(Color32::GRAY),
    );
}

/// Table of pre-formatted rows under the given headers.
pub fn show_records(ui: &mut egui::Ui, id_salt: &str, headers: &[String], rows: &[Vec<String>]) {
    ui.push_id(id_salt, |ui| {
        egui::ScrollArea::horizontal().show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(TableColumn::auto().at_least(80.0), headers.len())
                .min_scrolled_height(0.0)
                .header(HEADER_HEIGHT, |mut header| {
                    for title in headers {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let cells = &rows[row.index()];
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
    });
}
