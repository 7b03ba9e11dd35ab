//! Preprocessing page: missing-value report plus fill / drop handling.

use crate::data::processor::total_missing;
use crate::data::{drop_missing, fill_missing, missing_summary, FillValue, MissingAction};
use crate::gui::widgets::{show_dataframe, show_notice, show_records, subheader, Notice};
use polars::prelude::DataFrame;

/// Table produced by the chosen action and the message to show with it.
pub struct Outcome {
    pub table: DataFrame,
    pub notice: Option<Notice>,
}

/// Apply the chosen missing-value action. Failures keep the table unchanged.
pub fn handle_missing(df: &DataFrame, action: MissingAction, fill_text: &str) -> Outcome {
    let unchanged = |notice| Outcome {
        table: df.clone(),
        notice,
    };

    match action {
        MissingAction::Fill => match FillValue::parse(fill_text) {
            Ok(None) => unchanged(None),
            Ok(Some(value)) => match fill_missing(df, &value) {
                Ok(table) => {
                    log::info!("Filled {} missing value(s) with {value}", total_missing(df));
                    Outcome {
                        table,
                        notice: Some(Notice::Success(format!(
                            "Missing values filled with custom value: {value}"
                        ))),
                    }
                }
                Err(e) => unchanged(Some(Notice::Error(e.to_string()))),
            },
            Err(e) => {
                log::warn!("Rejected fill value {fill_text:?}");
                unchanged(Some(Notice::Error(e.to_string())))
            }
        },
        MissingAction::Drop => match drop_missing(df) {
            Ok(table) => {
                log::info!("Dropped {} row(s) with missing values", df.height() - table.height());
                Outcome {
                    table,
                    notice: Some(Notice::Success(
                        "Rows with missing values dropped.".to_string(),
                    )),
                }
            }
            Err(e) => unchanged(Some(Notice::Error(e.to_string()))),
        },
    }
}

/// Widget state of the preprocessing page. Dropped when the page is left.
#[derive(Default)]
pub struct PreprocessView {
    action: MissingAction,
    fill_text: String,
    missing_rows: Option<Vec<Vec<String>>>,
    outcome: Option<Outcome>,
}

impl PreprocessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame, table_height: f32) {
        ui.heading("🧹 Data Preprocessing");

        subheader(ui, "Missing Data");
        let rows = self.missing_rows.get_or_insert_with(|| {
            missing_summary(df)
                .into_iter()
                .map(|m| {
                    vec![
                        m.column,
                        m.missing.to_string(),
                        format!("{:.2}", m.percent),
                    ]
                })
                .collect()
        });
        let headers = ["Column", "Missing Values", "% Missing"].map(String::from);
        show_records(ui, "missing_table", &headers, rows);

        subheader(ui, "Handle Missing Values");
        ui.label("Choose an option to handle missing values:");

        let mut changed = false;
        ui.horizontal(|ui| {
            for action in [MissingAction::Fill, MissingAction::Drop] {
                if ui.radio_value(&mut self.action, action, action.label()).changed() {
                    changed = true;
                }
            }
        });

        if self.action == MissingAction::Fill {
            ui.horizontal(|ui| {
                ui.label("Enter the value to fill missing values:");
                if ui.text_edit_singleline(&mut self.fill_text).changed() {
                    changed = true;
                }
            });
        }

        if changed || self.outcome.is_none() {
            self.outcome = Some(handle_missing(df, self.action, &self.fill_text));
        }

        if let Some(outcome) = &self.outcome {
            if let Some(notice) = &outcome.notice {
                ui.add_space(4.0);
                show_notice(ui, notice);
            }
            ui.add_space(6.0);
            show_dataframe(ui, "preprocessed_table", &outcome.table, table_height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        df![
            "A" => [Some(1i64), Some(2), None],
            "B" => ["x", "y", "z"],
        ]
        .unwrap()
    }

    #[test]
    fn test_empty_fill_text_keeps_table() {
        let df = sample();
        let outcome = handle_missing(&df, MissingAction::Fill, "");
        assert!(outcome.notice.is_none());
        assert!(outcome.table.equals_missing(&df));
    }

    #[test]
    fn test_fill_reports_success() {
        let outcome = handle_missing(&sample(), MissingAction::Fill, "0");
        assert_eq!(total_missing(&outcome.table), 0);
        assert_eq!(
            outcome.notice,
            Some(Notice::Success(
                "Missing values filled with custom value: 0.0".to_string()
            ))
        );
    }

    #[test]
    fn test_invalid_fill_value_leaves_table_unchanged() {
        let df = sample();
        let outcome = handle_missing(&df, MissingAction::Fill, "²");
        assert!(matches!(outcome.notice, Some(Notice::Error(_))));
        assert!(outcome.table.equals_missing(&df));
    }

    #[test]
    fn test_drop_ignores_fill_text() {
        let outcome = handle_missing(&sample(), MissingAction::Drop, "ignored");
        assert_eq!(outcome.table.height(), 2);
        assert_eq!(
            outcome.notice,
            Some(Notice::Success("Rows with missing values dropped.".to_string()))
        );
    }
}
