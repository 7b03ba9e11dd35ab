//! Filter page: choose columns and permitted values, show the matching rows.

use crate::data::filter::{cell_label, CellKey};
use crate::data::loader::column_names;
use crate::data::{apply_filters, distinct_values, FilterSet};
use crate::gui::widgets::{show_dataframe, show_notice, subheader, Notice};
use egui::{RichText, ScrollArea};
use polars::prelude::DataFrame;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Widget state of the filter page. Dropped when the page is left.
#[derive(Default)]
pub struct FilterView {
    selected_columns: Vec<String>,
    selections: BTreeMap<String, BTreeSet<CellKey>>,
    distinct: HashMap<String, Result<Vec<CellKey>, String>>,
    filtered: Option<Result<DataFrame, String>>,
}

impl FilterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter set built from the current selections. Columns without any
    /// selected value are left out.
    pub fn filter_set(&self) -> FilterSet {
        self.selected_columns
            .iter()
            .filter_map(|column| {
                let values = self.selections.get(column)?;
                (!values.is_empty()).then(|| (column.clone(), values.clone()))
            })
            .collect()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame, table_height: f32) {
        ui.heading("🔍 Filter Data");
        subheader(ui, "Filter Options");

        let mut changed = false;

        ui.label("Choose columns to filter");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("filter_columns")
                    .max_height(120.0)
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for name in column_names(df) {
                                let mut checked = self.selected_columns.contains(&name);
                                if ui.checkbox(&mut checked, &name).changed() {
                                    if checked {
                                        self.selected_columns.push(name);
                                    } else {
                                        self.selected_columns.retain(|c| c != &name);
                                        self.selections.remove(&name);
                                    }
                                    changed = true;
                                }
                            }
                        });
                    });
            });

        for column in self.selected_columns.clone() {
            ui.add_space(6.0);
            ui.label(format!("Filter values in {column}"));

            let values = self.distinct.entry(column.clone()).or_insert_with(|| {
                distinct_values(df, &column).map_err(|e| e.to_string())
            });
            let values = match values {
                Ok(values) => values,
                Err(e) => {
                    show_notice(ui, &Notice::Error(e.clone()));
                    continue;
                }
            };

            let selected = self.selections.entry(column.clone()).or_default();
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt(format!("filter_values_{column}"))
                        .max_height(120.0)
                        .show(ui, |ui| {
                            ui.horizontal_wrapped(|ui| {
                                for value in values.iter() {
                                    let mut on = selected.contains(value);
                                    if ui.checkbox(&mut on, cell_label(value)).changed() {
                                        if on {
                                            selected.insert(value.clone());
                                        } else {
                                            selected.remove(value);
                                        }
                                        changed = true;
                                    }
                                }
                            });
                        });
                });
        }

        if changed || self.filtered.is_none() {
            let filters = self.filter_set();
            log::debug!("Applying filters on {} column(s)", filters.len());
            self.filtered = Some(apply_filters(df, &filters).map_err(|e| e.to_string()));
        }

        subheader(ui, "Filtered Data");
        match &self.filtered {
            Some(Ok(filtered)) => {
                ui.label(
                    RichText::new(format!("{} of {} rows", filtered.height(), df.height()))
                        .size(12.0),
                );
                show_dataframe(ui, "filtered_table", filtered, table_height);
            }
            Some(Err(e)) => show_notice(ui, &Notice::Error(e.clone())),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_set_skips_columns_without_values() {
        let mut view = FilterView::new();
        view.selected_columns = vec!["A".to_string(), "B".to_string()];
        view.selections.insert("A".to_string(), BTreeSet::new());
        view.selections.insert(
            "B".to_string(),
            [Some("x".to_string())].into_iter().collect(),
        );
        // Selections of a column no longer chosen are ignored
        view.selections.insert(
            "C".to_string(),
            [Some("y".to_string())].into_iter().collect(),
        );

        let filters = view.filter_set();
        assert_eq!(filters.len(), 1);
        assert!(filters.contains_key("B"));
    }
}
