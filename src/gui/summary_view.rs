//! Summary page: describe-style statistics and per-column details.

use crate::data::filter::MISSING_LABEL;
use crate::gui::widgets::{format_float, show_notice, show_records, subheader, Notice};
use crate::stats::{ColumnDetail, Describe, NumericSummary, StatsCalculator, TextSummary};
use polars::prelude::DataFrame;

/// Header row plus one row per statistic, one column per described column.
type Grid = (Vec<String>, Vec<Vec<String>>);

fn numeric_grid(summaries: &[NumericSummary]) -> Grid {
    let stats: [(&str, fn(&NumericSummary) -> String); 8] = [
        ("count", |s| format_float(s.count as f64)),
        ("mean", |s| format_float(s.mean)),
        ("std", |s| format_float(s.std)),
        ("min", |s| format_float(s.min)),
        ("25%", |s| format_float(s.q25)),
        ("50%", |s| format_float(s.median)),
        ("75%", |s| format_float(s.q75)),
        ("max", |s| format_float(s.max)),
    ];
    grid(summaries.iter().map(|s| s.column.clone()), &stats, summaries)
}

fn text_grid(summaries: &[TextSummary]) -> Grid {
    let stats: [(&str, fn(&TextSummary) -> String); 4] = [
        ("count", |s| s.count.to_string()),
        ("unique", |s| s.unique.to_string()),
        ("top", |s| s.top.clone().unwrap_or_else(|| MISSING_LABEL.to_string())),
        ("freq", |s| s.freq.to_string()),
    ];
    grid(summaries.iter().map(|s| s.column.clone()), &stats, summaries)
}

fn grid<T>(
    columns: impl Iterator<Item = String>,
    stats: &[(&str, fn(&T) -> String)],
    summaries: &[T],
) -> Grid {
    let headers = std::iter::once(String::new()).chain(columns).collect();
    let rows = stats
        .iter()
        .map(|(name, cell)| {
            std::iter::once(name.to_string())
                .chain(summaries.iter().map(cell))
                .collect()
        })
        .collect();
    (headers, rows)
}

/// Rows of the statistical summary table.
pub fn describe_grid(describe: &Describe) -> Grid {
    if describe.numeric.is_empty() {
        text_grid(&describe.text)
    } else {
        numeric_grid(&describe.numeric)
    }
}

fn details_rows(details: &[ColumnDetail]) -> Vec<Vec<String>> {
    details
        .iter()
        .map(|d| vec![d.column.clone(), d.dtype.clone(), d.unique.to_string()])
        .collect()
}

/// Cached summaries of the current table. Dropped when the page is left.
#[derive(Default)]
pub struct SummaryView {
    describe: Option<Result<Grid, String>>,
    details: Option<Result<Vec<Vec<String>>, String>>,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        ui.heading("📊 Data Summary");

        subheader(ui, "Statistical Summary");
        let describe = self.describe.get_or_insert_with(|| {
            log::debug!("Describing {} column(s)", df.width());
            StatsCalculator::describe(df)
                .map(|d| describe_grid(&d))
                .map_err(|e| e.to_string())
        });
        match describe {
            Ok((headers, rows)) if headers.len() > 1 => {
                show_records(ui, "describe_table", headers, rows)
            }
            Ok(_) => show_notice(ui, &Notice::Info("No columns to describe.".to_string())),
            Err(e) => show_notice(ui, &Notice::Error(e.clone())),
        }

        subheader(ui, "Column Details");
        let details = self.details.get_or_insert_with(|| {
            StatsCalculator::column_details(df)
                .map(|d| details_rows(&d))
                .map_err(|e| e.to_string())
        });
        match details {
            Ok(rows) => {
                let headers = ["Column", "Data Type", "Unique Values"].map(String::from);
                show_records(ui, "details_table", &headers, rows);
            }
            Err(e) => show_notice(ui, &Notice::Error(e.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_numeric_grid_has_one_row_per_statistic() {
        let df = df![
            "A" => [1.0, 2.0, 3.0],
            "B" => ["x", "y", "x"],
        ]
        .unwrap();
        let (headers, rows) = describe_grid(&StatsCalculator::describe(&df).unwrap());

        assert_eq!(headers, vec!["".to_string(), "A".to_string()]);
        let names: Vec<_> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
        assert_eq!(rows[0][1], "3.000000");
        assert_eq!(rows[1][1], "2.000000");
        assert_eq!(rows[2][1], "1.000000");
    }

    #[test]
    fn test_text_grid_when_no_numeric_columns() {
        let df = df!["B" => ["x", "y", "x"]].unwrap();
        let (headers, rows) = describe_grid(&StatsCalculator::describe(&df).unwrap());

        assert_eq!(headers.len(), 2);
        assert_eq!(rows[0], vec!["count", "3"]);
        assert_eq!(rows[1], vec!["unique", "2"]);
        assert_eq!(rows[2], vec!["top", "x"]);
        assert_eq!(rows[3], vec!["freq", "2"]);
    }

    #[test]
    fn test_details_rows() {
        let details = vec![ColumnDetail {
            column: "A".to_string(),
            dtype: "i64".to_string(),
            unique: 2,
        }];
        assert_eq!(details_rows(&details), vec![vec!["A", "i64", "2"]]);
    }
}
