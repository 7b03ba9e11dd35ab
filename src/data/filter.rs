//! Row filtering by permitted values per column.

use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Label shown for a missing cell.
pub const MISSING_LABEL: &str = "NaN";

/// A cell identified by its text rendering; `None` is the missing marker.
pub type CellKey = Option<String>;

/// Per-column permitted values: column name -> selected values.
/// A column that is absent, or whose set is empty, does not restrict rows.
pub type FilterSet = BTreeMap<String, BTreeSet<CellKey>>;

/// Display label for a cell key.
pub fn cell_label(key: &CellKey) -> &str {
    key.as_deref().unwrap_or(MISSING_LABEL)
}

/// Render a column as text keys, one per row.
fn text_keys(column: &Column) -> PolarsResult<Vec<CellKey>> {
    let text = column.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Distinct values of a column in first-appearance order, missing included.
pub fn distinct_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<CellKey>> {
    let keys = text_keys(df.column(column)?)?;
    let mut seen = HashSet::new();
    Ok(keys.into_iter().filter(|k| seen.insert(k.clone())).collect())
}

/// Keep rows whose value in every restricted column is permitted.
pub fn apply_filters(df: &DataFrame, filters: &FilterSet) -> PolarsResult<DataFrame> {
    let mut keep = vec![true; df.height()];

    for (column, permitted) in filters {
        if permitted.is_empty() {
            continue;
        }
        let keys = text_keys(df.column(column)?)?;
        for (flag, key) in keep.iter_mut().zip(keys.iter()) {
            *flag = *flag && permitted.contains(key);
        }
    }

    if keep.iter().all(|&k| k) {
        return Ok(df.clone());
    }

    let mask: BooleanChunked = keep.into_iter().collect();
    df.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df![
            "A" => [Some(1i64), Some(2), None],
            "B" => ["x", "y", "z"],
        ]
        .unwrap()
    }

    fn rows_as_text(df: &DataFrame) -> Vec<Vec<CellKey>> {
        let columns: Vec<Vec<CellKey>> = df
            .get_columns()
            .iter()
            .map(|c| text_keys(c).unwrap())
            .collect();
        (0..df.height())
            .map(|i| columns.iter().map(|c| c[i].clone()).collect())
            .collect()
    }

    fn set(values: &[Option<&str>]) -> BTreeSet<CellKey> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_filter_on_text_column() {
        let df = sample();
        let mut filters = FilterSet::new();
        filters.insert("B".to_string(), set(&[Some("x"), Some("y")]));

        let out = apply_filters(&df, &filters).unwrap();
        assert!(out.equals_missing(&df.head(Some(2))));
    }

    #[test]
    fn test_empty_filter_set_returns_table() {
        let df = sample();
        let out = apply_filters(&df, &FilterSet::new()).unwrap();
        assert!(out.equals_missing(&df));
    }

    #[test]
    fn test_column_without_selection_is_no_restriction() {
        let df = sample();
        let mut filters = FilterSet::new();
        filters.insert("A".to_string(), BTreeSet::new());

        let out = apply_filters(&df, &filters).unwrap();
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let df = sample();
        let mut filters = FilterSet::new();
        filters.insert("A".to_string(), set(&[Some("1"), None]));
        filters.insert("B".to_string(), set(&[Some("x"), Some("y")]));

        let out = apply_filters(&df, &filters).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(out.column("B").unwrap().str().unwrap().get(0), Some("x"));
    }

    #[test]
    fn test_missing_marker_can_be_permitted() {
        let df = sample();
        let mut filters = FilterSet::new();
        filters.insert("A".to_string(), set(&[None]));

        let out = apply_filters(&df, &filters).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(out.column("B").unwrap().str().unwrap().get(0), Some("z"));
    }

    #[test]
    fn test_filtered_rows_exist_in_source() {
        let df = df![
            "k" => ["a", "b", "a", "c", "b"],
            "v" => [1.5f64, 2.0, 3.5, 4.0, 5.5],
        ]
        .unwrap();
        let mut filters = FilterSet::new();
        filters.insert("k".to_string(), set(&[Some("a"), Some("c")]));

        let out = apply_filters(&df, &filters).unwrap();
        let source_rows = rows_as_text(&df);
        for row in rows_as_text(&out) {
            assert!(source_rows.contains(&row));
        }
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_distinct_values_keep_order_and_missing() {
        let df = df![
            "n" => [Some(3i64), Some(1), None, Some(3), None],
        ]
        .unwrap();

        let values = distinct_values(&df, "n").unwrap();
        assert_eq!(
            values,
            vec![Some("3".to_string()), Some("1".to_string()), None]
        );
        assert_eq!(cell_label(&values[2]), MISSING_LABEL);
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let mut filters = FilterSet::new();
        filters.insert("nope".to_string(), set(&[Some("x")]));
        assert!(apply_filters(&sample(), &filters).is_err());
    }
}
