//! Data Processor Module
//! Missing-value reporting and handling (fill / drop).

use crate::data::loader::{is_integer_dtype, is_numeric_dtype};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Invalid custom value '{0}'. Please enter a valid number or text.")]
    InvalidFillValue(String),
}

/// Missing entries of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingSummary {
    pub column: String,
    pub missing: usize,
    pub percent: f64,
}

/// Missing count and percentage per column. An empty table reports 0%.
pub fn missing_summary(df: &DataFrame) -> Vec<MissingSummary> {
    let rows = df.height();
    df.get_columns()
        .iter()
        .map(|col| {
            let missing = col.null_count();
            let percent = if rows == 0 {
                0.0
            } else {
                missing as f64 / rows as f64 * 100.0
            };
            MissingSummary {
                column: col.name().to_string(),
                missing,
                percent,
            }
        })
        .collect()
}

/// Total missing entries across all columns.
pub fn total_missing(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

/// How missing values are handled on the preprocessing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAction {
    #[default]
    Fill,
    Drop,
}

impl MissingAction {
    pub fn label(self) -> &'static str {
        match self {
            MissingAction::Fill => "Fill with Custom Value",
            MissingAction::Drop => "Drop Rows",
        }
    }
}

/// Replacement for missing entries.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Number(f64),
    Text(String),
}

impl FillValue {
    /// Classify user input. Empty input means no fill.
    ///
    /// Input is numeric-looking when, without an optional leading `-` and at
    /// most one `.`, it is non-empty and made of digits only. Superscript and
    /// subscript digits count as digits but cannot be parsed, so they are an
    /// error. Any other numeric character (`½`, `Ⅻ`) is plain text.
    pub fn parse(input: &str) -> Result<Option<Self>, ProcessorError> {
        if input.is_empty() {
            return Ok(None);
        }

        let unsigned = input.strip_prefix('-').unwrap_or(input);
        let digits = unsigned.replacen('.', "", 1);
        let numeric_looking = !digits.is_empty()
            && digits
                .chars()
                .all(|c| c.is_ascii_digit() || is_digit_glyph(c));

        if !numeric_looking {
            return Ok(Some(FillValue::Text(input.to_string())));
        }

        input
            .parse::<f64>()
            .map(|n| Some(FillValue::Number(n)))
            .map_err(|_| ProcessorError::InvalidFillValue(input.to_string()))
    }
}

/// Superscript and subscript digits.
fn is_digit_glyph(c: char) -> bool {
    matches!(c, '⁰' | '¹' | '²' | '³' | '⁴'..='⁹' | '₀'..='₉')
}

/// Numbers always render with a fractional part (`0.0`, `-4.0`).
impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Number(n) => write!(f, "{n:?}"),
            FillValue::Text(s) => f.write_str(s),
        }
    }
}

fn fits_integer(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() <= i64::MAX as f64
}

/// Fill one column's nulls with `value`, converting its type as needed.
fn fill_column(column: &Column, value: &FillValue) -> PolarsResult<Series> {
    let series = column.as_materialized_series();
    let dtype = series.dtype();

    let filled = match value {
        FillValue::Number(n) if is_integer_dtype(dtype) && fits_integer(*n) => series
            .cast(&DataType::Int64)?
            .i64()?
            .fill_null_with_values(*n as i64)?
            .into_series(),
        FillValue::Number(n) if is_numeric_dtype(dtype) => series
            .cast(&DataType::Float64)?
            .f64()?
            .fill_null_with_values(*n)?
            .into_series(),
        _ => {
            let text = value.to_string();
            let strings = series.cast(&DataType::String)?;
            let ca = strings.str()?;
            ca.set(&ca.is_null(), Some(text.as_str()))?.into_series()
        }
    };
    Ok(filled)
}

/// Replace every missing entry in the table with `value`.
///
/// Integer columns stay integer for integral numbers and become float
/// otherwise. Columns that cannot hold the value become text. Columns are
/// replaced by position, so any header text is taken literally.
pub fn fill_missing(df: &DataFrame, value: &FillValue) -> Result<DataFrame, ProcessorError> {
    let mut out = df.clone();
    for (idx, column) in df.get_columns().iter().enumerate() {
        if column.null_count() == 0 {
            continue;
        }
        out.replace_column(idx, fill_column(column, value)?)?;
    }
    Ok(out)
}

/// Remove every row holding at least one missing entry.
pub fn drop_missing(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
    Ok(df.drop_nulls::<String>(None)?)
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

    #[test]
    fn test_fill_zero_keeps_integer_column() {
        let df = sample();
        let value = FillValue::parse("0").unwrap().unwrap();
        assert_eq!(value, FillValue::Number(0.0));

        let out = fill_missing(&df, &value).unwrap();
        assert_eq!(total_missing(&out), 0);

        let a = out.column("A").unwrap();
        assert_eq!(a.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = a.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(2), Some(0)]);
        assert!(out
            .column("B")
            .unwrap()
            .as_materialized_series()
            .equals(df.column("B").unwrap().as_materialized_series()));
    }

    #[test]
    fn test_fill_fraction_promotes_to_float() {
        let out = fill_missing(&sample(), &FillValue::Number(2.5)).unwrap();

        let a = out.column("A").unwrap();
        assert_eq!(a.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = a.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(2.5)]);
    }

    #[test]
    fn test_fill_text_turns_numeric_column_into_text() {
        let df = df![
            "n" => [Some(1.5f64), None],
            "s" => [None, Some("b")],
        ]
        .unwrap();
        let value = FillValue::parse("unknown").unwrap().unwrap();

        let out = fill_missing(&df, &value).unwrap();
        assert_eq!(total_missing(&out), 0);
        assert_eq!(out.column("n").unwrap().str().unwrap().get(1), Some("unknown"));
        assert_eq!(out.column("s").unwrap().str().unwrap().get(0), Some("unknown"));
    }

    #[test]
    fn test_fill_number_into_text_column_uses_its_rendering() {
        let df = df!["s" => [None, Some("b")]].unwrap();
        let out = fill_missing(&df, &FillValue::Number(7.0)).unwrap();
        assert_eq!(out.column("s").unwrap().str().unwrap().get(0), Some("7.0"));
    }

    #[test]
    fn test_fill_leaves_complete_columns_alone() {
        let df = df![
            "i" => [1i64, 2],
            "f" => [Some(0.5f64), None],
        ]
        .unwrap();

        let out = fill_missing(&df, &FillValue::Text("x".to_string())).unwrap();
        assert_eq!(out.column("i").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("f").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_parse_fill_values() {
        assert_eq!(FillValue::parse("").unwrap(), None);
        assert_eq!(
            FillValue::parse("3.25").unwrap(),
            Some(FillValue::Number(3.25))
        );
        assert_eq!(
            FillValue::parse("-4").unwrap(),
            Some(FillValue::Number(-4.0))
        );
        assert_eq!(
            FillValue::parse("1.2.3").unwrap(),
            Some(FillValue::Text("1.2.3".to_string()))
        );
        assert_eq!(
            FillValue::parse("1e5").unwrap(),
            Some(FillValue::Text("1e5".to_string()))
        );
        assert_eq!(
            FillValue::parse(".").unwrap(),
            Some(FillValue::Text(".".to_string()))
        );
    }

    #[test]
    fn test_superscript_digits_are_rejected() {
        for input in ["²", "-³", "1.⁵", "₂"] {
            let err = FillValue::parse(input).unwrap_err();
            assert!(matches!(err, ProcessorError::InvalidFillValue(_)), "{input}");
        }
    }

    #[test]
    fn test_other_numeric_characters_are_text() {
        for input in ["½", "Ⅻ", "٣", "３"] {
            assert_eq!(
                FillValue::parse(input).unwrap(),
                Some(FillValue::Text(input.to_string()))
            );
        }
    }

    #[test]
    fn test_fill_value_renders_numbers_as_floats() {
        assert_eq!(FillValue::Number(0.0).to_string(), "0.0");
        assert_eq!(FillValue::Number(-4.0).to_string(), "-4.0");
        assert_eq!(FillValue::Number(3.25).to_string(), "3.25");
        assert_eq!(FillValue::Text("n/a".to_string()).to_string(), "n/a");
    }

    #[test]
    fn test_fill_number_into_boolean_column_becomes_text() {
        let df = df!["flag" => [Some(true), None]].unwrap();

        let out = fill_missing(&df, &FillValue::Number(0.0)).unwrap();
        let flag = out.column("flag").unwrap();
        assert_eq!(flag.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = flag.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("true"), Some("0.0")]);
    }

    #[test]
    fn test_fill_takes_wildcard_like_headers_literally() {
        let df = df![
            "*" => [None, Some(1i64)],
            "^a.*$" => [Some("x"), None],
            "a1" => [Some(2.5f64), Some(3.5)],
        ]
        .unwrap();

        let out = fill_missing(&df, &FillValue::Number(0.0)).unwrap();
        assert_eq!(out.get_column_names(), df.get_column_names());
        assert_eq!(out.column("*").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("*").unwrap().i64().unwrap().get(0), Some(0));
        assert_eq!(out.column("^a.*$").unwrap().str().unwrap().get(1), Some("0.0"));
        assert!(out
            .column("a1")
            .unwrap()
            .as_materialized_series()
            .equals(df.column("a1").unwrap().as_materialized_series()));
    }

    #[test]
    fn test_drop_removes_rows_with_missing() {
        let df = sample();
        let out = drop_missing(&df).unwrap();

        assert_eq!(out.height(), 2);
        assert_eq!(total_missing(&out), 0);
        assert!(out.equals_missing(&df.head(Some(2))));
    }

    #[test]
    fn test_drop_on_complete_table_is_identity() {
        let df = df!["a" => [1i64, 2, 3]].unwrap();
        assert!(drop_missing(&df).unwrap().equals(&df));
    }

    #[test]
    fn test_missing_summary_percentages() {
        let df = df![
            "a" => [Some(1i64), None, None, Some(4)],
            "b" => ["p", "q", "r", "s"],
        ]
        .unwrap();

        let summary = missing_summary(&df);
        assert_eq!(
            summary,
            vec![
                MissingSummary {
                    column: "a".to_string(),
                    missing: 2,
                    percent: 50.0,
                },
                MissingSummary {
                    column: "b".to_string(),
                    missing: 0,
                    percent: 0.0,
                },
            ]
        );
    }

    #[test]
    fn test_missing_summary_empty_table() {
        let df = DataFrame::new(vec![Column::new("a".into(), Vec::<i64>::new())]).unwrap();
        let summary = missing_summary(&df);
        assert_eq!(summary[0].missing, 0);
        assert_eq!(summary[0].percent, 0.0);
    }
}
