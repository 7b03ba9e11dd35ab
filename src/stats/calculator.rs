//! Statistics Calculator Module
//! Descriptive statistics and per-column details for the summary page.

use crate::data::loader::is_numeric_dtype;
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Count / unique / top / freq of a non-numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Statistical summary of a table. Text columns are only described when
/// the table has no numeric column.
#[derive(Debug, Clone, Default)]
pub struct Describe {
    pub numeric: Vec<NumericSummary>,
    pub text: Vec<TextSummary>,
}

/// Data type and cardinality of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDetail {
    pub column: String,
    pub dtype: String,
    pub unique: usize,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> NumericSummary {
        let n = values.len();
        if n == 0 {
            return NumericSummary::empty(column);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        NumericSummary {
            column: column.to_string(),
            count: n,
            mean: values.iter().mean(),
            // Sample standard deviation, NaN below two values
            std: values.iter().std_dev(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Present values of a column as f64.
    pub fn numeric_values(column: &Column) -> PolarsResult<Vec<f64>> {
        let values = column.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().flatten().collect())
    }

    fn text_summary(column: &Column) -> PolarsResult<TextSummary> {
        let text = column.cast(&DataType::String)?;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for value in text.str()?.into_iter().flatten() {
            let count = counts.entry(value).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }

        // First seen wins ties
        let mut top: Option<(&str, usize)> = None;
        for &value in &order {
            let freq = counts[value];
            let better = match top {
                Some((_, best)) => freq > best,
                None => true,
            };
            if better {
                top = Some((value, freq));
            }
        }

        Ok(TextSummary {
            column: column.name().to_string(),
            count: column.len() - column.null_count(),
            unique: order.len(),
            top: top.map(|(v, _)| v.to_string()),
            freq: top.map(|(_, f)| f).unwrap_or(0),
        })
    }

    /// Describe every numeric column in parallel, or the text columns when
    /// the table has no numeric column.
    pub fn describe(df: &DataFrame) -> Result<Describe, StatsError> {
        let columns = df.get_columns();
        let has_numeric = columns.iter().any(|c| is_numeric_dtype(c.dtype()));

        if has_numeric {
            let numeric = columns
                .par_iter()
                .filter(|c| is_numeric_dtype(c.dtype()))
                .map(|c| {
                    let values = Self::numeric_values(c)?;
                    Ok(Self::compute_descriptive_stats(c.name().as_str(), &values))
                })
                .collect::<PolarsResult<Vec<_>>>()?;
            return Ok(Describe {
                numeric,
                text: Vec::new(),
            });
        }

        let text = columns
            .par_iter()
            .map(Self::text_summary)
            .collect::<PolarsResult<Vec<_>>>()?;
        Ok(Describe {
            numeric: Vec::new(),
            text,
        })
    }

    /// Data type and distinct non-missing count per column.
    pub fn column_details(df: &DataFrame) -> Result<Vec<ColumnDetail>, StatsError> {
        let details = df
            .get_columns()
            .par_iter()
            .map(|c| {
                let unique = c.as_materialized_series().drop_nulls().n_unique()?;
                Ok(ColumnDetail {
                    column: c.name().to_string(),
                    dtype: c.dtype().to_string(),
                    unique,
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_descriptive_stats_match_pandas() {
        let s = StatsCalculator::compute_descriptive_stats("v", &[4.0, 1.0, 3.0, 2.0]);

        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.std, 1.2909944487358056));
        assert!(approx(s.min, 1.0));
        assert!(approx(s.q25, 1.75));
        assert!(approx(s.median, 2.5));
        assert!(approx(s.q75, 3.25));
        assert!(approx(s.max, 4.0));
    }

    #[test]
    fn test_single_value_has_nan_std() {
        let s = StatsCalculator::compute_descriptive_stats("v", &[7.0]);
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert!(approx(s.q75, 7.0));
    }

    #[test]
    fn test_describe_skips_missing_and_text() {
        let df = df![
            "A" => [Some(1i64), Some(2), None],
            "B" => ["x", "y", "z"],
            "C" => [0.5f64, 1.5, 2.5],
        ]
        .unwrap();

        let describe = StatsCalculator::describe(&df).unwrap();
        assert!(describe.text.is_empty());
        assert_eq!(describe.numeric.len(), 2);

        let a = &describe.numeric[0];
        assert_eq!(a.column, "A");
        assert_eq!(a.count, 2);
        assert!(approx(a.mean, 1.5));
        assert_eq!(describe.numeric[1].column, "C");
    }

    #[test]
    fn test_describe_text_only_table() {
        let df = df![
            "B" => [Some("x"), Some("y"), Some("y"), None, Some("x")],
        ]
        .unwrap();

        let describe = StatsCalculator::describe(&df).unwrap();
        assert!(describe.numeric.is_empty());
        assert_eq!(
            describe.text,
            vec![TextSummary {
                column: "B".to_string(),
                count: 4,
                unique: 2,
                top: Some("x".to_string()),
                freq: 2,
            }]
        );
    }

    #[test]
    fn test_column_details_count_non_missing_distinct() {
        let df = df![
            "A" => [Some(1i64), Some(1), None],
            "B" => ["x", "y", "z"],
        ]
        .unwrap();

        let details = StatsCalculator::column_details(&df).unwrap();
        assert_eq!(
            details,
            vec![
                ColumnDetail {
                    column: "A".to_string(),
                    dtype: "i64".to_string(),
                    unique: 1,
                },
                ColumnDetail {
                    column: "B".to_string(),
                    dtype: "str".to_string(),
                    unique: 3,
                },
            ]
        );
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0];
        assert!(approx(StatsCalculator::percentile(&sorted, 50.0), 20.0));
        assert!(approx(StatsCalculator::percentile(&sorted, 25.0), 15.0));
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }
}
