//! Stats module - descriptive statistics

mod calculator;

pub use calculator::{ColumnDetail, Describe, NumericSummary, StatsCalculator, TextSummary};
