//! Chart Data Module
//! Derives plot geometry (points, lines, bars, histogram bins) from two columns.

use crate::data::loader::is_numeric_dtype;
use crate::stats::StatsCalculator;
use polars::prelude::*;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use thiserror::Error;

/// Points on the KDE curve.
const KDE_GRID_SIZE: usize = 200;
/// Above this many Freedman-Diaconis bins the Sturges count is used instead.
const MAX_HISTOGRAM_BINS: usize = 2000;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No columns available for visualization.")]
    NoColumns,
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Column '{0}' must be numeric for a {1}")]
    NonNumeric(String, &'static str),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Scatter,
    Line,
    Bar,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Histogram,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Line => "Line Plot",
            ChartKind::Bar => "Bar Plot",
            ChartKind::Histogram => "Histogram",
        }
    }

    /// The Y column is ignored for histograms.
    pub fn uses_y(self) -> bool {
        self != ChartKind::Histogram
    }
}

/// One bar: centre on the X axis, width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpec {
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawable geometry in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Points(Vec<[f64; 2]>),
    Line(Vec<[f64; 2]>),
    Bars(Vec<BarSpec>),
    Histogram { bins: Vec<BarSpec>, kde: Vec<[f64; 2]> },
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    /// Category labels when the X axis is categorical (plotted at 0, 1, 2, ...)
    pub x_categories: Option<Vec<String>>,
    pub y_categories: Option<Vec<String>>,
    pub geometry: Geometry,
}

impl ChartData {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Bounds of the geometry as (x_min, x_max, y_min, y_max).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut xs: Vec<f64> = Vec::new();
        let mut ys: Vec<f64> = Vec::new();

        match &self.geometry {
            Geometry::Points(points) | Geometry::Line(points) => {
                for p in points {
                    xs.push(p[0]);
                    ys.push(p[1]);
                }
            }
            Geometry::Bars(bars) => {
                for b in bars {
                    xs.push(b.center - b.width / 2.0);
                    xs.push(b.center + b.width / 2.0);
                    ys.push(0.0);
                    ys.push(b.height);
                }
            }
            Geometry::Histogram { bins, kde } => {
                for b in bins {
                    xs.push(b.center - b.width / 2.0);
                    xs.push(b.center + b.width / 2.0);
                    ys.push(0.0);
                    ys.push(b.height);
                }
                ys.extend(kde.iter().map(|p| p[1]));
            }
        }

        if xs.is_empty() {
            return None;
        }

        Some((
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ))
    }
}

/// A column mapped onto a plot axis.
enum AxisValues {
    Numeric(Vec<Option<f64>>),
    /// Category codes in first-appearance order plus their labels
    Categorical {
        codes: Vec<Option<usize>>,
        labels: Vec<String>,
    },
}

impl AxisValues {
    fn from_column(column: &Column) -> PolarsResult<Self> {
        if is_numeric_dtype(column.dtype()) {
            let values = column.cast(&DataType::Float64)?;
            return Ok(AxisValues::Numeric(values.f64()?.into_iter().collect()));
        }

        let text = column.cast(&DataType::String)?;
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut labels = Vec::new();
        let codes = text
            .str()?
            .into_iter()
            .map(|v| {
                v.map(|s| {
                    *index.entry(s.to_string()).or_insert_with(|| {
                        labels.push(s.to_string());
                        labels.len() - 1
                    })
                })
            })
            .collect();

        Ok(AxisValues::Categorical { codes, labels })
    }

    fn value(&self, row: usize) -> Option<f64> {
        match self {
            AxisValues::Numeric(values) => values[row],
            AxisValues::Categorical { codes, .. } => codes[row].map(|c| c as f64),
        }
    }

    fn len(&self) -> usize {
        match self {
            AxisValues::Numeric(values) => values.len(),
            AxisValues::Categorical { codes, .. } => codes.len(),
        }
    }

    fn labels(&self) -> Option<Vec<String>> {
        match self {
            AxisValues::Numeric(_) => None,
            AxisValues::Categorical { labels, .. } => Some(labels.clone()),
        }
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
    df.column(name)
        .map_err(|_| ChartError::ColumnNotFound(name.to_string()))
}

/// Build the chart of `kind` for columns `x` and `y` (`y` unused for histograms).
pub fn build_chart(
    df: &DataFrame,
    x: &str,
    y: &str,
    kind: ChartKind,
) -> Result<ChartData, ChartError> {
    if df.width() == 0 {
        return Err(ChartError::NoColumns);
    }

    let x_axis = AxisValues::from_column(column(df, x)?)?;

    if kind == ChartKind::Histogram {
        return Ok(histogram(x, &x_axis));
    }

    let y_column = column(df, y)?;
    let y_axis = AxisValues::from_column(y_column)?;

    let pairs: Vec<[f64; 2]> = (0..x_axis.len())
        .filter_map(|row| Some([x_axis.value(row)?, y_axis.value(row)?]))
        .collect();
    let numeric_x = matches!(x_axis, AxisValues::Numeric(_));

    if kind != ChartKind::Scatter && !is_numeric_dtype(y_column.dtype()) {
        return Err(ChartError::NonNumeric(y.to_string(), kind.title()));
    }

    let (x_categories, geometry) = match kind {
        ChartKind::Line => (x_axis.labels(), Geometry::Line(mean_by_x(&pairs))),
        ChartKind::Bar if numeric_x => (
            Some(numeric_bar_labels(&pairs)),
            bars_from_means(&mean_by_x(&pairs), true),
        ),
        ChartKind::Bar => (
            x_axis.labels(),
            bars_from_means(&mean_by_x(&pairs), false),
        ),
        _ => (x_axis.labels(), Geometry::Points(pairs)),
    };

    Ok(ChartData {
        kind,
        x_label: x.to_string(),
        y_label: y.to_string(),
        x_categories,
        y_categories: if kind == ChartKind::Scatter {
            y_axis.labels()
        } else {
            None
        },
        geometry,
    })
}

/// Mean Y per distinct X, ascending by X. Category codes ascend in
/// first-appearance order, so categorical X keeps that order.
fn mean_by_x(pairs: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut sums: Vec<(f64, f64, usize)> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for &[x, y] in pairs {
        let slot = *index.entry(x.to_bits()).or_insert_with(|| {
            sums.push((x, 0.0, 0));
            sums.len() - 1
        });
        sums[slot].1 += y;
        sums[slot].2 += 1;
    }

    let mut means: Vec<[f64; 2]> = sums
        .into_iter()
        .map(|(x, sum, n)| [x, sum / n as f64])
        .collect();
    means.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
    means
}

fn sorted_distinct_x(pairs: &[[f64; 2]]) -> Vec<f64> {
    let mut xs: Vec<f64> = pairs.iter().map(|p| p[0]).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    xs.dedup();
    xs
}

fn numeric_bar_labels(pairs: &[[f64; 2]]) -> Vec<String> {
    sorted_distinct_x(pairs).iter().map(|x| x.to_string()).collect()
}

/// One bar per category. Numeric X values become categories in sorted order.
fn bars_from_means(means: &[[f64; 2]], numeric_x: bool) -> Geometry {
    let bars = means
        .iter()
        .enumerate()
        .map(|(i, &[x, mean])| BarSpec {
            center: if numeric_x { i as f64 } else { x },
            width: 0.8,
            height: mean,
        })
        .collect();
    Geometry::Bars(bars)
}

fn histogram(x: &str, x_axis: &AxisValues) -> ChartData {
    let geometry = match x_axis {
        AxisValues::Numeric(values) => {
            let values: Vec<f64> = values.iter().flatten().copied().collect();
            let bins = histogram_bins(&values);
            let kde = bins
                .first()
                .map(|b| kde_curve(&values, b.width))
                .unwrap_or_default();
            Geometry::Histogram { bins, kde }
        }
        AxisValues::Categorical { codes, labels } => {
            let mut counts = vec![0usize; labels.len()];
            for code in codes.iter().flatten() {
                counts[*code] += 1;
            }
            Geometry::Bars(
                counts
                    .iter()
                    .enumerate()
                    .map(|(i, &count)| BarSpec {
                        center: i as f64,
                        width: 0.8,
                        height: count as f64,
                    })
                    .collect(),
            )
        }
    };

    ChartData {
        kind: ChartKind::Histogram,
        x_label: x.to_string(),
        y_label: "Count".to_string(),
        x_categories: x_axis.labels(),
        y_categories: None,
        geometry,
    }
}

/// Bin edges by NumPy's "auto" rule: the smaller of the Sturges and
/// Freedman-Diaconis widths, Sturges alone when the IQR is zero. Long-tailed
/// data whose FD width would need more than `MAX_HISTOGRAM_BINS` bins falls
/// back to Sturges.
pub fn histogram_edges(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let (first, last) = (sorted[0], sorted[sorted.len() - 1]);

    if first == last {
        return vec![first - 0.5, first + 0.5];
    }

    let n = sorted.len() as f64;
    let range = last - first;
    let sturges = range / (n.log2() + 1.0);
    let iqr = StatsCalculator::percentile(&sorted, 75.0) - StatsCalculator::percentile(&sorted, 25.0);
    let fd = 2.0 * iqr / n.cbrt();
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    // f64 -> usize saturates, so the comparison holds for any width
    let mut n_bins = ((range / width).ceil() as usize).max(1);
    if n_bins > MAX_HISTOGRAM_BINS {
        n_bins = ((range / sturges).ceil() as usize).max(1);
    }
    let step = range / n_bins as f64;
    (0..=n_bins).map(|i| first + i as f64 * step).collect()
}

/// Count values into the "auto" bins. The last bin includes its right edge.
pub fn histogram_bins(values: &[f64]) -> Vec<BarSpec> {
    let edges = histogram_edges(values);
    if edges.len() < 2 {
        return Vec::new();
    }

    let n_bins = edges.len() - 1;
    let first = edges[0];
    let width = edges[1] - edges[0];
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let idx = (((v - first) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| BarSpec {
            center: edges[i] + width / 2.0,
            width,
            height: count as f64,
        })
        .collect()
}

/// Gaussian KDE with Scott's bandwidth, scaled to histogram counts.
pub fn kde_curve(values: &[f64], bin_width: f64) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 {
        return Vec::new();
    }

    let bandwidth = values.iter().std_dev() * (n as f64).powf(-0.2);
    if bandwidth.is_nan() || bandwidth <= 0.0 {
        return Vec::new();
    }

    let kernels: Vec<Normal> = values
        .iter()
        .filter_map(|&v| Normal::new(v, bandwidth).ok())
        .collect();

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / (KDE_GRID_SIZE - 1) as f64;
    let scale = bin_width; // density * n * width, with the 1/n of the mean cancelled

    (0..KDE_GRID_SIZE)
        .into_par_iter()
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = kernels.iter().map(|k| k.pdf(x)).sum();
            [x, density * scale]
        })
        .collect()
}
