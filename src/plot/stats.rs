//! The statistics each chart kind draws: value counts, histogram bins and
//! box plot summaries.
//!
//! Missing cells are ignored by every function in this module.

use std::{cmp::Ordering, collections::HashMap};

use crate::table::{Cell, Column, ColumnKind};

/// Number of equal-width bins used by histograms.
pub const HISTOGRAM_BINS: usize = 20;

/// How far past the quartiles, in interquartile ranges, box plot whiskers reach.
const WHISKER_IQR_FACTOR: f64 = 1.5;

/// How often a distinct value occurs in a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub label: String,
    pub count: usize,
    /// The numeric value of the label in a numeric column, used for ordering.
    number: Option<f64>,
}

impl ValueCount {
    /// Order by value: numbers ascending, then text ascending.
    pub(super) fn cmp_value(&self, other: &Self) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

/// Count each distinct value in `column`, most frequent first.
///
/// Values with the same count keep the order in which they first appear.
pub fn value_counts(column: &Column) -> Vec<ValueCount> {
    let mut counts = count_in_appearance_order(column);
    // Stable sort keeps first-appearance order among ties.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Count each distinct value in `column`, ordered by the values themselves.
pub fn sorted_value_counts(column: &Column) -> Vec<ValueCount> {
    let mut counts = count_in_appearance_order(column);
    counts.sort_by(ValueCount::cmp_value);
    counts
}

fn count_in_appearance_order(column: &Column) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for cell in column.cells() {
        let Some(label) = cell.label() else {
            continue;
        };

        match index_of.get(&label) {
            Some(&index) => counts[index].count += 1,
            None => {
                index_of.insert(label.clone(), counts.len());
                counts.push(ValueCount {
                    label,
                    count: 1,
                    number: cell.as_number(),
                });
            }
        }
    }

    counts
}

/// Frequencies of values over equal-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin boundaries, one more than the number of bins.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// The midpoint of each bin.
    pub fn centres(&self) -> Vec<f64> {
        self.edges
            .windows(2)
            .map(|edge| (edge[0] + edge[1]) / 2.0)
            .collect()
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// Bin `values` into `bins` equal-width bins spanning their own range.
///
/// Every bin is half open except the last, which includes the maximum. When
/// all values are equal the range is widened to half a unit either side.
/// Non-finite values are ignored. Returns `None` if there is nothing to bin.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    if values.is_empty() || bins == 0 {
        return None;
    }

    let (mut min, mut max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let edges = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();
    let mut counts = vec![0; bins];

    for value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Tukey box plot statistics for one group of values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub upper_whisker: f64,
    /// Values beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// The five values in the order ECharts box plots expect.
    pub fn five_numbers(&self) -> Vec<f64> {
        vec![
            self.lower_whisker,
            self.first_quartile,
            self.median,
            self.third_quartile,
            self.upper_whisker,
        ]
    }
}

/// Summarise `values` for a box plot, or `None` if there are none.
///
/// Quartiles use linear interpolation between closest ranks. Whiskers end at
/// the most extreme values within 1.5 interquartile ranges of the box.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();

    if sorted.is_empty() {
        return None;
    }

    sorted.sort_by(f64::total_cmp);

    let first_quartile = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let third_quartile = quantile(&sorted, 0.75);
    let reach = WHISKER_IQR_FACTOR * (third_quartile - first_quartile);
    let lower_fence = first_quartile - reach;
    let upper_fence = third_quartile + reach;

    let mut lower_whisker = f64::INFINITY;
    let mut upper_whisker = f64::NEG_INFINITY;
    let mut outliers = Vec::new();

    for &value in &sorted {
        if value < lower_fence || value > upper_fence {
            outliers.push(value);
        } else {
            lower_whisker = lower_whisker.min(value);
            upper_whisker = upper_whisker.max(value);
        }
    }

    Some(BoxSummary {
        lower_whisker,
        first_quartile,
        median,
        third_quartile,
        upper_whisker,
        outliers,
    })
}

/// The `q`th quantile of non-empty, ascending `sorted` values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// The distinct values of `column`, used as the category grid of box plots.
///
/// Numeric categories are sorted, text categories keep the order in which
/// they first appear.
pub fn categories(column: &Column) -> Vec<String> {
    let mut counts = count_in_appearance_order(column);

    if column.kind() == ColumnKind::Numeric {
        counts.sort_by(ValueCount::cmp_value);
    }

    counts.into_iter().map(|count| count.label).collect()
}

/// The numbers of `values` grouped by the category of `axis` on the same row.
///
/// Groups are returned in the order given by [categories]. Rows where either
/// cell is missing, or the value is not a number, are skipped.
pub fn group_by_category(axis: &Column, values: &Column) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = categories(axis)
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();
    let index_of: HashMap<String, usize> = groups
        .iter()
        .enumerate()
        .map(|(index, (category, _))| (category.clone(), index))
        .collect();

    for (axis_cell, value_cell) in axis.cells().iter().zip(values.cells()) {
        let (Some(category), Cell::Number(value)) = (axis_cell.label(), value_cell) else {
            continue;
        };

        if let Some(&index) = index_of.get(&category) {
            groups[index].1.push(*value);
        }
    }

    groups
}
