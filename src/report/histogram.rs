use crate::dataset::{LABEL_COLUMN, NormalizedTable};

use super::ReportError;

/// Numeric columns offered by the histogram column picker.
pub const HISTOGRAM_COLUMNS: [&str; 8] = [
    "income_annum",
    "loan_amount",
    "loan_term",
    "cibil_score",
    "residential_assets_value",
    "commercial_assets_value",
    "luxury_assets_value",
    "bank_asset_value",
];

pub const DEFAULT_HISTOGRAM_BINS: usize = 30;
pub const MAX_HISTOGRAM_BINS: usize = 200;

/// Per-label counts of one column over shared, equal-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelHistogram {
    pub column: String,
    /// `bins + 1` ascending bin edges; the last bin includes its right edge.
    pub edges: Vec<f64>,
    /// Counts indexed by label (`0` rejected, `1` approved), then bin.
    pub counts: [Vec<u32>; 2],
}

impl LabelHistogram {
    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Tallest single-label bar.
    pub fn max_count(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|counts| counts.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self, label: usize) -> u32 {
        self.counts[label].iter().sum()
    }
}

/// Histogram of `column`, layered by the loan status label.
pub fn label_histogram(
    table: &NormalizedTable,
    column: &str,
    bins: usize,
) -> Result<LabelHistogram, ReportError> {
    if column == LABEL_COLUMN {
        return Err(ReportError::LabelColumn(column.to_string()));
    }
    let values = table
        .column_values(column)
        .ok_or_else(|| ReportError::UnknownColumn(column.to_string()))?;
    let labels = table.label_values().ok_or(ReportError::MissingLabel)?;

    let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
    let (min, max) = value_range(&values);
    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

    let mut counts = [vec![0u32; bins], vec![0u32; bins]];
    for (idx, (value, label)) in values.iter().zip(&labels).enumerate() {
        let label = match *label {
            l if l == 0.0 => 0,
            l if l == 1.0 => 1,
            other => {
                return Err(ReportError::InvalidLabel {
                    row: idx + 1,
                    value: other,
                });
            }
        };
        let bin = (((value - min) / width) as usize).min(bins - 1);
        counts[label][bin] += 1;
    }

    Ok(LabelHistogram {
        column: column.to_string(),
        edges,
        counts,
    })
}

/// Data range, widened around a single value and defaulting to `[0, 1]`.
fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 0.5, max + 0.5);
    }
    (min, max)
}
