//! Exploratory views over the normalized table for the extended report.

mod correlation;
mod histogram;

use thiserror::Error;

pub use correlation::{CorrelationMatrix, correlation_matrix};
pub use histogram::{
    DEFAULT_HISTOGRAM_BINS, HISTOGRAM_COLUMNS, LabelHistogram, MAX_HISTOGRAM_BINS, label_histogram,
};

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("Unknown column `{0}`")]
    UnknownColumn(String),
    #[error("`{0}` is the label column and cannot be layered by itself")]
    LabelColumn(String),
    #[error("Dataset has no label column")]
    MissingLabel,
    #[error("Row {row}: label {value} is not 0 or 1")]
    InvalidLabel { row: usize, value: f64 },
}
