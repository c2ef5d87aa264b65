use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or normalizing the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be opened.
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The CSV reader rejected the input.
    #[error("Malformed dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    /// Two headers collapse to the same name once trimmed.
    #[error("Duplicate column `{0}` after trimming names")]
    DuplicateColumn(String),
    /// A column needed for normalization or training is absent.
    #[error("Dataset is missing required column `{0}`")]
    MissingColumn(String),
    /// A record's field count differs from the header.
    #[error("Row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Categorical text outside the expected pair.
    #[error("Row {row}: `{column}` has unexpected category {value:?}")]
    UnmappedCategory {
        row: usize,
        column: String,
        value: String,
    },
    /// A numeric cell that does not parse to a finite number.
    #[error("Row {row}: `{column}` is not a number: {value:?}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}
