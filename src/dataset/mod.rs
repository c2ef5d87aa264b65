//! Loan-approval dataset loading and normalization.
//!
//! The source CSV carries padded header names, an identifier column and three
//! textual categorical columns. [`load_dataset`] turns it into a purely numeric
//! [`NormalizedTable`] ready for training.

mod error;
mod loader;
mod normalize;
mod table;

pub use error::DatasetError;
pub use loader::{load_dataset, read_csv, read_csv_from};
pub use normalize::{CATEGORICAL_MAPPINGS, CategoricalMapping, normalize};
pub use table::{NormalizedTable, RawTable};

/// Identifier column dropped during normalization.
pub const ID_COLUMN: &str = "loan_id";
/// Binary outcome column (approved = 1, rejected = 0).
pub const LABEL_COLUMN: &str = "loan_status";
