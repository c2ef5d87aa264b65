use super::{DatasetError, LABEL_COLUMN};

/// Header names and string cells exactly as read from CSV.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    /// Number of data records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Numeric dataset with trimmed names, no identifier column and binary categoricals.
///
/// Rows are stored row-major; every row has one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl NormalizedTable {
    /// Build a table, rejecting rows whose width differs from the column list.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::RaggedRow {
                    row: idx + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Copy out one column's values in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Every column except the label, in table order.
    pub fn feature_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| *column != LABEL_COLUMN)
            .collect()
    }

    pub fn label_values(&self) -> Option<Vec<f64>> {
        self.column_values(LABEL_COLUMN)
    }
}

impl From<&NormalizedTable> for RawTable {
    fn from(table: &NormalizedTable) -> Self {
        Self {
            headers: table.columns.clone(),
            records: table
                .rows
                .iter()
                .map(|row| row.iter().map(|value| value.to_string()).collect())
                .collect(),
        }
    }
}
