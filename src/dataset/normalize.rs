use std::collections::HashSet;

use super::{DatasetError, ID_COLUMN, NormalizedTable, RawTable};

/// Total mapping from a categorical column's text to a binary code.
///
/// Already-coded `0`/`1` cells pass through, so normalizing a normalized
/// table is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalMapping {
    pub column: &'static str,
    /// Text coded as `1`.
    pub positive: &'static str,
    /// Text coded as `0`.
    pub negative: &'static str,
}

impl CategoricalMapping {
    /// Code a cell, or `None` when the text is outside the expected pair.
    pub fn code(&self, text: &str) -> Option<f64> {
        match text.trim() {
            value if value == self.positive || value == "1" => Some(1.0),
            value if value == self.negative || value == "0" => Some(0.0),
            _ => None,
        }
    }
}

/// The three categorical columns of the loan dataset.
pub static CATEGORICAL_MAPPINGS: [CategoricalMapping; 3] = [
    CategoricalMapping {
        column: "education",
        positive: "Graduate",
        negative: "Not Graduate",
    },
    CategoricalMapping {
        column: "self_employed",
        positive: "Yes",
        negative: "No",
    },
    CategoricalMapping {
        column: super::LABEL_COLUMN,
        positive: "Approved",
        negative: "Rejected",
    },
];

enum CellDecoder {
    Categorical(&'static CategoricalMapping),
    Numeric,
}

/// Trim column names, drop the identifier column and binarize categoricals.
///
/// Row count is preserved; any cell that cannot be coded fails the whole table.
pub fn normalize(raw: RawTable) -> Result<NormalizedTable, DatasetError> {
    let headers: Vec<String> = raw
        .headers
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut seen = HashSet::with_capacity(headers.len());
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(DatasetError::DuplicateColumn(header.clone()));
        }
    }
    for mapping in CATEGORICAL_MAPPINGS.iter() {
        if !seen.contains(mapping.column) {
            return Err(DatasetError::MissingColumn(mapping.column.to_string()));
        }
    }

    let kept: Vec<(usize, CellDecoder)> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.as_str() != ID_COLUMN)
        .map(|(idx, header)| {
            let decoder = CATEGORICAL_MAPPINGS
                .iter()
                .find(|mapping| mapping.column == header.as_str())
                .map_or(CellDecoder::Numeric, CellDecoder::Categorical);
            (idx, decoder)
        })
        .collect();

    let mut rows = Vec::with_capacity(raw.records.len());
    for (record_idx, record) in raw.records.iter().enumerate() {
        let row = record_idx + 1;
        if record.len() != headers.len() {
            return Err(DatasetError::RaggedRow {
                row,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let values = kept
            .iter()
            .map(|(col, decoder)| decode_cell(decoder, &record[*col], &headers[*col], row))
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(values);
    }

    let columns = kept
        .iter()
        .map(|(col, _)| headers[*col].clone())
        .collect();
    NormalizedTable::new(columns, rows)
}

fn decode_cell(
    decoder: &CellDecoder,
    text: &str,
    column: &str,
    row: usize,
) -> Result<f64, DatasetError> {
    match decoder {
        CellDecoder::Categorical(mapping) => {
            mapping
                .code(text)
                .ok_or_else(|| DatasetError::UnmappedCategory {
                    row,
                    column: column.to_string(),
                    value: text.to_string(),
                })
        }
        CellDecoder::Numeric => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| DatasetError::InvalidNumber {
                row,
                column: column.to_string(),
                value: text.to_string(),
            }),
    }
}
