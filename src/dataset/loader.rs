use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::{ReaderBuilder, Trim};
use tracing::info;

use super::{DatasetError, NormalizedTable, RawTable, normalize};

/// Read the dataset file and normalize it.
pub fn load_dataset(path: &Path) -> Result<NormalizedTable, DatasetError> {
    let started = Instant::now();
    let raw = read_csv(path)?;
    let table = normalize(raw)?;
    info!(
        rows = table.len(),
        columns = table.columns().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Loaded dataset {}",
        path.display()
    );
    Ok(table)
}

/// Read a CSV file into a [`RawTable`].
pub fn read_csv(path: &Path) -> Result<RawTable, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv_from(file)
}

/// Read CSV text from any reader.
///
/// Headers are kept verbatim so normalization decides how to clean them;
/// field values are trimmed. Width mismatches are reported by [`normalize`]
/// with the offending row number.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RawTable, DatasetError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(reader);
    let headers = csv.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();
    for record in csv.records() {
        records.push(record?.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, records })
}
