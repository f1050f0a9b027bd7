//! CSV demand profile loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Errors raised while reading a demand profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read \"{path}\": {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("column \"{0}\" not found in header")]
    MissingColumn(String),
    #[error("row {row}: cannot parse \"{value}\" as a number")]
    BadValue { row: usize, value: String },
}

/// Reads one numeric column from a headered CSV.
///
/// Cells are trimmed before parsing. Rows are numbered from 1 (the first
/// data row) in error messages.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the CSV is malformed, the column is absent,
/// or a cell is not a number.
pub fn read_demand_csv(reader: impl Read, column: &str) -> Result<Vec<f64>, ProfileError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let index = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ProfileError::MissingColumn(column.to_string()))?;

    let mut values = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = record.get(index).unwrap_or("");
        let value = cell.parse::<f64>().map_err(|_| ProfileError::BadValue {
            row: i + 1,
            value: cell.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Reads one numeric column from a CSV file.
///
/// # Errors
///
/// Returns a [`ProfileError`] if the file cannot be opened or parsed.
pub fn load_demand_csv(path: &Path, column: &str) -> Result<Vec<f64>, ProfileError> {
    let file = File::open(path).map_err(|source| ProfileError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_demand_csv(file, column)
}
