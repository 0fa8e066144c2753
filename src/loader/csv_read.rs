use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Reads a headered CSV file into typed records.
///
/// A row that fails to deserialize is logged as a warning and skipped; the
/// remaining rows still load. Failing to open or read the file itself is an
/// error, which aborts the caller's load run.
pub fn read_csv<T>(path: &Path) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned,
{
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                // Header occupies line 1, so data rows start at line 2.
                tracing::warn!(
                    file = %path.display(),
                    line = index + 2,
                    "Skipping malformed row: {}",
                    e
                );
            }
        }
    }

    Ok(records)
}
