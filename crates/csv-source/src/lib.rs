//! CSV file reading for csv-import
//!
//! This crate opens local CSV files and turns each data line into a
//! [`Record`] keyed by the (trimmed) header names. It can either load a
//! whole file into memory ([`read_records`]) or hand back a lazy
//! [`RecordReader`] for streaming imports.

mod error;
mod file;
mod reader;

pub use error::SourceError;
pub use file::{open_local, read_local, DEFAULT_BUFFER_SIZE};
pub use import_core::Record;
pub use reader::{parse_records, CsvOptions, RecordReader};

use std::path::Path;

/// Read a CSV file fully into memory and parse every data row.
///
/// Fails with [`SourceError::NotFound`] when `path` does not exist, before
/// anything else is attempted.
pub async fn read_records(path: &Path, options: &CsvOptions) -> Result<Vec<Record>, SourceError> {
    let reader = read_local(path).await?;
    let records = parse_records(reader, options)?;
    tracing::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
