//! CSV parsing into records
//!
//! The first line of the input is always treated as the header. Header
//! names and field values are trimmed. Rows may be ragged: missing trailing
//! fields are left out of the record, and fields beyond the header are keyed
//! `_<index>` so that the destination rejects them for that row only.

use crate::SourceError;
use import_core::Record;
use std::io::Read;
use tracing::{debug, warn};

/// Options controlling how CSV input is parsed.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: `,`)
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Lazily parses records from a CSV reader.
pub struct RecordReader<R: Read> {
    inner: csv::Reader<R>,
    headers: Vec<String>,
    row: csv::StringRecord,
    index: u64,
}

impl<R: Read> RecordReader<R> {
    /// Create a reader and consume the header line.
    pub fn new(reader: R, options: &CsvOptions) -> Result<Self, SourceError> {
        let mut inner = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(options.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = inner.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            warn!("CSV input is empty");
        } else {
            debug!("CSV headers: {headers:?}");
        }

        Ok(Self {
            inner,
            headers,
            row: csv::StringRecord::new(),
            index: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn to_record(&self) -> Record {
        // Header is line 1, so the first data row falls back to line 2.
        let line = self
            .row
            .position()
            .map(|p| p.line())
            .unwrap_or(self.index + 1);

        let mut record = Record::new(line);
        for (i, value) in self.row.iter().enumerate() {
            match self.headers.get(i) {
                Some(column) => record.push(column.as_str(), value),
                None => record.push(format!("_{i}"), value),
            }
        }
        record
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.headers.is_empty() {
            return None;
        }
        match self.inner.read_record(&mut self.row) {
            Ok(true) => {
                self.index += 1;
                Some(Ok(self.to_record()))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Parse every data row of `reader` into memory.
pub fn parse_records<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<Record>, SourceError> {
    RecordReader::new(reader, options)?.collect()
}
