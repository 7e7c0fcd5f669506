//! In-memory record sink

use csv_import_mysql_sink::{RecordSink, SinkError};
use csv_import_source::Record;
use std::collections::BTreeSet;

/// Sink that keeps written rows in a vector.
///
/// Optionally restricts the accepted column set, mimicking a destination
/// table that rejects unknown columns, and can be told to reject rows
/// containing a given value or to fail whole batches.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Rows written so far, with the table each went to.
    pub rows: Vec<(String, Record)>,
    /// Number of single-row writes attempted.
    pub attempts: usize,
    /// Number of batch writes attempted.
    pub batches: usize,
    columns: Option<BTreeSet<String>>,
    rejected_value: Option<String>,
    fail_batches: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept records whose columns are all in `columns`.
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: Some(columns.iter().map(|c| c.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Reject any record containing `value` in one of its fields.
    pub fn rejecting_value(mut self, value: &str) -> Self {
        self.rejected_value = Some(value.to_string());
        self
    }

    /// Make every `write_batch` call fail as a whole.
    pub fn failing_batches(mut self) -> Self {
        self.fail_batches = true;
        self
    }

    fn check(&self, record: &Record) -> Result<(), SinkError> {
        if let Some(columns) = &self.columns {
            if let Some(unknown) = record.columns().find(|c| !columns.contains(*c)) {
                return Err(SinkError::Rejected(format!(
                    "Unknown column '{unknown}' in 'field list'"
                )));
            }
        }
        if let Some(rejected) = &self.rejected_value {
            if record.values().any(|v| v == rejected) {
                return Err(SinkError::Rejected(format!("value '{rejected}' not allowed")));
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordSink for MemorySink {
    async fn write_record(&mut self, table: &str, record: &Record) -> Result<(), SinkError> {
        self.attempts += 1;
        self.check(record)?;
        self.rows.push((table.to_string(), record.clone()));
        Ok(())
    }

    async fn write_batch(
        &mut self,
        table: &str,
        records: &[Record],
    ) -> Result<Vec<Result<(), SinkError>>, SinkError> {
        self.batches += 1;
        if self.fail_batches {
            return Err(SinkError::Rejected("batch transaction failed".to_string()));
        }

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(self.write_record(table, record).await);
        }
        Ok(results)
    }

    async fn close(self) -> Result<(), SinkError> {
        Ok(())
    }
}
