//! RecordSink trait definition.

use crate::SinkError;
use import_core::Record;

/// Trait for writing parsed records to a destination table.
///
/// The import pipeline is generic over this trait, so the MySQL
/// implementation and in-memory test sinks are driven by the same code:
///
/// ```ignore
/// pub async fn import_records<S: RecordSink>(sink: &mut S, table: &str, records: Vec<Record>) {
///     for record in &records {
///         if let Err(e) = sink.write_record(table, record).await {
///             tracing::error!("row {} failed: {e}", record.line);
///         }
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait RecordSink: Send {
    /// Insert a single record as one row of `table`.
    async fn write_record(&mut self, table: &str, record: &Record) -> Result<(), SinkError>;

    /// Insert a batch of records, reporting the outcome of each row.
    ///
    /// The returned vector has one entry per input record, in order. An
    /// outer `Err` means the batch as a whole failed and none of its rows
    /// were written.
    ///
    /// The default implementation writes each record independently.
    async fn write_batch(
        &mut self,
        table: &str,
        records: &[Record],
    ) -> Result<Vec<Result<(), SinkError>>, SinkError> {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(self.write_record(table, record).await);
        }
        Ok(results)
    }

    /// Release the underlying connection.
    async fn close(self) -> Result<(), SinkError>
    where
        Self: Sized;
}
