//! The import pipeline.
//!
//! Two modes share the same per-row semantics:
//!
//! - [`ImportMode::Buffered`] parses the whole file into memory, then issues
//!   one `INSERT` per record on a single connection.
//! - [`ImportMode::Streaming`] runs the parser on a blocking task feeding a
//!   bounded channel; the writer drains it in batches, one transaction per
//!   batch with a savepoint per row.
//!
//! In both modes a failed row is logged and counted, never raised.

use anyhow::{Context, Result};
use csv_import_mysql_sink::{MySQLSink, Opts, RecordSink, SinkError};
use csv_import_source::{
    open_local, read_records, CsvOptions, Record, RecordReader, SourceError, DEFAULT_BUFFER_SIZE,
};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Default number of rows per transaction in streaming mode.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default number of parsed records that may wait for the writer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Parse everything, then insert row by row.
    Buffered,
    /// Parse and insert concurrently through a bounded queue.
    Streaming {
        batch_size: usize,
        queue_capacity: usize,
    },
}

/// Configuration for one import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Local CSV file to import
    pub source: PathBuf,

    /// Destination table
    pub table: String,

    pub csv: CsvOptions,

    pub mode: ImportMode,

    /// Parse and count only; never connect to the database
    pub dry_run: bool,
}

/// Counters for one import run.
///
/// `read` is the number of records parsed from the source. `attempted`
/// counts inserts issued, which equals `read` unless the run is a dry run.
/// `inserted + failed == attempted` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub read: u64,
    pub attempted: u64,
    pub inserted: u64,
    pub failed: u64,
}

impl ImportSummary {
    fn record_result(&mut self, table: &str, record: &Record, result: Result<(), SinkError>) {
        match result {
            Ok(()) => self.inserted += 1,
            Err(e) => {
                self.failed += 1;
                error!(
                    "Failed to insert CSV line {} into {table}: {e} (row: {:?})",
                    record.line,
                    record.iter().collect::<Vec<_>>()
                );
            }
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read {} rows: {} inserted, {} failed",
            self.read, self.inserted, self.failed
        )
    }
}

/// Insert every record, one statement each, continuing past failures.
pub async fn import_records<S: RecordSink>(
    sink: &mut S,
    table: &str,
    records: &[Record],
) -> ImportSummary {
    let mut summary = ImportSummary {
        read: records.len() as u64,
        ..Default::default()
    };

    for record in records {
        summary.attempted += 1;
        let result = sink.write_record(table, record).await;
        summary.record_result(table, record, result);
    }

    summary
}

/// Start parsing `reader` on a blocking task, sending records into a
/// channel holding at most `queue_capacity` of them (at least one).
///
/// The header line is read on the task, and this resolves once it has been
/// consumed, so an unreadable header fails here rather than on the task. The
/// task resolves to the number of records sent; it stops early without error
/// if the receiver is dropped.
pub async fn spawn_parser<R>(
    reader: R,
    options: &CsvOptions,
    queue_capacity: usize,
) -> Result<(mpsc::Receiver<Record>, JoinHandle<Result<u64, SourceError>>), SourceError>
where
    R: Read + Send + 'static,
{
    let options = options.clone();
    let (tx, rx) = mpsc::channel(queue_capacity.max(1));
    let (header_tx, header_rx) = oneshot::channel();

    let handle = tokio::task::spawn_blocking(move || -> Result<u64, SourceError> {
        let records = match RecordReader::new(reader, &options) {
            Ok(records) => {
                let _ = header_tx.send(Ok(()));
                records
            }
            Err(e) => {
                let _ = header_tx.send(Err(e));
                return Ok(0);
            }
        };

        let mut sent = 0u64;
        for record in records {
            if tx.blocking_send(record?).is_err() {
                debug!("Record receiver dropped after {sent} records");
                break;
            }
            sent += 1;
        }
        Ok(sent)
    });

    match header_rx.await {
        Ok(Err(e)) => Err(e),
        // A dropped sender means the task panicked; joining the handle reports it.
        Ok(Ok(())) | Err(_) => Ok((rx, handle)),
    }
}

/// Drain `rx`, writing records in batches of `batch_size`.
pub async fn stream_records<S: RecordSink>(
    sink: &mut S,
    table: &str,
    mut rx: mpsc::Receiver<Record>,
    batch_size: usize,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    let mut batch: Vec<Record> = Vec::with_capacity(batch_size);

    while let Some(record) = rx.recv().await {
        summary.read += 1;
        batch.push(record);

        if batch.len() >= batch_size {
            flush_batch(sink, table, &mut batch, &mut summary).await;
        }
    }

    if !batch.is_empty() {
        flush_batch(sink, table, &mut batch, &mut summary).await;
    }

    summary
}

async fn flush_batch<S: RecordSink>(
    sink: &mut S,
    table: &str,
    batch: &mut Vec<Record>,
    summary: &mut ImportSummary,
) {
    summary.attempted += batch.len() as u64;

    match sink.write_batch(table, batch).await {
        Ok(results) => {
            for (record, result) in batch.iter().zip(results) {
                summary.record_result(table, record, result);
            }
        }
        Err(e) => {
            let first = batch.first().map(|r| r.line).unwrap_or_default();
            let last = batch.last().map(|r| r.line).unwrap_or_default();
            error!(
                "Failed to write batch of {} records (CSV lines {first}-{last}) into {table}: {e}",
                batch.len()
            );
            summary.failed += batch.len() as u64;
        }
    }

    debug!(
        "Batch done: {} inserted, {} failed so far",
        summary.inserted, summary.failed
    );
    batch.clear();
}

async fn close_sink<S: RecordSink>(sink: S) {
    if let Err(e) = sink.close().await {
        warn!("Failed to close connection cleanly: {e}");
    }
}

/// Run a complete import against MySQL.
///
/// The source file is opened before the database connection, so a missing
/// file aborts the run without ever connecting.
pub async fn run_import(config: &ImportConfig, mysql: Opts) -> Result<ImportSummary> {
    info!("Starting CSV import into table {}", config.table);
    info!("Source: {}", config.source.display());
    info!("Mode: {:?}", config.mode);

    if config.dry_run {
        warn!("Running in dry-run mode - no data will be written");
    }

    let summary = match config.mode {
        ImportMode::Buffered => {
            let records = read_records(&config.source, &config.csv)
                .await
                .context("Failed to load CSV records")?;

            if config.dry_run {
                return Ok(ImportSummary {
                    read: records.len() as u64,
                    ..Default::default()
                });
            }

            let mut sink = MySQLSink::connect(mysql)
                .await
                .context("Failed to open MySQL connection")?;
            let summary = import_records(&mut sink, &config.table, &records).await;
            close_sink(sink).await;
            summary
        }
        ImportMode::Streaming {
            batch_size,
            queue_capacity,
        } => {
            let reader = open_local(&config.source, DEFAULT_BUFFER_SIZE)
                .await
                .context("Failed to open CSV source")?;
            let (mut rx, parser) = spawn_parser(reader, &config.csv, queue_capacity)
                .await
                .context("Failed to read CSV header")?;

            let summary = if config.dry_run {
                let mut summary = ImportSummary::default();
                while rx.recv().await.is_some() {
                    summary.read += 1;
                }
                summary
            } else {
                let mut sink = MySQLSink::connect(mysql)
                    .await
                    .context("Failed to open MySQL connection")?;
                let summary = stream_records(&mut sink, &config.table, rx, batch_size).await;
                close_sink(sink).await;
                summary
            };

            match parser.await.context("CSV parser task failed")? {
                Ok(sent) => debug!("Parser produced {sent} records"),
                Err(e) => {
                    warn!("Import stopped early: {summary}");
                    return Err(e).context("Failed to parse CSV source");
                }
            }
            summary
        }
    };

    info!("CSV import completed: {summary}");
    Ok(summary)
}
