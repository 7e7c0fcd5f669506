//! MySQL implementation of [`RecordSink`].

use crate::statement::{insert_params, insert_statement};
use crate::{RecordSink, SinkError};
use import_core::Record;
use mysql_async::{prelude::*, Conn, Opts, TxOpts};
use tracing::{debug, info};

/// Savepoint wrapped around each row of a batch so one failing row can be
/// rolled back without discarding the rest of the batch.
pub const SAVEPOINT_NAME: &str = "csv_import_row";

/// Writes records over one dedicated MySQL connection.
pub struct MySQLSink {
    conn: Conn,
}

impl MySQLSink {
    /// Open a connection to the server described by `opts`.
    pub async fn connect(opts: Opts) -> Result<Self, SinkError> {
        let target = format!("{}:{}", opts.ip_or_hostname(), opts.tcp_port());
        info!("Connecting to MySQL at {target}");

        let conn = Conn::new(opts)
            .await
            .map_err(|source| SinkError::Connect { target, source })?;

        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl RecordSink for MySQLSink {
    async fn write_record(&mut self, table: &str, record: &Record) -> Result<(), SinkError> {
        let sql = insert_statement(table, record);
        self.conn.exec_drop(&sql, insert_params(record)).await?;
        Ok(())
    }

    async fn write_batch(
        &mut self,
        table: &str,
        records: &[Record],
    ) -> Result<Vec<Result<(), SinkError>>, SinkError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.conn.start_transaction(TxOpts::default()).await?;
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let sql = insert_statement(table, record);

            tx.query_drop(format!("SAVEPOINT {SAVEPOINT_NAME}")).await?;
            match tx.exec_drop(&sql, insert_params(record)).await {
                Ok(()) => {
                    tx.query_drop(format!("RELEASE SAVEPOINT {SAVEPOINT_NAME}"))
                        .await?;
                    results.push(Ok(()));
                }
                Err(e) => {
                    tx.query_drop(format!("ROLLBACK TO SAVEPOINT {SAVEPOINT_NAME}"))
                        .await?;
                    results.push(Err(SinkError::MySQL(e)));
                }
            }
        }

        tx.commit().await?;
        debug!("Committed batch of {} records into {table}", records.len());

        Ok(results)
    }

    async fn close(self) -> Result<(), SinkError> {
        self.conn.disconnect().await?;
        debug!("MySQL connection closed");
        Ok(())
    }
}
