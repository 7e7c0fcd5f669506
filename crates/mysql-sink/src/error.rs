//! Error types for record sinks.

use thiserror::Error;

/// Errors that can occur while writing records.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The initial connection could not be established.
    #[error("Failed to connect to MySQL at {target}")]
    Connect {
        target: String,
        #[source]
        source: mysql_async::Error,
    },

    /// MySQL rejected a statement.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// The sink refused the record without reaching a database.
    #[error("Record rejected: {0}")]
    Rejected(String),
}
