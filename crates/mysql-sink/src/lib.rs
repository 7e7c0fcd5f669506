//! Record sinks for csv-import.
//!
//! [`RecordSink`] is the seam between the import pipeline and the
//! destination database. [`MySQLSink`] implements it over a single
//! `mysql_async` connection, issuing one parameterized `INSERT` per record.

mod error;
mod mysql;
mod statement;
mod traits;

pub use error::SinkError;
pub use mysql::{MySQLSink, SAVEPOINT_NAME};
pub use statement::{insert_params, insert_statement, quote_identifier, quote_table};
pub use traits::RecordSink;

// Re-export so callers can build connection options without a direct dependency.
pub use mysql_async::{Opts, OptsBuilder};
