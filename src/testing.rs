//! Test infrastructure for csv-import
//!
//! [`memory::MemorySink`] lets the import pipeline be exercised without a
//! database; [`mysql`] holds helpers for end-to-end tests against a real
//! MySQL server (enabled by setting `MYSQL_TEST_URL`).

pub mod memory;
pub mod mysql;

pub use memory::MemorySink;
pub use mysql::{create_mysql_config, generate_test_id, MySQLConfig};
