//! MySQL helpers for end-to-end tests

use anyhow::Result;
use csv_import_mysql_sink::{quote_identifier, Opts};
use mysql_async::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Connection settings for the test MySQL server.
#[derive(Clone)]
pub struct MySQLConfig {
    connection_string: String,
}

impl MySQLConfig {
    pub fn opts(&self) -> Result<Opts> {
        Ok(Opts::from_url(&self.connection_string)?)
    }

    pub async fn connect(&self) -> Result<mysql_async::Conn> {
        Ok(mysql_async::Conn::new(self.opts()?).await?)
    }
}

/// Read `MYSQL_TEST_URL`; `None` means MySQL tests should be skipped.
pub fn create_mysql_config() -> Option<MySQLConfig> {
    std::env::var("MYSQL_TEST_URL")
        .ok()
        .filter(|url| !url.is_empty())
        .map(|connection_string| MySQLConfig { connection_string })
}

/// Unique suffix for per-test table names.
pub fn generate_test_id() -> u64 {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    timestamp.wrapping_add(counter) % 1_000_000_000
}

/// Drop and recreate `table` with the given `(name, type)` column definitions.
pub async fn recreate_table(
    conn: &mut mysql_async::Conn,
    table: &str,
    columns: &[(&str, &str)],
) -> Result<()> {
    drop_table(conn, table).await?;

    let definitions: Vec<String> = columns
        .iter()
        .map(|(name, data_type)| format!("{} {data_type}", quote_identifier(name)))
        .collect();
    conn.query_drop(format!(
        "CREATE TABLE {} ({})",
        quote_identifier(table),
        definitions.join(", ")
    ))
    .await?;
    Ok(())
}

pub async fn drop_table(conn: &mut mysql_async::Conn, table: &str) -> Result<()> {
    conn.query_drop(format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))
        .await?;
    Ok(())
}

pub async fn count_rows(conn: &mut mysql_async::Conn, table: &str) -> Result<u64> {
    let count: Option<u64> = conn
        .query_first(format!("SELECT COUNT(*) FROM {}", quote_identifier(table)))
        .await?;
    Ok(count.unwrap_or_default())
}

/// Fetch the given columns of every row as strings, ordered by the first column.
pub async fn fetch_rows(
    conn: &mut mysql_async::Conn,
    table: &str,
    columns: &[&str],
) -> Result<Vec<Vec<Option<String>>>> {
    let quoted: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        quoted
            .iter()
            .map(|c| format!("CAST({c} AS CHAR)"))
            .collect::<Vec<_>>()
            .join(", "),
        quote_identifier(table),
        quoted[0]
    );

    let rows: Vec<mysql_async::Row> = conn.query(sql).await?;
    let values = rows
        .into_iter()
        .map(|row| {
            (0..columns.len())
                .map(|i| row.get::<Option<String>, usize>(i).flatten())
                .collect()
        })
        .collect();
    Ok(values)
}
