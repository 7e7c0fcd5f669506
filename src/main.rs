//! Command-line interface for csv-import
//!
//! # Usage Examples
//!
//! ```bash
//! # Import with explicit connection flags
//! csv-import --file marketing_data_clean.csv --table marketing \
//!   --mysql-host localhost --mysql-user root --mysql-database marketing_data
//!
//! # Credentials from the environment, settings from a config file
//! MYSQL_PASSWORD=secret csv-import --config import.yaml --file marketing_data_clean.csv
//!
//! # Streaming import, summary written as JSON
//! csv-import --file big.csv --table marketing --streaming --batch-size 500 \
//!   --summary-json summary.json
//! ```
//!
//! Per-row failures are logged and do not change the exit code; fatal setup
//! errors (missing file, unreachable database) exit with status 1.

use anyhow::Context;
use clap::Parser;
use csv_import::config::{resolve_import_config, resolve_mysql_opts};
use csv_import::{run_import, FileConfig, ImportOpts, ImportSummary, MySQLOpts};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "csv-import")]
#[command(about = "Import the rows of a CSV file into a MySQL table")]
#[command(long_about = None)]
struct Cli {
    /// CSV file to import (first line must be the header)
    #[arg(long, value_name = "FILE")]
    file: PathBuf,

    /// YAML config file providing defaults for connection and import settings
    #[arg(long, value_name = "PATH", env = "CSV_IMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Write the import summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    summary_json: Option<PathBuf>,

    #[command(flatten)]
    import: ImportOpts,

    #[command(flatten)]
    mysql: MySQLOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("csv_import=info")),
        )
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let import_config = resolve_import_config(cli.file, &cli.import, &file_config.import)?;
    let mysql_opts = resolve_mysql_opts(&cli.mysql, &file_config.mysql)?;

    let summary = run_import(&import_config, mysql_opts).await?;

    if import_config.dry_run {
        println!("Dry run: read {} rows, nothing inserted", summary.read);
    } else {
        println!("{summary}");
    }

    if let Some(path) = &cli.summary_json {
        write_summary(path, &summary)?;
    }

    Ok(())
}

fn write_summary(path: &Path, summary: &ImportSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal_args() {
        let cli = Cli::try_parse_from([
            "csv-import",
            "--file",
            "marketing_data_clean.csv",
            "--table",
            "marketing",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("marketing_data_clean.csv"));
        assert_eq!(cli.import.table.as_deref(), Some("marketing"));
        assert!(!cli.import.streaming);
        assert!(!cli.import.dry_run);
    }

    #[test]
    fn test_parse_streaming_args() {
        let cli = Cli::try_parse_from([
            "csv-import",
            "--file",
            "data.csv",
            "--table",
            "marketing",
            "--streaming",
            "--batch-size",
            "250",
            "--queue-capacity",
            "64",
            "--delimiter",
            ";",
            "--mysql-host",
            "db",
            "--mysql-port",
            "3307",
        ])
        .unwrap();

        assert!(cli.import.streaming);
        assert_eq!(cli.import.batch_size, Some(250));
        assert_eq!(cli.import.queue_capacity, Some(64));
        assert_eq!(cli.import.delimiter, Some(';'));
        assert_eq!(cli.mysql.mysql_host.as_deref(), Some("db"));
        assert_eq!(cli.mysql.mysql_port, Some(3307));
    }

    #[test]
    fn test_last_streaming_flag_wins() {
        let cli = Cli::try_parse_from([
            "csv-import",
            "--file",
            "data.csv",
            "--streaming",
            "--no-streaming",
        ])
        .unwrap();

        assert!(!cli.import.streaming);
        assert!(cli.import.no_streaming);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["csv-import", "--table", "marketing"]).is_err());
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let summary = ImportSummary {
            read: 4,
            attempted: 4,
            inserted: 3,
            failed: 1,
        };

        write_summary(&path, &summary).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["inserted"], 3);
        assert_eq!(written["failed"], 1);
    }
}
