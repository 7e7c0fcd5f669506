//! Configuration loading and resolution.
//!
//! Settings come from three places, highest precedence first:
//! command-line flags (or their environment variables), the optional YAML
//! config file, then built-in defaults.
//!
//! ```yaml
//! mysql:
//!   host: localhost
//!   port: 3306
//!   user: root
//!   database: marketing_data
//! import:
//!   table: marketing
//!   streaming: true
//!   batch_size: 500
//! ```

use crate::import::{ImportConfig, ImportMode, DEFAULT_BATCH_SIZE, DEFAULT_QUEUE_CAPACITY};
use crate::{ImportOpts, MySQLOpts};
use anyhow::{Context, Result};
use csv_import_mysql_sink::{Opts, OptsBuilder};
use csv_import_source::CsvOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "root";

/// Contents of a YAML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub mysql: MySQLSection,
    pub import: ImportSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MySQLSection {
    pub connection_string: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSection {
    pub table: Option<String>,
    pub delimiter: Option<char>,
    pub streaming: Option<bool>,
    pub batch_size: Option<usize>,
    pub queue_capacity: Option<usize>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse config YAML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Build MySQL connection options from flags and config file values.
pub fn resolve_mysql_opts(cli: &MySQLOpts, file: &MySQLSection) -> Result<Opts> {
    let url = cli
        .mysql_connection_string
        .as_ref()
        .or(file.connection_string.as_ref());
    if let Some(url) = url {
        // The URL carries the password, so it stays out of the error message.
        return Opts::from_url(url).context("Invalid MySQL connection string");
    }

    let host = cli
        .mysql_host
        .clone()
        .or_else(|| file.host.clone())
        .unwrap_or_else(|| DEFAULT_MYSQL_HOST.to_string());
    let port = cli.mysql_port.or(file.port).unwrap_or(DEFAULT_MYSQL_PORT);
    let user = cli
        .mysql_user
        .clone()
        .or_else(|| file.user.clone())
        .unwrap_or_else(|| DEFAULT_MYSQL_USER.to_string());
    let password = cli.mysql_password.clone().or_else(|| file.password.clone());
    let database = cli.mysql_database.clone().or_else(|| file.database.clone());

    let builder = OptsBuilder::default()
        .ip_or_hostname(host)
        .tcp_port(port)
        .user(Some(user))
        .pass(password)
        .db_name(database);

    Ok(Opts::from(builder))
}

/// Build the import configuration from flags and config file values.
pub fn resolve_import_config(
    source: PathBuf,
    cli: &ImportOpts,
    file: &ImportSection,
) -> Result<ImportConfig> {
    let table = cli
        .table
        .clone()
        .or_else(|| file.table.clone())
        .filter(|t| !t.trim().is_empty())
        .context("No destination table given; pass --table or set import.table in the config file")?;

    let delimiter = cli.delimiter.or(file.delimiter).unwrap_or(',');
    if !delimiter.is_ascii() {
        anyhow::bail!("CSV delimiter must be a single ASCII character, got '{delimiter}'");
    }

    let streaming = if cli.streaming {
        true
    } else if cli.no_streaming {
        false
    } else {
        file.streaming.unwrap_or(false)
    };

    let mode = if streaming {
        let batch_size = cli
            .batch_size
            .or(file.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE);
        let queue_capacity = cli
            .queue_capacity
            .or(file.queue_capacity)
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);
        if batch_size == 0 {
            anyhow::bail!("Batch size must be greater than zero");
        }
        if queue_capacity == 0 {
            anyhow::bail!("Queue capacity must be greater than zero");
        }
        ImportMode::Streaming {
            batch_size,
            queue_capacity,
        }
    } else {
        ImportMode::Buffered
    };

    Ok(ImportConfig {
        source,
        table,
        csv: CsvOptions {
            delimiter: delimiter as u8,
        },
        mode,
        dry_run: cli.dry_run,
    })
}
