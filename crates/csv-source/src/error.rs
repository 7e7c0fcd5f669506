//! Error types for reading CSV sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or parsing a CSV source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source file does not exist.
    #[error("CSV source not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The source file exists but could not be read.
    #[error("Failed to read CSV source: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid CSV (or not valid UTF-8).
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

impl SourceError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound { path }
        } else {
            SourceError::Io { path, source }
        }
    }
}
