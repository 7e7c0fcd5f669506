//! Local filesystem access for CSV sources

use crate::SourceError;
use std::io::BufReader;
use std::path::Path;

/// Buffer size used for streaming reads (1MB).
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Read a local file entirely into memory and return a sync reader over it.
pub async fn read_local(path: &Path) -> Result<Box<dyn std::io::Read + Send>, SourceError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| SourceError::from_io(path.to_path_buf(), e))?;
    tracing::debug!("Loaded {} bytes from {}", contents.len(), path.display());
    Ok(Box::new(std::io::Cursor::new(contents)))
}

/// Open a local file for incremental reading.
///
/// The returned reader is blocking; callers inside a tokio runtime should
/// consume it from `spawn_blocking`.
pub async fn open_local(
    path: &Path,
    buffer_size: usize,
) -> Result<BufReader<std::fs::File>, SourceError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| SourceError::from_io(path.to_path_buf(), e))?;
    let file = file.into_std().await;
    Ok(BufReader::with_capacity(buffer_size, file))
}
