//! Saving a copy of an already materialized local file.
//!
//! A hard link is tried first. When the filesystem refuses (different
//! device, no link support, existing target), the file is re-streamed through
//! the chunk reader and relay queue into a new file. The copy never reads the
//! whole source into memory.

use std::path::Path;

use tokio::fs::File;
use tracing::{debug, info, instrument};

use super::error::TransferError;
use super::filter::FilterChain;
use super::sink::WriterSink;
use super::transfer::{TransferConfig, transfer};

/// How [`persist_copy`] produced the destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMethod {
    /// The destination is a hard link to the source.
    HardLink,
    /// The source was re-streamed; carries the bytes written.
    Streamed(u64),
}

/// Makes `dest` hold the same bytes as `src`.
///
/// # Errors
///
/// Returns [`TransferError`] if the source cannot be opened, the destination
/// cannot be created, or the streaming copy fails.
#[instrument(skip(config), fields(src = %src.display(), dest = %dest.display()))]
pub async fn persist_copy(
    src: &Path,
    dest: &Path,
    config: &TransferConfig,
) -> Result<PersistMethod, TransferError> {
    match tokio::fs::hard_link(src, dest).await {
        Ok(()) => {
            info!("saved copy as hard link");
            return Ok(PersistMethod::HardLink);
        }
        Err(e) => {
            debug!(error = %e, "hard link failed; falling back to streaming copy");
        }
    }

    restream_copy(src, dest, config).await.map(PersistMethod::Streamed)
}

/// Streams `src` into a new file at `dest` through the relay pipeline.
///
/// # Errors
///
/// Returns [`TransferError`] on any open, read or write failure.
pub async fn restream_copy(
    src: &Path,
    dest: &Path,
    config: &TransferConfig,
) -> Result<u64, TransferError> {
    let file = File::open(src)
        .await
        .map_err(|e| TransferError::io(src, e))?;
    let reader = config.reader(file, src.display().to_string())?;
    let sink = WriterSink::create_file(dest).await?;

    let outcome = transfer(
        reader,
        FilterChain::identity(),
        sink,
        config.queue_capacity(),
    )
    .await?;
    info!(bytes = outcome.bytes_written, "saved copy by streaming");
    Ok(outcome.bytes_written)
}
