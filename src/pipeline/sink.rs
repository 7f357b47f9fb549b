//! Destinations that drain the relay queue.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::debug;

use super::error::TransferError;

/// A consumer of filtered chunks.
///
/// Chunks arrive in stream order. An empty chunk is ordinary data.
/// `finish` runs once, after the end-of-stream marker.
#[async_trait]
pub trait ChunkSink: Send {
    /// Identifier of the destination for errors and logs.
    fn destination(&self) -> &str;

    /// Writes one chunk.
    ///
    /// # Errors
    ///
    /// Returns the destination's IO error.
    async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()>;

    /// Flushes everything written so far.
    ///
    /// # Errors
    ///
    /// Returns the destination's IO error.
    async fn finish(&mut self) -> std::io::Result<()>;
}

/// Sink over any async writer: a file, stdout or an in-memory buffer.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    destination: String,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps `writer`; `destination` names it in errors.
    pub fn new(writer: W, destination: impl Into<String>) -> Self {
        Self {
            writer,
            destination: destination.into(),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<BufWriter<File>> {
    /// Creates (or truncates) `path` and wraps it in a buffered sink.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Io`] if the file cannot be created.
    pub async fn create_file(path: &Path) -> Result<Self, TransferError> {
        let file = File::create(path)
            .await
            .map_err(|e| TransferError::io(path, e))?;
        debug!(path = %path.display(), "opened file sink");
        Ok(Self::new(
            BufWriter::new(file),
            path.display().to_string(),
        ))
    }
}

#[async_trait]
impl<W> ChunkSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn destination(&self) -> &str {
        &self.destination
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(chunk).await
    }

    async fn finish(&mut self) -> std::io::Result<()> {
        self.writer.flush().await
    }
}
