//! Fixed-size chunk reader over an async byte source.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use super::error::ConfigError;

/// Default chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Pulls chunks of at most `chunk_size` bytes from a byte source.
///
/// The reader is the only thing touching the source, so chunks come out in
/// source order. Short reads are accumulated until the chunk is full or the
/// source reports end of stream.
#[derive(Debug)]
pub struct ChunkReader<R> {
    source: R,
    chunk_size: usize,
    label: String,
    bytes_read: u64,
}

impl<R> ChunkReader<R>
where
    R: AsyncRead + Unpin,
{
    /// Creates a reader over `source`.
    ///
    /// `label` identifies the source (URL or path) in errors and logs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChunkSize`] when `chunk_size` is zero.
    pub fn new(
        source: R,
        chunk_size: usize,
        label: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize { value: chunk_size });
        }
        Ok(Self {
            source,
            chunk_size,
            label: label.into(),
            bytes_read: 0,
        })
    }

    /// Reads the next chunk, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates the source's IO error unchanged; callers attach the label.
    pub async fn next_chunk(&mut self) -> std::io::Result<Option<Bytes>> {
        let mut buf = BytesMut::zeroed(self.chunk_size);
        let mut filled = 0;
        while filled < self.chunk_size {
            let n = self.source.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            trace!(source = %self.label, total = self.bytes_read, "source exhausted");
            return Ok(None);
        }

        buf.truncate(filled);
        self.bytes_read += filled as u64;
        Ok(Some(buf.freeze()))
    }

    /// Identifier of the source.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Total bytes handed out so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Configured maximum chunk length.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}
