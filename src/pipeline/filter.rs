//! Per-chunk byte transforms applied between the reader and the relay queue.
//!
//! A [`FilterChain`] owns an ordered list of [`ChunkFilter`]s and applies them
//! left to right to every chunk. Filters may keep state between chunks (the
//! gzip decoder does), so a chain is driven by exactly one producer, in
//! chunk order, and never shared.

use std::io::Write;

use bytes::{Bytes, BytesMut};
use flate2::write::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;

use super::error::ConfigError;

/// A filter rejected its input.
#[derive(Debug, Error)]
#[error("{filter} filter rejected input: {source}")]
pub struct FilterError {
    /// Name of the filter that failed.
    pub filter: &'static str,
    /// The underlying decoder error.
    #[source]
    pub source: std::io::Error,
}

impl FilterError {
    /// Creates a filter error.
    #[must_use]
    pub fn new(filter: &'static str, source: std::io::Error) -> Self {
        Self { filter, source }
    }
}

/// A stateful, order-sensitive chunk transform.
pub trait ChunkFilter: Send {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Transforms one chunk. Output may be empty while the filter buffers.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the chunk cannot be transformed.
    fn apply(&mut self, chunk: Bytes) -> Result<Bytes, FilterError>;

    /// Flushes retained state once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the stream ended in an invalid state.
    fn finish(&mut self) -> Result<Bytes, FilterError> {
        Ok(Bytes::new())
    }
}

/// Ordered composition of filters. An empty chain is the identity.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ChunkFilter>>,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

impl FilterChain {
    /// Creates a chain applying `filters` in order.
    #[must_use]
    pub fn new(filters: Vec<Box<dyn ChunkFilter>>) -> Self {
        Self { filters }
    }

    /// Creates an empty (identity) chain.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds the decoding chain for an HTTP `Content-Encoding` header value.
    ///
    /// Codings are listed in the order they were applied by the sender, so
    /// they are undone in reverse. `identity` contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedEncoding`] for any coding without a
    /// decoder; nothing has been read at that point.
    pub fn for_content_encoding(header: Option<&str>) -> Result<Self, ConfigError> {
        let mut filters: Vec<Box<dyn ChunkFilter>> = Vec::new();
        let codings = header
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|coding| !coding.is_empty());

        for coding in codings.rev() {
            match coding.to_ascii_lowercase().as_str() {
                "gzip" | "x-gzip" => filters.push(Box::new(GzipFilter::new())),
                "identity" => {}
                _ => {
                    return Err(ConfigError::UnsupportedEncoding {
                        encoding: coding.to_string(),
                    });
                }
            }
        }

        let chain = Self::new(filters);
        debug!(filters = ?chain, "filter chain configured");
        Ok(chain)
    }

    /// Number of filters in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true when the chain is the identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Passes `chunk` through every filter in order.
    ///
    /// # Errors
    ///
    /// Returns the first filter's error; later filters are not invoked.
    pub fn apply(&mut self, chunk: Bytes) -> Result<Bytes, FilterError> {
        self.filters
            .iter_mut()
            .try_fold(chunk, |data, filter| filter.apply(data))
    }

    /// Drains every filter's retained state at end of stream.
    ///
    /// Output flushed by filter `i` still passes through filters `i+1..`
    /// before their own flush.
    ///
    /// # Errors
    ///
    /// Returns the first filter error encountered.
    pub fn finish(&mut self) -> Result<Bytes, FilterError> {
        let mut carry = Bytes::new();
        for filter in &mut self.filters {
            let head = if carry.is_empty() {
                Bytes::new()
            } else {
                filter.apply(carry)?
            };
            let tail = filter.finish()?;
            carry = concat(head, tail);
        }
        Ok(carry)
    }
}

fn concat(head: Bytes, tail: Bytes) -> Bytes {
    if tail.is_empty() {
        return head;
    }
    if head.is_empty() {
        return tail;
    }
    let mut joined = BytesMut::with_capacity(head.len() + tail.len());
    joined.extend_from_slice(&head);
    joined.extend_from_slice(&tail);
    joined.freeze()
}

/// Streaming gzip decoder.
///
/// Compressed input may be split at any byte; the decoder keeps partial
/// headers, blocks and trailers between calls.
pub struct GzipFilter {
    decoder: MultiGzDecoder<Vec<u8>>,
}

impl GzipFilter {
    const NAME: &'static str = "gzip";

    /// Creates a decoder. Concatenated gzip members decode as one stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoder: MultiGzDecoder::new(Vec::new()),
        }
    }

    fn take_output(&mut self) -> Bytes {
        Bytes::from(std::mem::take(self.decoder.get_mut()))
    }
}

impl Default for GzipFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkFilter for GzipFilter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&mut self, chunk: Bytes) -> Result<Bytes, FilterError> {
        self.decoder
            .write_all(&chunk)
            .and_then(|()| self.decoder.flush())
            .map_err(|e| FilterError::new(Self::NAME, e))?;
        Ok(self.take_output())
    }

    fn finish(&mut self) -> Result<Bytes, FilterError> {
        self.decoder
            .try_finish()
            .map_err(|e| FilterError::new(Self::NAME, e))?;
        Ok(self.take_output())
    }
}
