//! Error types for the streaming transfer pipeline.
//!
//! Every variant carries the identifier of the source or destination it
//! failed on, so the binary can print either a terse summary or the full
//! cause chain.

use std::path::PathBuf;

use thiserror::Error;

use super::filter::FilterError;
use super::relay::MAX_QUEUE_CAPACITY;

/// Invalid pipeline configuration, raised before any byte is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunk size must be a positive number of bytes.
    #[error("invalid chunk size {value}: must be at least 1 byte")]
    InvalidChunkSize {
        /// The rejected value.
        value: usize,
    },

    /// Relay queue capacity outside the supported range.
    #[error("invalid queue capacity {value}: must be between 1 and {MAX_QUEUE_CAPACITY}")]
    InvalidQueueCapacity {
        /// The rejected value.
        value: usize,
    },

    /// A content coding that no filter can undo.
    #[error("unsupported content encoding `{encoding}`")]
    UnsupportedEncoding {
        /// The coding token as received.
        encoding: String,
    },
}

/// Errors that abort a transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The pipeline configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading from the byte source failed.
    #[error("error reading from {source_label}: {source}")]
    Read {
        /// Identifier of the byte source (URL or path).
        source_label: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A filter rejected chunk data (for example corrupt gzip input).
    #[error("{filter} filter failed on data from {source_label}")]
    Filter {
        /// Name of the failing filter.
        filter: &'static str,
        /// Identifier of the byte source (URL or path).
        source_label: String,
        /// The filter's own error.
        #[source]
        source: FilterError,
    },

    /// Writing to the sink failed.
    #[error("error writing to {destination}: {source}")]
    Write {
        /// Identifier of the sink.
        destination: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Opening a file on either end of the pipeline failed.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The producer went away without sending the end-of-stream marker.
    #[error("stream from {source_label} ended without an end-of-stream marker")]
    Truncated {
        /// Identifier of the byte source.
        source_label: String,
    },

    /// The consumer went away before draining the queue.
    #[error("consumer for {source_label} stopped before the stream was drained")]
    ConsumerGone {
        /// Identifier of the byte source.
        source_label: String,
    },

    /// A pipeline task was cancelled by the runtime.
    #[error("{role} task for {source_label} was cancelled")]
    Cancelled {
        /// `producer` or `consumer`.
        role: &'static str,
        /// Identifier of the byte source.
        source_label: String,
    },
}

impl TransferError {
    /// Creates a read error.
    pub fn read(source_label: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            source_label: source_label.into(),
            source,
        }
    }

    /// Creates a filter error.
    pub fn filter(source_label: impl Into<String>, source: FilterError) -> Self {
        Self::Filter {
            filter: source.filter,
            source_label: source_label.into(),
            source,
        }
    }

    /// Creates a sink write error.
    pub fn write(destination: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            destination: destination.into(),
            source,
        }
    }

    /// Creates a file IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
