//! Error types for the fetch module.

use thiserror::Error;

use crate::pipeline::{ConfigError, TransferError};

/// Errors that can occur while fetching a remote record.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not reach the server (DNS, refused connection, TLS).
    #[error(
        "Attempted url: {url}\nUnable to make connection; check your internet connection?\nLibrary error message: {source}"
    )]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before headers arrived.
    #[error("Attempted url: {url}\nTimed out waiting for the server.")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP status.
    #[error("Attempted url: {url}\nHTTP error reading data from server (HTTP {status}).")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The endpoint or parameters do not form a valid URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
        /// Why it failed to parse.
        #[source]
        source: url::ParseError,
    },

    /// The response uses a content coding we cannot decode.
    #[error("Attempted url: {url}\nServer response cannot be decoded.")]
    Encoding {
        /// The URL whose response was rejected.
        url: String,
        /// The rejected coding.
        #[source]
        source: ConfigError,
    },

    /// The body transfer failed (read, decompression or write).
    #[error("Attempted url: {url}\nTransfer of the response body failed.")]
    Transfer {
        /// The URL whose body was being transferred.
        url: String,
        /// The pipeline error.
        #[source]
        source: TransferError,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error, mapping timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    /// Creates an unsupported encoding error.
    pub fn encoding(url: impl Into<String>, source: ConfigError) -> Self {
        Self::Encoding {
            url: url.into(),
            source,
        }
    }

    /// Creates a body transfer error.
    pub fn transfer(url: impl Into<String>, source: TransferError) -> Self {
        Self::Transfer {
            url: url.into(),
            source,
        }
    }
}
