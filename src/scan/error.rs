//! Error types for the sequence scanner.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a scan. Records written before the error remain.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The search pattern is not a valid regular expression.
    #[error("invalid search pattern `{pattern}`")]
    Pattern {
        /// The pattern as supplied.
        pattern: String,
        /// Why it failed to compile.
        #[source]
        source: regex::Error,
    },

    /// The document could not be opened.
    #[error("IO error opening {path}: {source}")]
    Open {
        /// The document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML in {label} at byte {position}")]
    Malformed {
        /// Identifier of the document.
        label: String,
        /// Byte offset where parsing failed.
        position: u64,
        /// The parser error.
        #[source]
        source: quick_xml::Error,
    },

    /// The document ended with elements still open.
    #[error("{label} ended before all elements were closed ({open} still open)")]
    Truncated {
        /// Identifier of the document.
        label: String,
        /// Number of unclosed elements.
        open: usize,
    },

    /// Writing a match record failed.
    #[error("error writing match records: {source}")]
    Record {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
