//! Seqfetch Core Library
//!
//! Fetches nucleotide records over HTTP, decodes and persists them through a
//! bounded producer/consumer pipeline, and scans the stored XML for a
//! sequence pattern.
//!
//! # Architecture
//!
//! - [`pipeline`] - chunked reader, filter chain, relay queue, sinks and the
//!   transfer driver that ties them together
//! - [`fetch`] - HTTP client and efetch URL construction
//! - [`scan`] - pull-parsing pattern scanner with match recorders
//! - [`naming`] - file names for saved record copies

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fetch;
pub mod naming;
pub mod pipeline;
pub mod scan;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use fetch::{EFETCH_ENDPOINT, FetchError, HttpClient, efetch_url};
pub use naming::{saved_copy_name, today_utc};
pub use pipeline::{
    ChunkFilter, ChunkReader, ChunkSink, ConfigError, FilterChain, TransferConfig, TransferError,
    TransferOutcome, WriterSink, persist_copy, transfer,
};
pub use scan::{
    CsvRecorder, FrequencyTable, MatchRecord, MatchRecorder, ScanError, ScanSummary,
    SequenceScanner,
};
