//! Streaming transfer pipeline.
//!
//! Bytes flow reader -> filter chain -> relay queue -> sink:
//!
//! - [`ChunkReader`] pulls fixed-size chunks from any `AsyncRead` source
//! - [`FilterChain`] applies per-chunk transforms such as gzip decoding
//! - the relay queue hands chunks to the consumer task with backpressure
//! - a [`ChunkSink`] persists them (file, stdout, memory)
//!
//! # Example
//!
//! ```no_run
//! use seqfetch_core::pipeline::{FilterChain, TransferConfig, WriterSink, transfer};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TransferConfig::default();
//! let file = tokio::fs::File::open("sequence.xml.gz").await?;
//! let reader = config.reader(file, "sequence.xml.gz")?;
//! let filters = FilterChain::for_content_encoding(Some("gzip"))?;
//! let sink = WriterSink::create_file(Path::new("sequence.xml")).await?;
//! let outcome = transfer(reader, filters, sink, config.queue_capacity()).await?;
//! println!("wrote {} bytes", outcome.bytes_written);
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;
mod persist;
mod reader;
mod relay;
mod sink;
mod transfer;

pub use error::{ConfigError, TransferError};
pub use filter::{ChunkFilter, FilterChain, FilterError, GzipFilter};
pub use persist::{PersistMethod, persist_copy, restream_copy};
pub use reader::{ChunkReader, DEFAULT_CHUNK_SIZE};
pub use relay::{
    DEFAULT_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, Relay, RelayClosed, RelayReceiver, RelaySender,
    relay_queue,
};
pub use sink::{ChunkSink, WriterSink};
pub use transfer::{TransferConfig, TransferOutcome, transfer};
