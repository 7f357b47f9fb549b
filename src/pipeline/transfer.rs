//! Producer/consumer transfer over the relay queue.
//!
//! [`transfer`] runs two tokio tasks: the producer reads chunks, filters them
//! and puts them on the queue; the consumer drains the queue into a
//! [`ChunkSink`]. The queue is the only thing the two tasks share.

use bytes::Bytes;
use tokio::io::AsyncRead;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

use super::error::{ConfigError, TransferError};
use super::filter::FilterChain;
use super::reader::{ChunkReader, DEFAULT_CHUNK_SIZE};
use super::relay::{
    DEFAULT_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, Relay, RelayReceiver, RelaySender, relay_queue,
};
use super::sink::ChunkSink;

/// Chunk size and queue capacity for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    chunk_size: usize,
    queue_capacity: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl TransferConfig {
    /// Validates and creates a transfer configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero chunk size or a queue capacity
    /// outside `1..=MAX_QUEUE_CAPACITY`.
    pub fn new(chunk_size: usize, queue_capacity: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize { value: chunk_size });
        }
        if !(1..=MAX_QUEUE_CAPACITY).contains(&queue_capacity) {
            return Err(ConfigError::InvalidQueueCapacity {
                value: queue_capacity,
            });
        }
        Ok(Self {
            chunk_size,
            queue_capacity,
        })
    }

    /// Maximum bytes per chunk.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Unacknowledged items allowed on the relay queue.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Wraps `source` in a chunk reader using this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chunk size is invalid.
    pub fn reader<R>(
        &self,
        source: R,
        label: impl Into<String>,
    ) -> Result<ChunkReader<R>, ConfigError>
    where
        R: AsyncRead + Unpin,
    {
        ChunkReader::new(source, self.chunk_size, label)
    }
}

/// Result of a completed transfer.
#[derive(Debug)]
pub struct TransferOutcome<S> {
    /// The sink, finished and flushed.
    pub sink: S,
    /// Bytes read from the source, before filtering.
    pub bytes_read: u64,
    /// Bytes delivered to the sink, after filtering.
    pub bytes_written: u64,
    /// Chunks delivered to the sink, including empty ones.
    pub chunks: u64,
}

#[derive(Debug)]
struct Produced {
    bytes_read: u64,
}

#[derive(Debug)]
struct Drained<S> {
    sink: S,
    bytes_written: u64,
    chunks: u64,
}

/// Streams `reader` through `filters` into `sink`.
///
/// Returns once the consumer has acknowledged the end-of-stream marker and
/// the sink is flushed.
///
/// # Errors
///
/// Returns the producer's error (read or filter failure) in preference to
/// the consumer error it caused, otherwise the consumer's error.
///
/// # Panics
///
/// Re-raises a panic from either task, including relay protocol violations.
#[instrument(skip_all, fields(source = %reader.label(), destination = %sink.destination()))]
pub async fn transfer<R, S>(
    reader: ChunkReader<R>,
    filters: FilterChain,
    sink: S,
    queue_capacity: usize,
) -> Result<TransferOutcome<S>, TransferError>
where
    R: AsyncRead + Unpin + Send + 'static,
    S: ChunkSink + 'static,
{
    let (tx, rx) = relay_queue(queue_capacity)?;
    let source_label = reader.label().to_string();
    debug!(
        chunk_size = reader.chunk_size(),
        queue_capacity,
        filters = filters.len(),
        "starting transfer"
    );

    let producer = tokio::spawn(produce(reader, filters, tx));
    let consumer = tokio::spawn(drain(rx, sink, source_label.clone()));
    let (produced, drained) = tokio::join!(producer, consumer);

    let produced = unwrap_join(produced, "producer", &source_label)?;
    let drained = unwrap_join(drained, "consumer", &source_label)?;

    match (produced, drained) {
        (Ok(produced), Ok(drained)) => {
            info!(
                bytes_read = produced.bytes_read,
                bytes_written = drained.bytes_written,
                chunks = drained.chunks,
                "transfer complete"
            );
            Ok(TransferOutcome {
                sink: drained.sink,
                bytes_read: produced.bytes_read,
                bytes_written: drained.bytes_written,
                chunks: drained.chunks,
            })
        }
        (Err(TransferError::ConsumerGone { .. }), Err(consumer_error)) => {
            warn!(error = %consumer_error, "consumer failed");
            Err(consumer_error)
        }
        (Err(producer_error), _) => {
            warn!(error = %producer_error, "producer failed");
            Err(producer_error)
        }
        (Ok(_), Err(consumer_error)) => {
            warn!(error = %consumer_error, "consumer failed");
            Err(consumer_error)
        }
    }
}

fn unwrap_join<T>(
    joined: Result<T, JoinError>,
    role: &'static str,
    source_label: &str,
) -> Result<T, TransferError> {
    match joined {
        Ok(value) => Ok(value),
        Err(join_error) if join_error.is_panic() => {
            std::panic::resume_unwind(join_error.into_panic())
        }
        Err(_) => Err(TransferError::Cancelled {
            role,
            source_label: source_label.to_string(),
        }),
    }
}

async fn produce<R>(
    mut reader: ChunkReader<R>,
    mut filters: FilterChain,
    mut tx: RelaySender,
) -> Result<Produced, TransferError>
where
    R: AsyncRead + Unpin,
{
    let label = reader.label().to_string();
    let consumer_gone = || TransferError::ConsumerGone {
        source_label: label.clone(),
    };

    while let Some(chunk) = reader
        .next_chunk()
        .await
        .map_err(|e| TransferError::read(&label, e))?
    {
        let filtered = filters
            .apply(chunk)
            .map_err(|e| TransferError::filter(&label, e))?;
        tx.put(filtered).await.map_err(|_| consumer_gone())?;
    }

    let tail: Bytes = filters
        .finish()
        .map_err(|e| TransferError::filter(&label, e))?;
    if !tail.is_empty() {
        tx.put(tail).await.map_err(|_| consumer_gone())?;
    }

    tx.close().await.map_err(|_| consumer_gone())?;
    Ok(Produced {
        bytes_read: reader.bytes_read(),
    })
}

async fn drain<S>(
    mut rx: RelayReceiver,
    mut sink: S,
    source_label: String,
) -> Result<Drained<S>, TransferError>
where
    S: ChunkSink,
{
    let mut bytes_written = 0_u64;
    let mut chunks = 0_u64;

    loop {
        match rx.get().await {
            Some(Relay::Chunk(chunk)) => {
                sink.write_chunk(&chunk)
                    .await
                    .map_err(|e| TransferError::write(sink.destination(), e))?;
                bytes_written += chunk.len() as u64;
                chunks += 1;
                rx.task_done();
            }
            Some(Relay::End) => {
                sink.finish()
                    .await
                    .map_err(|e| TransferError::write(sink.destination(), e))?;
                rx.task_done();
                return Ok(Drained {
                    sink,
                    bytes_written,
                    chunks,
                });
            }
            None => return Err(TransferError::Truncated { source_label }),
        }
    }
}
