//! Bounded relay queue between the producer and consumer tasks.
//!
//! Capacity counts *unacknowledged* items: a `put` waits while `capacity`
//! items have been sent but not yet acknowledged with
//! [`RelayReceiver::task_done`]. The producer ends the stream with
//! [`RelaySender::close`], which sends [`Relay::End`] and then waits for the
//! consumer to acknowledge everything, marker included.
//!
//! Dropping the receiver before the marker is acknowledged closes the queue,
//! which fails any pending `put`/`close` instead of leaving the producer
//! blocked.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};
use tracing::trace;

use super::error::ConfigError;

/// Default number of unacknowledged items before `put` blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Upper bound for the queue capacity.
pub const MAX_QUEUE_CAPACITY: usize = 1024;

/// One item on the relay queue.
///
/// `End` is a separate variant, so an empty chunk is never mistaken for the
/// end of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relay {
    /// A filtered chunk, possibly empty.
    Chunk(Bytes),
    /// End-of-stream marker, sent exactly once.
    End,
}

/// The consumer side went away.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("relay queue closed by the consumer")]
pub struct RelayClosed;

#[derive(Debug)]
struct Shared {
    capacity: u32,
    slots: Semaphore,
    outstanding: AtomicUsize,
}

/// Creates a relay queue with room for `capacity` unacknowledged items.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidQueueCapacity`] unless
/// `1 <= capacity <= MAX_QUEUE_CAPACITY`.
pub fn relay_queue(capacity: usize) -> Result<(RelaySender, RelayReceiver), ConfigError> {
    if !(1..=MAX_QUEUE_CAPACITY).contains(&capacity) {
        return Err(ConfigError::InvalidQueueCapacity { value: capacity });
    }
    let permits = u32::try_from(capacity)
        .map_err(|_| ConfigError::InvalidQueueCapacity { value: capacity })?;

    let shared = Arc::new(Shared {
        capacity: permits,
        slots: Semaphore::new(capacity),
        outstanding: AtomicUsize::new(0),
    });
    let (tx, rx) = mpsc::unbounded_channel();

    Ok((
        RelaySender {
            tx,
            shared: Arc::clone(&shared),
        },
        RelayReceiver {
            rx,
            shared,
            ended: false,
            acknowledged_end: false,
        },
    ))
}

/// Producer half of the relay queue.
#[derive(Debug)]
pub struct RelaySender {
    tx: mpsc::UnboundedSender<Relay>,
    shared: Arc<Shared>,
}

impl RelaySender {
    /// Hands `chunk` to the consumer, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`RelayClosed`] if the consumer has gone away.
    pub async fn put(&mut self, chunk: Bytes) -> Result<(), RelayClosed> {
        self.send(Relay::Chunk(chunk)).await
    }

    /// Sends the end-of-stream marker and waits until the consumer has
    /// acknowledged every item sent on this queue.
    ///
    /// # Errors
    ///
    /// Returns [`RelayClosed`] if the consumer went away before draining.
    pub async fn close(mut self) -> Result<(), RelayClosed> {
        self.send(Relay::End).await?;
        // Every slot back in the semaphore means nothing is left unacknowledged.
        let all = self
            .shared
            .slots
            .acquire_many(self.shared.capacity)
            .await
            .map_err(|_| RelayClosed)?;
        drop(all);
        trace!("relay queue drained");
        Ok(())
    }

    /// Items sent but not yet acknowledged.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::SeqCst)
    }

    async fn send(&mut self, item: Relay) -> Result<(), RelayClosed> {
        let slot = self.shared.slots.acquire().await.map_err(|_| RelayClosed)?;
        // The slot is returned by `task_done`, not by dropping the permit.
        slot.forget();
        self.shared.outstanding.fetch_add(1, Ordering::SeqCst);
        self.tx.send(item).map_err(|_| RelayClosed)
    }
}

/// Consumer half of the relay queue.
#[derive(Debug)]
pub struct RelayReceiver {
    rx: mpsc::UnboundedReceiver<Relay>,
    shared: Arc<Shared>,
    ended: bool,
    acknowledged_end: bool,
}

impl RelayReceiver {
    /// Waits for the next item.
    ///
    /// Returns `None` if the producer went away without sending
    /// [`Relay::End`].
    ///
    /// # Panics
    ///
    /// Panics when called again after [`Relay::End`] was received.
    pub async fn get(&mut self) -> Option<Relay> {
        assert!(
            !self.ended,
            "relay protocol violation: get() after the end-of-stream marker"
        );
        let item = self.rx.recv().await?;
        if item == Relay::End {
            self.ended = true;
        }
        Some(item)
    }

    /// Acknowledges one received item, freeing its slot.
    ///
    /// # Panics
    ///
    /// Panics when there is nothing left to acknowledge.
    pub fn task_done(&mut self) {
        let previous = self
            .shared
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        assert!(
            previous.is_ok(),
            "relay protocol violation: task_done() called more times than items were sent"
        );
        if self.ended && previous == Ok(1) {
            self.acknowledged_end = true;
        }
        self.shared.slots.add_permits(1);
    }
}

impl Drop for RelayReceiver {
    fn drop(&mut self) {
        if !self.acknowledged_end {
            self.shared.slots.close();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    const STALL: Duration = Duration::from_millis(100);

    #[test]
    fn test_relay_queue_rejects_zero_capacity() {
        assert_eq!(
            relay_queue(0).err(),
            Some(ConfigError::InvalidQueueCapacity { value: 0 })
        );
    }

    #[test]
    fn test_relay_queue_rejects_capacity_over_max() {
        assert_eq!(
            relay_queue(MAX_QUEUE_CAPACITY + 1).err(),
            Some(ConfigError::InvalidQueueCapacity {
                value: MAX_QUEUE_CAPACITY + 1
            })
        );
    }

    #[tokio::test]
    async fn test_relay_preserves_order_and_end_marker() {
        let (mut tx, mut rx) = relay_queue(4).unwrap();
        tx.put(Bytes::from_static(b"a")).await.unwrap();
        tx.put(Bytes::new()).await.unwrap();
        tx.put(Bytes::from_static(b"b")).await.unwrap();

        let producer = tokio::spawn(tx.close());

        assert_eq!(rx.get().await, Some(Relay::Chunk(Bytes::from_static(b"a"))));
        rx.task_done();
        // Empty chunk is data, not the end marker.
        assert_eq!(rx.get().await, Some(Relay::Chunk(Bytes::new())));
        rx.task_done();
        assert_eq!(rx.get().await, Some(Relay::Chunk(Bytes::from_static(b"b"))));
        rx.task_done();
        assert_eq!(rx.get().await, Some(Relay::End));
        rx.task_done();

        producer.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_put_blocks_when_capacity_unacknowledged() {
        let (mut tx, mut rx) = relay_queue(2).unwrap();
        tx.put(Bytes::from_static(b"1")).await.unwrap();
        tx.put(Bytes::from_static(b"2")).await.unwrap();
        assert_eq!(tx.outstanding(), 2);

        // Third put must stall: two items are outstanding.
        let stalled = tokio::time::timeout(STALL, tx.put(Bytes::from_static(b"3"))).await;
        assert!(stalled.is_err(), "put should block while queue is full");

        // Receiving alone does not free a slot; acknowledging does.
        assert!(rx.get().await.is_some());
        let still_stalled = tokio::time::timeout(STALL, tx.put(Bytes::from_static(b"3"))).await;
        assert!(still_stalled.is_err(), "put should wait for acknowledgement");

        rx.task_done();
        tokio::time::timeout(STALL, tx.put(Bytes::from_static(b"3")))
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_waits_for_final_acknowledgement() {
        let (mut tx, mut rx) = relay_queue(4).unwrap();
        tx.put(Bytes::from_static(b"x")).await.unwrap();
        let mut closing = tokio::spawn(tx.close());

        assert_eq!(rx.get().await, Some(Relay::Chunk(Bytes::from_static(b"x"))));
        rx.task_done();
        assert_eq!(rx.get().await, Some(Relay::End));

        // Marker received but not acknowledged: close() is still waiting.
        assert!(tokio::time::timeout(STALL, &mut closing).await.is_err());

        rx.task_done();
        closing.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_dropped_receiver_releases_blocked_producer() {
        let (mut tx, rx) = relay_queue(1).unwrap();
        tx.put(Bytes::from_static(b"1")).await.unwrap();

        let blocked = tokio::spawn(async move { tx.put(Bytes::from_static(b"2")).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(rx);

        assert_eq!(blocked.await.unwrap(), Err(RelayClosed));
    }

    #[tokio::test]
    async fn test_dropped_sender_without_marker_yields_none() {
        let (tx, mut rx) = relay_queue(1).unwrap();
        drop(tx);
        assert_eq!(rx.get().await, None);
    }

    #[tokio::test]
    #[should_panic(expected = "after the end-of-stream marker")]
    async fn test_get_after_end_is_protocol_violation() {
        let (tx, mut rx) = relay_queue(1).unwrap();
        let closing = tokio::spawn(tx.close());
        assert_eq!(rx.get().await, Some(Relay::End));
        rx.task_done();
        closing.await.unwrap().unwrap();
        let _ = rx.get().await;
    }

    #[tokio::test]
    #[should_panic(expected = "more times than items were sent")]
    async fn test_extra_acknowledgement_is_protocol_violation() {
        let (_tx, mut rx) = relay_queue(1).unwrap();
        rx.task_done();
    }
}
