//! In-process change feed.
//!
//! The feed distributes batches of change events to subscribers in
//! emission order. It stands in for the realtime listener of the
//! persistence collaborator.
//!
//! # Usage
//!
//! ```rust
//! use costwheel_core::{ChangeEvent, ChangeFeed, Record};
//!
//! let feed = ChangeFeed::new();
//! let receiver = feed.subscribe();
//!
//! feed.emit_batch(vec![ChangeEvent::added(Record::new("a", "rent", 100.0))]);
//!
//! let batch = receiver.try_recv().unwrap();
//! assert_eq!(batch.sequence, 1);
//! assert_eq!(batch.events.len(), 1);
//! ```

use crate::feed::{ChangeEvent, FeedBatch};
use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// A change feed that distributes batches to subscribers.
///
/// The change feed:
/// - Preserves emission order
/// - Assigns monotonically increasing sequence numbers per batch
/// - Supports multiple subscribers
///
/// Batches emitted before a subscription are not replayed to it.
pub struct ChangeFeed {
    /// Subscribers (senders).
    subscribers: RwLock<Vec<Sender<FeedBatch>>>,
    /// Next sequence number.
    next_sequence: RwLock<u64>,
}

impl ChangeFeed {
    /// Creates a new change feed.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_sequence: RwLock::new(1),
        }
    }

    /// Subscribes to the feed.
    ///
    /// Returns a receiver that will receive all future batches.
    pub fn subscribe(&self) -> Receiver<FeedBatch> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits a batch of events to all subscribers.
    ///
    /// Returns the sequence number assigned to the batch.
    pub fn emit_batch(&self, events: Vec<ChangeEvent>) -> u64 {
        // Holding the subscriber lock for the whole emission keeps
        // sequence assignment and delivery in the same order.
        let mut subscribers = self.subscribers.write();

        let sequence = {
            let mut next = self.next_sequence.write();
            let sequence = *next;
            *next += 1;
            sequence
        };
        let batch = FeedBatch { sequence, events };

        // Send to subscribers (remove disconnected ones)
        subscribers.retain(|tx| tx.send(batch.clone()).is_ok());
        sequence
    }

    /// Emits a single event as its own batch.
    pub fn emit(&self, event: ChangeEvent) -> u64 {
        self.emit_batch(vec![event])
    }

    /// Returns the latest assigned sequence number (0 if none).
    pub fn latest_sequence(&self) -> u64 {
        self.next_sequence.read().saturating_sub(1)
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("latest_sequence", &self.latest_sequence())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
