//! Change events and feed batches.

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Kind of change reported by the persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Record was added.
    Added,
    /// Record was modified.
    Modified,
    /// Record was removed.
    Removed,
}

/// A single change event.
///
/// Removal events still carry the record body as last seen by the
/// collaborator; only its id is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Type of change.
    pub kind: ChangeKind,
    /// The record affected.
    pub record: Record,
}

impl ChangeEvent {
    /// Creates an added event.
    pub fn added(record: Record) -> Self {
        Self {
            kind: ChangeKind::Added,
            record,
        }
    }

    /// Creates a modified event.
    pub fn modified(record: Record) -> Self {
        Self {
            kind: ChangeKind::Modified,
            record,
        }
    }

    /// Creates a removed event.
    pub fn removed(record: Record) -> Self {
        Self {
            kind: ChangeKind::Removed,
            record,
        }
    }
}

/// One delivery from the feed: an ordered batch of events.
///
/// Every batch triggers exactly one reconciliation cycle, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedBatch {
    /// Sequence number assigned by the feed.
    pub sequence: u64,
    /// Events in application order.
    pub events: Vec<ChangeEvent>,
}

impl FeedBatch {
    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the batch carries no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
