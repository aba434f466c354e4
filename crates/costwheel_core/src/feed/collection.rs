//! In-memory persistence collaborator.
//!
//! `InMemoryCollection` owns a list of records and reports every change
//! on a [`ChangeFeed`], the way a hosted document collection would. It
//! accepts removal requests from the chart through [`DeleteSink`], so the
//! click → delete → removed event → redraw loop can run without a real
//! backend.

use crate::feed::{ChangeEvent, ChangeFeed};
use crate::interaction::DeleteSink;
use crate::record::{Record, RecordId, RecordStore};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// A record collection that publishes its changes on a feed.
pub struct InMemoryCollection {
    feed: Arc<ChangeFeed>,
    records: Mutex<RecordStore>,
}

impl InMemoryCollection {
    /// Creates an empty collection publishing on `feed`.
    pub fn new(feed: Arc<ChangeFeed>) -> Self {
        Self {
            feed,
            records: Mutex::new(RecordStore::new()),
        }
    }

    /// Returns the feed this collection publishes on.
    pub fn feed(&self) -> &Arc<ChangeFeed> {
        &self.feed
    }

    /// Adds a record under a fresh id and publishes it.
    pub fn add(&self, name: impl Into<String>, cost: f64) -> RecordId {
        self.batch(|w| w.add(name, cost)).1
    }

    /// Updates a record's name and cost.
    ///
    /// Returns false if the id is unknown; nothing is published then.
    pub fn update(&self, id: &str, name: impl Into<String>, cost: f64) -> bool {
        self.batch(|w| w.update(id, name, cost)).1
    }

    /// Deletes a record.
    ///
    /// Returns false if the id is unknown; nothing is published then.
    pub fn delete(&self, id: &str) -> bool {
        self.batch(|w| w.delete(id)).1
    }

    /// Groups several writes into one published batch.
    ///
    /// Returns the batch sequence number (`None` if the closure wrote
    /// nothing) and the closure's result.
    pub fn batch<F, T>(&self, f: F) -> (Option<u64>, T)
    where
        F: FnOnce(&mut CollectionWriter<'_>) -> T,
    {
        let (events, result) = {
            let mut records = self.records.lock();
            let mut writer = CollectionWriter {
                records: &mut *records,
                events: Vec::new(),
            };
            let result = f(&mut writer);
            (writer.events, result)
        };
        if events.is_empty() {
            return (None, result);
        }
        (Some(self.feed.emit_batch(events)), result)
    }

    /// Publishes events verbatim as one batch.
    ///
    /// The events are mirrored into the collection with the same lenient
    /// policy the chart's store uses, but are forwarded unchanged, so
    /// malformed events reach subscribers as given.
    pub fn publish(&self, events: Vec<ChangeEvent>) -> u64 {
        {
            let mut records = self.records.lock();
            for event in &events {
                records.apply(event);
            }
        }
        self.feed.emit_batch(events)
    }

    /// Returns a copy of the records in insertion order.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.lock().iter().cloned().collect()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl DeleteSink for InMemoryCollection {
    fn delete_by_id(&self, id: &RecordId) {
        if !self.delete(id.as_str()) {
            debug!(id = %id, "delete request for unknown record");
        }
    }
}

impl std::fmt::Debug for InMemoryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCollection")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Write access to a collection inside [`InMemoryCollection::batch`].
pub struct CollectionWriter<'a> {
    records: &'a mut RecordStore,
    events: Vec<ChangeEvent>,
}

impl CollectionWriter<'_> {
    /// Adds a record under a fresh id.
    pub fn add(&mut self, name: impl Into<String>, cost: f64) -> RecordId {
        let id = RecordId::generate();
        self.insert(Record::new(id.clone(), name, cost));
        id
    }

    /// Inserts a record with a caller-chosen id.
    ///
    /// Returns false if the id is already taken.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.records.contains(record.id.as_str()) {
            return false;
        }
        self.push(ChangeEvent::added(record));
        true
    }

    /// Updates a record. Returns false if the id is unknown.
    pub fn update(&mut self, id: &str, name: impl Into<String>, cost: f64) -> bool {
        if !self.records.contains(id) {
            return false;
        }
        self.push(ChangeEvent::modified(Record::new(id, name, cost)));
        true
    }

    /// Deletes a record. Returns false if the id is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        match self.records.get(id).cloned() {
            Some(record) => {
                self.push(ChangeEvent::removed(record));
                true
            }
            None => false,
        }
    }

    fn push(&mut self, event: ChangeEvent) {
        self.records.apply(&event);
        self.events.push(event);
    }
}
