//! Reference model of the record store.

use costwheel_core::{ChangeEvent, ChangeKind, Record};

/// A deliberately naive store: a vector searched linearly.
///
/// Applies the same recovery rules as the real store, so the two can be
/// compared after any event sequence.
#[derive(Debug, Clone, Default)]
pub struct ModelStore {
    records: Vec<Record>,
}

impl ModelStore {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    pub fn apply(&mut self, event: &ChangeEvent) {
        let position = self.records.iter().position(|r| r.id == event.record.id);
        match (event.kind, position) {
            (ChangeKind::Added, None) | (ChangeKind::Modified, None) => {
                self.records.push(event.record.clone());
            }
            (ChangeKind::Added, Some(_)) => {}
            (ChangeKind::Modified, Some(i)) => self.records[i] = event.record.clone(),
            (ChangeKind::Removed, Some(i)) => {
                self.records.remove(i);
            }
            (ChangeKind::Removed, None) => {}
        }
    }

    /// Applies every event in order.
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a ChangeEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.to_string()).collect()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}
