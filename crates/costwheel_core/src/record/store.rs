//! Ordered record store.

use crate::feed::{ChangeEvent, ChangeKind};
use crate::record::{Record, RecordId};
use indexmap::IndexMap;
use tracing::warn;

/// What applying a single change event did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new record was appended.
    Inserted,
    /// An existing record was replaced in place.
    Replaced,
    /// A modification for an unknown id was appended as a new record.
    ImplicitInsert,
    /// An addition for an id already present was ignored.
    DuplicateIgnored,
    /// A record was removed.
    Removed,
    /// A removal for an unknown id was ignored.
    UnknownRemoveIgnored,
}

impl ApplyOutcome {
    /// Returns true if the event was malformed and a fallback policy applied.
    pub fn is_recovered(&self) -> bool {
        matches!(
            self,
            ApplyOutcome::ImplicitInsert
                | ApplyOutcome::DuplicateIgnored
                | ApplyOutcome::UnknownRemoveIgnored
        )
    }
}

/// The authoritative, insertion-ordered set of records.
///
/// The store guarantees:
/// - At most one record per id
/// - Iteration in insertion order
/// - Modifications keep a record's position
/// - Removals keep the relative order of the remaining records
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: IndexMap<RecordId, Record>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one change event.
    ///
    /// Malformed events never fail: a duplicate add is ignored, a
    /// modification of an unknown id becomes an add, and a removal of an
    /// unknown id is ignored. Each recovery is logged.
    pub fn apply(&mut self, event: &ChangeEvent) -> ApplyOutcome {
        let record = &event.record;
        match event.kind {
            ChangeKind::Added => {
                if self.records.contains_key(&record.id) {
                    warn!(id = %record.id, "ignoring duplicate add");
                    ApplyOutcome::DuplicateIgnored
                } else {
                    self.records.insert(record.id.clone(), record.clone());
                    ApplyOutcome::Inserted
                }
            }
            ChangeKind::Modified => match self.records.get_mut(&record.id) {
                Some(existing) => {
                    *existing = record.clone();
                    ApplyOutcome::Replaced
                }
                None => {
                    warn!(id = %record.id, "modification for unknown record, adding it");
                    self.records.insert(record.id.clone(), record.clone());
                    ApplyOutcome::ImplicitInsert
                }
            },
            ChangeKind::Removed => {
                if self.records.shift_remove(&record.id).is_some() {
                    ApplyOutcome::Removed
                } else {
                    warn!(id = %record.id, "ignoring removal of unknown record");
                    ApplyOutcome::UnknownRemoveIgnored
                }
            }
        }
    }

    /// Gets a record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    /// Checks if a record exists.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Returns the position of a record in iteration order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.get_index_of(id)
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Record> + '_ {
        self.records.values()
    }

    /// Iterates record ids in insertion order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &RecordId> + '_ {
        self.records.keys()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the sum of layout costs.
    pub fn total_cost(&self) -> f64 {
        self.records.values().map(Record::layout_cost).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &RecordStore) -> Vec<&str> {
        store.ids().map(RecordId::as_str).collect()
    }

    #[test]
    fn add_preserves_order() {
        let mut store = RecordStore::new();
        for (id, cost) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
            let outcome = store.apply(&ChangeEvent::added(Record::new(id, id, cost)));
            assert_eq!(outcome, ApplyOutcome::Inserted);
        }
        assert_eq!(ids(&store), ["a", "b", "c"]);
        assert_eq!(store.total_cost(), 6.0);
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let mut store = RecordStore::new();
        store.apply(&ChangeEvent::added(Record::new("a", "rent", 100.0)));
        let outcome = store.apply(&ChangeEvent::added(Record::new("a", "food", 5.0)));

        assert_eq!(outcome, ApplyOutcome::DuplicateIgnored);
        assert!(outcome.is_recovered());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().name, "rent");
    }

    #[test]
    fn modify_keeps_position() {
        let mut store = RecordStore::new();
        for id in ["a", "b", "c"] {
            store.apply(&ChangeEvent::added(Record::new(id, id, 1.0)));
        }
        let outcome = store.apply(&ChangeEvent::modified(Record::new("b", "bills", 40.0)));

        assert_eq!(outcome, ApplyOutcome::Replaced);
        assert_eq!(ids(&store), ["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap().cost, 40.0);
        assert_eq!(store.get("b").unwrap().name, "bills");
    }

    #[test]
    fn modify_unknown_is_implicit_add() {
        let mut store = RecordStore::new();
        store.apply(&ChangeEvent::added(Record::new("a", "rent", 1.0)));
        let outcome = store.apply(&ChangeEvent::modified(Record::new("z", "misc", 2.0)));

        assert_eq!(outcome, ApplyOutcome::ImplicitInsert);
        assert_eq!(ids(&store), ["a", "z"]);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut store = RecordStore::new();
        for id in ["a", "b", "c", "d"] {
            store.apply(&ChangeEvent::added(Record::new(id, id, 1.0)));
        }
        let outcome = store.apply(&ChangeEvent::removed(Record::new("b", "b", 1.0)));

        assert_eq!(outcome, ApplyOutcome::Removed);
        assert_eq!(ids(&store), ["a", "c", "d"]);
        assert_eq!(store.position("c"), Some(1));
    }

    #[test]
    fn remove_unknown_is_ignored() {
        let mut store = RecordStore::new();
        let outcome = store.apply(&ChangeEvent::removed(Record::new("ghost", "", 0.0)));
        assert_eq!(outcome, ApplyOutcome::UnknownRemoveIgnored);
        assert!(store.is_empty());
    }

    #[test]
    fn readd_after_remove_goes_to_end() {
        let mut store = RecordStore::new();
        for id in ["a", "b"] {
            store.apply(&ChangeEvent::added(Record::new(id, id, 1.0)));
        }
        store.apply(&ChangeEvent::removed(Record::new("a", "a", 1.0)));
        store.apply(&ChangeEvent::added(Record::new("a", "a", 1.0)));
        assert_eq!(ids(&store), ["b", "a"]);
    }
}
