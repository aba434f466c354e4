//! Property-based test generators using proptest.
//!
//! Ids are drawn from a small pool so that duplicate adds, modifications
//! of unknown ids and removals of unknown ids all show up regularly.

use costwheel_core::{ChangeEvent, ChangeKind, Record, RecordId};
use proptest::prelude::*;

/// Number of distinct ids the generators draw from.
pub const ID_POOL: usize = 6;

const NAMES: [&str; 5] = ["rent", "food", "travel", "utilities", "fun"];

/// Strategy for ids from the shared pool.
pub fn record_id_strategy() -> impl Strategy<Value = RecordId> {
    (0..ID_POOL).prop_map(|n| RecordId::new(format!("r{n}")))
}

/// Strategy for record names. Names repeat across ids.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES.to_vec()).prop_map(str::to_string)
}

/// Strategy for valid costs, zero included.
pub fn cost_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        1 => Just(0.0),
        8 => 0.01f64..10_000.0,
    ]
}

/// Strategy for costs an upstream might send, garbage included.
pub fn untrusted_cost_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => cost_strategy(),
        1 => -1000.0f64..0.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

/// Strategy for a record from the shared id pool.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    (record_id_strategy(), name_strategy(), cost_strategy())
        .prop_map(|(id, name, cost)| Record::new(id, name, cost))
}

/// Strategy for change kinds.
pub fn change_kind_strategy() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        3 => Just(ChangeKind::Added),
        2 => Just(ChangeKind::Modified),
        2 => Just(ChangeKind::Removed),
    ]
}

/// Strategy for a single change event.
pub fn change_event_strategy() -> impl Strategy<Value = ChangeEvent> {
    (change_kind_strategy(), record_strategy())
        .prop_map(|(kind, record)| ChangeEvent { kind, record })
}

/// Strategy for one feed delivery, possibly empty.
pub fn batch_strategy() -> impl Strategy<Value = Vec<ChangeEvent>> {
    prop::collection::vec(change_event_strategy(), 0..8)
}

/// Strategy for a sequence of deliveries.
pub fn feed_strategy() -> impl Strategy<Value = Vec<Vec<ChangeEvent>>> {
    prop::collection::vec(batch_strategy(), 1..12)
}

/// Strategy for records with distinct ids and arbitrary costs.
pub fn distinct_records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((name_strategy(), untrusted_cost_strategy()), 0..24).prop_map(
        |pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(n, (name, cost))| Record::new(format!("d{n}"), name, cost))
                .collect()
        },
    )
}

/// Strategy for millisecond gaps between deliveries, from back-to-back
/// to well past a full transition.
pub fn gap_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        1 => Just(0u64),
        4 => 1u64..750,
        1 => 750u64..2000,
    ]
}
