//! Records and the record store.

mod id;
mod store;

pub use id::RecordId;
pub use store::{ApplyOutcome, RecordStore};

use serde::{Deserialize, Serialize};

/// A cost-bearing record, one slice of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique key issued by the persistence collaborator.
    pub id: RecordId,
    /// Display name; also keys the slice color.
    #[serde(default)]
    pub name: String,
    /// Cost; drives the slice's angular share.
    #[serde(default)]
    pub cost: f64,
}

impl Record {
    /// Creates a record.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }

    /// Returns the cost used for layout.
    ///
    /// Negative and non-finite costs come from a misbehaving upstream and
    /// are clamped to zero.
    #[must_use]
    pub fn layout_cost(&self) -> f64 {
        if self.cost.is_finite() && self.cost > 0.0 {
            self.cost
        } else {
            0.0
        }
    }
}
