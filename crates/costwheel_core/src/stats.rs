//! Chart statistics.

use crate::record::ApplyOutcome;

/// Counters describing what the chart has processed.
///
/// Values only ever increase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartStats {
    /// Feed batches applied.
    pub batches_applied: u64,
    /// Change events applied, recovered ones included.
    pub events_applied: u64,
    /// Additions ignored because the id already existed.
    pub duplicate_adds_ignored: u64,
    /// Modifications of unknown ids turned into additions.
    pub implicit_adds: u64,
    /// Removals of unknown ids ignored.
    pub unknown_removes_ignored: u64,
    /// Reconciliation cycles run.
    pub cycles: u64,
    /// Elements created.
    pub elements_entered: u64,
    /// Elements destroyed after their exit transition.
    pub elements_exited: u64,
    /// Clicks dispatched to the interaction handler.
    pub clicks: u64,
}

impl ChartStats {
    /// Creates zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_outcome(&mut self, outcome: ApplyOutcome) {
        self.events_applied += 1;
        match outcome {
            ApplyOutcome::DuplicateIgnored => self.duplicate_adds_ignored += 1,
            ApplyOutcome::ImplicitInsert => self.implicit_adds += 1,
            ApplyOutcome::UnknownRemoveIgnored => self.unknown_removes_ignored += 1,
            ApplyOutcome::Inserted | ApplyOutcome::Replaced | ApplyOutcome::Removed => {}
        }
    }

    /// Total events that needed a fallback policy.
    pub fn recovered_events(&self) -> u64 {
        self.duplicate_adds_ignored + self.implicit_adds + self.unknown_removes_ignored
    }
}
