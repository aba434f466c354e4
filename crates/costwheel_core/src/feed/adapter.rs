//! Subscription side of the change feed.

use crate::chart::DonutChart;
use crate::color::ColorScale;
use crate::feed::{ChangeFeed, FeedBatch};
use crate::interaction::InteractionHandler;
use crate::reconcile::CycleReport;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::{debug, warn};

/// Drains feed deliveries into a chart, one cycle per delivery.
#[derive(Debug)]
pub struct FeedAdapter {
    receiver: Receiver<FeedBatch>,
    last_sequence: Option<u64>,
    disconnected: bool,
}

impl FeedAdapter {
    /// Wraps an existing subscription.
    pub fn new(receiver: Receiver<FeedBatch>) -> Self {
        Self {
            receiver,
            last_sequence: None,
            disconnected: false,
        }
    }

    /// Subscribes to `feed`.
    pub fn subscribe(feed: &ChangeFeed) -> Self {
        Self::new(feed.subscribe())
    }

    /// Applies every pending delivery in arrival order.
    ///
    /// Returns one report per delivery. Never blocks.
    pub fn pump<C, H>(&mut self, chart: &mut DonutChart<C, H>, now: Duration) -> Vec<CycleReport>
    where
        C: ColorScale,
        H: InteractionHandler,
    {
        let mut reports = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    if let Some(last) = self.last_sequence {
                        if batch.sequence <= last {
                            warn!(
                                sequence = batch.sequence,
                                last, "feed sequence went backwards"
                            );
                        }
                    }
                    self.last_sequence = Some(batch.sequence);
                    debug!(sequence = batch.sequence, events = batch.len(), "applying feed batch");
                    reports.push(chart.apply_batch(&batch.events, now));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!("change feed disconnected");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        reports
    }

    /// Sequence of the last applied delivery.
    pub fn last_sequence(&self) -> Option<u64> {
        self.last_sequence
    }

    /// Returns true once the publisher has gone away.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::OrdinalScale;
    use crate::config::ChartConfig;
    use crate::feed::ChangeEvent;
    use crate::interaction::NoInteractions;
    use crate::record::Record;

    fn chart() -> DonutChart<OrdinalScale, NoInteractions> {
        DonutChart::new(ChartConfig::default(), OrdinalScale::default(), NoInteractions).unwrap()
    }

    #[test]
    fn one_cycle_per_batch() {
        let feed = ChangeFeed::new();
        let mut adapter = FeedAdapter::subscribe(&feed);
        let mut chart = chart();

        feed.emit_batch(vec![
            ChangeEvent::added(Record::new("a", "rent", 100.0)),
            ChangeEvent::added(Record::new("b", "food", 50.0)),
        ]);
        feed.emit(ChangeEvent::removed(Record::new("a", "rent", 100.0)));

        let reports = adapter.pump(&mut chart, Duration::ZERO);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].entering.len(), 2);
        assert_eq!(reports[1].exiting.len(), 1);
        assert_eq!(adapter.last_sequence(), Some(2));
        assert_eq!(chart.stats().cycles, 2);
    }

    #[test]
    fn empty_channel_does_nothing() {
        let feed = ChangeFeed::new();
        let mut adapter = FeedAdapter::subscribe(&feed);
        let mut chart = chart();
        assert!(adapter.pump(&mut chart, Duration::ZERO).is_empty());
        assert!(!adapter.is_disconnected());
    }

    #[test]
    fn detects_disconnect() {
        let feed = ChangeFeed::new();
        let mut adapter = FeedAdapter::subscribe(&feed);
        feed.emit(ChangeEvent::added(Record::new("a", "rent", 1.0)));
        drop(feed);

        let mut chart = chart();
        let reports = adapter.pump(&mut chart, Duration::ZERO);
        assert_eq!(reports.len(), 1);
        assert!(adapter.is_disconnected());
    }
}
