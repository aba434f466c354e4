//! Chart fixtures and event helpers.

use costwheel_core::{
    ArcGeometry, ChangeEvent, ChangeFeed, ChartConfig, ColorScale, DeleteLog, DonutChart,
    FeedAdapter, InMemoryCollection, InteractionHandler, OrdinalScale, Record, SliceInteractions,
};
use std::sync::Arc;
use std::time::Duration;

/// Angular tolerance used by geometry assertions.
pub const TOLERANCE: f64 = 1e-9;

/// A gap long enough for any transition to finish.
pub const SETTLE_AFTER: Duration = Duration::from_secs(60);

/// A chart whose clicks land in a [`DeleteLog`].
pub type TestChart = DonutChart<OrdinalScale, SliceInteractions<Arc<DeleteLog>>>;

/// A chart whose clicks go to an [`InMemoryCollection`].
pub type WiredChart = DonutChart<OrdinalScale, SliceInteractions<Arc<InMemoryCollection>>>;

/// Milliseconds as a clock timestamp.
pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// An added event.
pub fn added(id: &str, name: &str, cost: f64) -> ChangeEvent {
    ChangeEvent::added(Record::new(id, name, cost))
}

/// A modified event.
pub fn modified(id: &str, name: &str, cost: f64) -> ChangeEvent {
    ChangeEvent::modified(Record::new(id, name, cost))
}

/// A removed event. Only the id matters.
pub fn removed(id: &str) -> ChangeEvent {
    ChangeEvent::removed(Record::new(id, "", 0.0))
}

/// Creates a chart with default configuration.
pub fn test_chart() -> (TestChart, Arc<DeleteLog>) {
    test_chart_with(ChartConfig::default())
}

/// Creates a chart with the given configuration.
pub fn test_chart_with(config: ChartConfig) -> (TestChart, Arc<DeleteLog>) {
    let log = Arc::new(DeleteLog::new());
    let chart = DonutChart::new(
        config,
        OrdinalScale::default(),
        SliceInteractions::new(Arc::clone(&log)),
    )
    .expect("default chart config is valid");
    (chart, log)
}

/// A chart subscribed to an in-memory collection, closing the
/// click-to-remove loop.
pub struct WiredFixture {
    /// The persistence stand-in.
    pub collection: Arc<InMemoryCollection>,
    /// The feed subscription.
    pub adapter: FeedAdapter,
    /// The chart.
    pub chart: WiredChart,
}

impl WiredFixture {
    /// Creates an empty collection and a chart subscribed to it.
    pub fn new() -> Self {
        let collection = Arc::new(InMemoryCollection::new(Arc::new(ChangeFeed::new())));
        let adapter = FeedAdapter::subscribe(collection.feed());
        let chart = DonutChart::new(
            ChartConfig::default(),
            OrdinalScale::default(),
            SliceInteractions::new(Arc::clone(&collection)),
        )
        .expect("default chart config is valid");
        Self {
            collection,
            adapter,
            chart,
        }
    }

    /// Delivers pending feed batches at `now`. Returns how many arrived.
    pub fn pump(&mut self, now: Duration) -> usize {
        self.adapter.pump(&mut self.chart, now).len()
    }
}

impl Default for WiredFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks far past every transition started at or before `now`.
///
/// Returns the time ticked to.
pub fn settle<C, H>(chart: &mut DonutChart<C, H>, now: Duration) -> Duration
where
    C: ColorScale,
    H: InteractionHandler,
{
    let later = now + SETTLE_AFTER;
    chart.tick(later);
    later
}

/// Live geometry of every rendered element, in draw order.
pub fn rendered<C, H>(chart: &DonutChart<C, H>) -> Vec<(String, ArcGeometry)>
where
    C: ColorScale,
    H: InteractionHandler,
{
    chart
        .reconciler()
        .elements()
        .map(|e| (e.id().to_string(), e.current()))
        .collect()
}

/// Asserts that `geometry` spans `[start, end)`.
pub fn assert_span(geometry: &ArcGeometry, start: f64, end: f64) {
    assert!(
        (geometry.start_angle - start).abs() < TOLERANCE
            && (geometry.end_angle - end).abs() < TOLERANCE,
        "expected [{start}, {end}), got [{}, {})",
        geometry.start_angle,
        geometry.end_angle
    );
}
