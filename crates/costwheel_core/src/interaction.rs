//! Hover and click behavior attached to rendered elements.
//!
//! The rendering layer reports pointer events to the chart, which calls
//! the injected [`InteractionHandler`] with the element's segment and an
//! [`ElementHandle`]. Handlers may recolor the element, show or hide the
//! tooltip, and send removal requests out through a [`DeleteSink`]. They
//! never touch the record store: a removal only shows once the matching
//! *removed* event comes back through the feed.

use crate::color::Color;
use crate::config::ChartConfig;
use crate::geometry::{centroid, ArcGeometry, Point};
use crate::layout::Segment;
use crate::reconcile::RenderedElement;
use crate::record::{Record, RecordId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Hint shown in every tooltip.
pub const DELETE_HINT: &str = "Click slice to delete";

/// Outbound removal requests to the persistence collaborator.
///
/// Fire-and-forget: there is no acknowledgement, and a lost request is
/// indistinguishable from one that has not arrived yet.
pub trait DeleteSink {
    /// Requests removal of the record with this id.
    fn delete_by_id(&self, id: &RecordId);
}

impl<T: DeleteSink + ?Sized> DeleteSink for Arc<T> {
    fn delete_by_id(&self, id: &RecordId) {
        (**self).delete_by_id(id);
    }
}

/// A sink that only remembers the requests it received.
#[derive(Debug, Default)]
pub struct DeleteLog {
    requests: Mutex<Vec<RecordId>>,
}

impl DeleteLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the requested ids in order.
    pub fn requests(&self) -> Vec<RecordId> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests.
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns true if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

impl DeleteSink for DeleteLog {
    fn delete_by_id(&self, id: &RecordId) {
        self.requests.lock().push(id.clone());
    }
}

/// The informational overlay shown while a slice is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// The hovered record.
    pub record_id: RecordId,
    /// Record name.
    pub name: String,
    /// Record cost.
    pub cost: f64,
    /// Call to action.
    pub hint: &'static str,
    /// Where to place the overlay, relative to the chart centre.
    pub anchor: Point,
}

/// Mutable access to one rendered element during an interaction.
pub struct ElementHandle<'a> {
    pub(crate) element: &'a mut RenderedElement,
    pub(crate) overlay: &'a mut Option<Tooltip>,
    pub(crate) config: &'a ChartConfig,
    pub(crate) now: Duration,
}

impl ElementHandle<'_> {
    /// The element's record id.
    pub fn id(&self) -> &RecordId {
        self.element.id()
    }

    /// The record as last laid out.
    pub fn record(&self) -> &Record {
        self.element.record()
    }

    /// The geometry currently drawn.
    pub fn current(&self) -> ArcGeometry {
        self.element.current()
    }

    /// The fill currently drawn.
    pub fn fill(&self) -> Color {
        self.element.fill()
    }

    /// The record-name-keyed color.
    pub fn base_color(&self) -> Color {
        self.element.base_color()
    }

    /// Fades the fill to `color` over the hover duration.
    pub fn fade_to(&mut self, color: Color) {
        self.element.transition_fill(
            color,
            self.now,
            self.config.hover_duration,
            self.config.easing,
        );
    }

    /// Fades to the highlight color.
    ///
    /// A highlighted element keeps its fill when the color scale
    /// reassigns its base color.
    pub fn highlight(&mut self) {
        self.element.set_highlighted(true);
        self.fade_to(self.config.highlight_color);
    }

    /// Fades back to the record-name-keyed color.
    pub fn restore(&mut self) {
        self.element.set_highlighted(false);
        self.fade_to(self.element.base_color());
    }

    /// Shows the tooltip for this element, anchored at its centroid.
    pub fn show_tooltip(&mut self) {
        let record = self.element.record();
        *self.overlay = Some(Tooltip {
            record_id: record.id.clone(),
            name: record.name.clone(),
            cost: record.cost,
            hint: DELETE_HINT,
            anchor: centroid(&self.element.target(), &self.config.ring()),
        });
    }

    /// Hides the tooltip if it belongs to this element.
    pub fn hide_tooltip(&mut self) {
        if self
            .overlay
            .as_ref()
            .is_some_and(|tooltip| &tooltip.record_id == self.element.id())
        {
            *self.overlay = None;
        }
    }
}

/// Behavior attached to every rendered element.
pub trait InteractionHandler {
    /// Pointer entered the element.
    fn on_hover(&mut self, segment: &Segment<'_>, element: &mut ElementHandle<'_>);

    /// Pointer left the element.
    fn on_hover_end(&mut self, segment: &Segment<'_>, element: &mut ElementHandle<'_>);

    /// Element was clicked.
    fn on_click(&mut self, segment: &Segment<'_>, element: &mut ElementHandle<'_>);
}

/// The standard slice behavior: highlight and tooltip on hover, removal
/// request on click.
#[derive(Debug)]
pub struct SliceInteractions<D> {
    sink: D,
}

impl<D: DeleteSink> SliceInteractions<D> {
    /// Creates the handler around a removal sink.
    pub fn new(sink: D) -> Self {
        Self { sink }
    }

    /// Returns the removal sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }
}

impl<D: DeleteSink> InteractionHandler for SliceInteractions<D> {
    fn on_hover(&mut self, _segment: &Segment<'_>, element: &mut ElementHandle<'_>) {
        element.show_tooltip();
        element.highlight();
    }

    fn on_hover_end(&mut self, _segment: &Segment<'_>, element: &mut ElementHandle<'_>) {
        element.hide_tooltip();
        element.restore();
    }

    fn on_click(&mut self, segment: &Segment<'_>, _element: &mut ElementHandle<'_>) {
        debug!(id = %segment.record.id, "requesting removal");
        self.sink.delete_by_id(&segment.record.id);
    }
}

/// A handler that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInteractions;

impl InteractionHandler for NoInteractions {
    fn on_hover(&mut self, _segment: &Segment<'_>, _element: &mut ElementHandle<'_>) {}

    fn on_hover_end(&mut self, _segment: &Segment<'_>, _element: &mut ElementHandle<'_>) {}

    fn on_click(&mut self, _segment: &Segment<'_>, _element: &mut ElementHandle<'_>) {}
}
