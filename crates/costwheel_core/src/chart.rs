//! The donut chart facade.
//!
//! [`DonutChart`] ties the record store, layout, reconciler, color scale
//! and interaction handler together. The caller feeds it change batches
//! and frame timestamps; it never reads a clock itself.

use crate::color::ColorScale;
use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::feed::ChangeEvent;
use crate::geometry::{arc_path, contains, Point};
use crate::interaction::{ElementHandle, InteractionHandler, Tooltip};
use crate::layout::{pie, Segment};
use crate::reconcile::{CycleReport, Reconciler, TickReport};
use crate::record::{RecordId, RecordStore};
use crate::stats::ChartStats;
use crate::surface::{RenderSurface, Style};
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy)]
enum Pointer {
    Hover,
    HoverEnd,
    Click,
}

/// A live donut chart over a change feed.
pub struct DonutChart<C, H> {
    config: ChartConfig,
    store: RecordStore,
    reconciler: Reconciler,
    colors: C,
    handler: H,
    tooltip: Option<Tooltip>,
    hovered: Option<RecordId>,
    stats: ChartStats,
}

impl<C: ColorScale, H: InteractionHandler> DonutChart<C, H> {
    /// Creates an empty chart.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration is unusable.
    pub fn new(config: ChartConfig, colors: C, handler: H) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            reconciler: Reconciler::new(config.transition_duration, config.easing),
            config,
            store: RecordStore::new(),
            colors,
            handler,
            tooltip: None,
            hovered: None,
            stats: ChartStats::new(),
        })
    }

    /// Applies one feed delivery.
    ///
    /// Every event is applied to the store in order, then exactly one
    /// reconciliation cycle runs for the whole batch.
    pub fn apply_batch(&mut self, events: &[ChangeEvent], now: Duration) -> CycleReport {
        for event in events {
            let outcome = self.store.apply(event);
            self.stats.record_outcome(outcome);
        }
        self.stats.batches_applied += 1;
        self.reconcile(now)
    }

    fn reconcile(&mut self, now: Duration) -> CycleReport {
        let report = {
            let names: Vec<&str> = self.store.iter().map(|r| r.name.as_str()).collect();
            self.colors.set_domain(&names);
            let segments = pie(self.store.iter());
            self.reconciler.reconcile(&segments, &mut self.colors, now)
        };
        debug!(
            cycle = report.cycle,
            entering = report.entering.len(),
            updating = report.updating.len(),
            exiting = report.exiting.len(),
            "reconciled"
        );
        self.stats.cycles = self.reconciler.cycles();
        self.stats.elements_entered += report.entering.len() as u64;

        // Zero-length transitions commit right away.
        self.tick(now);
        report
    }

    /// Advances every transition to `now`.
    pub fn tick(&mut self, now: Duration) -> TickReport {
        let report = self.reconciler.tick(now);
        if !report.destroyed.is_empty() {
            self.stats.elements_exited += report.destroyed.len() as u64;
            if let Some(hovered) = &self.hovered {
                if report.destroyed.contains(hovered) {
                    trace!(id = %hovered, "hovered element destroyed");
                    self.hovered = None;
                }
            }
            if let Some(tooltip) = &self.tooltip {
                if report.destroyed.contains(&tooltip.record_id) {
                    self.tooltip = None;
                }
            }
        }
        report
    }

    /// Draws the current frame.
    ///
    /// Elements are drawn in creation order at their live geometry, then
    /// the tooltip.
    ///
    /// # Errors
    ///
    /// The first surface error aborts the frame and is returned.
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> ChartResult<()> {
        let ring = self.config.ring();
        surface.begin_frame()?;
        for element in self.reconciler.elements() {
            let path = arc_path(&element.current(), &ring);
            let style = Style {
                fill: element.fill(),
                stroke: self.config.stroke_color,
                stroke_width: self.config.stroke_width,
            };
            surface.draw_path(element.id(), &path, &style)?;
        }
        if let Some(tooltip) = &self.tooltip {
            surface.draw_tooltip(tooltip)?;
        }
        surface.end_frame()
    }

    /// Pointer entered the element for `id`.
    ///
    /// A different element still hovered gets its hover-exit first.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing is rendered for `id`.
    pub fn hover(&mut self, id: &str, now: Duration) -> ChartResult<()> {
        if self.reconciler.get(id).is_none() {
            return Err(ChartError::element_not_found(&RecordId::new(id)));
        }
        if let Some(previous) = self.hovered.take() {
            if previous.as_str() != id && self.reconciler.get(previous.as_str()).is_some() {
                self.dispatch(previous.as_str(), now, Pointer::HoverEnd)?;
            }
        }
        self.dispatch(id, now, Pointer::Hover)?;
        self.hovered = Some(RecordId::new(id));
        Ok(())
    }

    /// Pointer left the element for `id`.
    ///
    /// The tooltip and hover state of another element are left alone.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing is rendered for `id`.
    pub fn hover_end(&mut self, id: &str, now: Duration) -> ChartResult<()> {
        self.dispatch(id, now, Pointer::HoverEnd)?;
        if self.hovered.as_ref().is_some_and(|h| h.as_str() == id) {
            self.hovered = None;
        }
        Ok(())
    }

    /// The element for `id` was clicked.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if nothing is rendered for `id`.
    pub fn click(&mut self, id: &str, now: Duration) -> ChartResult<()> {
        self.dispatch(id, now, Pointer::Click)?;
        self.stats.clicks += 1;
        Ok(())
    }

    fn dispatch(&mut self, id: &str, now: Duration, pointer: Pointer) -> ChartResult<()> {
        let Self {
            config,
            reconciler,
            handler,
            tooltip,
            ..
        } = self;
        let element = reconciler
            .get_mut(id)
            .ok_or_else(|| ChartError::element_not_found(&RecordId::new(id)))?;

        let record = element.record().clone();
        let target = element.target();
        let segment = Segment {
            record: &record,
            index: element.index(),
            start_angle: target.start_angle,
            end_angle: target.end_angle,
            value: target.value,
        };
        let mut handle = ElementHandle {
            element,
            overlay: tooltip,
            config,
            now,
        };
        trace!(id, ?pointer, "dispatching pointer event");
        match pointer {
            Pointer::Hover => handler.on_hover(&segment, &mut handle),
            Pointer::HoverEnd => handler.on_hover_end(&segment, &mut handle),
            Pointer::Click => handler.on_click(&segment, &mut handle),
        }
        Ok(())
    }

    /// Returns the id of the topmost element under `point`.
    ///
    /// `point` is relative to the chart centre. Hit testing uses live
    /// geometry, so a collapsing element stops being hittable as it
    /// shrinks away.
    pub fn element_at(&self, point: Point) -> Option<&RecordId> {
        let ring = self.config.ring();
        self.reconciler
            .elements()
            .rev()
            .find(|element| contains(&element.current(), &ring, point))
            .map(|element| element.id())
    }

    /// Moves the pointer to `point`.
    ///
    /// Fires hover-exit and hover-enter when the element under the
    /// pointer changes. Returns the element now hovered.
    ///
    /// # Errors
    ///
    /// Propagates errors from the hover dispatch.
    pub fn pointer_move(&mut self, point: Point, now: Duration) -> ChartResult<Option<RecordId>> {
        let hit = self.element_at(point).cloned();
        if hit == self.hovered {
            return Ok(hit);
        }
        match &hit {
            Some(id) => self.hover(id.as_str(), now)?,
            None => {
                if let Some(previous) = self.hovered.clone() {
                    self.hover_end(previous.as_str(), now)?;
                }
            }
        }
        Ok(hit)
    }

    /// Clicks whatever element is under `point`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the click dispatch.
    pub fn pointer_click(&mut self, point: Point, now: Duration) -> ChartResult<Option<RecordId>> {
        let hit = self.element_at(point).cloned();
        if let Some(id) = &hit {
            self.click(id.as_str(), now)?;
        }
        Ok(hit)
    }

    /// Lays out the current store contents.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        pie(self.store.iter())
    }

    /// The authoritative record set.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The rendered elements.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Counters.
    pub fn stats(&self) -> &ChartStats {
        &self.stats
    }

    /// The visible tooltip, if any.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// The hovered element, if any.
    pub fn hovered(&self) -> Option<&RecordId> {
        self.hovered.as_ref()
    }

    /// The interaction handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The interaction handler, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The color scale.
    pub fn colors(&self) -> &C {
        &self.colors
    }

    /// The configuration.
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Returns true while any transition is running.
    pub fn is_animating(&self) -> bool {
        self.reconciler.is_animating()
    }
}

impl<C, H> std::fmt::Debug for DonutChart<C, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DonutChart")
            .field("records", &self.store.len())
            .field("elements", &self.reconciler.len())
            .field("hovered", &self.hovered)
            .field("stats", &self.stats)
            .finish()
    }
}
