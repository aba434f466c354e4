//! Reconciliation engine.
//!
//! Keeps one [`RenderedElement`] per record id across cycles. Each cycle
//! diffs the new layout against the rendered set by id, classifies every
//! id as entering, updating or exiting, and starts the matching
//! transition from the element's live geometry. The external frame clock
//! then calls [`Reconciler::tick`] to advance, commit and destroy.

use crate::color::{Color, ColorScale};
use crate::geometry::ArcGeometry;
use crate::layout::Segment;
use crate::record::{Record, RecordId};
use crate::tween::{Easing, Tween};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::time::Duration;

/// Classification of an element relative to the previous cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// New this cycle; growing from nothing.
    Entering,
    /// Present before and now; moving to the new geometry.
    Updating,
    /// Gone from the layout; shrinking away before destruction.
    Exiting,
}

/// Persistent visual state for one record id.
#[derive(Debug, Clone)]
pub struct RenderedElement {
    record: Record,
    index: usize,
    phase: Phase,
    current: ArcGeometry,
    target: ArcGeometry,
    tween: Option<Tween<ArcGeometry>>,
    base_color: Color,
    fill: Color,
    fill_tween: Option<Tween<Color>>,
    highlighted: bool,
}

impl RenderedElement {
    /// The record id.
    pub fn id(&self) -> &RecordId {
        &self.record.id
    }

    /// The record as of the last cycle that included it.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Position in the last layout that included the record.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Classification from the most recent cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The geometry to draw now.
    ///
    /// Always valid, including mid-transition: it holds the last sampled
    /// value and is the start point of the next transition.
    pub fn current(&self) -> ArcGeometry {
        self.current
    }

    /// The geometry the current transition ends at.
    pub fn target(&self) -> ArcGeometry {
        self.target
    }

    /// Returns true while a geometry or color transition is running.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some() || self.fill_tween.is_some()
    }

    /// The record-name-keyed color.
    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// The fill to draw now.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Returns true between a hover highlight and its restore.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Starts a fill transition from the current fill.
    pub(crate) fn transition_fill(
        &mut self,
        to: Color,
        now: Duration,
        duration: Duration,
        easing: Easing,
    ) {
        self.sample_fill(now);
        self.fill_tween = Some(Tween::new(self.fill, to, now, duration, easing));
    }

    fn sample_fill(&mut self, now: Duration) {
        if let Some(tween) = self.fill_tween {
            self.fill = tween.sample(now);
        }
    }

    /// Moves the fill onto a new base color. A fade already running keeps
    /// its schedule and ends on the new color instead.
    fn follow_base(&mut self, now: Duration) {
        match self.fill_tween {
            Some(tween) => {
                self.sample_fill(now);
                let remaining = (tween.started_at + tween.duration).saturating_sub(now);
                self.fill_tween = Some(Tween::new(
                    self.fill,
                    self.base_color,
                    now,
                    remaining,
                    tween.easing,
                ));
            }
            None => self.fill = self.base_color,
        }
    }

    fn start_transition(&mut self, target: ArcGeometry, now: Duration, duration: Duration, easing: Easing) {
        self.target = target;
        self.tween = Some(Tween::new(self.current, target, now, duration, easing));
    }

    /// Advances transitions. Returns true if the geometry transition
    /// completed on this call.
    fn advance(&mut self, now: Duration) -> bool {
        if let Some(fill) = self.fill_tween {
            self.fill = fill.sample(now);
            if fill.is_finished(now) {
                self.fill_tween = None;
            }
        }
        match self.tween {
            Some(tween) if tween.is_finished(now) => {
                self.current = tween.to;
                self.tween = None;
                true
            }
            Some(tween) => {
                self.current = tween.sample(now);
                false
            }
            None => false,
        }
    }
}

/// Outcome of one reconciliation cycle.
///
/// The three lists partition the union of previously rendered ids and
/// laid-out ids. `entering` and `updating` follow layout order; `exiting`
/// follows element order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    /// Ids new in this cycle.
    pub entering: Vec<RecordId>,
    /// Ids present before and after.
    pub updating: Vec<RecordId>,
    /// Ids no longer laid out.
    pub exiting: Vec<RecordId>,
}

impl CycleReport {
    /// Returns the classification of an id in this cycle.
    pub fn phase_of(&self, id: &str) -> Option<Phase> {
        let has = |ids: &[RecordId]| ids.iter().any(|i| i.as_str() == id);
        if has(&self.entering) {
            Some(Phase::Entering)
        } else if has(&self.updating) {
            Some(Phase::Updating)
        } else if has(&self.exiting) {
            Some(Phase::Exiting)
        } else {
            None
        }
    }

    /// Total number of classified ids.
    pub fn len(&self) -> usize {
        self.entering.len() + self.updating.len() + self.exiting.len()
    }

    /// Returns true if no id was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of advancing transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Elements whose enter or update transition committed.
    pub settled: Vec<RecordId>,
    /// Elements whose exit transition completed and that were destroyed.
    pub destroyed: Vec<RecordId>,
    /// Elements still animating.
    pub animating: usize,
}

/// The keyed store of rendered elements and the diffing logic.
#[derive(Debug, Clone)]
pub struct Reconciler {
    elements: IndexMap<RecordId, RenderedElement>,
    duration: Duration,
    easing: Easing,
    cycles: u64,
}

impl Reconciler {
    /// Creates an empty reconciler.
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            elements: IndexMap::new(),
            duration,
            easing,
            cycles: 0,
        }
    }

    /// Runs one cycle against a fresh layout.
    ///
    /// Transitions start at `now` from each element's live geometry, so a
    /// cycle arriving mid-flight supersedes the previous targets without a
    /// jump. An element already exiting keeps its exit transition; an
    /// exiting element whose id comes back is updated from wherever it
    /// has shrunk to.
    pub fn reconcile(
        &mut self,
        segments: &[Segment<'_>],
        colors: &mut dyn ColorScale,
        now: Duration,
    ) -> CycleReport {
        self.cycles += 1;
        let mut report = CycleReport {
            cycle: self.cycles,
            ..CycleReport::default()
        };
        let (duration, easing) = (self.duration, self.easing);
        let mut laid_out: HashSet<&str> = HashSet::with_capacity(segments.len());

        for segment in segments {
            let id = &segment.record.id;
            laid_out.insert(id.as_str());
            let target = segment.geometry();
            let color = colors.color_of(&segment.record.name);

            match self.elements.get_mut(id) {
                Some(element) => {
                    element.record = segment.record.clone();
                    element.index = segment.index;
                    element.phase = Phase::Updating;
                    element.start_transition(target, now, duration, easing);
                    if element.base_color != color {
                        element.base_color = color;
                        if !element.highlighted {
                            element.follow_base(now);
                        }
                    }
                    report.updating.push(id.clone());
                }
                None => {
                    let mut element = RenderedElement {
                        record: segment.record.clone(),
                        index: segment.index,
                        phase: Phase::Entering,
                        current: target.collapsed_at_end(),
                        target,
                        tween: None,
                        base_color: color,
                        fill: color,
                        fill_tween: None,
                        highlighted: false,
                    };
                    element.start_transition(target, now, duration, easing);
                    self.elements.insert(id.clone(), element);
                    report.entering.push(id.clone());
                }
            }
        }

        for (id, element) in self.elements.iter_mut() {
            if laid_out.contains(id.as_str()) {
                continue;
            }
            if element.phase != Phase::Exiting {
                element.phase = Phase::Exiting;
                let collapsed = element.current.collapsed_at_end();
                element.start_transition(collapsed, now, duration, easing);
            }
            report.exiting.push(id.clone());
        }

        report
    }

    /// Samples every transition at `now`.
    ///
    /// Finished transitions commit their exact target; finished exits
    /// destroy their element.
    pub fn tick(&mut self, now: Duration) -> TickReport {
        let mut report = TickReport::default();
        for (id, element) in self.elements.iter_mut() {
            if element.advance(now) {
                if element.phase == Phase::Exiting {
                    report.destroyed.push(id.clone());
                } else {
                    report.settled.push(id.clone());
                }
            }
        }
        if !report.destroyed.is_empty() {
            self.elements
                .retain(|_, element| !(element.phase == Phase::Exiting && element.tween.is_none()));
        }
        report.animating = self.elements.values().filter(|e| e.is_animating()).count();
        report
    }

    /// Gets an element by id.
    pub fn get(&self, id: &str) -> Option<&RenderedElement> {
        self.elements.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut RenderedElement> {
        self.elements.get_mut(id)
    }

    /// Iterates elements in draw order.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &RenderedElement> + '_ {
        self.elements.values()
    }

    /// Iterates rendered ids in draw order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> + '_ {
        self.elements.keys()
    }

    /// Returns the number of rendered elements, exiting ones included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns true while any element is animating.
    pub fn is_animating(&self) -> bool {
        self.elements.values().any(RenderedElement::is_animating)
    }

    /// Number of cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The shared transition duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::FixedColor;
    use crate::layout::pie;
    use std::f64::consts::{PI, TAU};

    const DURATION: Duration = Duration::from_millis(750);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(DURATION, Easing::Linear)
    }

    fn cycle(r: &mut Reconciler, records: &[Record], now: Duration) -> CycleReport {
        let segments = pie(records);
        r.reconcile(&segments, &mut FixedColor(Color::BLACK), now)
    }

    fn ids(list: &[RecordId]) -> Vec<&str> {
        list.iter().map(RecordId::as_str).collect()
    }

    #[test]
    fn entering_grows_from_its_end_angle() {
        let mut r = reconciler();
        let records = [Record::new("a", "rent", 100.0)];
        let report = cycle(&mut r, &records, ms(0));

        assert_eq!(ids(&report.entering), ["a"]);
        let element = r.get("a").unwrap();
        assert_eq!(element.phase(), Phase::Entering);
        assert!(element.current().is_collapsed());
        assert!((element.current().start_angle - TAU).abs() < 1e-12);

        r.tick(ms(375));
        let mid = r.get("a").unwrap().current();
        assert!((mid.start_angle - PI).abs() < 1e-9);
        assert!((mid.end_angle - TAU).abs() < 1e-9);

        let tick = r.tick(ms(750));
        assert_eq!(ids(&tick.settled), ["a"]);
        assert_eq!(r.get("a").unwrap().current(), r.get("a").unwrap().target());
        assert!(!r.is_animating());
    }

    #[test]
    fn updating_interpolates_from_current() {
        let mut r = reconciler();
        cycle(&mut r, &[Record::new("a", "a", 100.0)], ms(0));
        r.tick(ms(750));

        let records = [Record::new("a", "a", 100.0), Record::new("b", "b", 300.0)];
        let report = cycle(&mut r, &records, ms(1000));
        assert_eq!(ids(&report.updating), ["a"]);
        assert_eq!(ids(&report.entering), ["b"]);

        r.tick(ms(1375));
        let a = r.get("a").unwrap().current();
        // Halfway between TAU and PI/2
        assert!((a.end_angle - (TAU + PI / 2.0) / 2.0).abs() < 1e-9);

        r.tick(ms(1750));
        let a = r.get("a").unwrap();
        assert!((a.current().end_angle - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn exiting_collapses_then_is_destroyed() {
        let mut r = reconciler();
        let both = [Record::new("a", "a", 100.0), Record::new("b", "b", 300.0)];
        cycle(&mut r, &both, ms(0));
        r.tick(ms(750));
        let a_end = r.get("a").unwrap().current().end_angle;

        let report = cycle(&mut r, &[Record::new("b", "b", 300.0)], ms(1000));
        assert_eq!(ids(&report.exiting), ["a"]);
        assert_eq!(ids(&report.updating), ["b"]);
        assert_eq!(r.get("a").unwrap().target(), ArcGeometry::new(a_end, a_end, 100.0));

        let tick = r.tick(ms(1749));
        assert!(tick.destroyed.is_empty());
        assert!(r.get("a").is_some());

        let tick = r.tick(ms(1750));
        assert_eq!(ids(&tick.destroyed), ["a"]);
        assert!(r.get("a").is_none());
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn empty_cycle_is_stable() {
        let mut r = reconciler();
        let records = [Record::new("a", "a", 1.0), Record::new("b", "b", 2.0)];
        cycle(&mut r, &records, ms(0));
        r.tick(ms(750));
        let before: Vec<ArcGeometry> = r.elements().map(RenderedElement::current).collect();

        let report = cycle(&mut r, &records, ms(1000));
        assert_eq!(ids(&report.updating), ["a", "b"]);
        assert!(report.entering.is_empty() && report.exiting.is_empty());

        r.tick(ms(1300));
        let during: Vec<ArcGeometry> = r.elements().map(RenderedElement::current).collect();
        assert_eq!(before, during);
    }

    #[test]
    fn zero_cost_update_stays_present() {
        let mut r = reconciler();
        cycle(&mut r, &[Record::new("a", "a", 1.0), Record::new("b", "b", 1.0)], ms(0));
        r.tick(ms(750));

        let report = cycle(&mut r, &[Record::new("a", "a", 0.0), Record::new("b", "b", 1.0)], ms(800));
        assert_eq!(report.phase_of("a"), Some(Phase::Updating));
        r.tick(ms(2000));
        let a = r.get("a").unwrap();
        assert!(a.current().is_collapsed());
        assert_eq!(a.phase(), Phase::Updating);
    }

    #[test]
    fn interrupted_update_starts_from_live_geometry() {
        let mut r = reconciler();
        cycle(&mut r, &[Record::new("a", "a", 1.0)], ms(0));
        r.tick(ms(300));
        let live = r.get("a").unwrap().current();

        cycle(&mut r, &[Record::new("a", "a", 1.0), Record::new("b", "b", 1.0)], ms(300));
        // Sampled at the new cycle's start, nothing jumps
        r.tick(ms(300));
        assert!(r.get("a").unwrap().current().approx_eq(&live, 1e-12));
    }

    #[test]
    fn removed_then_readded_before_exit_finishes() {
        let mut r = reconciler();
        let both = [Record::new("a", "a", 1.0), Record::new("b", "b", 1.0)];
        cycle(&mut r, &both, ms(0));
        r.tick(ms(750));

        cycle(&mut r, &[Record::new("b", "b", 1.0)], ms(1000));
        r.tick(ms(1200));
        let shrinking = r.get("a").unwrap().current();

        let report = cycle(&mut r, &both, ms(1200));
        assert_eq!(report.phase_of("a"), Some(Phase::Updating));
        r.tick(ms(1200));
        assert!(r.get("a").unwrap().current().approx_eq(&shrinking, 1e-12));

        let tick = r.tick(ms(1950));
        assert!(tick.destroyed.is_empty());
        assert!((r.get("a").unwrap().current().end_angle - PI).abs() < 1e-12);
    }

    #[test]
    fn exit_is_not_restarted_by_later_cycles() {
        let mut r = reconciler();
        cycle(&mut r, &[Record::new("a", "a", 1.0), Record::new("b", "b", 1.0)], ms(0));
        r.tick(ms(750));

        cycle(&mut r, &[Record::new("b", "b", 1.0)], ms(1000));
        let report = cycle(&mut r, &[Record::new("b", "b", 1.0)], ms(1500));
        assert_eq!(report.phase_of("a"), Some(Phase::Exiting));

        // Still finishes on the original schedule
        let tick = r.tick(ms(1750));
        assert_eq!(ids(&tick.destroyed), ["a"]);
    }

    #[test]
    fn zero_duration_commits_on_first_tick() {
        let mut r = Reconciler::new(Duration::ZERO, Easing::CubicInOut);
        cycle(&mut r, &[Record::new("a", "a", 1.0)], ms(0));
        let tick = r.tick(ms(0));
        assert_eq!(ids(&tick.settled), ["a"]);
        assert!((r.get("a").unwrap().current().end_angle - TAU).abs() < 1e-12);
    }

    #[test]
    fn name_change_recolors_idle_element() {
        use crate::color::OrdinalScale;

        let mut r = reconciler();
        let mut scale = OrdinalScale::default();
        let records = [Record::new("a", "rent", 1.0), Record::new("b", "food", 1.0)];
        r.reconcile(&pie(&records), &mut scale, ms(0));
        let before = r.get("b").unwrap().fill();

        let renamed = [Record::new("a", "rent", 1.0), Record::new("b", "travel", 1.0)];
        r.reconcile(&pie(&renamed), &mut scale, ms(10));
        let after = r.get("b").unwrap();
        assert_ne!(after.fill(), before);
        assert_eq!(after.fill(), after.base_color());
    }

    #[test]
    fn recolor_during_restore_fade_ends_on_new_base() {
        let red = Color::rgb(255, 0, 0);
        let records = [Record::new("a", "a", 1.0)];
        let mut r = reconciler();
        r.reconcile(&pie(&records), &mut FixedColor(Color::BLACK), ms(0));
        r.tick(ms(750));

        let a = r.get_mut("a").unwrap();
        a.set_highlighted(true);
        a.transition_fill(Color::WHITE, ms(800), ms(300), Easing::Linear);
        r.tick(ms(1100));
        let a = r.get_mut("a").unwrap();
        a.set_highlighted(false);
        a.transition_fill(Color::BLACK, ms(1100), ms(300), Easing::Linear);
        r.tick(ms(1200));

        r.reconcile(&pie(&records), &mut FixedColor(red), ms(1200));
        assert_eq!(r.get("a").unwrap().base_color(), red);
        // The fade keeps its end time.
        r.tick(ms(1400));
        assert_eq!(r.get("a").unwrap().fill(), red);
    }

    #[test]
    fn recolor_keeps_highlight() {
        let red = Color::rgb(255, 0, 0);
        let records = [Record::new("a", "a", 1.0)];
        let mut r = reconciler();
        r.reconcile(&pie(&records), &mut FixedColor(Color::BLACK), ms(0));
        let a = r.get_mut("a").unwrap();
        a.set_highlighted(true);
        a.transition_fill(Color::WHITE, ms(0), ms(300), Easing::Linear);
        r.tick(ms(750));

        r.reconcile(&pie(&records), &mut FixedColor(red), ms(800));
        r.tick(ms(2000));
        let a = r.get("a").unwrap();
        assert_eq!(a.fill(), Color::WHITE);
        assert_eq!(a.base_color(), red);
    }
}
