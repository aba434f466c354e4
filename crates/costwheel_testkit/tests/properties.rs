//! Property tests for layout and reconciliation.

use costwheel_core::{pie, ArcGeometry, Phase};
use costwheel_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

fn timed_feed() -> impl Strategy<Value = Vec<(u64, Vec<costwheel_core::ChangeEvent>)>> {
    prop::collection::vec((gap_strategy(), batch_strategy()), 1..12)
}

proptest! {
    #[test]
    fn widths_partition_the_circle(records in distinct_records_strategy()) {
        let segments = pie(records.iter());
        prop_assert_eq!(segments.len(), records.len());

        let total: f64 = records.iter().map(|r| r.layout_cost()).sum();
        let width: f64 = segments.iter().map(|s| s.end_angle - s.start_angle).sum();
        if total > 0.0 {
            prop_assert!((width - TAU).abs() < 1e-9);
        } else {
            prop_assert_eq!(width, 0.0);
        }

        let mut angle = 0.0;
        for segment in &segments {
            prop_assert_eq!(segment.start_angle, angle);
            prop_assert!(segment.end_angle >= segment.start_angle);
            angle = segment.end_angle;
        }
    }

    #[test]
    fn segment_order_is_insertion_order(feed in feed_strategy()) {
        let (mut chart, _log) = test_chart();
        let mut model = ModelStore::new();

        for (n, batch) in feed.iter().enumerate() {
            model.apply_all(batch);
            chart.apply_batch(batch, ms(n as u64 * 100));

            let segment_ids: Vec<String> =
                chart.segments().iter().map(|s| s.record.id.to_string()).collect();
            prop_assert_eq!(&segment_ids, &model.ids());
            prop_assert_eq!(chart.store().iter().cloned().collect::<Vec<_>>(), model.records());
        }
    }

    #[test]
    fn classification_partitions_ids(feed in timed_feed()) {
        let (mut chart, _log) = test_chart();
        let mut now = ms(0);

        for (gap, batch) in &feed {
            now += ms(*gap);
            chart.tick(now);
            let before: HashSet<String> =
                chart.reconciler().ids().map(|id| id.to_string()).collect();

            let report = chart.apply_batch(batch, now);
            let laid_out: HashSet<String> =
                chart.store().ids().map(|id| id.to_string()).collect();

            let entering: HashSet<String> = report.entering.iter().map(|id| id.to_string()).collect();
            let updating: HashSet<String> = report.updating.iter().map(|id| id.to_string()).collect();
            let exiting: HashSet<String> = report.exiting.iter().map(|id| id.to_string()).collect();

            prop_assert_eq!(entering.len() + updating.len() + exiting.len(), report.len());
            prop_assert!(entering.is_disjoint(&updating));
            prop_assert!(entering.is_disjoint(&exiting));
            prop_assert!(updating.is_disjoint(&exiting));

            let union: HashSet<String> = before.union(&laid_out).cloned().collect();
            let classified: HashSet<String> =
                entering.union(&updating).chain(exiting.iter()).cloned().collect();
            prop_assert_eq!(&classified, &union);

            prop_assert!(entering.is_disjoint(&before));
            prop_assert!(exiting.is_disjoint(&laid_out));
            for id in &exiting {
                prop_assert_eq!(chart.reconciler().get(id).map(|e| e.phase()), Some(Phase::Exiting));
            }
        }
    }

    #[test]
    fn new_cycles_start_from_live_geometry(feed in timed_feed()) {
        let (mut chart, _log) = test_chart();
        let mut now = ms(0);

        for (gap, batch) in &feed {
            now += ms(*gap);
            chart.tick(now);
            let before: HashMap<String, ArcGeometry> = rendered(&chart).into_iter().collect();

            chart.apply_batch(batch, now);

            for (id, geometry) in rendered(&chart) {
                if let Some(previous) = before.get(&id) {
                    prop_assert!(
                        previous.approx_eq(&geometry, 1e-12),
                        "{} jumped from {:?} to {:?}", id, previous, geometry
                    );
                }
            }
        }
    }

    #[test]
    fn settled_elements_sit_on_their_segments(feed in timed_feed()) {
        let (mut chart, _log) = test_chart();
        let mut now = ms(0);
        for (gap, batch) in &feed {
            now += ms(*gap);
            chart.apply_batch(batch, now);
        }
        settle(&mut chart, now);

        prop_assert!(!chart.is_animating());
        let segments = chart.segments();
        prop_assert_eq!(chart.reconciler().len(), segments.len());
        for segment in &segments {
            let element = chart.reconciler().get(segment.record.id.as_str()).unwrap();
            prop_assert_eq!(element.current(), element.target());
            prop_assert!(element.current().approx_eq(&segment.geometry(), 1e-12));
        }
    }

    #[test]
    fn empty_batch_changes_nothing(feed in timed_feed()) {
        let (mut chart, _log) = test_chart();
        let mut now = ms(0);
        for (gap, batch) in &feed {
            now += ms(*gap);
            chart.apply_batch(batch, now);
        }
        now = settle(&mut chart, now);
        let before = rendered(&chart);

        let report = chart.apply_batch(&[], now);
        prop_assert!(report.entering.is_empty());
        prop_assert!(report.exiting.is_empty());
        let ids: Vec<String> = chart.store().ids().map(|id| id.to_string()).collect();
        let updating: Vec<String> = report.updating.iter().map(|id| id.to_string()).collect();
        prop_assert_eq!(updating, ids);

        settle(&mut chart, now);
        let after = rendered(&chart);
        prop_assert_eq!(before.len(), after.len());
        for ((id_a, a), (id_b, b)) in before.iter().zip(&after) {
            prop_assert_eq!(id_a, id_b);
            prop_assert!(a.approx_eq(b, 1e-12));
        }
    }
}
