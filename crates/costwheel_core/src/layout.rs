//! Pie layout: records to angular segments.

use crate::geometry::ArcGeometry;
use crate::record::Record;
use serde::Serialize;
use std::f64::consts::TAU;

/// One record's slice of the circle for a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment<'a> {
    /// The source record.
    pub record: &'a Record,
    /// Position in layout order.
    pub index: usize,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// The (clamped) cost the slice represents.
    pub value: f64,
}

impl Segment<'_> {
    /// The animatable geometry of this segment.
    #[must_use]
    pub fn geometry(&self) -> ArcGeometry {
        ArcGeometry::new(self.start_angle, self.end_angle, self.value)
    }

    /// Share of the full circle in `[0, 1]`.
    #[must_use]
    pub fn share(&self) -> f64 {
        (self.end_angle - self.start_angle) / TAU
    }
}

/// Lays records out around the full circle in the order given.
///
/// Each record gets an angular width proportional to its cost. Records
/// are never sorted, so a record keeps its angular position while only its
/// own cost changes. Zero-cost records get a zero-width segment at the
/// current angle. If every cost is zero, every segment is zero-width at
/// angle 0.
pub fn pie<'a, I>(records: I) -> Vec<Segment<'a>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let records: Vec<&Record> = records.into_iter().collect();
    let total: f64 = records.iter().map(|r| r.layout_cost()).sum();
    let scale = if total > 0.0 { TAU / total } else { 0.0 };

    let mut angle = 0.0;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let value = record.layout_cost();
            let start_angle = angle;
            angle += value * scale;
            Segment {
                record,
                index,
                start_angle,
                end_angle: angle,
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn rec(id: &str, cost: f64) -> Record {
        Record::new(id, id, cost)
    }

    fn widths_sum(segments: &[Segment<'_>]) -> f64 {
        segments.iter().map(|s| s.end_angle - s.start_angle).sum()
    }

    #[test]
    fn single_record_spans_circle() {
        let records = [rec("a", 100.0)];
        let segments = pie(&records);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_angle, 0.0);
        assert!((segments[0].end_angle - TAU).abs() < 1e-12);
    }

    #[test]
    fn proportional_and_unsorted() {
        let records = [rec("a", 100.0), rec("b", 300.0)];
        let segments = pie(&records);
        assert!((segments[0].end_angle - PI / 2.0).abs() < 1e-12);
        assert!((segments[1].start_angle - PI / 2.0).abs() < 1e-12);
        assert!((segments[1].end_angle - TAU).abs() < 1e-12);

        // Larger value second stays second
        assert_eq!(segments[1].record.id.as_str(), "b");
        assert!((segments[0].share() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn zero_cost_gets_zero_width() {
        let records = [rec("a", 1.0), rec("z", 0.0), rec("b", 1.0)];
        let segments = pie(&records);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].start_angle, segments[1].end_angle);
        assert!((segments[1].start_angle - PI).abs() < 1e-12);
        assert!((widths_sum(&segments) - TAU).abs() < 1e-9);
    }

    #[test]
    fn negative_cost_is_clamped() {
        let records = [rec("a", -50.0), rec("b", 10.0)];
        let segments = pie(&records);
        assert_eq!(segments[0].value, 0.0);
        assert!((segments[1].end_angle - TAU).abs() < 1e-12);
    }

    #[test]
    fn all_zero_costs_collapse_at_origin() {
        let records = [rec("a", 0.0), rec("b", 0.0)];
        let segments = pie(&records);
        assert!(segments.iter().all(|s| s.start_angle == 0.0 && s.end_angle == 0.0));
    }

    #[test]
    fn empty_input() {
        assert!(pie(std::iter::empty()).is_empty());
    }

    #[test]
    fn indices_follow_input_order() {
        let records = [rec("c", 1.0), rec("a", 2.0), rec("b", 3.0)];
        let order: Vec<(usize, &str)> = pie(&records)
            .iter()
            .map(|s| (s.index, s.record.id.as_str()))
            .collect();
        assert_eq!(order, [(0, "c"), (1, "a"), (2, "b")]);
    }
}
