//! Wedge geometry and path construction.
//!
//! Angles are in radians, measured clockwise from twelve o'clock, with the
//! chart centre at the origin and `y` growing downwards (screen
//! coordinates). A wedge at angle `a` and radius `r` touches the point
//! `(r·sin a, −r·cos a)`.

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Angles closer than this are treated as equal.
pub const EPSILON: f64 = 1e-9;

/// A point relative to the chart centre.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset, downwards.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.sin(),
            y: -radius * angle.cos(),
        }
    }
}

/// Inner and outer radius of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radii {
    /// Outer radius.
    pub outer: f64,
    /// Inner radius; zero draws a full pie.
    pub inner: f64,
}

impl Radii {
    /// Creates radii.
    #[must_use]
    pub const fn new(outer: f64, inner: f64) -> Self {
        Self { outer, inner }
    }

    /// A donut whose hole is half the outer radius.
    #[must_use]
    pub fn donut(outer: f64) -> Self {
        Self {
            outer,
            inner: outer / 2.0,
        }
    }
}

/// The animatable state of one wedge.
///
/// This is what a rendered element stores as its current geometry and
/// what transitions interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcGeometry {
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians, never below `start_angle`.
    pub end_angle: f64,
    /// Value the wedge represents.
    pub value: f64,
}

impl ArcGeometry {
    /// Creates a geometry.
    #[must_use]
    pub const fn new(start_angle: f64, end_angle: f64, value: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            value,
        }
    }

    /// Angular width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Returns true if the wedge has no visible width.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.width() <= EPSILON
    }

    /// The zero-width wedge sitting at this wedge's end angle.
    #[must_use]
    pub fn collapsed_at_end(&self) -> Self {
        Self {
            start_angle: self.end_angle,
            end_angle: self.end_angle,
            value: self.value,
        }
    }

    /// Linear interpolation of every field.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            start_angle: lerp(self.start_angle, to.start_angle, t),
            end_angle: lerp(self.end_angle, to.end_angle, t),
            value: lerp(self.value, to.value, t),
        }
    }

    /// Returns true if all fields are within `tolerance` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.start_angle - other.start_angle).abs() <= tolerance
            && (self.end_angle - other.end_angle).abs() <= tolerance
            && (self.value - other.value).abs() <= tolerance
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if a == b {
        return a;
    }
    a * (1.0 - t) + b * t
}

/// One drawing command of a wedge outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight line.
    LineTo(Point),
    /// Circular arc around the origin.
    Arc {
        /// Arc radius.
        radius: f64,
        /// Take the longer way round.
        large_arc: bool,
        /// Clockwise on screen.
        clockwise: bool,
        /// End point.
        to: Point,
    },
    /// Close the current subpath.
    Close,
}

/// The outline of a wedge.
///
/// `Display` renders SVG path data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArcPath {
    /// Commands in drawing order.
    pub commands: Vec<PathCommand>,
}

impl ArcPath {
    fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Returns true if the path has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => write!(f, "M{},{}", num(p.x), num(p.y))?,
                PathCommand::LineTo(p) => write!(f, "L{},{}", num(p.x), num(p.y))?,
                PathCommand::Arc {
                    radius,
                    large_arc,
                    clockwise,
                    to,
                } => write!(
                    f,
                    "A{r},{r},0,{},{},{},{}",
                    u8::from(large_arc),
                    u8::from(clockwise),
                    num(to.x),
                    num(to.y),
                    r = num(radius)
                )?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Formats a coordinate with three decimals, without trailing zeros or `-0`.
fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Builds the outline of the annular wedge described by `geometry`.
pub fn arc_path(geometry: &ArcGeometry, radii: &Radii) -> ArcPath {
    let (inner, outer) = if radii.inner > radii.outer {
        (radii.outer, radii.inner)
    } else {
        (radii.inner, radii.outer)
    };
    let start = geometry.start_angle;
    let end = geometry.end_angle.max(start);
    let width = end - start;
    let mut path = ArcPath::default();

    if outer <= EPSILON {
        path.push(PathCommand::MoveTo(Point::default()));
        path.push(PathCommand::Close);
        return path;
    }

    if width >= TAU - EPSILON {
        // A full ring cannot be one SVG arc; draw two halves per circle.
        push_circle(&mut path, outer, start, true);
        if inner > EPSILON {
            push_circle(&mut path, inner, start, false);
        }
        path.push(PathCommand::Close);
        return path;
    }

    let large_arc = width > PI;
    path.push(PathCommand::MoveTo(Point::polar(outer, start)));
    path.push(PathCommand::Arc {
        radius: outer,
        large_arc,
        clockwise: true,
        to: Point::polar(outer, end),
    });
    if inner > EPSILON {
        path.push(PathCommand::LineTo(Point::polar(inner, end)));
        path.push(PathCommand::Arc {
            radius: inner,
            large_arc,
            clockwise: false,
            to: Point::polar(inner, start),
        });
    } else {
        path.push(PathCommand::LineTo(Point::default()));
    }
    path.push(PathCommand::Close);
    path
}

fn push_circle(path: &mut ArcPath, radius: f64, from: f64, clockwise: bool) {
    let half = if clockwise { PI } else { -PI };
    path.push(PathCommand::MoveTo(Point::polar(radius, from)));
    path.push(PathCommand::Arc {
        radius,
        large_arc: true,
        clockwise,
        to: Point::polar(radius, from + half),
    });
    path.push(PathCommand::Arc {
        radius,
        large_arc: true,
        clockwise,
        to: Point::polar(radius, from),
    });
}

/// The midpoint of the wedge, halfway between the radii.
pub fn centroid(geometry: &ArcGeometry, radii: &Radii) -> Point {
    let radius = (radii.inner + radii.outer) / 2.0;
    let angle = (geometry.start_angle + geometry.end_angle) / 2.0;
    Point::polar(radius, angle)
}

/// Returns true if `point` lies inside the wedge.
///
/// Collapsed wedges contain nothing.
pub fn contains(geometry: &ArcGeometry, radii: &Radii, point: Point) -> bool {
    if geometry.is_collapsed() {
        return false;
    }
    let distance = point.x.hypot(point.y);
    let (inner, outer) = (radii.inner.min(radii.outer), radii.inner.max(radii.outer));
    if distance < inner || distance > outer {
        return false;
    }
    if geometry.width() >= TAU - EPSILON {
        return true;
    }
    let angle = point.x.atan2(-point.y).rem_euclid(TAU);
    let start = geometry.start_angle.rem_euclid(TAU);
    let offset = (angle - start).rem_euclid(TAU);
    offset < geometry.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: Radii = Radii::new(150.0, 75.0);

    #[test]
    fn quarter_wedge_path() {
        let path = arc_path(&ArcGeometry::new(0.0, PI / 2.0, 1.0), &R);
        assert_eq!(
            path.to_string(),
            "M0,-150A150,150,0,0,1,150,0L75,0A75,75,0,0,0,0,-75Z"
        );
    }

    #[test]
    fn large_wedge_sets_large_arc_flag() {
        let path = arc_path(&ArcGeometry::new(0.0, 1.5 * PI, 1.0), &R);
        match path.commands[1] {
            PathCommand::Arc { large_arc, .. } => assert!(large_arc),
            other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn full_ring_is_two_circles() {
        let path = arc_path(&ArcGeometry::new(0.0, TAU, 1.0), &R);
        let moves = path
            .commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count();
        assert_eq!(moves, 2);
        assert_eq!(path.commands.last(), Some(&PathCommand::Close));
    }

    #[test]
    fn pie_slice_goes_through_centre() {
        let path = arc_path(&ArcGeometry::new(0.0, PI / 2.0, 1.0), &Radii::new(100.0, 0.0));
        assert_eq!(path.to_string(), "M0,-100A100,100,0,0,1,100,0L0,0Z");
    }

    #[test]
    fn collapsed_wedge_still_has_a_path() {
        let g = ArcGeometry::new(1.0, 1.0, 0.0);
        assert!(g.is_collapsed());
        assert!(!arc_path(&g, &R).is_empty());
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = ArcGeometry::new(0.0, 1.0, 10.0);
        let b = ArcGeometry::new(2.0, 4.0, 30.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert!(a.lerp(&b, 0.5).approx_eq(&ArcGeometry::new(1.0, 2.5, 20.0), 1e-12));
    }

    #[test]
    fn collapsed_at_end_keeps_end_angle() {
        let g = ArcGeometry::new(0.5, 2.0, 7.0).collapsed_at_end();
        assert_eq!(g.start_angle, 2.0);
        assert_eq!(g.end_angle, 2.0);
    }

    #[test]
    fn centroid_of_first_quarter() {
        let c = centroid(&ArcGeometry::new(0.0, PI / 2.0, 1.0), &R);
        let expected = 112.5 * (PI / 4.0).sin();
        assert!((c.x - expected).abs() < 1e-9);
        assert!((c.y + expected).abs() < 1e-9);
    }

    #[test]
    fn hit_testing() {
        let g = ArcGeometry::new(0.0, PI / 2.0, 1.0);
        // Upper right quadrant, inside the ring
        assert!(contains(&g, &R, Point::new(80.0, -80.0)));
        // Inside the hole
        assert!(!contains(&g, &R, Point::new(10.0, -10.0)));
        // Lower left quadrant
        assert!(!contains(&g, &R, Point::new(-80.0, 80.0)));
        // Full ring contains every angle
        let full = ArcGeometry::new(0.0, TAU, 1.0);
        assert!(contains(&full, &R, Point::new(-80.0, 80.0)));
        // Collapsed contains nothing
        assert!(!contains(&g.collapsed_at_end(), &R, Point::new(80.0, -80.0)));
    }

    proptest::proptest! {
        #[test]
        fn centroid_is_inside_its_wedge(start in 0.0f64..TAU, width in 0.01f64..(TAU - 0.01)) {
            let g = ArcGeometry::new(start, start + width, 1.0);
            proptest::prop_assert!(contains(&g, &R, centroid(&g, &R)));
        }
    }
}
