//! Time-parameterised transitions.
//!
//! A transition is a pure function of progress `t ∈ [0, 1]`; the
//! [`Tween`] adds a start time and a duration so an external frame clock
//! can sample it. Nothing here sleeps or schedules.

use crate::color::Color;
use crate::geometry::ArcGeometry;
use std::time::Duration;

/// Types that can be interpolated.
pub trait Interpolate: Copy {
    /// The value at progress `t`; `t = 0` gives `self`, `t = 1` gives `to`.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for ArcGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            *to
        } else if t <= 0.0 {
            *self
        } else {
            self.lerp(to, t)
        }
    }
}

impl Interpolate for Color {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self.lerp(to, t)
    }
}

/// Returns the interpolator between two values.
pub fn interpolate<T: Interpolate>(from: T, to: T) -> impl Fn(f64) -> T {
    move |t| from.interpolate(&to, t)
}

/// Maps elapsed-time progress to interpolation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end, symmetric cubic.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Applies the easing to `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// A transition between two values over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    /// Value at the start.
    pub from: T,
    /// Value at the end.
    pub to: T,
    /// Clock time the transition started.
    pub started_at: Duration,
    /// Length of the transition.
    pub duration: Duration,
    /// Easing curve.
    pub easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    /// Creates a tween.
    pub fn new(from: T, to: T, started_at: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            easing,
        }
    }

    /// Raw time progress at `now`, clamped to `[0, 1]`.
    ///
    /// A zero duration is complete immediately.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Returns true once `now` has reached the end.
    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// The value at `now`.
    pub fn sample(&self, now: Duration) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.interpolate(&self.to, self.easing.apply(t))
    }
}
