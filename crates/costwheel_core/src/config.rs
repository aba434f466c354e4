//! Chart configuration.

use crate::color::Color;
use crate::error::{ChartError, ChartResult};
use crate::geometry::Radii;
use crate::tween::Easing;
use std::time::Duration;

/// Configuration for a donut chart.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Outer radius of the ring.
    pub outer_radius: f64,

    /// Inner radius of the ring (0 = full pie).
    pub inner_radius: f64,

    /// Duration shared by enter, update and exit transitions.
    pub transition_duration: Duration,

    /// Duration of hover color changes.
    pub hover_duration: Duration,

    /// Easing applied to every transition.
    pub easing: Easing,

    /// Fill of a hovered slice.
    pub highlight_color: Color,

    /// Slice outline color.
    pub stroke_color: Color,

    /// Slice outline width.
    pub stroke_width: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            outer_radius: 150.0,
            inner_radius: 75.0,
            transition_duration: Duration::from_millis(750),
            hover_duration: Duration::from_millis(300),
            easing: Easing::CubicInOut,
            highlight_color: Color::WHITE,
            stroke_color: Color::WHITE,
            stroke_width: 3.0,
        }
    }
}

impl ChartConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outer radius and makes the hole half as wide.
    #[must_use]
    pub fn donut(mut self, outer_radius: f64) -> Self {
        self.outer_radius = outer_radius;
        self.inner_radius = outer_radius / 2.0;
        self
    }

    /// Sets both radii.
    #[must_use]
    pub const fn radii(mut self, outer: f64, inner: f64) -> Self {
        self.outer_radius = outer;
        self.inner_radius = inner;
        self
    }

    /// Sets the transition duration.
    #[must_use]
    pub const fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    /// Sets the hover duration.
    #[must_use]
    pub const fn hover_duration(mut self, duration: Duration) -> Self {
        self.hover_duration = duration;
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub const fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Sets the highlight color.
    #[must_use]
    pub const fn highlight_color(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }

    /// Returns the ring radii.
    pub fn ring(&self) -> Radii {
        Radii::new(self.outer_radius, self.inner_radius)
    }

    /// Checks that the configuration can be drawn.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.outer_radius.is_finite() || self.outer_radius <= 0.0 {
            return Err(ChartError::invalid_config(format!(
                "outer radius must be positive, got {}",
                self.outer_radius
            )));
        }
        if !self.inner_radius.is_finite() || self.inner_radius < 0.0 {
            return Err(ChartError::invalid_config(format!(
                "inner radius must be non-negative, got {}",
                self.inner_radius
            )));
        }
        if self.inner_radius >= self.outer_radius {
            return Err(ChartError::invalid_config(format!(
                "inner radius {} must be below outer radius {}",
                self.inner_radius, self.outer_radius
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::invalid_config("stroke width must be non-negative"));
        }
        Ok(())
    }
}
