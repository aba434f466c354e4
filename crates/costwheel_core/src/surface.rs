//! Rendering surface abstraction.
//!
//! The chart knows how to turn elements into paths and styles; the
//! surface knows how to put them on screen. Surface failures abort the
//! frame and are returned to the caller.

use crate::color::Color;
use crate::error::{ChartError, ChartResult};
use crate::geometry::ArcPath;
use crate::interaction::Tooltip;
use crate::record::RecordId;

/// How to paint one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
    /// Outline width.
    pub stroke_width: f64,
}

/// A drawing target for chart frames.
///
/// Only `draw_path` is required; the frame brackets and the tooltip
/// default to no-ops.
pub trait RenderSurface {
    /// Called before the first draw of a frame.
    fn begin_frame(&mut self) -> ChartResult<()> {
        Ok(())
    }

    /// Draws one element's outline.
    fn draw_path(&mut self, id: &RecordId, path: &ArcPath, style: &Style) -> ChartResult<()>;

    /// Draws the hover overlay.
    fn draw_tooltip(&mut self, _tooltip: &Tooltip) -> ChartResult<()> {
        Ok(())
    }

    /// Called after the last draw of a frame.
    fn end_frame(&mut self) -> ChartResult<()> {
        Ok(())
    }
}

/// A recorded `draw_path` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Element id.
    pub id: RecordId,
    /// SVG path data.
    pub path: String,
    /// Paint style.
    pub style: Style,
}

/// A surface that records frames for inspection.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    frames: Vec<Vec<DrawCall>>,
    pending: Vec<DrawCall>,
    tooltips: Vec<Tooltip>,
    failure: Option<String>,
}

impl RecordingSurface {
    /// Creates a working surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface whose drawing primitive is unavailable.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Completed frames in order.
    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }

    /// The last completed frame.
    pub fn last_frame(&self) -> Option<&[DrawCall]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Tooltips drawn, across all frames.
    pub fn tooltips(&self) -> &[Tooltip] {
        &self.tooltips
    }
}

impl RenderSurface for RecordingSurface {
    fn begin_frame(&mut self) -> ChartResult<()> {
        self.pending.clear();
        Ok(())
    }

    fn draw_path(&mut self, id: &RecordId, path: &ArcPath, style: &Style) -> ChartResult<()> {
        if let Some(message) = &self.failure {
            return Err(ChartError::surface(message.clone()));
        }
        self.pending.push(DrawCall {
            id: id.clone(),
            path: path.to_string(),
            style: *style,
        });
        Ok(())
    }

    fn draw_tooltip(&mut self, tooltip: &Tooltip) -> ChartResult<()> {
        self.tooltips.push(tooltip.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> ChartResult<()> {
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}
