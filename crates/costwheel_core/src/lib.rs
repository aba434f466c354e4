//! # Costwheel Core
//!
//! Reconciliation and animation engine for a live donut chart.
//!
//! This crate provides:
//! - Record store driven by add/modify/remove change events
//! - Pie layout of records around the full circle
//! - Annular wedge geometry and SVG path data
//! - Keyed reconciliation with enter/update/exit transitions
//! - Hover and click interactions with outbound removal requests
//! - An in-process change feed and in-memory collection
//!
//! ## Cycle
//!
//! 1. A feed delivery arrives as one ordered batch
//! 2. Every event is applied to the record store
//! 3. The store is laid out and diffed against the rendered elements by id
//! 4. Transitions start from each element's live geometry
//! 5. The caller's frame clock ticks the transitions and renders
//!
//! ## Key Invariants
//!
//! - Segment order is store insertion order; nothing is sorted
//! - Every id is in exactly one of entering, updating or exiting
//! - An element's live geometry is always drawable
//! - Clicks never mutate the store; removals come back through the feed

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chart;
mod color;
mod config;
mod error;
mod feed;
pub mod geometry;
mod interaction;
mod layout;
mod reconcile;
mod record;
mod stats;
mod surface;
mod tween;

pub use chart::DonutChart;
pub use color::{Color, ColorScale, FixedColor, OrdinalScale, SET1};
pub use config::ChartConfig;
pub use error::{ChartError, ChartResult};
pub use feed::{
    ChangeEvent, ChangeFeed, ChangeKind, CollectionWriter, FeedAdapter, FeedBatch,
    InMemoryCollection,
};
pub use geometry::{arc_path, ArcGeometry, ArcPath, Point, Radii};
pub use interaction::{
    DeleteLog, DeleteSink, ElementHandle, InteractionHandler, NoInteractions, SliceInteractions,
    Tooltip, DELETE_HINT,
};
pub use layout::{pie, Segment};
pub use reconcile::{CycleReport, Phase, Reconciler, RenderedElement, TickReport};
pub use record::{ApplyOutcome, Record, RecordId, RecordStore};
pub use stats::ChartStats;
pub use surface::{DrawCall, RecordingSurface, RenderSurface, Style};
pub use tween::{interpolate, Easing, Interpolate, Tween};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
