//! # Costwheel Testkit
//!
//! Test utilities for costwheel.
//!
//! This crate provides:
//! - Chart fixtures, standalone or wired to an in-memory collection
//! - Property-based generators for records, change events and feeds
//! - A reference model of the record store for differential checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use costwheel_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_chart() {
//!     let (mut chart, _log) = test_chart();
//!     chart.apply_batch(&[added("a", "rent", 100.0)], ms(0));
//!     settle(&mut chart, ms(0));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
