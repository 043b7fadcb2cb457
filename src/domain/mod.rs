//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw provider payloads (`RawMetricSeries`, `RawTimeline`)
//! - the aligned per-date table (`AlignedRecord`, `AlignedTable`)
//! - filter inputs and outputs (`FilterSpec`, `FilteredView`, `Totals`)

pub mod types;

pub use types::*;
