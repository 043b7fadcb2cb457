//! The core series pipeline: alignment, date filters, and totals.
//!
//! Everything here is pure: no I/O, no shared state.

pub mod align;
pub mod filter;
pub mod totals;

pub use align::{align, parse_series_date};
pub use filter::apply;
pub use totals::totals;
