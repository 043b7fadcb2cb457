//! Input/output helpers.
//!
//! - per-country CSV save/load of the aligned table (`table`)

pub mod table;

pub use table::*;
