//! Remote data sources.

use crate::domain::RawTimeline;
use crate::error::DashboardError;

pub mod disease;

pub use disease::{DEFAULT_BASE_URL, DiseaseClient, parse_timeline};

/// Something that can produce the raw historical timeline for a country.
///
/// One call covers the full available history. Implementations do no caching.
pub trait TimelineSource {
    fn fetch_timeline(&self, country: &str) -> Result<RawTimeline, DashboardError>;
}
