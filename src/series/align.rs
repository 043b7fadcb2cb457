//! Merge the raw per-metric series into one table keyed by calendar date.
//!
//! Rules:
//! - the date set is the union of the cases / deaths / recovered dates, and
//!   each of those dates must be present in all three series
//! - vaccinations are zero-filled for dates the provider does not report
//! - one bad date string fails the whole alignment

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::{AlignedRecord, AlignedTable, Metric, RawMetricSeries, RawTimeline};
use crate::error::DashboardError;

/// Accepted date key formats, tried in order.
///
/// The provider sends `M/D/YY`; the others cover hand-made fixtures and
/// re-exported data.
const DATE_FORMATS: [&str; 3] = ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];

/// Parse a provider date key into a calendar date.
pub fn parse_series_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Build the aligned table for one fetch.
pub fn align(timeline: &RawTimeline) -> Result<AlignedTable, DashboardError> {
    let cases = index_by_date(Metric::Cases, &timeline.cases)?;
    let deaths = index_by_date(Metric::Deaths, &timeline.deaths)?;
    let recovered = index_by_date(Metric::Recovered, &timeline.recovered)?;
    let vaccinations = match &timeline.vaccinations {
        Some(series) => index_by_date(Metric::Vaccinations, series)?,
        None => BTreeMap::new(),
    };

    let dates: BTreeSet<NaiveDate> = cases
        .keys()
        .chain(deaths.keys())
        .chain(recovered.keys())
        .copied()
        .collect();

    let mut records = Vec::with_capacity(dates.len());
    let mut zero_filled = 0usize;
    for date in dates {
        let (Some(&c), Some(&d), Some(&r)) = (cases.get(&date), deaths.get(&date), recovered.get(&date)) else {
            let missing: Vec<&str> = [
                (Metric::Cases, &cases),
                (Metric::Deaths, &deaths),
                (Metric::Recovered, &recovered),
            ]
            .into_iter()
            .filter(|(_, series)| !series.contains_key(&date))
            .map(|(metric, _)| metric.key())
            .collect();
            return Err(DashboardError::alignment(format!(
                "Date {date} is missing from the {} series.",
                missing.join("/")
            )));
        };

        let v = vaccinations.get(&date).copied().unwrap_or_else(|| {
            zero_filled += 1;
            0
        });

        records.push(AlignedRecord {
            date,
            cases: c,
            deaths: d,
            recovered: r,
            vaccinations: v,
        });
    }

    log::debug!(
        "Aligned {} dates ({zero_filled} without vaccination data)",
        records.len()
    );

    // BTreeSet iteration is strictly ascending, so this cannot fail.
    AlignedTable::new(records)
        .map_err(|e| DashboardError::alignment(format!("Aligned dates out of order at {}.", e.date)))
}

/// Parse every key of one series. Later keys overwrite earlier ones that map to
/// the same calendar date.
fn index_by_date(metric: Metric, series: &RawMetricSeries) -> Result<BTreeMap<NaiveDate, u64>, DashboardError> {
    let mut out = BTreeMap::new();
    for (raw, value) in series.iter() {
        let date = parse_series_date(raw).ok_or_else(|| {
            DashboardError::alignment(format!(
                "Invalid date '{raw}' in the {} series.",
                metric.key()
            ))
        })?;
        out.insert(date, value);
    }
    Ok(out)
}
