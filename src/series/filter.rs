//! Date-based selection over an aligned table.
//!
//! The table is sorted and has unique dates, so every filter kind selects one
//! contiguous run which we locate with two binary searches.

use chrono::NaiveDate;

use crate::domain::{AlignedRecord, AlignedTable, FilterSpec, FilteredView};

/// Select the records matching `spec`. Never fails; no match is an empty view.
pub fn apply(table: &AlignedTable, spec: FilterSpec) -> FilteredView {
    let records = table.records();
    let selected = match spec {
        FilterSpec::DateRange { start, end } => between(records, start, end),
        FilterSpec::ExactDate { date } => between(records, date, date),
        FilterSpec::Year { year } => match year_bounds(year) {
            Some((start, end)) => between(records, start, end),
            None => &[],
        },
    };

    log::debug!("Filter {spec} selected {} of {} records", selected.len(), records.len());
    FilteredView::new(Some(spec), selected.to_vec())
}

/// Records with `start <= date <= end`; empty when `start > end`.
fn between(records: &[AlignedRecord], start: NaiveDate, end: NaiveDate) -> &[AlignedRecord] {
    if start > end {
        return &[];
    }
    let lo = records.partition_point(|r| r.date < start);
    let hi = records.partition_point(|r| r.date <= end);
    &records[lo..hi]
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}
