//! Shared domain types.
//!
//! These types are intentionally kept small and cheap to copy so they can be:
//!
//! - built once per fetch by the aligner
//! - written to / read back from the per-country CSV
//! - sliced into filtered views for totals and charts

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One of the four tracked statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cases,
    Deaths,
    Recovered,
    Vaccinations,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Cases,
        Metric::Deaths,
        Metric::Recovered,
        Metric::Vaccinations,
    ];

    /// Column / JSON key name.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
            Metric::Vaccinations => "vaccinations",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Cases => "Cases",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Vaccinations => "Vaccinations",
        }
    }
}

/// Raw `date string -> count` mapping for a single metric, in provider order.
///
/// Keys are kept as the provider sent them; parsing into calendar dates is the
/// aligner's job so that a bad key fails the whole alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetricSeries {
    entries: Vec<(String, u64)>,
}

impl RawMetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: impl Into<String>, value: u64) {
        self.entries.push((date.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(d, v)| (d.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for RawMetricSeries {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The decoded `timeline` payload for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTimeline {
    pub cases: RawMetricSeries,
    pub deaths: RawMetricSeries,
    pub recovered: RawMetricSeries,
    /// Absent when the provider does not track vaccinations for the country.
    pub vaccinations: Option<RawMetricSeries>,
}

/// One row of the aligned table.
///
/// Field order doubles as the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub date: NaiveDate,
    pub cases: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub vaccinations: u64,
}

impl AlignedRecord {
    pub fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Cases => self.cases,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
            Metric::Vaccinations => self.vaccinations,
        }
    }
}

/// Returned by [`AlignedTable::new`] when records are not strictly ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderedDate {
    /// Index of the first record that is not after its predecessor.
    pub index: usize,
    pub date: NaiveDate,
}

/// Records sorted ascending by date with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedTable {
    records: Vec<AlignedRecord>,
}

impl AlignedTable {
    pub fn new(records: Vec<AlignedRecord>) -> Result<Self, UnorderedDate> {
        if let Some(index) = records
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            let index = index + 1;
            return Err(UnorderedDate {
                index,
                date: records[index].date,
            });
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[AlignedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}

/// A date-based selection over an aligned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpec {
    /// Inclusive on both ends. `start > end` selects nothing.
    DateRange { start: NaiveDate, end: NaiveDate },
    ExactDate { date: NaiveDate },
    Year { year: i32 },
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::DateRange { start, end } => write!(f, "range {start}..={end}"),
            FilterSpec::ExactDate { date } => write!(f, "date {date}"),
            FilterSpec::Year { year } => write!(f, "year {year}"),
        }
    }
}

/// An owned, contiguous selection of records plus the filter that produced it.
///
/// `filter == None` means the view covers the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    filter: Option<FilterSpec>,
    records: Vec<AlignedRecord>,
}

impl FilteredView {
    pub fn new(filter: Option<FilterSpec>, records: Vec<AlignedRecord>) -> Self {
        Self { filter, records }
    }

    /// View over every record of `table`.
    pub fn whole(table: &AlignedTable) -> Self {
        Self::new(None, table.records().to_vec())
    }

    pub fn filter(&self) -> Option<FilterSpec> {
        self.filter
    }

    pub fn records(&self) -> &[AlignedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Calendar year of the first record.
    pub fn first_year(&self) -> Option<i32> {
        self.first_date().map(|d| d.year())
    }
}

/// Per-metric sums over a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub cases: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub vaccinations: u64,
}

impl Totals {
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Cases => self.cases,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
            Metric::Vaccinations => self.vaccinations,
        }
    }
}
