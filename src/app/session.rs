//! Shared "dashboard session" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load saved table (or fetch -> align -> save -> reload) -> filter -> totals
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! All "currently selected" state lives in this explicit context object; each
//! search or filter replaces it wholesale.

use std::path::PathBuf;

use crate::data::TimelineSource;
use crate::domain::{AlignedTable, FilterSpec, FilteredView, Totals};
use crate::error::DashboardError;
use crate::io::TableStore;

/// Where the current table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Read from an existing saved file.
    Saved,
    /// Fetched from the remote source and saved during this search.
    Fetched,
}

/// The selected country and its table.
#[derive(Debug, Clone)]
pub struct CountryData {
    /// Normalized (trimmed, lower-cased) country identifier.
    pub country: String,
    pub table: AlignedTable,
    pub origin: DataOrigin,
    pub path: PathBuf,
}

/// Everything a chart adapter needs to draw the current view.
#[derive(Debug, Clone)]
pub struct ChartRequest<'a> {
    pub title: String,
    pub country: &'a str,
    pub view: &'a FilteredView,
}

pub struct Session<S> {
    source: S,
    store: TableStore,
    current: Option<CountryData>,
    view: Option<FilteredView>,
}

impl<S: TimelineSource> Session<S> {
    pub fn new(source: S, store: TableStore) -> Self {
        Self {
            source,
            store,
            current: None,
            view: None,
        }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Fetch, align, and save without touching the session state.
    ///
    /// An alignment failure aborts before anything is written.
    pub fn fetch_and_save(&self, country: &str) -> Result<(AlignedTable, PathBuf), DashboardError> {
        let country = normalize_country(country)?;
        let timeline = self.source.fetch_timeline(&country)?;
        let table = crate::series::align(&timeline)?;
        let path = self.store.save(&country, &table)?;
        Ok((table, path))
    }

    /// Select `country`: load its saved table, falling back to a fetch when no
    /// file exists. `refresh` always fetches.
    ///
    /// Any failure clears the current selection.
    pub fn search(&mut self, country: &str, refresh: bool) -> Result<&CountryData, DashboardError> {
        self.current = None;
        self.view = None;

        let country = normalize_country(country)?;
        let path = self.store.path_for(&country);

        let (table, origin) = if refresh {
            (self.refetch(&country)?, DataOrigin::Fetched)
        } else {
            match self.store.load(&country) {
                Ok(table) => (table, DataOrigin::Saved),
                Err(DashboardError::NotFound { .. }) => {
                    log::warn!("No saved data for '{country}', fetching");
                    (self.refetch(&country)?, DataOrigin::Fetched)
                }
                Err(e) => return Err(e),
            }
        };

        Ok(&*self.current.insert(CountryData {
            country,
            table,
            origin,
            path,
        }))
    }

    /// Fetch + save, then read the saved file back so memory matches disk.
    fn refetch(&self, country: &str) -> Result<AlignedTable, DashboardError> {
        self.fetch_and_save(country)?;
        self.store.load(country)
    }

    /// Replace the current view with `spec` applied to the selected table.
    ///
    /// `None` when no country is selected.
    pub fn apply_filter(&mut self, spec: FilterSpec) -> Option<&FilteredView> {
        let current = self.current.as_ref()?;
        let view = crate::series::apply(&current.table, spec);
        log::info!("{}: filter {spec} -> {} records", current.country, view.len());
        Some(&*self.view.insert(view))
    }

    /// Replace the current view with the whole selected table.
    pub fn show_all(&mut self) -> Option<&FilteredView> {
        let current = self.current.as_ref()?;
        let view = FilteredView::whole(&current.table);
        Some(&*self.view.insert(view))
    }

    pub fn current(&self) -> Option<&CountryData> {
        self.current.as_ref()
    }

    pub fn view(&self) -> Option<&FilteredView> {
        self.view.as_ref()
    }

    pub fn totals(&self) -> Option<Totals> {
        self.view.as_ref().map(crate::series::totals)
    }

    /// Chart input for the current view; `None` when there is nothing to draw.
    pub fn chart_request(&self, base_title: &str) -> Option<ChartRequest<'_>> {
        let current = self.current.as_ref()?;
        let view = self.view.as_ref().filter(|v| !v.is_empty())?;
        Some(ChartRequest {
            title: crate::report::chart_title(base_title, &current.country, view),
            country: &current.country,
            view,
        })
    }
}

fn normalize_country(country: &str) -> Result<String, DashboardError> {
    let country = country.trim().to_lowercase();
    if country.is_empty() {
        return Err(DashboardError::fetch("Country name is empty."));
    }
    Ok(country)
}
