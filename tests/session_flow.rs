use std::cell::RefCell;
use std::fs;

use chrono::NaiveDate;
use covid_dash::app::{DataOrigin, Session};
use covid_dash::data::{TimelineSource, parse_timeline};
use covid_dash::domain::{FilterSpec, RawTimeline, Totals};
use covid_dash::error::DashboardError;
use covid_dash::io::TableStore;
use covid_dash::report::CHART_TITLE;
use serde_json::json;

/// Serves a canned provider body and records which countries were asked for.
struct CannedSource {
    body: serde_json::Value,
    requests: RefCell<Vec<String>>,
}

impl CannedSource {
    fn new(body: serde_json::Value) -> Self {
        Self {
            body,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl TimelineSource for CannedSource {
    fn fetch_timeline(&self, country: &str) -> Result<RawTimeline, DashboardError> {
        self.requests.borrow_mut().push(country.to_string());
        parse_timeline(&self.body)
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn two_year_body() -> serde_json::Value {
    json!({
        "country": "India",
        "timeline": {
            "cases": {"12/31/20": 4, "1/1/21": 5, "1/2/21": 8},
            "deaths": {"12/31/20": 0, "1/1/21": 1, "1/2/21": 1},
            "recovered": {"12/31/20": 1, "1/1/21": 2, "1/2/21": 3},
            "vaccinated": {"1/2/21": 7}
        }
    })
}

#[test]
fn search_filter_and_totals_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(CannedSource::new(two_year_body()), TableStore::new(dir.path()));

    let data = session.search("India", false).unwrap();
    assert_eq!(data.origin, DataOrigin::Fetched);
    assert_eq!(data.table.len(), 3);
    assert_eq!(data.path, dir.path().join("india_covid_data.csv"));

    let saved = fs::read_to_string(dir.path().join("india_covid_data.csv")).unwrap();
    assert!(saved.starts_with("date,cases,deaths,recovered,vaccinations\n"), "{saved}");
    assert!(saved.contains("2021-01-01,5,1,2,0"), "{saved}");

    let view = session.apply_filter(FilterSpec::Year { year: 2021 }).unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(
        session.totals(),
        Some(Totals { cases: 13, deaths: 2, recovered: 5, vaccinations: 7 })
    );
    assert_eq!(
        session.chart_request(CHART_TITLE).unwrap().title,
        "COVID-19 Data for India (Year: 2021)"
    );

    session
        .apply_filter(FilterSpec::DateRange { start: ymd(2020, 1, 1), end: ymd(2021, 1, 1) })
        .unwrap();
    assert_eq!(
        session.chart_request(CHART_TITLE).unwrap().title,
        "COVID-19 Data for India (Date Range: 2020-12-31 to 2021-01-01)"
    );
}

#[test]
fn saved_file_is_reused_until_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(CannedSource::new(two_year_body()), TableStore::new(dir.path()));

    session.search("south korea", false).unwrap();
    assert!(dir.path().join("south korea_covid_data.csv").exists());

    assert_eq!(session.search("South Korea", false).unwrap().origin, DataOrigin::Saved);
    assert_eq!(session.search("south korea", true).unwrap().origin, DataOrigin::Fetched);
    assert_eq!(session.store().load("SOUTH KOREA").unwrap().len(), 3);
}

#[test]
fn load_without_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = TableStore::new(dir.path());
    match store.load("atlantis") {
        Err(DashboardError::NotFound { country, path }) => {
            assert_eq!(country, "atlantis");
            assert_eq!(path, dir.path().join("atlantis_covid_data.csv"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn malformed_payload_leaves_no_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let body = json!({"timeline": {"cases": {"1/1/21": 5}, "deaths": {"1/1/21": 1}}});
    let mut session = Session::new(CannedSource::new(body), TableStore::new(dir.path()));

    let err = session.search("peru", false).unwrap_err();
    assert!(matches!(err, DashboardError::Alignment { .. }), "{err}");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(session.current().is_none());
}

#[test]
fn corrupt_saved_file_is_reported_not_refetched() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("chile_covid_data.csv"), "date,cases\n2021-01-01,oops\n").unwrap();

    let source = CannedSource::new(two_year_body());
    let mut session = Session::new(source, TableStore::new(dir.path()));
    let err = session.search("chile", false).unwrap_err();
    assert!(matches!(err, DashboardError::LoadCorrupt { .. }), "{err}");
}
