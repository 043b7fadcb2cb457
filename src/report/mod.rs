//! Reporting utilities: chart titles and formatted terminal output.
//!
//! We keep presentation text in one place so the series pipeline stays free of
//! any wording, and the CLI and TUI describe a view the same way.

use crate::domain::{FilterSpec, FilteredView};

pub mod format;

pub use format::*;

/// Default base title for trend charts.
pub const CHART_TITLE: &str = "COVID-19 Data";

/// Compose a chart title describing which filter produced `view`.
///
/// Range titles use the dates actually present in the view, not the requested
/// bounds.
pub fn chart_title(base: &str, country: &str, view: &FilteredView) -> String {
    let country = title_case(country.trim());
    let head = format!("{base} for {country}");

    match view.filter() {
        None => head,
        Some(FilterSpec::DateRange { start, end }) => {
            let first = view.first_date().unwrap_or(start);
            let last = view.last_date().unwrap_or(end);
            format!("{head} (Date Range: {first} to {last})")
        }
        Some(FilterSpec::ExactDate { date }) => {
            let date = view.first_date().unwrap_or(date);
            format!("{head} (Specific Date: {date})")
        }
        Some(FilterSpec::Year { year }) => {
            let year = view.first_year().unwrap_or(year);
            format!("{head} (Year: {year})")
        }
    }
}

/// Upper-case the first letter of every word, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlignedRecord, AlignedTable};
    use crate::series::apply;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> AlignedTable {
        let rec = |date| AlignedRecord { date, cases: 1, deaths: 0, recovered: 0, vaccinations: 0 };
        AlignedTable::new(vec![rec(ymd(2020, 12, 31)), rec(ymd(2021, 1, 2)), rec(ymd(2021, 1, 3))]).unwrap()
    }

    #[test]
    fn titles_describe_each_filter_kind() {
        let table = table();

        let whole = FilteredView::whole(&table);
        assert_eq!(chart_title(CHART_TITLE, "india", &whole), "COVID-19 Data for India");

        let range = apply(
            &table,
            FilterSpec::DateRange { start: ymd(2021, 1, 1), end: ymd(2021, 1, 31) },
        );
        assert_eq!(
            chart_title(CHART_TITLE, "south korea", &range),
            "COVID-19 Data for South Korea (Date Range: 2021-01-02 to 2021-01-03)"
        );

        let day = apply(&table, FilterSpec::ExactDate { date: ymd(2020, 12, 31) });
        assert_eq!(
            chart_title(CHART_TITLE, "USA", &day),
            "COVID-19 Data for Usa (Specific Date: 2020-12-31)"
        );

        let year = apply(&table, FilterSpec::Year { year: 2021 });
        assert_eq!(chart_title("Trends", "peru", &year), "Trends for Peru (Year: 2021)");
    }

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(title_case("bosnia-and herzegovina"), "Bosnia-And Herzegovina");
        assert_eq!(title_case("côte d'ivoire"), "Côte D'Ivoire");
    }
}
