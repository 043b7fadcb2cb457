//! Command-line parsing for the COVID-19 dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code. Filters are parsed straight into `FilterSpec`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::FilterSpec;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "COVID-19 historical data dashboard (disease.sh-based)")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Base URL of the statistics API (overrides COVID_DASH_BASE_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory holding `<country>_covid_data.csv` files (overrides COVID_DASH_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the full history for a country and save it, replacing any saved copy.
    Fetch(FetchArgs),
    /// Print totals (and optionally a chart) for a country, filtered by date.
    Show(ShowArgs),
    /// Launch the interactive TUI.
    Tui(TuiArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Country name as accepted by the API (e.g. "india", "usa", "south korea").
    pub country: String,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Country name as accepted by the API.
    pub country: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Fetch fresh data even if a saved file exists.
    #[arg(long)]
    pub refresh: bool,

    /// Render an ASCII trend chart of the filtered rows.
    #[arg(long)]
    pub plot: bool,

    /// Maximum number of rows to list (0 hides the listing).
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Date filter flags. At most one kind may be given; none means the whole table.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Range start (YYYY-MM-DD, inclusive). Requires --to.
    #[arg(long, value_parser = parse_iso_date, requires = "to", conflicts_with_all = ["date", "year"])]
    pub from: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD, inclusive). Requires --from.
    #[arg(long, value_parser = parse_iso_date, requires = "from")]
    pub to: Option<NaiveDate>,

    /// A single date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_iso_date, conflicts_with_all = ["from", "to", "year"])]
    pub date: Option<NaiveDate>,

    /// A calendar year (e.g. 2021).
    #[arg(long, conflicts_with_all = ["from", "to", "date"])]
    pub year: Option<i32>,
}

impl FilterArgs {
    pub fn to_spec(&self) -> Option<FilterSpec> {
        match (self.from, self.to, self.date, self.year) {
            (Some(start), Some(end), _, _) => Some(FilterSpec::DateRange { start, end }),
            (_, _, Some(date), _) => Some(FilterSpec::ExactDate { date }),
            (_, _, _, Some(year)) => Some(FilterSpec::Year { year }),
            _ => None,
        }
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Country to load on startup.
    pub country: Option<String>,
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("covid").chain(args.iter().copied()))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn show_filter(args: &[&str]) -> Option<FilterSpec> {
        match parse(args).unwrap().command {
            Command::Show(show) => show.filter.to_spec(),
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn show_parses_each_filter_kind() {
        assert_eq!(show_filter(&["show", "india"]), None);
        assert_eq!(
            show_filter(&["show", "india", "--from", "2021-01-01", "--to", "2021-02-01"]),
            Some(FilterSpec::DateRange { start: ymd(2021, 1, 1), end: ymd(2021, 2, 1) })
        );
        assert_eq!(
            show_filter(&["show", "india", "--date", "2021-01-02"]),
            Some(FilterSpec::ExactDate { date: ymd(2021, 1, 2) })
        );
        assert_eq!(show_filter(&["show", "india", "--year", "2020"]), Some(FilterSpec::Year { year: 2020 }));
    }

    #[test]
    fn conflicting_or_incomplete_filters_are_rejected() {
        assert!(parse(&["show", "india", "--from", "2021-01-01"]).is_err());
        assert!(parse(&["show", "india", "--date", "2021-01-01", "--year", "2021"]).is_err());
        assert!(parse(&["show", "india", "--date", "01/02/2021"]).is_err());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = parse(&["fetch", "peru", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
