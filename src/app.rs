//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - sets up logging
//! - runs the session workflow for `fetch` / `show`
//! - hands over to the TUI

use clap::Parser;

use crate::cli::{Command, FetchArgs, ShowArgs};
use crate::data::DiseaseClient;
use crate::error::AppError;
use crate::io::TableStore;
use crate::report::CHART_TITLE;

pub mod logging;
pub mod session;
pub mod settings;

pub use session::{ChartRequest, CountryData, DataOrigin, Session};
pub use settings::Settings;

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // We want `covid` and `covid india` to behave like `covid tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::resolve(cli.global.base_url.clone(), cli.global.data_dir.clone());

    match cli.command {
        Command::Fetch(args) => {
            logging::init(logging::LogTarget::Stderr)?;
            handle_fetch(&settings, args)
        }
        Command::Show(args) => {
            logging::init(logging::LogTarget::Stderr)?;
            handle_show(&settings, args)
        }
        Command::Tui(args) => {
            logging::init(logging::LogTarget::File(settings.log_path()))?;
            crate::tui::run(&settings, args)
        }
    }
}

/// Build a session backed by the live API and the configured data directory.
pub fn open_session(settings: &Settings) -> Result<Session<DiseaseClient>, AppError> {
    let client = DiseaseClient::new(&settings.base_url)?;
    Ok(Session::new(client, TableStore::new(&settings.data_dir)))
}

fn handle_fetch(settings: &Settings, args: FetchArgs) -> Result<(), AppError> {
    let session = open_session(settings)?;
    let (table, path) = session.fetch_and_save(&args.country)?;

    println!("{}", crate::report::format_table_summary(&args.country, &table));
    println!("Saved to {}", path.display());
    Ok(())
}

fn handle_show(settings: &Settings, args: ShowArgs) -> Result<(), AppError> {
    let mut session = open_session(settings)?;
    let data = session.search(&args.country, args.refresh)?;
    let origin = match data.origin {
        DataOrigin::Saved => "saved file",
        DataOrigin::Fetched => "fresh fetch",
    };
    println!(
        "{} [{origin}: {}]",
        crate::report::format_table_summary(&data.country, &data.table),
        data.path.display()
    );

    let view_is_empty = match args.filter.to_spec() {
        Some(spec) => session.apply_filter(spec),
        None => session.show_all(),
    }
    .map(|v| v.is_empty())
    .unwrap_or(true);

    if view_is_empty {
        return Err(AppError::new(3, "No data available for the selected filter."));
    }

    let (Some(chart), Some(totals)) = (session.chart_request(CHART_TITLE), session.totals()) else {
        return Err(AppError::new(3, "No data available for the selected filter."));
    };

    println!("\n{}\n", chart.title);
    print!("{}", crate::report::format_totals(&totals));

    if args.rows > 0 {
        println!();
        print!("{}", crate::report::format_view_rows(chart.view, args.rows));
    }

    if args.plot {
        println!();
        print!(
            "{}",
            crate::plot::render_ascii_chart(chart.view, &chart.title, args.width, args.height)
        );
    }

    Ok(())
}

/// Rewrite argv so `covid` defaults to `covid tui`.
///
/// Rules:
/// - `covid`                        -> `covid tui`
/// - `covid india`                  -> `covid tui india`
/// - `covid --data-dir d`           -> `covid tui --data-dir d`
/// - `covid --help/--version/-h`    -> unchanged (show top-level help/version)
/// - anything naming a subcommand   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let rest = argv.get(1..).unwrap_or_default();

    let has_help_or_version = rest
        .iter()
        .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version" | "help"));
    let has_subcommand = rest
        .iter()
        .any(|a| matches!(a.as_str(), "fetch" | "show" | "tui"));

    if has_help_or_version || has_subcommand {
        return argv;
    }

    let at = argv.len().min(1);
    argv.insert(at, "tui".to_string());
    argv
}
