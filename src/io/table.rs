//! Per-country CSV persistence of the aligned table.
//!
//! File layout:
//! - one file per country: `<data_dir>/<country lowercased>_covid_data.csv`
//! - header row `date,cases,deaths,recovered,vaccinations`
//! - `date` as `YYYY-MM-DD`, counts as unsigned integers
//!
//! Loads are all-or-nothing: one bad row fails the whole load.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use csv::StringRecord;

use crate::domain::{AlignedRecord, AlignedTable};
use crate::error::DashboardError;

pub const FILE_SUFFIX: &str = "_covid_data";
pub const FILE_EXTENSION: &str = "csv";

/// CSV header, in column order.
pub const COLUMNS: [&str; 5] = ["date", "cases", "deaths", "recovered", "vaccinations"];

/// Saved tables live as flat files under one data directory.
#[derive(Debug, Clone)]
pub struct TableStore {
    data_dir: PathBuf,
}

impl TableStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, country: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{FILE_EXTENSION}", file_stem(country)))
    }

    /// Write `table`, replacing any existing file for the country.
    ///
    /// Rows go to a sibling `.tmp` file which is synced to disk, then renamed
    /// over the target.
    pub fn save(&self, country: &str, table: &AlignedTable) -> Result<PathBuf, DashboardError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| DashboardError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let path = self.path_for(country);
        let tmp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));

        let written = File::create(&tmp).and_then(|file| {
            write_table(&file, table)?;
            file.sync_all()
        });
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp);
            return Err(DashboardError::Io { path: tmp, source });
        }

        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(DashboardError::Io { path, source });
        }

        log::info!("Saved {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    pub fn load(&self, country: &str) -> Result<AlignedTable, DashboardError> {
        let path = self.path_for(country);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DashboardError::NotFound {
                    country: country.trim().to_string(),
                    path,
                });
            }
            Err(source) => return Err(DashboardError::Io { path, source }),
        };

        let table = read_table(file).map_err(|cause| DashboardError::LoadCorrupt {
            path: path.clone(),
            cause,
        })?;

        log::info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }
}

/// `"South Korea"` -> `"south korea_covid_data"`.
///
/// Path separators are replaced so the file always lands in the data directory.
pub fn file_stem(country: &str) -> String {
    let name: String = country
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{name}{FILE_SUFFIX}")
}

/// Write the header and one row per record.
pub fn write_table<W: Write>(writer: W, table: &AlignedTable) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Written explicitly so an empty table still gets a header.
    wtr.write_record(COLUMNS)?;
    for record in table.records() {
        wtr.serialize(record)?;
    }
    wtr.flush()
}

/// Parse a saved table. The error is a human-readable cause.
pub fn read_table<R: Read>(reader: R) -> Result<AlignedTable, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| format!("Failed to read header: {e}"))?;
    let normalized: Vec<String> = headers.iter().map(normalize_header_name).collect();
    ensure_columns(&normalized)?;
    rdr.set_headers(StringRecord::from(normalized));

    let mut records = Vec::new();
    for result in rdr.deserialize::<AlignedRecord>() {
        records.push(result.map_err(|e| e.to_string())?);
    }

    AlignedTable::new(records).map_err(|e| {
        // +2: one header line, 1-based line numbers.
        format!(
            "line {}: date {} does not come after the previous row",
            e.index + 2,
            e.date
        )
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet tools sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn ensure_columns(headers: &[String]) -> Result<(), String> {
    let mut sorted: Vec<&str> = headers.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let mut expected = COLUMNS.to_vec();
    expected.sort_unstable();

    if sorted != expected {
        return Err(format!(
            "expected columns [{}], found [{}]",
            COLUMNS.join(", "),
            headers.join(", ")
        ));
    }
    Ok(())
}
