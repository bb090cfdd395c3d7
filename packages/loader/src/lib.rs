#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV loader for mortality tables.
//!
//! Parses rows keyed by `Year, State, Deaths, Age Adjusted Rate, URL` and
//! coerces them into typed [`Record`]s. This is the only place raw strings
//! are turned into numbers: a field that cannot be coerced fails the whole
//! load with [`LoadError::InvalidField`], so no `NaN` ever reaches the
//! indexer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use mortality_map_index::{Index, IndexError, build_index};
use mortality_map_record_models::Record;
use thiserror::Error;

/// Header of the year column.
pub const YEAR_COLUMN: &str = "Year";
/// Header of the state column.
pub const STATE_COLUMN: &str = "State";
/// Header of the death count column.
pub const DEATHS_COLUMN: &str = "Deaths";
/// Header of the age-adjusted rate column.
pub const RATE_COLUMN: &str = "Age Adjusted Rate";
/// Header of the source URL column.
pub const URL_COLUMN: &str = "URL";

/// Errors that can occur while loading a mortality table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// A field could not be coerced into its typed form.
    #[error("Line {line}: invalid {column} value '{value}': {reason}")]
    InvalidField {
        /// 1-based line number in the source file.
        line: u64,
        /// Column the field belongs to.
        column: &'static str,
        /// Raw field content.
        value: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// The coerced records violate data integrity.
    #[error("Data integrity error: {0}")]
    Index(#[from] IndexError),
}

/// Positions of the required columns within a header row.
struct ColumnLayout {
    year: usize,
    state: usize,
    deaths: usize,
    rate: usize,
    url: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(LoadError::MissingColumn { column })
        };

        Ok(Self {
            year: find(YEAR_COLUMN)?,
            state: find(STATE_COLUMN)?,
            deaths: find(DEATHS_COLUMN)?,
            rate: find(RATE_COLUMN)?,
            url: find(URL_COLUMN)?,
        })
    }
}

/// Reads and coerces every row of a CSV stream.
///
/// # Errors
///
/// Returns [`LoadError`] if the stream cannot be parsed, a required column
/// is missing, or any field fails numeric coercion.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let layout = ColumnLayout::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = row.position().map_or(0, csv::Position::line);
        records.push(coerce_row(&row, &layout, line)?);
    }

    log::debug!("Parsed {} mortality records", records.len());

    Ok(records)
}

/// Reads a CSV stream and builds an [`Index`] from it.
///
/// Nothing is returned unless every row coerces and the records pass
/// integrity checks.
///
/// # Errors
///
/// Returns [`LoadError`] on any parse, coercion, or integrity failure.
pub fn read_index<R: Read>(reader: R) -> Result<Index, LoadError> {
    Ok(build_index(read_records(reader)?)?)
}

/// Loads records from a CSV file on disk.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or parsed.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    log::info!("Loading mortality table from {}", path.display());
    read_records(File::open(path)?)
}

/// Loads a CSV file from disk and builds an [`Index`] from it.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened, parsed, coerced, or
/// indexed.
pub fn load_index(path: &Path) -> Result<Index, LoadError> {
    Ok(build_index(load_records(path)?)?)
}

fn coerce_row(row: &StringRecord, layout: &ColumnLayout, line: u64) -> Result<Record, LoadError> {
    let field = |pos: usize, column: &'static str| {
        row.get(pos)
            .map(str::trim)
            .ok_or_else(|| LoadError::InvalidField {
                line,
                column,
                value: String::new(),
                reason: "field is missing".to_string(),
            })
    };
    let invalid = |column: &'static str, value: &str, reason: String| LoadError::InvalidField {
        line,
        column,
        value: value.to_owned(),
        reason,
    };

    let year_raw = field(layout.year, YEAR_COLUMN)?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|e| invalid(YEAR_COLUMN, year_raw, e.to_string()))?;

    let state = field(layout.state, STATE_COLUMN)?;
    if state.is_empty() {
        return Err(invalid(STATE_COLUMN, state, "state is empty".to_string()));
    }

    let deaths_raw = field(layout.deaths, DEATHS_COLUMN)?;
    let death_count = deaths_raw
        .parse::<u64>()
        .map_err(|e| invalid(DEATHS_COLUMN, deaths_raw, e.to_string()))?;

    let rate_raw = field(layout.rate, RATE_COLUMN)?;
    let adjusted_rate = rate_raw
        .parse::<f64>()
        .map_err(|e| invalid(RATE_COLUMN, rate_raw, e.to_string()))?;
    if !adjusted_rate.is_finite() || adjusted_rate < 0.0 {
        return Err(invalid(
            RATE_COLUMN,
            rate_raw,
            "expected a non-negative finite number".to_string(),
        ));
    }

    let source_url = field(layout.url, URL_COLUMN)?;

    Ok(Record {
        year,
        state: state.to_owned(),
        death_count,
        adjusted_rate,
        source_url: source_url.to_owned(),
    })
}
