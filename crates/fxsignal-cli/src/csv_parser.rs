//! CSV ingestion of daily OHLC price files.
//!
//! # Column Detection
//!
//! Headers are matched case-insensitively after trimming:
//! - `date`, `time`, `datetime`, `timestamp`, `dt` → bar date. A blank
//!   first header (the unnamed index column written by spreadsheet and
//!   dataframe exports) is also taken as the date column.
//! - `open`, `high`, `low`, `close` (or `price`, `adj close`) → prices
//!
//! Extra columns are ignored.
//!
//! # Row Handling
//!
//! - Rows whose date cannot be parsed are dropped with a warning.
//! - Rows are sorted ascending by date; a repeated date keeps its first row.
//! - A non-numeric or non-finite price is an error naming the offending
//!   line; an empty price cell is read as a missing value.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use fxsignal::series::{Bar, TimeSeries};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Outcome of loading a price file.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    /// Bars sorted ascending with unique dates.
    pub series: TimeSeries,
    /// Data rows dropped because their date could not be parsed.
    pub unparsable_dates: usize,
    /// Data rows dropped because their date repeated an earlier row.
    pub duplicate_dates: usize,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

/// Normalize a column header name for matching.
fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// Check if a header represents a date column.
fn is_date_column(normalized: &str) -> bool {
    matches!(normalized, "date" | "time" | "datetime" | "timestamp" | "dt")
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnMap> {
    let names: Vec<String> = headers.iter().map(normalize_header).collect();
    let find = |candidates: &[&str]| names.iter().position(|n| candidates.contains(&n.as_str()));

    let date = names
        .iter()
        .position(|n| is_date_column(n))
        .or_else(|| names.first().filter(|n| n.is_empty()).map(|_| 0))
        .ok_or_else(|| missing_column("date (or a blank first header)"))?;

    Ok(ColumnMap {
        date,
        open: find(&["open"]).ok_or_else(|| missing_column("open"))?,
        high: find(&["high"]).ok_or_else(|| missing_column("high"))?,
        low: find(&["low"]).ok_or_else(|| missing_column("low"))?,
        close: find(&["close", "price", "adj close", "adjusted close"])
            .ok_or_else(|| missing_column("close"))?,
    })
}

fn missing_column(name: &str) -> CliError {
    CliError::CsvParse {
        message: format!("no '{name}' column found"),
        line: Some(1),
    }
}

/// Parses a date cell, accepting common date and date-time layouts.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a price cell, treating empty as missing.
///
/// Only finite numbers are accepted; `inf` or `NaN` spelled out in the
/// file is rejected like any other non-numeric text.
fn parse_price(value: Option<&str>, column: &str, line: u64) -> Result<f64> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CliError::CsvParse {
            message: format!("cannot parse '{trimmed}' as a finite number in column '{column}'"),
            line: Some(line),
        })
}

/// Parse a CSV file into a date-ordered series.
///
/// # Errors
///
/// Returns `CliError::Io` if the file cannot be read, or
/// `CliError::CsvParse` if the CSV is malformed.
pub fn read_series<P: AsRef<Path>>(path: P) -> Result<LoadedSeries> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::io_at(e, path.display().to_string()))?;
    read_series_from_reader(BufReader::new(file))
}

/// Parse CSV data from a reader.
///
/// # Errors
///
/// Returns `CliError::CsvParse` if a required column is missing or a price
/// cell is not numeric.
pub fn read_series_from_reader<R: Read>(reader: R) -> Result<LoadedSeries> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut bars = Vec::new();
    let mut unparsable_dates = 0usize;

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);

        let raw_date = record.get(columns.date).unwrap_or("");
        let Some(date) = parse_date(raw_date) else {
            warn!(line, value = raw_date, "dropping row with unparsable date");
            unparsable_dates += 1;
            continue;
        };

        bars.push(Bar::new(
            date,
            parse_price(record.get(columns.open), "open", line)?,
            parse_price(record.get(columns.high), "high", line)?,
            parse_price(record.get(columns.low), "low", line)?,
            parse_price(record.get(columns.close), "close", line)?,
        ));
    }

    bars.sort_by_key(|bar| bar.date);
    let before = bars.len();
    bars.dedup_by_key(|bar| bar.date);
    let duplicate_dates = before - bars.len();
    if duplicate_dates > 0 {
        warn!(duplicate_dates, "dropping rows with repeated dates");
    }

    debug!(bars = bars.len(), unparsable_dates, "price file loaded");
    Ok(LoadedSeries {
        series: TimeSeries::new(bars),
        unparsable_dates,
        duplicate_dates,
    })
}
