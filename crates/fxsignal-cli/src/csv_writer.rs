//! Processed-data CSV export.
//!
//! One row per bar: the date, the OHLC prices and every computed indicator.
//! Missing values (warm-up gaps, missing prices) are written as empty cells,
//! so every bar of the analysed range appears in the output.
//!
//! Columns, in order:
//!
//! ```text
//! date,open,high,low,close,sma_<w>...,bb_upper,bb_middle,bb_lower,macd,macd_signal,macd_histogram,rsi
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};

use fxsignal::analysis::Analysis;
use fxsignal::series::{IndicatorSeries, TimeSeries};

use crate::error::{CliError, Result};

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// Maps an optional `-o` path to a destination.
    #[must_use]
    pub fn from_arg(path: Option<&str>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_string()))
    }

    /// Create a writer for this output destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout().lock())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::io_at(e, path.clone()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Formats one value, leaving missing values empty.
fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Header row for an analysis.
#[must_use]
pub fn header(analysis: &Analysis) -> Vec<String> {
    let mut columns: Vec<String> = ["date", "open", "high", "low", "close"]
        .iter()
        .map(ToString::to_string)
        .collect();
    columns.extend(analysis.moving_averages.iter().map(|ma| format!("sma_{}", ma.window)));
    columns.extend(
        [
            "bb_upper",
            "bb_middle",
            "bb_lower",
            "macd",
            "macd_signal",
            "macd_histogram",
            "rsi",
        ]
        .iter()
        .map(ToString::to_string),
    );
    columns
}

/// Writes the processed series as CSV.
///
/// # Errors
///
/// Returns `CliError::Export` wrapping any CSV serialization failure and
/// `CliError::Io` if flushing fails.
pub fn write_processed<W: Write>(series: &TimeSeries, analysis: &Analysis, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(header(analysis)).map_err(CliError::Export)?;

    let indicators: Vec<&IndicatorSeries> = analysis
        .moving_averages
        .iter()
        .map(|ma| &ma.values)
        .chain([
            &analysis.bollinger.upper,
            &analysis.bollinger.middle,
            &analysis.bollinger.lower,
            &analysis.macd.macd_line,
            &analysis.macd.signal_line,
            &analysis.macd.histogram,
            &analysis.rsi,
        ])
        .collect();

    for (i, bar) in series.bars().iter().enumerate() {
        let mut row = vec![
            bar.date.format("%Y-%m-%d").to_string(),
            cell(bar.open),
            cell(bar.high),
            cell(bar.low),
            cell(bar.close),
        ];
        row.extend(indicators.iter().map(|s| cell(s.values()[i])));
        writer.write_record(&row).map_err(CliError::Export)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the processed series to a destination.
///
/// # Errors
///
/// Same as [`write_processed`], plus `CliError::Io` if the destination
/// cannot be opened.
pub fn write_to(series: &TimeSeries, analysis: &Analysis, dest: &OutputDest) -> Result<()> {
    write_processed(series, analysis, dest.writer()?)
}
