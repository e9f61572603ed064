//! fxsignal CLI library
//!
//! The I/O collaborators around the `fxsignal` core: CSV ingestion, date
//! filtering, report printing and processed-data export. Exposed as a
//! library so the pieces can be tested without spawning the binary.

pub mod args;
pub mod csv_parser;
pub mod csv_writer;
pub mod error;

pub use error::{CliError, Result};

use std::io::Write;

use fxsignal::analysis::{analyze, Analysis};
use fxsignal::series::{IndicatorSeries, TimeSeries};
use tracing::{debug, info};

use crate::args::{Args, Command, CommonArgs};
use crate::csv_writer::OutputDest;

/// Loads, filters and analyses the input named by `common`.
///
/// # Errors
///
/// Propagates argument, configuration, ingestion and analysis failures.
pub fn load_and_analyze(common: &CommonArgs) -> Result<(TimeSeries, Analysis)> {
    let config = common.analysis_config()?;
    config.validate()?;
    let (from, to) = common.date_range()?;

    let loaded = csv_parser::read_series(&common.input)?;
    let series = match (from, to) {
        (None, None) => loaded.series,
        (from, to) => {
            let start = from.unwrap_or(chrono::NaiveDate::MIN);
            let end = to.unwrap_or(chrono::NaiveDate::MAX);
            loaded.series.between(start, end)
        }
    };
    info!(bars = series.len(), "analysing series");

    let analysis = analyze(&series, &config)?;
    Ok((series, analysis))
}

/// Executes a parsed command, writing human-readable output to `out`.
///
/// `export` without `-o` also writes its CSV to `out`.
///
/// # Errors
///
/// Any [`CliError`] raised while loading, analysing or writing.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let (series, analysis) = load_and_analyze(args.common())?;
    debug!(command = ?args.command, "running command");

    match &args.command {
        Command::Report(_) => write_report(&series, &analysis, out),
        Command::Signal(_) => {
            writeln!(out, "{} ({})", analysis.signal.label, analysis.signal.reason)?;
            Ok(())
        }
        Command::Export { .. } => match OutputDest::from_arg(args.output_path()) {
            OutputDest::Stdout => csv_writer::write_processed(&series, &analysis, out),
            dest => csv_writer::write_to(&series, &analysis, &dest),
        },
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.5}"))
}

fn fmt_latest(series: &IndicatorSeries) -> String {
    fmt_value(series.latest())
}

/// Prints the key metrics, latest indicator values and the signal.
///
/// # Errors
///
/// Returns `CliError::Io` if writing fails.
pub fn write_report<W: Write>(series: &TimeSeries, analysis: &Analysis, out: &mut W) -> Result<()> {
    if let (Some(first), Some(last)) = (series.bars().first(), series.last()) {
        writeln!(out, "Period:        {} to {} ({} bars)", first.date, last.date, series.len())?;
    }
    let metrics = &analysis.metrics;
    writeln!(out, "Highest high:  {:.5}", metrics.highest_high)?;
    writeln!(out, "Lowest low:    {:.5}", metrics.lowest_low)?;
    writeln!(out, "Average range: {:.5}", metrics.average_range)?;
    writeln!(out)?;

    for ma in &analysis.moving_averages {
        let label = format!("SMA({}):", ma.window);
        writeln!(out, "{label:<15}{}", fmt_latest(&ma.values))?;
    }
    writeln!(out, "Upper band:    {}", fmt_latest(&analysis.bollinger.upper))?;
    writeln!(out, "Middle band:   {}", fmt_latest(&analysis.bollinger.middle))?;
    writeln!(out, "Lower band:    {}", fmt_latest(&analysis.bollinger.lower))?;
    writeln!(out, "MACD:          {}", fmt_latest(&analysis.macd.macd_line))?;
    writeln!(out, "Signal line:   {}", fmt_latest(&analysis.macd.signal_line))?;
    writeln!(out, "Histogram:     {}", fmt_latest(&analysis.macd.histogram))?;
    writeln!(out, "RSI:           {}", fmt_latest(&analysis.rsi))?;
    writeln!(out)?;
    writeln!(out, "Signal: {}", analysis.signal.label)?;
    writeln!(out, "Reason: {}", analysis.signal.reason)?;
    Ok(())
}
