//! CLI argument parsing module.
//!
//! The CLI follows the pattern: `fxsignal <command> <input.csv> [options]`
//!
//! # Examples
//!
//! ```bash
//! # Signal, key metrics and latest indicator values
//! fxsignal report prices.csv
//!
//! # Same, restricted to 2023
//! fxsignal report prices.csv --from 2023-01-01 --to 2023-12-31
//!
//! # Just the signal label
//! fxsignal signal prices.csv --rsi-window 21
//!
//! # Processed data with every indicator column
//! fxsignal export prices.csv -o processed.csv
//!
//! # Parameters from a JSON file, MACD overridden on the command line
//! fxsignal report prices.csv --config analysis.json --macd 8,21,5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use fxsignal::config::AnalysisConfig;

use crate::csv_parser::parse_date;
use crate::error::{CliError, Result};

/// fxsignal: technical indicators and trading signals for daily OHLC data
#[derive(Parser, Debug)]
#[command(name = "fxsignal")]
#[command(author, version, about = "Technical indicators and trading signals for daily OHLC data")]
#[command(long_about = "fxsignal reads a daily OHLC price file, computes moving averages, \
    Bollinger Bands, MACD and RSI, and classifies the latest bar as Buy, Sell or Neutral. \
    Logging goes to stderr and is controlled with RUST_LOG.")]
pub struct Args {
    /// The action to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print key metrics, latest indicator values and the signal
    Report(CommonArgs),

    /// Print the signal label and reason only
    Signal(CommonArgs),

    /// Write the processed data with every indicator column as CSV
    Export {
        /// Shared options
        #[command(flatten)]
        common: CommonArgs,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Options shared by every command.
#[derive(ClapArgs, Debug, Clone)]
pub struct CommonArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// JSON file with analysis parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Moving-average windows, comma separated (e.g., 7,30)
    #[arg(long)]
    pub ma: Option<String>,

    /// Bollinger parameters: window,multiplier (e.g., 20,2.0)
    #[arg(long)]
    pub bollinger: Option<String>,

    /// MACD spans: short,long,signal (e.g., 12,26,9)
    #[arg(long)]
    pub macd: Option<String>,

    /// RSI window
    #[arg(long)]
    pub rsi_window: Option<usize>,

    /// RSI oversold threshold
    #[arg(long)]
    pub oversold: Option<f64>,

    /// RSI overbought threshold
    #[arg(long)]
    pub overbought: Option<f64>,
}

impl Args {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Options shared by every command.
    #[must_use]
    pub fn common(&self) -> &CommonArgs {
        match &self.command {
            Command::Report(common) | Command::Signal(common) => common,
            Command::Export { common, .. } => common,
        }
    }

    /// Output path for `export`, if given.
    #[must_use]
    pub fn output_path(&self) -> Option<&str> {
        match &self.command {
            Command::Export { output, .. } => output.as_deref(),
            Command::Report(_) | Command::Signal(_) => None,
        }
    }
}

impl CommonArgs {
    /// Builds the analysis configuration: defaults, then the config file,
    /// then individual flags.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for an unreadable config file and
    /// `CliError::InvalidArgument` for malformed flags.
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(ma) = &self.ma {
            config.moving_average_windows = parse_windows(ma)?;
        }
        if let Some(params) = &self.bollinger {
            let (window, k) = parse_bollinger_params(params)?;
            config.bollinger = config.bollinger.window(window).multiplier(k);
        }
        if let Some(params) = &self.macd {
            let (short, long, signal) = parse_macd_params(params)?;
            config.macd = config.macd.short(short).long(long).signal(signal);
        }
        if let Some(window) = self.rsi_window {
            config.rsi = config.rsi.window(window);
        }
        if let Some(oversold) = self.oversold {
            config.thresholds.oversold = oversold;
        }
        if let Some(overbought) = self.overbought {
            config.thresholds.overbought = overbought;
        }
        Ok(config)
    }

    /// Parsed `--from` / `--to` bounds.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` if a bound is not a date or the
    /// range is inverted.
    pub fn date_range(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        let from = self.from.as_deref().map(|v| parse_bound("from", v)).transpose()?;
        let to = self.to.as_deref().map(|v| parse_bound("to", v)).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(CliError::InvalidArgument {
                    argument: "from".to_string(),
                    reason: format!("start date {from} is after end date {to}"),
                    suggestion: Some("Swap --from and --to".to_string()),
                });
            }
        }
        Ok((from, to))
    }
}

fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| CliError::io_at(e, display.clone()))?;
    serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: display,
        source,
    })
}

fn parse_bound(argument: &str, value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| CliError::InvalidArgument {
        argument: argument.to_string(),
        reason: format!("cannot parse '{value}' as a date"),
        suggestion: Some("Use YYYY-MM-DD (e.g., 2024-01-31)".to_string()),
    })
}

fn parse_usize(argument: &str, value: &str, example: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|_| CliError::InvalidArgument {
        argument: argument.to_string(),
        reason: format!("cannot parse '{}' as integer", value.trim()),
        suggestion: Some(format!("Use a positive integer like {example}")),
    })
}

/// Parse comma-separated moving-average windows.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an empty list or a non-integer.
pub fn parse_windows(params: &str) -> Result<Vec<usize>> {
    if params.trim().is_empty() {
        return Err(CliError::InvalidArgument {
            argument: "ma".to_string(),
            reason: "no windows given".to_string(),
            suggestion: Some("Use a comma-separated list like 7,30".to_string()),
        });
    }
    params.split(',').map(|part| parse_usize("ma", part, "7")).collect()
}

/// Parse MACD parameters from a comma-separated string.
///
/// Expected format: "short,long,signal" (e.g., "12,26,9"). Zero spans are
/// rejected later by the analysis configuration.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for the wrong count or a non-integer.
pub fn parse_macd_params(params: &str) -> Result<(usize, usize, usize)> {
    let parts: Vec<&str> = params.split(',').collect();
    if parts.len() != 3 {
        return Err(CliError::InvalidArgument {
            argument: "macd".to_string(),
            reason: format!("MACD requires 3 parameters, got {}", parts.len()),
            suggestion: Some("Use format: short,long,signal (e.g., 12,26,9)".to_string()),
        });
    }
    Ok((
        parse_usize("macd short span", parts[0], "12")?,
        parse_usize("macd long span", parts[1], "26")?,
        parse_usize("macd signal span", parts[2], "9")?,
    ))
}

/// Parse Bollinger Bands parameters from a comma-separated string.
///
/// Expected format: "window,multiplier" (e.g., "20,2.0").
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for the wrong count or unparsable
/// values.
pub fn parse_bollinger_params(params: &str) -> Result<(usize, f64)> {
    let parts: Vec<&str> = params.split(',').collect();
    if parts.len() != 2 {
        return Err(CliError::InvalidArgument {
            argument: "bollinger".to_string(),
            reason: format!("Bollinger requires 2 parameters, got {}", parts.len()),
            suggestion: Some("Use format: window,multiplier (e.g., 20,2.0)".to_string()),
        });
    }
    let window = parse_usize("bollinger window", parts[0], "20")?;
    let multiplier = parts[1].trim().parse::<f64>().map_err(|_| CliError::InvalidArgument {
        argument: "bollinger multiplier".to_string(),
        reason: format!("cannot parse '{}' as number", parts[1].trim()),
        suggestion: Some("Use a non-negative number like 2.0".to_string()),
    })?;
    Ok((window, multiplier))
}
