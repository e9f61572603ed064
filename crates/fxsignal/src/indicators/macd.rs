//! Moving Average Convergence Divergence (MACD).
//!
//! - **MACD line**: short-span EMA minus long-span EMA of the close
//! - **Signal line**: EMA of the MACD line
//! - **Histogram**: MACD line minus signal line
//!
//! All three EMAs are seeded with their first input, so every component is
//! defined from bar 0 for any non-empty series. Early values are dominated
//! by the seed until enough history accumulates.
//!
//! # Formula
//!
//! ```text
//! MACD[i]      = EMA(close, short)[i] - EMA(close, long)[i]
//! Signal[i]    = EMA(MACD, signal)[i]
//! Histogram[i] = MACD[i] - Signal[i]
//! ```
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::macd::macd;
//!
//! let closes = [100.0_f64, 102.0, 101.0, 105.0];
//! let out = macd(&closes, 12, 26, 9).unwrap();
//! assert_eq!(out.macd_line[0], 0.0);
//! assert!(out.signal_line.iter().all(|v| !v.is_nan()));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::indicators::ema::ema;
use crate::series::{IndicatorSeries, TimeSeries};
use crate::traits::{SeriesElement, ValidatedInput};

/// Leading missing values of every MACD component: always zero.
#[inline]
#[must_use]
pub const fn macd_lookback() -> usize {
    0
}

/// Minimum series length for one defined MACD value.
#[inline]
#[must_use]
pub const fn macd_min_len() -> usize {
    1
}

/// Raw MACD components, each the same length as the input.
#[derive(Debug, Clone)]
pub struct MacdOutput<T> {
    /// Short EMA minus long EMA.
    pub macd_line: Vec<T>,
    /// EMA of the MACD line.
    pub signal_line: Vec<T>,
    /// MACD line minus signal line.
    pub histogram: Vec<T>,
}

impl<T> MacdOutput<T> {
    /// Number of entries per component.
    #[must_use]
    pub fn len(&self) -> usize {
        self.macd_line.len()
    }

    /// Returns `true` if the output is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macd_line.is_empty()
    }
}

fn validate_spans(short: usize, long: usize, signal: usize) -> Result<()> {
    for (span, reason) in [
        (short, "short span must be at least 1"),
        (long, "long span must be at least 1"),
        (signal, "signal span must be at least 1"),
    ] {
        if span == 0 {
            return Err(Error::InvalidPeriod { period: span, reason });
        }
    }
    Ok(())
}

/// Computes the MACD line, signal line and histogram.
///
/// Spans are not required to be ordered; `short >= long` simply yields a
/// line of the opposite sign convention.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if any span is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn macd<T: SeriesElement>(
    data: &[T],
    short: usize,
    long: usize,
    signal: usize,
) -> Result<MacdOutput<T>> {
    validate_spans(short, long, signal)?;
    data.validate_not_empty()?;

    let short_ema = ema(data, short)?;
    let long_ema = ema(data, long)?;

    let macd_line: Vec<T> = short_ema
        .iter()
        .zip(&long_ema)
        .map(|(&s, &l)| s - l)
        .collect();
    let signal_line = ema(&macd_line, signal)?;
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(&m, &s)| m - s)
        .collect();

    Ok(MacdOutput {
        macd_line,
        signal_line,
        histogram,
    })
}

/// Date-aligned MACD components.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    /// Short EMA minus long EMA.
    pub macd_line: IndicatorSeries,
    /// EMA of the MACD line.
    pub signal_line: IndicatorSeries,
    /// MACD line minus signal line.
    pub histogram: IndicatorSeries,
}

/// MACD configuration with fluent setters.
///
/// ```
/// use fxsignal::indicators::macd::Macd;
///
/// let config = Macd::new().short(8).long(21).signal(5);
/// assert_eq!(config.spans(), (8, 21, 5));
/// assert_eq!(Macd::default().spans(), (12, 26, 9));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macd {
    short: usize,
    long: usize,
    signal: usize,
}

impl Default for Macd {
    /// Spans 12, 26, 9.
    fn default() -> Self {
        Self {
            short: 12,
            long: 26,
            signal: 9,
        }
    }
}

impl Macd {
    /// Creates the default configuration (12, 26, 9).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the short EMA span.
    #[must_use]
    pub const fn short(mut self, span: usize) -> Self {
        self.short = span;
        self
    }

    /// Sets the long EMA span.
    #[must_use]
    pub const fn long(mut self, span: usize) -> Self {
        self.long = span;
        self
    }

    /// Sets the signal EMA span.
    #[must_use]
    pub const fn signal(mut self, span: usize) -> Self {
        self.signal = span;
        self
    }

    /// Returns `(short, long, signal)`.
    #[must_use]
    pub const fn spans(&self) -> (usize, usize, usize) {
        (self.short, self.long, self.signal)
    }

    /// Checks the spans without computing anything.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if any span is zero.
    pub fn validate(&self) -> Result<()> {
        validate_spans(self.short, self.long, self.signal)
    }

    /// Computes MACD over raw values.
    ///
    /// # Errors
    ///
    /// Same as [`macd`].
    pub fn compute_values<T: SeriesElement>(&self, data: &[T]) -> Result<MacdOutput<T>> {
        macd(data, self.short, self.long, self.signal)
    }

    /// Computes MACD over the close prices of a series.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` if any span is zero
    /// - `Error::EmptyInput` if the series is empty
    pub fn compute(&self, series: &TimeSeries) -> Result<MacdSeries> {
        self.validate()?;
        let closes = series.closes();
        debug!(
            short = self.short,
            long = self.long,
            signal = self.signal,
            bars = closes.len(),
            "macd"
        );
        let out = self.compute_values(&closes)?;
        Ok(MacdSeries {
            macd_line: series.indicator(out.macd_line),
            signal_line: series.indicator(out.signal_line),
            histogram: series.indicator(out.histogram),
        })
    }
}
