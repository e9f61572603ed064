//! Rolling statistics: simple moving average and sample standard deviation.
//!
//! Both statistics cover the trailing `window` observations ending at each
//! bar, inclusive. Bars `0..window-1` have insufficient history and are
//! missing.
//!
//! # Algorithm
//!
//! - **Mean**: every window is summed fresh. A running add-new/subtract-old
//!   sum cancels catastrophically once a large value leaves the window.
//! - **Standard deviation**: every window is folded into a fresh Welford
//!   accumulator and read with Bessel's correction (÷ `window - 1`).
//!
//! Windows share no state, so both statistics are evaluated in parallel when
//! the `parallel` feature is enabled, with bit-identical results to the
//! sequential path. A `NaN` poisons exactly the windows containing it.
//!
//! # Formula
//!
//! ```text
//! mean[i]   = (x[i-w+1] + ... + x[i]) / w
//! stddev[i] = sqrt(sum((x[j] - mean[i])^2 for j in i-w+1..=i) / (w - 1))
//! ```
//!
//! A window of 1 has a mean but no sample standard deviation; its stddev
//! output is entirely missing.
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::rolling::{sma, rolling_stddev};
//!
//! let closes = [100.0_f64, 102.0, 101.0, 105.0];
//! let mean = sma(&closes, 3).unwrap();
//! assert!(mean[1].is_nan());
//! assert_eq!(mean[2], 101.0);
//!
//! let sd = rolling_stddev(&closes, 3).unwrap();
//! assert!((sd[2] - 1.0).abs() < 1e-12);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::series::{IndicatorSeries, PriceField, TimeSeries};
use crate::traits::{validate_kernel_input, validate_period, SeriesElement, ValidatedInput};

/// Leading missing values of a rolling statistic with this window.
#[inline]
#[must_use]
pub const fn rolling_lookback(window: usize) -> usize {
    window.saturating_sub(1)
}

/// Minimum series length for one defined rolling value.
#[inline]
#[must_use]
pub const fn rolling_min_len(window: usize) -> usize {
    window
}

/// Welford accumulator for mean and variance.
///
/// Numerically stable single-pass mean and variance, used to evaluate each
/// rolling window independently.
///
/// ```
/// use fxsignal::indicators::rolling::RunningStat;
///
/// let mut stat = RunningStat::<f64>::new();
/// for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stat.update(x);
/// }
/// assert!((stat.mean() - 5.0).abs() < 1e-12);
/// assert!((stat.sample_variance() - 32.0 / 7.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RunningStat<T> {
    count: usize,
    mean: T,
    m2: T,
}

impl<T: SeriesElement> Default for RunningStat<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> RunningStat<T> {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: T::nan(),
            m2: T::zero(),
        }
    }

    /// Adds one observation. A `NaN` poisons the accumulator.
    pub fn update(&mut self, value: T) {
        if value.is_nan() {
            self.mean = T::nan();
            self.m2 = T::nan();
            self.count += 1;
            return;
        }
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.m2 = T::zero();
            return;
        }
        let Ok(n) = T::from_usize(self.count) else {
            self.mean = T::nan();
            return;
        };
        let delta = value - self.mean;
        self.mean = self.mean + delta / n;
        self.m2 = self.m2 + delta * (value - self.mean);
    }

    /// Number of observations seen.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Running mean, `NaN` when empty.
    #[must_use]
    pub fn mean(&self) -> T {
        self.mean
    }

    /// Sample variance (Bessel's correction), `NaN` below two observations.
    #[must_use]
    pub fn sample_variance(&self) -> T {
        if self.count < 2 {
            return T::nan();
        }
        match T::from_usize(self.count - 1) {
            // Rounding can leave m2 a hair below zero on flat windows.
            Ok(dof) => (self.m2 / dof).max(T::zero()),
            Err(_) => T::nan(),
        }
    }

    /// Sample standard deviation.
    #[must_use]
    pub fn sample_stddev(&self) -> T {
        self.sample_variance().sqrt()
    }
}

/// Arithmetic mean of one complete window; `NaN` if any value is missing.
#[inline]
fn window_mean<T: SeriesElement>(window: &[T], window_t: T) -> T {
    window.iter().fold(T::zero(), |acc, &x| acc + x) / window_t
}

/// Computes the simple moving average of a series.
///
/// Returns a vector of the same length as the input. The first
/// `window - 1` values are missing; an input shorter than the window yields
/// an entirely missing output.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `window` is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn sma<T: SeriesElement>(data: &[T], window: usize) -> Result<Vec<T>> {
    validate_kernel_input(data, window)?;

    let mut result = vec![T::nan(); data.len()];
    if data.len() < window {
        return Ok(result);
    }
    let window_t = T::from_usize(window)?;

    #[cfg(feature = "parallel")]
    let defined: Vec<T> = data
        .par_windows(window)
        .map(|w| window_mean(w, window_t))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let defined: Vec<T> = data.windows(window).map(|w| window_mean(w, window_t)).collect();

    result[window - 1..].copy_from_slice(&defined);
    Ok(result)
}

/// Sample standard deviation of one complete window.
#[inline]
fn window_stddev<T: SeriesElement>(window: &[T]) -> T {
    let mut stat = RunningStat::new();
    for &value in window {
        stat.update(value);
    }
    stat.sample_stddev()
}

/// Computes the rolling sample standard deviation (÷ `window - 1`).
///
/// Same alignment and warm-up as [`sma`]. With `window == 1` every output
/// is missing, since a single observation has no sample deviation.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `window` is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn rolling_stddev<T: SeriesElement>(data: &[T], window: usize) -> Result<Vec<T>> {
    validate_kernel_input(data, window)?;

    let mut result = vec![T::nan(); data.len()];
    if data.len() < window || window < 2 {
        return Ok(result);
    }

    let first = window - 1;

    #[cfg(feature = "parallel")]
    let defined: Vec<T> = (first..data.len())
        .into_par_iter()
        .map(|end| window_stddev(&data[end + 1 - window..=end]))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let defined: Vec<T> = data.windows(window).map(window_stddev).collect();

    result[first..].copy_from_slice(&defined);
    Ok(result)
}

/// Mean and standard deviation over the same rolling window.
#[derive(Debug, Clone)]
pub struct RollingStatsOutput<T> {
    /// Rolling arithmetic mean.
    pub mean: Vec<T>,
    /// Rolling sample standard deviation.
    pub stddev: Vec<T>,
}

/// Computes the rolling mean and sample standard deviation together.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `window` is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn rolling_stats<T: SeriesElement>(data: &[T], window: usize) -> Result<RollingStatsOutput<T>> {
    Ok(RollingStatsOutput {
        mean: sma(data, window)?,
        stddev: rolling_stddev(data, window)?,
    })
}

/// Date-aligned rolling mean and standard deviation.
#[derive(Debug, Clone)]
pub struct RollingStatsSeries {
    /// Rolling arithmetic mean.
    pub mean: IndicatorSeries,
    /// Rolling sample standard deviation.
    pub stddev: IndicatorSeries,
}

/// Rolling statistics engine over a [`TimeSeries`] field.
///
/// ```
/// use chrono::NaiveDate;
/// use fxsignal::indicators::rolling::RollingStats;
/// use fxsignal::series::{Bar, TimeSeries};
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let series: TimeSeries = [100.0, 102.0, 101.0, 105.0]
///     .iter()
///     .zip(start.iter_days())
///     .map(|(&c, date)| Bar::new(date, c, c, c, c))
///     .collect();
///
/// let stats = RollingStats::new().window(3).compute(&series).unwrap();
/// assert_eq!(stats.mean.get(1), None);
/// assert_eq!(stats.mean.get(2), Some(101.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingStats {
    window: usize,
    field: PriceField,
}

impl Default for RollingStats {
    /// Window 20 on close prices.
    fn default() -> Self {
        Self {
            window: 20,
            field: PriceField::Close,
        }
    }
}

impl RollingStats {
    /// Creates the default configuration (window 20, close).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window size.
    #[must_use]
    pub const fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the price field the statistics run over.
    #[must_use]
    pub const fn field(mut self, field: PriceField) -> Self {
        self.field = field;
        self
    }

    /// Returns the window size.
    #[must_use]
    pub const fn get_window(&self) -> usize {
        self.window
    }

    /// Returns the selected price field.
    #[must_use]
    pub const fn get_field(&self) -> PriceField {
        self.field
    }

    /// Computes the rolling mean and standard deviation.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` if the window is zero
    /// - `Error::EmptyInput` if the series is empty
    /// - `Error::InsufficientData` if the series is shorter than the window
    pub fn compute(&self, series: &TimeSeries) -> Result<RollingStatsSeries> {
        validate_period(self.window)?;
        let data = series.field(self.field);
        data.validate_not_empty()?;
        data.validate_min_length(rolling_min_len(self.window), "rolling_stats")?;

        debug!(window = self.window, field = ?self.field, bars = data.len(), "rolling stats");
        let out = rolling_stats(&data, self.window)?;
        Ok(RollingStatsSeries {
            mean: series.indicator(out.mean),
            stddev: series.indicator(out.stddev),
        })
    }
}

/// Simple moving average of close prices as a date-aligned series.
///
/// # Errors
///
/// Same as [`RollingStats::compute`].
pub fn moving_average(series: &TimeSeries, window: usize) -> Result<IndicatorSeries> {
    validate_period(window)?;
    let closes = series.closes();
    closes.validate_not_empty()?;
    closes.validate_min_length(rolling_min_len(window), "sma")?;
    Ok(series.indicator(sma(&closes, window)?))
}
