//! Bollinger Bands.
//!
//! Volatility bands placed `k` sample standard deviations above and below a
//! simple moving average.
//!
//! # Formula
//!
//! ```text
//! Middle = SMA(close, window)
//! Upper  = Middle + k × StdDev(close, window)
//! Lower  = Middle - k × StdDev(close, window)
//! ```
//!
//! The standard deviation uses the sample divisor (`window - 1`), so the
//! window must be at least 2. Bands share the rolling warm-up gap: the
//! first `window - 1` bars are missing.
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::bollinger::bollinger;
//!
//! let data = [2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! let bands = bollinger(&data, 3, 2.0).unwrap();
//! assert!(bands.upper[1].is_nan());
//! assert!(bands.lower[7] <= bands.middle[7] && bands.middle[7] <= bands.upper[7]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::indicators::rolling::{rolling_lookback, rolling_min_len, rolling_stats, RollingStatsOutput};
use crate::series::{IndicatorSeries, TimeSeries};
use crate::traits::{SeriesElement, ValidatedInput};

/// Leading missing values of the bands.
#[inline]
#[must_use]
pub const fn bollinger_lookback(window: usize) -> usize {
    rolling_lookback(window)
}

/// Minimum series length for one defined band value.
#[inline]
#[must_use]
pub const fn bollinger_min_len(window: usize) -> usize {
    rolling_min_len(window)
}

/// Raw band values, each the same length as the input.
#[derive(Debug, Clone)]
pub struct BollingerOutput<T> {
    /// Rolling mean.
    pub middle: Vec<T>,
    /// `middle + k × stddev`.
    pub upper: Vec<T>,
    /// `middle - k × stddev`.
    pub lower: Vec<T>,
}

fn validate_window(window: usize) -> Result<()> {
    if window < 2 {
        return Err(Error::InvalidPeriod {
            period: window,
            reason: "bollinger window must be at least 2",
        });
    }
    Ok(())
}

fn validate_multiplier(k: f64) -> Result<()> {
    if !k.is_finite() || k < 0.0 {
        return Err(Error::InvalidParameter {
            name: "multiplier",
            reason: "band multiplier must be finite and non-negative",
        });
    }
    Ok(())
}

/// Derives bands from precomputed rolling statistics.
///
/// Missing mean or deviation values propagate to both bands.
#[must_use]
pub fn bands_from_stats<T: SeriesElement>(stats: RollingStatsOutput<T>, k: T) -> BollingerOutput<T> {
    let (upper, lower) = stats
        .mean
        .iter()
        .zip(&stats.stddev)
        .map(|(&mean, &sd)| {
            let offset = k * sd;
            (mean + offset, mean - offset)
        })
        .unzip();
    BollingerOutput {
        middle: stats.mean,
        upper,
        lower,
    }
}

/// Computes Bollinger Bands over a slice.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `window < 2`
/// - `Error::InvalidParameter` if `k` is negative or not finite
/// - `Error::EmptyInput` if `data` is empty
pub fn bollinger<T: SeriesElement>(data: &[T], window: usize, k: T) -> Result<BollingerOutput<T>> {
    validate_window(window)?;
    validate_multiplier(k.to_f64_lossy())?;
    let stats = rolling_stats(data, window)?;
    Ok(bands_from_stats(stats, k))
}

/// Date-aligned Bollinger Bands.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    /// Rolling mean.
    pub middle: IndicatorSeries,
    /// Upper band.
    pub upper: IndicatorSeries,
    /// Lower band.
    pub lower: IndicatorSeries,
}

/// Bollinger Bands configuration.
///
/// ```
/// use fxsignal::indicators::bollinger::Bollinger;
///
/// let config = Bollinger::new().window(10).multiplier(1.5);
/// assert_eq!(config.get_window(), 10);
/// assert_eq!(config.get_multiplier(), 1.5);
/// assert_eq!(Bollinger::default().get_window(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bollinger {
    window: usize,
    multiplier: f64,
}

impl Default for Bollinger {
    /// Window 20, multiplier 2.
    fn default() -> Self {
        Self {
            window: 20,
            multiplier: 2.0,
        }
    }
}

impl Bollinger {
    /// Creates the default configuration (window 20, multiplier 2).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rolling window.
    #[must_use]
    pub const fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the standard-deviation multiplier.
    #[must_use]
    pub const fn multiplier(mut self, k: f64) -> Self {
        self.multiplier = k;
        self
    }

    /// Returns the rolling window.
    #[must_use]
    pub const fn get_window(&self) -> usize {
        self.window
    }

    /// Returns the standard-deviation multiplier.
    #[must_use]
    pub const fn get_multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Leading missing values for this configuration.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        bollinger_lookback(self.window)
    }

    /// Minimum series length for this configuration.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        bollinger_min_len(self.window)
    }

    /// Checks the parameters without computing anything.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` if the window is below 2
    /// - `Error::InvalidParameter` if the multiplier is negative or not finite
    pub fn validate(&self) -> Result<()> {
        validate_window(self.window)?;
        validate_multiplier(self.multiplier)
    }

    /// Computes the bands over close prices.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` / `Error::InvalidParameter` per [`validate`](Self::validate)
    /// - `Error::EmptyInput` if the series is empty
    /// - `Error::InsufficientData` if the series is shorter than the window
    pub fn compute(&self, series: &TimeSeries) -> Result<BollingerBands> {
        self.validate()?;
        let closes = series.closes();
        closes.validate_not_empty()?;
        closes.validate_min_length(self.min_len(), "bollinger")?;

        debug!(window = self.window, multiplier = self.multiplier, bars = closes.len(), "bollinger");
        let out = bollinger(&closes, self.window, self.multiplier)?;
        Ok(BollingerBands {
            middle: series.indicator(out.middle),
            upper: series.indicator(out.upper),
            lower: series.indicator(out.lower),
        })
    }
}
