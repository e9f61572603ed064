//! Relative Strength Index (RSI).
//!
//! A 0–100 momentum oscillator comparing average gains to average losses
//! over a window. Averages are simple rolling means of the per-bar gains
//! and losses, so the first defined value appears at bar `window`: bar 0
//! has no price change and every window touching it is incomplete.
//!
//! # Formula
//!
//! ```text
//! delta[i] = close[i] - close[i-1]            (i >= 1)
//! gain[i]  = max(delta[i], 0)
//! loss[i]  = max(-delta[i], 0)
//! RS       = mean(gain, window) / mean(loss, window)
//! RSI      = 100 - 100 / (1 + RS)
//! ```
//!
//! # Degenerate averages
//!
//! | avg gain | avg loss | RSI |
//! |----------|----------|-----|
//! | > 0      | 0        | 100 |
//! | 0        | 0        | 50  |
//! | 0        | > 0      | 0   |
//!
//! Each window's sums are folded fresh from its own terms. A running
//! add-and-subtract sum would leave rounding residue from rolled-out terms,
//! turning a flat window into a tiny ratio or pushing the RSI below zero.
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::rsi::rsi;
//!
//! let rising: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
//! let out = rsi(&rising, 14).unwrap();
//! assert!(out[13].is_nan());
//! assert_eq!(out[14], 100.0);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::series::{IndicatorSeries, TimeSeries};
use crate::traits::{validate_kernel_input, validate_period, SeriesElement, ValidatedInput};

/// Leading missing values of an RSI with the given window.
#[inline]
#[must_use]
pub const fn rsi_lookback(window: usize) -> usize {
    window
}

/// Minimum series length for one defined RSI value.
#[inline]
#[must_use]
pub const fn rsi_min_len(window: usize) -> usize {
    window + 1
}

/// Maps average gain and loss to an RSI value.
///
/// Never divides by zero: see the table in the module docs.
#[inline]
#[must_use]
pub fn rsi_value<T: SeriesElement>(avg_gain: T, avg_loss: T) -> T {
    let zero = T::zero();
    if avg_loss == zero {
        if avg_gain == zero {
            T::fifty()
        } else {
            T::hundred()
        }
    } else if avg_gain == zero {
        zero
    } else {
        let rs = avg_gain / avg_loss;
        T::hundred() - T::hundred() / (T::one() + rs)
    }
}

/// Splits a price change into `(gain, loss)`, both `NaN` when undefined.
#[inline]
fn split_delta<T: SeriesElement>(delta: T) -> (T, T) {
    if delta.is_nan() {
        (T::nan(), T::nan())
    } else {
        (delta.max(T::zero()), (-delta).max(T::zero()))
    }
}

/// RSI of one complete window of `(gain, loss)` pairs.
///
/// Both sums only accumulate non-negative terms, so neither can drift below
/// zero and the result stays within 0–100.
#[inline]
fn window_rsi<T: SeriesElement>(window: &[(T, T)], window_t: T) -> T {
    let mut gain_sum = T::zero();
    let mut loss_sum = T::zero();
    for &(gain, loss) in window {
        if gain.is_nan() {
            return T::nan();
        }
        gain_sum = gain_sum + gain;
        loss_sum = loss_sum + loss;
    }
    rsi_value(gain_sum / window_t, loss_sum / window_t)
}

/// Computes the RSI with simple rolling averages of gains and losses.
///
/// Bars `0..window` are missing; an input of `window` bars or fewer yields
/// an entirely missing output. A window containing a missing price change
/// is missing.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `window` is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn rsi<T: SeriesElement>(data: &[T], window: usize) -> Result<Vec<T>> {
    validate_kernel_input(data, window)?;

    let mut result = vec![T::nan(); data.len()];
    if data.len() < rsi_min_len(window) {
        return Ok(result);
    }

    // deltas[j] is the change into bar j + 1
    let deltas: Vec<(T, T)> = data
        .windows(2)
        .map(|pair| split_delta(pair[1] - pair[0]))
        .collect();
    let window_t = T::from_usize(window)?;

    #[cfg(feature = "parallel")]
    let defined: Vec<T> = deltas
        .par_windows(window)
        .map(|w| window_rsi(w, window_t))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let defined: Vec<T> = deltas.windows(window).map(|w| window_rsi(w, window_t)).collect();

    result[window..].copy_from_slice(&defined);
    Ok(result)
}

/// RSI configuration.
///
/// ```
/// use fxsignal::indicators::rsi::Rsi;
///
/// assert_eq!(Rsi::default().get_window(), 14);
/// assert_eq!(Rsi::new().window(7).lookback(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rsi {
    window: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { window: 14 }
    }
}

impl Rsi {
    /// Creates the default configuration (window 14).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the averaging window.
    #[must_use]
    pub const fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Returns the averaging window.
    #[must_use]
    pub const fn get_window(&self) -> usize {
        self.window
    }

    /// Leading missing values for this configuration.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        rsi_lookback(self.window)
    }

    /// Minimum series length for this configuration.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        rsi_min_len(self.window)
    }

    /// Computes the RSI of close prices.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` if the window is zero
    /// - `Error::EmptyInput` if the series is empty
    /// - `Error::InsufficientData` if the series has `window` bars or fewer
    pub fn compute(&self, series: &TimeSeries) -> Result<IndicatorSeries> {
        validate_period(self.window)?;
        let closes = series.closes();
        closes.validate_not_empty()?;
        closes.validate_min_length(self.min_len(), "rsi")?;
        debug!(window = self.window, bars = closes.len(), "rsi");
        Ok(series.indicator(rsi(&closes, self.window)?))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::series::Bar;
    use crate::utils::{approx_eq, EPSILON};
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        closes
            .iter()
            .zip(start.iter_days())
            .map(|(&c, d)| Bar::new(d, c, c, c, c))
            .collect()
    }

    /// Reference RSI computed from scratch for each bar.
    fn naive_rsi(data: &[f64], window: usize) -> Vec<f64> {
        (0..data.len())
            .map(|i| {
                if i < window {
                    return f64::NAN;
                }
                let (mut g, mut l) = (0.0, 0.0);
                for k in i + 1 - window..=i {
                    let d = data[k] - data[k - 1];
                    g += d.max(0.0);
                    l += (-d).max(0.0);
                }
                rsi_value(g / window as f64, l / window as f64)
            })
            .collect()
    }

    #[test]
    fn test_rsi_value_policy() {
        assert_eq!(rsi_value(1.5_f64, 0.0), 100.0);
        assert_eq!(rsi_value(0.0_f64, 0.0), 50.0);
        assert_eq!(rsi_value(0.0_f64, 2.0), 0.0);
        assert!(approx_eq(rsi_value(1.0_f64, 1.0), 50.0, EPSILON));
        assert!(approx_eq(rsi_value(3.0_f64, 1.0), 75.0, EPSILON));
    }

    #[test]
    fn test_rsi_strictly_increasing_is_100() {
        let data: Vec<f64> = (0..40).map(|i| 50.0 + i as f64 * 0.25).collect();
        let out = rsi(&data, 14).unwrap();
        for (i, v) in out.iter().enumerate() {
            if i < 14 {
                assert!(v.is_nan(), "bar {i} should be missing");
            } else {
                assert_eq!(*v, 100.0, "bar {i}");
            }
        }
    }

    #[test]
    fn test_rsi_flat_is_50() {
        let out = rsi(&[1.2345_f64; 30], 14).unwrap();
        assert!(out[14..].iter().all(|&v| v == 50.0));
        assert!(out[..14].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rsi_strictly_decreasing_is_0() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&data, 5).unwrap();
        assert!(out[5..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rsi_flat_after_move_is_exactly_50() {
        // Non-representable increments roll out of the window before the
        // flat tail is evaluated.
        let mut data: Vec<f64> = (0..10).map(|i| 1.1 + i as f64 * 0.1).collect();
        data.extend(std::iter::repeat(2.0).take(10));
        let out = rsi(&data, 3).unwrap();
        assert_eq!(out[19], 50.0);
        assert_eq!(out[16], 50.0);
    }

    #[test]
    fn test_rsi_matches_naive() {
        let data: Vec<f64> = (0..120)
            .map(|i| 100.0 + (i as f64 * 0.35).sin() * 3.0 + (i as f64 * 0.11).cos())
            .collect();
        let fast = rsi(&data, 14).unwrap();
        let slow = naive_rsi(&data, 14);
        for (i, (a, b)) in fast.iter().zip(&slow).enumerate() {
            assert!(approx_eq(*a, *b, 1e-8), "bar {i}: {a} vs {b}");
        }
    }

    #[test]
    fn test_rsi_bounded() {
        let data: Vec<f64> = (0..200).map(|i| 80.0 + ((i * 37) % 23) as f64).collect();
        let out = rsi(&data, 9).unwrap();
        for v in out.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn test_rsi_bounded_after_large_move_rolls_out() {
        // A jump of 1e6 followed by tiny moves: rolled-out terms must not
        // leave residue that drags a side's average below zero.
        let tiny = 2.0_f64.powi(-36);
        for k in 0..4000 {
            let c = f64::from(k) * 2.0_f64.powi(-44);
            let data = [
                0.0,
                1e6,
                0.5,
                0.5 + tiny,
                0.5 + tiny + c,
                0.2,
                0.2 + 1e-15,
                0.1,
                0.05,
                0.01,
            ];
            let out = rsi(&data, 4).unwrap();
            for (bar, v) in out.iter().enumerate().filter(|(_, v)| !v.is_nan()) {
                assert!((0.0..=100.0).contains(v), "k {k} bar {bar} rsi {v}");
            }
        }
    }

    #[test]
    fn test_rsi_short_input_all_missing() {
        let out = rsi(&[1.0_f64, 2.0, 3.0], 3).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
        let out = rsi(&[1.0_f64, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(out[3], 100.0);
    }

    #[test]
    fn test_rsi_missing_price_blanks_windows() {
        let data = [1.0_f64, 2.0, f64::NAN, 3.0, 4.0, 5.0, 6.0, 7.0];
        let out = rsi(&data, 2).unwrap();
        // deltas into bars 2 and 3 are undefined
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert!(out[4].is_nan());
        assert_eq!(out[5], 100.0);
    }

    #[test]
    fn test_rsi_errors() {
        assert!(matches!(rsi(&[1.0_f64], 0), Err(Error::InvalidPeriod { .. })));
        assert_eq!(rsi::<f64>(&[], 14), Err(Error::EmptyInput));
    }

    #[test]
    fn test_rsi_engine() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 4) as f64).collect();
        let series = make_series(&closes);
        let out = Rsi::default().compute(&series).unwrap();
        assert_eq!(out.len(), 30);
        assert_eq!(out.first_defined_index(), Some(14));
        assert!(out.latest().is_some());
    }

    #[test]
    fn test_rsi_engine_insufficient_data() {
        let series = make_series(&[1.0; 14]);
        assert!(matches!(
            Rsi::default().compute(&series),
            Err(Error::InsufficientData {
                required: 15,
                actual: 14,
                indicator: "rsi"
            })
        ));
    }

    #[test]
    fn test_lookback_helpers() {
        assert_eq!(rsi_lookback(14), 14);
        assert_eq!(rsi_min_len(14), 15);
    }
}
