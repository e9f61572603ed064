//! Exponential Moving Average (EMA).
//!
//! Recursive smoothing with factor `α = 2 / (span + 1)`, seeded with the
//! first observed value. Unlike the simple moving average there is no
//! warm-up gap: the output is defined from bar 0.
//!
//! # Formula
//!
//! ```text
//! EMA[0] = x[0]
//! EMA[i] = α × x[i] + (1 - α) × EMA[i-1]
//! ```
//!
//! # Ordering
//!
//! Every output depends on the whole prefix, so the series is consumed
//! strictly in ascending order as a prefix scan over [`ExponentialSmoother`]
//! state. [`crate::kernels::scan`] holds the associative reformulation used
//! for the parallel variant.
//!
//! # Missing inputs
//!
//! Leading missing values stay missing and the seed is the first defined
//! value. A missing value after seeding yields a missing output and leaves
//! the smoother state untouched.
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::ema::ema;
//!
//! let result = ema(&[10.0_f64, 11.0, 12.0], 3).unwrap();
//! assert_eq!(result[0], 10.0);
//! assert_eq!(result[1], 10.5); // 0.5 × 11 + 0.5 × 10
//! assert_eq!(result[2], 11.25);
//! ```

use tracing::debug;

use crate::error::{Error, Result};
use crate::series::{IndicatorSeries, TimeSeries};
use crate::traits::{validate_kernel_input, validate_period, SeriesElement, ValidatedInput};

/// Leading missing values of an EMA: always zero.
#[inline]
#[must_use]
pub const fn ema_lookback(_span: usize) -> usize {
    0
}

/// Minimum series length for one defined EMA value.
#[inline]
#[must_use]
pub const fn ema_min_len(_span: usize) -> usize {
    1
}

/// Standard smoothing factor `α = 2 / (span + 1)`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `span` is zero.
pub fn ema_alpha<T: SeriesElement>(span: usize) -> Result<T> {
    validate_period(span)?;
    let span_plus_one = T::from_usize(span + 1)?;
    Ok(T::two() / span_plus_one)
}

/// Recursive EMA state.
///
/// ```
/// use fxsignal::indicators::ema::ExponentialSmoother;
///
/// let mut smoother = ExponentialSmoother::<f64>::new(3).unwrap();
/// assert_eq!(smoother.update(10.0), 10.0);
/// assert_eq!(smoother.update(12.0), 11.0);
/// assert_eq!(smoother.current(), Some(11.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExponentialSmoother<T> {
    alpha: T,
    state: Option<T>,
}

impl<T: SeriesElement> ExponentialSmoother<T> {
    /// Creates a smoother for the given span.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if `span` is zero.
    pub fn new(span: usize) -> Result<Self> {
        Ok(Self {
            alpha: ema_alpha(span)?,
            state: None,
        })
    }

    /// Creates a smoother with an explicit smoothing factor.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` unless `0 < alpha <= 1`.
    pub fn with_alpha(alpha: T) -> Result<Self> {
        if !(alpha > T::zero() && alpha <= T::one()) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                reason: "smoothing factor must lie in (0, 1]",
            });
        }
        Ok(Self { alpha, state: None })
    }

    /// The smoothing factor.
    #[must_use]
    pub fn alpha(&self) -> T {
        self.alpha
    }

    /// Current EMA, `None` before the first defined observation.
    #[must_use]
    pub fn current(&self) -> Option<T> {
        self.state
    }

    /// Folds one observation into the average and returns the new value.
    ///
    /// Returns `NaN` for a missing observation.
    pub fn update(&mut self, value: T) -> T {
        if value.is_nan() {
            return T::nan();
        }
        let next = match self.state {
            None => value,
            Some(prev) => self.alpha * value + (T::one() - self.alpha) * prev,
        };
        self.state = Some(next);
        next
    }

    /// Clears the state; the next observation becomes the new seed.
    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Computes the EMA of a series with smoothing factor `2 / (span + 1)`.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `span` is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn ema<T: SeriesElement>(data: &[T], span: usize) -> Result<Vec<T>> {
    validate_kernel_input(data, span)?;
    Ok(scan_smoother(data, ExponentialSmoother::new(span)?))
}

/// Computes the EMA with a custom smoothing factor.
///
/// # Errors
///
/// - `Error::InvalidParameter` unless `0 < alpha <= 1`
/// - `Error::EmptyInput` if `data` is empty
pub fn ema_with_alpha<T: SeriesElement>(data: &[T], alpha: T) -> Result<Vec<T>> {
    let smoother = ExponentialSmoother::with_alpha(alpha)?;
    data.validate_not_empty()?;
    Ok(scan_smoother(data, smoother))
}

fn scan_smoother<T: SeriesElement>(data: &[T], smoother: ExponentialSmoother<T>) -> Vec<T> {
    data.iter()
        .scan(smoother, |state, &value| Some(state.update(value)))
        .collect()
}

/// EMA of close prices as a date-aligned series.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `span` is zero
/// - `Error::EmptyInput` if the series is empty
pub fn exponential_average(series: &TimeSeries, span: usize) -> Result<IndicatorSeries> {
    validate_period(span)?;
    let closes = series.closes();
    closes.validate_not_empty()?;
    debug!(span, bars = closes.len(), "ema");
    Ok(series.indicator(ema(&closes, span)?))
}
