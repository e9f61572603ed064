//! Core numeric traits and input validation.
//!
//! [`SeriesElement`] abstracts the slice kernels over `f32` and `f64`.
//! [`ValidatedInput`] and the free `validate_*` functions hold the checks
//! every kernel runs before touching its input.

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements in an indicator series.
///
/// Extends `num_traits::Float` with the conversions and constants the
/// indicator kernels need. Missing values are represented by `NaN`.
///
/// # Example
///
/// ```
/// use fxsignal::traits::SeriesElement;
///
/// fn mean<T: SeriesElement>(data: &[T]) -> fxsignal::Result<T> {
///     let n = T::from_usize(data.len())?;
///     Ok(data.iter().fold(T::zero(), |acc, &x| acc + x) / n)
/// }
///
/// assert!((mean(&[1.0_f64, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
/// ```
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Converts this element to `f64`, mapping failures to `NaN`.
    #[inline]
    #[must_use]
    fn to_f64_lossy(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// Returns the constant 2 as this type (`alpha = 2 / (span + 1)`).
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns the constant 100 as this type.
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        Self::from_usize(100).unwrap_or_else(|_| Self::nan())
    }

    /// Returns the constant 50 as this type (the neutral RSI reading).
    #[inline]
    #[must_use]
    fn fifty() -> Self {
        Self::from_usize(50).unwrap_or_else(|_| Self::nan())
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Validation helpers for input series.
pub trait ValidatedInput {
    /// Returns the length of the series.
    fn len(&self) -> usize;

    /// Returns true if the series is empty.
    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates that the series is not empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyInput` if the series is empty.
    #[inline]
    fn validate_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(())
        }
    }

    /// Validates that the series has at least `min_length` elements.
    ///
    /// # Errors
    ///
    /// Returns `Error::InsufficientData` if the series is shorter than `min_length`.
    #[inline]
    fn validate_min_length(&self, min_length: usize, indicator: &'static str) -> Result<()> {
        if self.len() < min_length {
            Err(Error::InsufficientData {
                required: min_length,
                actual: self.len(),
                indicator,
            })
        } else {
            Ok(())
        }
    }
}

impl<T> ValidatedInput for [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T> ValidatedInput for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Validates that a window or span is usable.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if the period is zero.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}

/// Validates the input of a slice kernel.
///
/// Kernels accept inputs shorter than their window (the output is then
/// entirely missing), so only the period and emptiness are checked.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if the period is zero
/// - `Error::EmptyInput` if the data is empty
#[inline]
pub fn validate_kernel_input<T>(data: &[T], period: usize) -> Result<()> {
    validate_period(period)?;
    data.validate_not_empty()
}
