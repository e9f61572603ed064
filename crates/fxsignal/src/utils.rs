//! Small numeric helpers shared by the engines and their tests.
//!
//! Missing values travel through the slice kernels as `NaN`; these helpers
//! convert between that encoding and `Option`, count warm-up gaps, and
//! compare floating-point output with a tolerance.

use crate::traits::SeriesElement;

/// Tolerance for comparisons after a handful of arithmetic steps.
pub const EPSILON: f64 = 1e-10;

/// Tolerance for comparisons after long recursive accumulations (EMA tails,
/// reassociated prefix scans).
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Maps the `NaN` missing-marker to `None`.
///
/// ```
/// use fxsignal::utils::defined;
///
/// assert_eq!(defined(1.5_f64), Some(1.5));
/// assert_eq!(defined(f64::NAN), None);
/// ```
#[inline]
#[must_use]
pub fn defined<T: SeriesElement>(value: T) -> Option<T> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Absolute-tolerance comparison where two missing values compare equal.
///
/// ```
/// use fxsignal::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(0.1_f64 + 0.2, 0.3, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// assert!(!approx_eq(f64::NAN, 0.0, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    match (defined(a), defined(b)) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() < tolerance,
        _ => false,
    }
}

/// Counts the leading missing values of a series (its warm-up gap).
///
/// ```
/// use fxsignal::utils::count_nan_prefix;
///
/// assert_eq!(count_nan_prefix(&[f64::NAN, f64::NAN, 1.0, f64::NAN]), 2);
/// ```
#[inline]
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

/// Counts every missing value of a series.
#[inline]
#[must_use]
pub fn count_nans<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

/// Returns `true` when both series have the same length and bit-identical
/// values, treating `NaN` payloads as equal.
#[must_use]
pub fn bit_identical(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
        })
}
