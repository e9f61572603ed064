//! Associative prefix-scan formulation of the EMA recursion.
//!
//! One EMA step `e ↦ (1 - α)·e + α·x` is an affine map, and composition of
//! affine maps is associative. The EMA is therefore the inclusive prefix
//! scan of per-bar maps, which a parallel scan can evaluate out of order
//! without changing the result beyond floating-point reassociation.
//!
//! # Formulation
//!
//! ```text
//! map[seed] = (scale 0, offset x[seed])          // constant map: EMA[seed] = x[seed]
//! map[i]    = (scale 1 - α, offset α·x[i])       // i > seed, x[i] defined
//! map[i]    = identity                           // x[i] missing
//! EMA[i]    = (map[0] ∘ ... ∘ map[i]).offset     // scale is 0 once seeded
//! ```
//!
//! The sequential [`crate::indicators::ema::ema`] stays the canonical
//! implementation used by MACD; [`ema_scan`] and `ema_parallel` are tested
//! against it within tolerance.
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::ema::ema;
//! use fxsignal::kernels::scan::ema_scan;
//!
//! let data: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
//! let direct = ema(&data, 12).unwrap();
//! let scanned = ema_scan(&data, 12).unwrap();
//! for (a, b) in direct.iter().zip(&scanned) {
//!     assert!((a - b).abs() < 1e-9);
//! }
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::indicators::ema::ema_alpha;
use crate::traits::{validate_kernel_input, SeriesElement};

/// Affine map `e ↦ scale·e + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine<T> {
    /// Multiplicative coefficient.
    pub scale: T,
    /// Additive coefficient.
    pub offset: T,
}

impl<T: SeriesElement> Affine<T> {
    /// The identity map.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            scale: T::one(),
            offset: T::zero(),
        }
    }

    /// The constant map `e ↦ value`.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            scale: T::zero(),
            offset: value,
        }
    }

    /// One EMA step for observation `x`.
    #[must_use]
    pub fn ema_step(alpha: T, x: T) -> Self {
        Self {
            scale: T::one() - alpha,
            offset: alpha * x,
        }
    }

    /// Applies `self` first, then `next`.
    #[inline]
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            scale: next.scale * self.scale,
            offset: next.scale * self.offset + next.offset,
        }
    }

    /// Evaluates the map at `e`.
    #[inline]
    #[must_use]
    pub fn apply(self, e: T) -> T {
        self.scale * e + self.offset
    }
}

/// Builds the per-bar maps of the EMA recursion.
fn ema_maps<T: SeriesElement>(data: &[T], alpha: T) -> Vec<Affine<T>> {
    let mut seeded = false;
    data.iter()
        .map(|&x| {
            if x.is_nan() {
                Affine::identity()
            } else if seeded {
                Affine::ema_step(alpha, x)
            } else {
                seeded = true;
                Affine::constant(x)
            }
        })
        .collect()
}

/// Reads EMA values out of prefix compositions, restoring missing bars.
fn read_out<T: SeriesElement>(data: &[T], prefixes: &[Affine<T>]) -> Vec<T> {
    data.iter()
        .zip(prefixes)
        .map(|(x, prefix)| {
            if x.is_nan() {
                T::nan()
            } else {
                prefix.apply(T::zero())
            }
        })
        .collect()
}

/// Inclusive prefix composition, evaluated left to right.
#[must_use]
pub fn prefix_compose<T: SeriesElement>(maps: &[Affine<T>]) -> Vec<Affine<T>> {
    maps.iter()
        .scan(Affine::identity(), |acc, &map| {
            *acc = acc.then(map);
            Some(*acc)
        })
        .collect()
}

/// EMA evaluated as a sequential prefix scan of affine maps.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `span` is zero
/// - `Error::EmptyInput` if `data` is empty
pub fn ema_scan<T: SeriesElement>(data: &[T], span: usize) -> Result<Vec<T>> {
    validate_kernel_input(data, span)?;
    let maps = ema_maps(data, ema_alpha(span)?);
    Ok(read_out(data, &prefix_compose(&maps)))
}

/// EMA evaluated as a chunked parallel prefix scan.
///
/// Three phases: each chunk is reduced to one composed map in parallel,
/// the chunk totals are scanned sequentially into carries, and every chunk
/// then replays its maps from its carry in parallel.
///
/// # Errors
///
/// - `Error::InvalidPeriod` if `span` is zero
/// - `Error::EmptyInput` if `data` is empty
#[cfg(feature = "parallel")]
pub fn ema_parallel<T: SeriesElement>(data: &[T], span: usize, chunk_len: usize) -> Result<Vec<T>> {
    validate_kernel_input(data, span)?;
    let chunk_len = chunk_len.max(1);
    let maps = ema_maps(data, ema_alpha(span)?);

    let totals: Vec<Affine<T>> = maps
        .par_chunks(chunk_len)
        .map(|chunk| chunk.iter().fold(Affine::identity(), |acc, &m| acc.then(m)))
        .collect();

    let carries: Vec<Affine<T>> = totals
        .iter()
        .scan(Affine::identity(), |acc, &total| {
            let carry = *acc;
            *acc = acc.then(total);
            Some(carry)
        })
        .collect();

    let mut prefixes = vec![Affine::identity(); maps.len()];
    prefixes
        .par_chunks_mut(chunk_len)
        .zip(maps.par_chunks(chunk_len))
        .zip(carries.par_iter())
        .for_each(|((out, chunk), &carry)| {
            let mut acc = carry;
            for (slot, &m) in out.iter_mut().zip(chunk) {
                acc = acc.then(m);
                *slot = acc;
            }
        });

    Ok(read_out(data, &prefixes))
}
