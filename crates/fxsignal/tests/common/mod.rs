//! Shared test utilities for fxsignal integration tests.

use chrono::NaiveDate;
use fxsignal::series::{Bar, TimeSeries};

/// Close prices of the ten-bar end-to-end scenario.
#[allow(dead_code)]
pub const SCENARIO_CLOSES: [f64; 10] =
    [100.0, 102.0, 101.0, 105.0, 107.0, 106.0, 110.0, 108.0, 111.0, 115.0];

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Approximate equality where two NaN values compare equal.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Verify that the first `n` values are NaN and the rest are not.
#[allow(dead_code)]
pub fn verify_nan_prefix(data: &[f64], expected_nan_count: usize) -> bool {
    data.iter()
        .enumerate()
        .all(|(i, v)| v.is_nan() == (i < expected_nan_count))
}

/// Builds consecutive daily bars from close prices, with a one-unit
/// high/low spread around each close.
#[allow(dead_code)]
pub fn series_from_closes(closes: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    closes
        .iter()
        .zip(start.iter_days())
        .map(|(&c, date)| Bar::new(date, c, c + 1.0, c - 1.0, c))
        .collect()
}

/// Deterministic EUR/USD-like series of `n` bars.
#[allow(dead_code)]
pub fn fx_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            1.10 + (t * 0.13).sin() * 0.015 + (t * 0.041).cos() * 0.008 + t * 0.0001
        })
        .collect()
}
