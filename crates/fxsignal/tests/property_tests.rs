//! Property-based tests using proptest.
//!
//! These tests verify invariants that must hold for all valid inputs,
//! using randomly generated price series to find edge cases.

use chrono::NaiveDate;
use proptest::prelude::*;

use fxsignal::analysis::analyze;
use fxsignal::config::AnalysisConfig;
use fxsignal::indicators::{bollinger, ema, macd, rolling_stddev, rsi, sma};
use fxsignal::series::{Bar, TimeSeries};
use fxsignal::kernels::scan::ema_scan;
use fxsignal::signal::{SignalClassifier, SignalLabel, SignalReason};
use fxsignal::utils::bit_identical;

// ==================== Test Data Generators ====================

/// Generate a random price series (all positive values)
fn arb_price_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.5..2.0_f64, min_len..=max_len)
}

fn arb_optional_value() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), Just(Some(f64::NAN)), (-100.0..200.0_f64).prop_map(Some)]
}

// ==================== Rolling Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Output length equals input length and the warm-up gap is `window - 1`
    #[test]
    fn prop_sma_alignment(data in arb_price_series(1, 80), window in 1usize..=30) {
        let result = sma(&data, window).unwrap();
        prop_assert_eq!(result.len(), data.len());
        for (i, v) in result.iter().enumerate() {
            prop_assert_eq!(v.is_nan(), i + 1 < window);
        }
    }

    /// An input shorter than the window is entirely missing
    #[test]
    fn prop_short_input_all_missing(data in arb_price_series(1, 19), extra in 1usize..10) {
        let window = data.len() + extra;
        prop_assert!(sma(&data, window).unwrap().iter().all(|v| v.is_nan()));
        prop_assert!(rsi(&data, window).unwrap().iter().all(|v| v.is_nan()));
    }

    /// SMA lies within the window's min and max
    #[test]
    fn prop_sma_bounded(data in arb_price_series(10, 60), window in 1usize..=10) {
        let result = sma(&data, window).unwrap();
        for i in (window - 1)..data.len() {
            let slice = &data[i + 1 - window..=i];
            let lo = slice.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(result[i] >= lo - 1e-9 && result[i] <= hi + 1e-9);
        }
    }
}

// ==================== Bollinger Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// lower <= middle <= upper wherever the bands are defined
    #[test]
    fn prop_bollinger_ordering(
        data in arb_price_series(2, 80),
        window in 2usize..=25,
        k in 0.0..4.0_f64,
    ) {
        let out = bollinger(&data, window, k).unwrap();
        for i in 0..data.len() {
            if out.upper[i].is_nan() {
                prop_assert!(out.lower[i].is_nan());
                continue;
            }
            prop_assert!(out.lower[i] <= out.middle[i]);
            prop_assert!(out.middle[i] <= out.upper[i]);
        }
    }
}

// ==================== EMA / MACD Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// EMA is seeded with the first value and is never missing
    #[test]
    fn prop_ema_seeded(data in arb_price_series(1, 60), span in 1usize..=50) {
        let result = ema(&data, span).unwrap();
        prop_assert_eq!(result[0], data[0]);
        prop_assert!(result.iter().all(|v| !v.is_nan()));
    }

    /// EMA is deterministic bit-for-bit
    #[test]
    fn prop_ema_deterministic(data in arb_price_series(1, 100), span in 1usize..=30) {
        prop_assert!(bit_identical(&ema(&data, span).unwrap(), &ema(&data, span).unwrap()));
    }

    /// The affine prefix scan agrees with the recursion
    #[test]
    fn prop_ema_scan_equivalent(data in arb_price_series(1, 200), span in 1usize..=40) {
        let direct = ema(&data, span).unwrap();
        let scanned = ema_scan(&data, span).unwrap();
        for (a, b) in direct.iter().zip(&scanned) {
            prop_assert!((a - b).abs() < 1e-9);
        }
    }

    /// MACD and its signal line are never missing for any length >= 1
    #[test]
    fn prop_macd_never_missing(data in arb_price_series(1, 60)) {
        let out = macd(&data, 12, 26, 9).unwrap();
        prop_assert!(out.macd_line.iter().all(|v| !v.is_nan()));
        prop_assert!(out.signal_line.iter().all(|v| !v.is_nan()));
    }
}

// ==================== RSI Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// RSI is missing before bar `window` and bounded in [0, 100] after
    #[test]
    fn prop_rsi_bounded(data in arb_price_series(2, 80), window in 1usize..=20) {
        let result = rsi(&data, window).unwrap();
        for (i, v) in result.iter().enumerate() {
            if i < window {
                prop_assert!(v.is_nan());
            } else {
                prop_assert!(v.is_finite());
                prop_assert!((0.0..=100.0).contains(v));
            }
        }
    }

    /// Strictly increasing closes give exactly 100
    #[test]
    fn prop_rsi_increasing(start in 0.5..2.0_f64, steps in prop::collection::vec(0.0001..0.05_f64, 15..60)) {
        let data: Vec<f64> = steps
            .iter()
            .scan(start, |acc, step| {
                *acc += step;
                Some(*acc)
            })
            .collect();
        let result = rsi(&data, 14).unwrap();
        prop_assert!(result[14..].iter().all(|&v| v == 100.0));
    }

    /// A constant series gives exactly 50
    #[test]
    fn prop_rsi_flat(value in 0.5..2.0_f64, len in 15usize..60) {
        let result = rsi(&vec![value; len], 14).unwrap();
        prop_assert!(result[14..].iter().all(|&v| v == 50.0));
    }
}

// ==================== Recomputation ====================

fn daily_series(closes: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    closes
        .iter()
        .zip(start.iter_days())
        .map(|(&c, date)| Bar::new(date, c, c * 1.01, c * 0.99, c))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every kernel reproduces its output bit for bit
    #[test]
    fn prop_kernels_recompute_identically(data in arb_price_series(1, 120), window in 2usize..=30) {
        prop_assert!(bit_identical(&sma(&data, window).unwrap(), &sma(&data, window).unwrap()));
        prop_assert!(bit_identical(
            &rolling_stddev(&data, window).unwrap(),
            &rolling_stddev(&data, window).unwrap()
        ));
        prop_assert!(bit_identical(&rsi(&data, window).unwrap(), &rsi(&data, window).unwrap()));

        let a = bollinger(&data, window, 2.0).unwrap();
        let b = bollinger(&data, window, 2.0).unwrap();
        prop_assert!(bit_identical(&a.middle, &b.middle));
        prop_assert!(bit_identical(&a.upper, &b.upper));
        prop_assert!(bit_identical(&a.lower, &b.lower));

        let a = macd(&data, 12, 26, 9).unwrap();
        let b = macd(&data, 12, 26, 9).unwrap();
        prop_assert!(bit_identical(&a.macd_line, &b.macd_line));
        prop_assert!(bit_identical(&a.signal_line, &b.signal_line));
        prop_assert!(bit_identical(&a.histogram, &b.histogram));
    }

    /// The full analysis reproduces every series, the metrics and the signal
    #[test]
    fn prop_analyze_recomputes_identically(data in arb_price_series(1, 120)) {
        let series = daily_series(&data);
        let config = AnalysisConfig::default();
        let a = analyze(&series, &config).unwrap();
        let b = analyze(&series, &config).unwrap();

        prop_assert_eq!(a.moving_averages.len(), b.moving_averages.len());
        for (x, y) in a.moving_averages.iter().zip(&b.moving_averages) {
            prop_assert_eq!(x.window, y.window);
            prop_assert!(bit_identical(x.values.values(), y.values.values()));
        }
        prop_assert!(bit_identical(a.bollinger.middle.values(), b.bollinger.middle.values()));
        prop_assert!(bit_identical(a.bollinger.upper.values(), b.bollinger.upper.values()));
        prop_assert!(bit_identical(a.bollinger.lower.values(), b.bollinger.lower.values()));
        prop_assert!(bit_identical(a.macd.macd_line.values(), b.macd.macd_line.values()));
        prop_assert!(bit_identical(a.macd.signal_line.values(), b.macd.signal_line.values()));
        prop_assert!(bit_identical(a.macd.histogram.values(), b.macd.histogram.values()));
        prop_assert!(bit_identical(a.rsi.values(), b.rsi.values()));
        prop_assert_eq!(a.metrics, b.metrics);
        prop_assert_eq!(a.signal.label, b.signal.label);
        prop_assert_eq!(a.signal.reason, b.signal.reason);
    }
}

// ==================== Classifier Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Labels follow the rule table and a missing input is always Neutral
    #[test]
    fn prop_classifier_rules(
        macd in arb_optional_value(),
        signal in arb_optional_value(),
        rsi in arb_optional_value(),
    ) {
        let out = SignalClassifier::default().classify(macd, signal, rsi);
        let present = |v: Option<f64>| v.filter(|x| !x.is_nan());
        match (present(macd), present(signal), present(rsi)) {
            (Some(m), Some(s), Some(r)) => {
                let expected = if m > s && r < 30.0 {
                    SignalLabel::Buy
                } else if m < s && r > 70.0 {
                    SignalLabel::Sell
                } else {
                    SignalLabel::Neutral
                };
                prop_assert_eq!(out.label, expected);
                prop_assert_ne!(out.reason, SignalReason::InsufficientData);
            }
            _ => {
                prop_assert_eq!(out.label, SignalLabel::Neutral);
                prop_assert_eq!(out.reason, SignalReason::InsufficientData);
            }
        }
    }
}
