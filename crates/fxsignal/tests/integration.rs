//! Integration tests for the public API.
//!
//! End-to-end scenarios over `TimeSeries`, from slice kernels through the
//! configured engines to the analysis pipeline.

#![allow(clippy::needless_range_loop)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

mod common;

use chrono::NaiveDate;
use common::{approx_eq, fx_closes, series_from_closes, verify_nan_prefix, EPSILON, SCENARIO_CLOSES};
use fxsignal::prelude::*;

// ==================== Basic Usage Tests ====================

#[test]
fn test_prelude_import_basic() {
    let prices = SCENARIO_CLOSES.to_vec();
    let _sma = sma(&prices, 3).unwrap();
    let _ema = ema(&prices, 3).unwrap();
    let _rsi = rsi(&prices, 3).unwrap();
    let _macd = macd(&prices, 12, 26, 9).unwrap();
    let _bands = bollinger(&prices, 5, 2.0).unwrap();
}

#[test]
fn test_sma_scenario() {
    let result = sma(&SCENARIO_CLOSES, 3).unwrap();
    assert!(result[0].is_nan());
    assert!(result[1].is_nan());
    assert_eq!(result[2], 101.0);
    assert!(approx_eq(result[9], (108.0 + 111.0 + 115.0) / 3.0, EPSILON));
    assert!(verify_nan_prefix(&result, rolling_lookback(3)));
}

#[test]
fn test_sma_scenario_through_engine() {
    let series = series_from_closes(&SCENARIO_CLOSES);
    let stats = RollingStats::new().window(3).compute(&series).unwrap();
    assert_eq!(stats.mean.get(0), None);
    assert_eq!(stats.mean.get(1), None);
    assert_eq!(stats.mean.get(2), Some(101.0));
    let expected_date = NaiveDate::from_ymd_opt(2023, 3, 3).unwrap();
    assert_eq!(stats.mean.iter().nth(2), Some((expected_date, Some(101.0))));
}

#[test]
fn test_macd_short_series_defined_from_bar_zero() {
    for len in [1, 2, 10, 25] {
        let series = series_from_closes(&fx_closes(len));
        let out = Macd::default().compute(&series).unwrap();
        assert_eq!(out.macd_line.defined_count(), len, "len {len}");
        assert_eq!(out.signal_line.defined_count(), len, "len {len}");
    }
}

#[test]
fn test_lookbacks_match_outputs() {
    let data = fx_closes(100);
    assert!(verify_nan_prefix(&sma(&data, 7).unwrap(), rolling_lookback(7)));
    assert!(verify_nan_prefix(
        &bollinger(&data, 20, 2.0).unwrap().upper,
        bollinger_lookback(20)
    ));
    assert!(verify_nan_prefix(&ema(&data, 12).unwrap(), ema_lookback(12)));
    assert!(verify_nan_prefix(&macd(&data, 12, 26, 9).unwrap().signal_line, macd_lookback()));
    assert!(verify_nan_prefix(&rsi(&data, 14).unwrap(), rsi_lookback(14)));
}

#[test]
fn test_min_len_boundaries() {
    let config_rsi = Rsi::default();
    let at = series_from_closes(&fx_closes(rsi_min_len(14)));
    let below = series_from_closes(&fx_closes(rsi_min_len(14) - 1));
    assert_eq!(config_rsi.compute(&at).unwrap().defined_count(), 1);
    assert!(matches!(
        config_rsi.compute(&below),
        Err(Error::InsufficientData { indicator: "rsi", .. })
    ));

    let at = series_from_closes(&fx_closes(bollinger_min_len(20)));
    assert_eq!(Bollinger::default().compute(&at).unwrap().upper.defined_count(), 1);
}

#[test]
fn test_f32_kernels() {
    let data: Vec<f32> = SCENARIO_CLOSES.iter().map(|&v| v as f32).collect();
    assert_eq!(sma(&data, 3).unwrap()[2], 101.0_f32);
    assert_eq!(ema(&data, 5).unwrap()[0], 100.0_f32);
    assert!(!rsi(&data, 3).unwrap()[3].is_nan());
}

// ==================== Date Handling ====================

#[test]
fn test_filter_then_analyze() {
    let series = series_from_closes(&fx_closes(90));
    let from = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2023, 4, 30).unwrap();
    let window = series.between(from, to);
    assert_eq!(window.len(), 30);
    assert_eq!(window.dates()[0], from);

    let analysis = analyze(&window, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.rsi.len(), 30);
    assert_eq!(analysis.rsi.dates()[29], to);
    assert_eq!(analysis.moving_average(30).unwrap().defined_count(), 1);
}

#[test]
fn test_unordered_dates_detected() {
    let d = |day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
    let series = TimeSeries::new(vec![
        Bar::new(d(1), 1.0, 1.0, 1.0, 1.0),
        Bar::new(d(3), 1.0, 1.0, 1.0, 1.0),
        Bar::new(d(3), 1.0, 1.0, 1.0, 1.0),
    ]);
    assert_eq!(series.validate_order(), Err(Error::UnorderedDates { index: 2 }));
}

// ==================== Signals ====================

#[test]
fn test_signal_scenarios() {
    let classifier = SignalClassifier::default();
    let cases = [
        ((1.2, 0.8, 25.0), SignalLabel::Buy),
        ((-0.5, 0.1, 75.0), SignalLabel::Sell),
        ((0.3, 0.3, 50.0), SignalLabel::Neutral),
    ];
    for ((m, s, r), expected) in cases {
        let signal = classifier.classify(Some(m), Some(s), Some(r));
        assert_eq!(signal.label, expected, "macd {m} signal {s} rsi {r}");
    }
}

#[test]
fn test_sell_after_rally_then_turn() {
    // Long rally pushes RSI high; a sharp final drop turns MACD below its
    // signal line while the 14-bar RSI still reads overbought.
    let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    closes.push(155.0);
    let series = series_from_closes(&closes);
    let analysis = analyze(&series, &AnalysisConfig::default()).unwrap();

    let macd = analysis.macd.macd_line.latest().unwrap();
    let signal = analysis.macd.signal_line.latest().unwrap();
    let rsi = analysis.rsi.latest().unwrap();
    assert!(macd < signal, "macd {macd} signal {signal}");
    assert!(rsi > 70.0, "rsi {rsi}");
    assert_eq!(analysis.signal.label, SignalLabel::Sell);
}

#[test]
fn test_buy_after_selloff_then_turn() {
    let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    closes.push(146.0);
    let series = series_from_closes(&closes);
    let analysis = analyze(&series, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.signal.label, SignalLabel::Buy);
    assert_eq!(analysis.signal.reason.message(), "Momentum is shifting upwards");
}

#[test]
fn test_flat_market_is_neutral() {
    let series = series_from_closes(&[1.25; 40]);
    let analysis = analyze(&series, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.rsi.latest(), Some(50.0));
    assert_eq!(analysis.signal.label, SignalLabel::Neutral);
    assert_eq!(analysis.signal.reason, SignalReason::NoClearSignal);
}

// ==================== Configuration ====================

#[test]
fn test_custom_config_from_json() {
    let config: AnalysisConfig = serde_json::from_str(
        r#"{ "moving_average_windows": [3], "rsi": { "window": 3 }, "bollinger": { "window": 3 } }"#,
    )
    .unwrap();
    let series = series_from_closes(&SCENARIO_CLOSES);
    let analysis = analyze(&series, &config).unwrap();
    assert_eq!(analysis.moving_average(3).unwrap().get(2), Some(101.0));
    assert_eq!(analysis.rsi.first_defined_index(), Some(3));
    assert_eq!(analysis.bollinger.middle.get(2), Some(101.0));
}

#[test]
fn test_invalid_config_rejected_before_compute() {
    let config = AnalysisConfig {
        thresholds: Thresholds {
            oversold: 90.0,
            overbought: 10.0,
        },
        ..AnalysisConfig::default()
    };
    let series = series_from_closes(&SCENARIO_CLOSES);
    assert!(matches!(
        analyze(&series, &config),
        Err(Error::InvalidParameter { .. })
    ));
}
