//! Commonly used types and traits for convenient importing.
//!
//! ```
//! use fxsignal::prelude::*;
//!
//! let prices = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//!
//! let sma_result = sma(&prices, 3).unwrap();
//! let ema_result = ema(&prices, 3).unwrap();
//! let rsi_result = rsi(&prices, 5).unwrap();
//! assert_eq!(rsi_result[5], 100.0);
//! ```
//!
//! # Contents
//!
//! - [`Error`] and [`Result`]
//! - [`SeriesElement`] and [`ValidatedInput`]
//! - the data model: [`Bar`], [`PriceField`], [`TimeSeries`], [`IndicatorSeries`]
//! - slice kernels and their lookback helpers
//! - engine configs: [`RollingStats`], [`Bollinger`], [`Macd`], [`Rsi`]
//! - [`SignalClassifier`], [`AnalysisConfig`] and [`analyze`]

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::traits::{SeriesElement, ValidatedInput};

// Data model
pub use crate::series::{Bar, IndicatorSeries, PriceField, TimeSeries};

// Slice kernels
pub use crate::indicators::bollinger::bollinger;
pub use crate::indicators::ema::ema;
pub use crate::indicators::macd::macd;
pub use crate::indicators::rolling::{rolling_stats, rolling_stddev, sma};
pub use crate::indicators::rsi::rsi;

// Output types
pub use crate::indicators::bollinger::{BollingerBands, BollingerOutput};
pub use crate::indicators::macd::{MacdOutput, MacdSeries};
pub use crate::indicators::rolling::{RollingStatsOutput, RollingStatsSeries};

// Engines
pub use crate::indicators::bollinger::Bollinger;
pub use crate::indicators::ema::ExponentialSmoother;
pub use crate::indicators::macd::Macd;
pub use crate::indicators::rolling::RollingStats;
pub use crate::indicators::rsi::Rsi;

// Lookback functions
pub use crate::indicators::bollinger::{bollinger_lookback, bollinger_min_len};
pub use crate::indicators::ema::{ema_lookback, ema_min_len};
pub use crate::indicators::macd::{macd_lookback, macd_min_len};
pub use crate::indicators::rolling::{rolling_lookback, rolling_min_len};
pub use crate::indicators::rsi::{rsi_lookback, rsi_min_len};

// Signals and pipeline
pub use crate::analysis::{analyze, Analysis, KeyMetrics, MovingAverage};
pub use crate::config::AnalysisConfig;
pub use crate::signal::{Signal, SignalClassifier, SignalLabel, SignalReason, Thresholds};
