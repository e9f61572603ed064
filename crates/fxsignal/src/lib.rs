//! fxsignal: technical indicators and trading signals for daily OHLC series
//!
//! This crate computes rolling statistics, Bollinger Bands, EMA-based MACD
//! and RSI over a date-ordered price series, and classifies the latest
//! values into a Buy / Sell / Neutral signal.
//!
//! # Features
//!
//! - **Explicit edge policies**: warm-up gaps, EMA seeding, sample standard
//!   deviation and the RSI zero-division cases are contracts, not library
//!   defaults
//! - **Generics**: slice kernels work with both `f32` and `f64`
//! - **Date alignment**: engines return [`series::IndicatorSeries`] sharing
//!   the source's date index
//! - **Parallel**: with the `parallel` feature (default) independent
//!   windows and engines run on rayon
//!
//! # Quick Start
//!
//! ```
//! use fxsignal::prelude::*;
//!
//! let data = vec![100.0_f64, 102.0, 101.0, 105.0, 107.0];
//! let result = sma(&data, 3).unwrap();
//!
//! // First 2 values are missing (warm-up gap)
//! assert!(result[0].is_nan());
//! assert!(result[1].is_nan());
//! assert!((result[2] - 101.0).abs() < 1e-10);
//! ```
//!
//! # Full analysis
//!
//! ```
//! use chrono::NaiveDate;
//! use fxsignal::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series: TimeSeries = (0..60)
//!     .zip(start.iter_days())
//!     .map(|(i, date)| {
//!         let c = 1.08 + (f64::from(i) * 0.2).sin() * 0.01;
//!         Bar::new(date, c, c + 0.003, c - 0.003, c)
//!     })
//!     .collect();
//!
//! let analysis = analyze(&series, &AnalysisConfig::default()).unwrap();
//! println!("{}: {}", analysis.signal.label, analysis.signal.reason);
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result<T, Error>`]:
//!
//! ```
//! use fxsignal::prelude::*;
//!
//! // Zero window
//! assert!(matches!(sma(&[1.0_f64, 2.0], 0), Err(Error::InvalidPeriod { .. })));
//!
//! // Empty data
//! let empty: Vec<f64> = vec![];
//! assert_eq!(sma(&empty, 5), Err(Error::EmptyInput));
//!
//! // Short data is not an error at the kernel layer
//! assert!(sma(&[1.0_f64, 2.0], 10).unwrap().iter().all(|v| v.is_nan()));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod indicators;
pub mod kernels;
pub mod prelude;
pub mod series;
pub mod signal;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use analysis::{analyze, Analysis, KeyMetrics};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use series::{Bar, IndicatorSeries, PriceField, TimeSeries};
pub use signal::{Signal, SignalClassifier, SignalLabel, SignalReason, Thresholds};
pub use traits::{SeriesElement, ValidatedInput};
pub use utils::{approx_eq, count_nan_prefix, count_nans, EPSILON, LOOSE_EPSILON};
