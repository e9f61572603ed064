//! Indicator engines.
//!
//! Every indicator comes in two layers:
//!
//! - a **slice kernel** generic over [`SeriesElement`](crate::traits::SeriesElement)
//!   ([`sma`], [`ema`], [`macd`](macd::macd), [`rsi`](rsi::rsi),
//!   [`bollinger`](bollinger::bollinger)). Kernels return one value per input,
//!   using `NaN` for missing values. An input shorter than the window is not
//!   an error: the output is simply all missing.
//! - a **configured engine** over a [`TimeSeries`](crate::series::TimeSeries)
//!   ([`RollingStats`], [`Bollinger`], [`Macd`], [`Rsi`]) returning
//!   date-aligned [`IndicatorSeries`](crate::series::IndicatorSeries). Engines
//!   report [`InsufficientData`](crate::error::Error::InsufficientData) when
//!   not a single bar can be defined.
//!
//! # Warm-up
//!
//! | Indicator       | Leading missing | Minimum length |
//! |-----------------|-----------------|----------------|
//! | SMA / stddev    | `w - 1`         | `w`            |
//! | Bollinger Bands | `w - 1`         | `w`            |
//! | EMA / MACD      | 0               | 1              |
//! | RSI             | `w`             | `w + 1`        |
//!
//! # Example
//!
//! ```
//! use fxsignal::indicators::{ema, rsi, sma};
//!
//! let prices = vec![44.0_f64, 44.5, 43.5, 44.5, 44.0, 43.0, 42.5, 43.5, 44.5, 45.0];
//!
//! let sma_result = sma(&prices, 5).unwrap();
//! assert!(sma_result[3].is_nan());
//!
//! let ema_result = ema(&prices, 5).unwrap();
//! assert_eq!(ema_result[0], 44.0);
//!
//! let rsi_result = rsi(&prices, 5).unwrap();
//! assert!(rsi_result[4].is_nan() && !rsi_result[5].is_nan());
//! ```

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;

pub use bollinger::{bollinger, Bollinger, BollingerBands, BollingerOutput};
pub use ema::{ema, ema_with_alpha, exponential_average, ExponentialSmoother};
pub use macd::{macd, Macd, MacdOutput, MacdSeries};
pub use rolling::{
    moving_average, rolling_stats, rolling_stddev, sma, RollingStats, RollingStatsOutput,
    RollingStatsSeries, RunningStat,
};
pub use rsi::{rsi, rsi_value, Rsi};
