//! One-shot analysis pipeline.
//!
//! [`analyze`] runs every indicator over a [`TimeSeries`], summarizes the
//! price range and classifies the latest bar. Unlike the individual
//! engines it is lenient about length: an indicator whose window does not
//! fit the series comes back entirely missing, and the signal then falls
//! back to [`SignalReason::InsufficientData`](crate::signal::SignalReason).
//!
//! With the `parallel` feature the window-based indicators and the
//! EMA-based indicators are computed on separate rayon tasks. The EMA
//! recursion itself always runs sequentially.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::indicators::bollinger::{bollinger, BollingerBands};
use crate::indicators::macd::{macd, MacdSeries};
use crate::indicators::rolling::sma;
use crate::indicators::rsi::rsi;
use crate::series::{IndicatorSeries, TimeSeries};
use crate::signal::{Signal, SignalClassifier};
use crate::traits::ValidatedInput;

/// Price-range summary of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyMetrics {
    /// Highest `high` over the series.
    pub highest_high: f64,
    /// Lowest `low` over the series.
    pub lowest_low: f64,
    /// Mean of `high - low`.
    pub average_range: f64,
}

impl KeyMetrics {
    /// Summarizes a series; `None` if it is empty.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use fxsignal::analysis::KeyMetrics;
    /// use fxsignal::series::{Bar, TimeSeries};
    ///
    /// let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    /// let series = TimeSeries::new(vec![
    ///     Bar::new(d, 1.0, 2.0, 0.5, 1.5),
    ///     Bar::new(d.succ_opt().unwrap(), 1.5, 3.0, 1.0, 2.5),
    /// ]);
    /// let m = KeyMetrics::from_series(&series).unwrap();
    /// assert_eq!((m.highest_high, m.lowest_low, m.average_range), (3.0, 0.5, 1.75));
    /// ```
    #[must_use]
    pub fn from_series(series: &TimeSeries) -> Option<Self> {
        let bars = series.bars();
        if bars.is_empty() {
            return None;
        }
        let highest_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let total_range: f64 = bars.iter().map(|b| b.range()).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_range = total_range / bars.len() as f64;
        Some(Self {
            highest_high,
            lowest_low,
            average_range,
        })
    }
}

/// Simple moving average for one configured window.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Window size.
    pub window: usize,
    /// Rolling mean of close prices.
    pub values: IndicatorSeries,
}

/// Everything computed by [`analyze`].
#[derive(Debug, Clone)]
pub struct Analysis {
    /// One entry per configured window, in configuration order.
    pub moving_averages: Vec<MovingAverage>,
    /// Bollinger Bands of close prices.
    pub bollinger: BollingerBands,
    /// MACD line, signal line and histogram.
    pub macd: MacdSeries,
    /// RSI of close prices.
    pub rsi: IndicatorSeries,
    /// Classification of the latest defined values.
    pub signal: Signal,
    /// Price-range summary.
    pub metrics: KeyMetrics,
}

impl Analysis {
    /// Moving average for `window`, if it was configured.
    #[must_use]
    pub fn moving_average(&self, window: usize) -> Option<&IndicatorSeries> {
        self.moving_averages
            .iter()
            .find(|ma| ma.window == window)
            .map(|ma| &ma.values)
    }
}

struct WindowedOutputs {
    moving_averages: Vec<MovingAverage>,
    bollinger: BollingerBands,
    rsi: IndicatorSeries,
}

fn windowed(series: &TimeSeries, closes: &[f64], config: &AnalysisConfig) -> Result<WindowedOutputs> {
    let moving_averages = config
        .moving_average_windows
        .iter()
        .map(|&window| {
            let values = series.indicator(sma(closes, window)?);
            if values.is_all_missing() {
                warn!(window, bars = closes.len(), "moving average window exceeds series length");
            }
            Ok(MovingAverage { window, values })
        })
        .collect::<Result<Vec<_>>>()?;

    let bands = bollinger(closes, config.bollinger.get_window(), config.bollinger.get_multiplier())?;
    let bollinger = BollingerBands {
        middle: series.indicator(bands.middle),
        upper: series.indicator(bands.upper),
        lower: series.indicator(bands.lower),
    };
    if bollinger.middle.is_all_missing() {
        warn!(window = config.bollinger.get_window(), "bollinger window exceeds series length");
    }

    let rsi = series.indicator(rsi(closes, config.rsi.get_window())?);
    if rsi.is_all_missing() {
        warn!(window = config.rsi.get_window(), "rsi window exceeds series length");
    }
    trace!("windowed indicators done");

    Ok(WindowedOutputs {
        moving_averages,
        bollinger,
        rsi,
    })
}

fn smoothed(series: &TimeSeries, closes: &[f64], config: &AnalysisConfig) -> Result<MacdSeries> {
    let (short, long, signal) = config.macd.spans();
    let out = macd(closes, short, long, signal)?;
    trace!("macd done");
    Ok(MacdSeries {
        macd_line: series.indicator(out.macd_line),
        signal_line: series.indicator(out.signal_line),
        histogram: series.indicator(out.histogram),
    })
}

#[cfg(feature = "parallel")]
fn run_engines(
    series: &TimeSeries,
    closes: &[f64],
    config: &AnalysisConfig,
) -> (Result<WindowedOutputs>, Result<MacdSeries>) {
    rayon::join(
        || windowed(series, closes, config),
        || smoothed(series, closes, config),
    )
}

#[cfg(not(feature = "parallel"))]
fn run_engines(
    series: &TimeSeries,
    closes: &[f64],
    config: &AnalysisConfig,
) -> (Result<WindowedOutputs>, Result<MacdSeries>) {
    (windowed(series, closes, config), smoothed(series, closes, config))
}

/// Computes every configured indicator, the key metrics and the signal.
///
/// # Errors
///
/// - `Error::InvalidPeriod` / `Error::InvalidParameter` if the configuration
///   is invalid (checked before anything is computed)
/// - `Error::EmptyInput` if the series is empty
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use fxsignal::analysis::analyze;
/// use fxsignal::config::AnalysisConfig;
/// use fxsignal::series::{Bar, TimeSeries};
/// use fxsignal::signal::SignalReason;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let series: TimeSeries = (0..10)
///     .zip(start.iter_days())
///     .map(|(i, d)| {
///         let c = 1.10 + f64::from(i) * 0.001;
///         Bar::new(d, c, c + 0.002, c - 0.002, c)
///     })
///     .collect();
///
/// let analysis = analyze(&series, &AnalysisConfig::default()).unwrap();
/// assert!(analysis.moving_average(30).unwrap().is_all_missing());
/// assert_eq!(analysis.macd.macd_line.defined_count(), 10);
/// assert_eq!(analysis.signal.reason, SignalReason::InsufficientData);
/// ```
pub fn analyze(series: &TimeSeries, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let closes = series.closes();
    closes.validate_not_empty()?;
    debug!(bars = closes.len(), "analysis started");

    let (windowed, macd) = run_engines(series, &closes, config);
    let WindowedOutputs {
        moving_averages,
        bollinger,
        rsi,
    } = windowed?;
    let macd = macd?;

    let signal = SignalClassifier::new(config.thresholds)?.classify_latest(&macd, &rsi);
    let metrics = KeyMetrics::from_series(series).ok_or(Error::EmptyInput)?;
    debug!(label = %signal.label, "analysis finished");

    Ok(Analysis {
        moving_averages,
        bollinger,
        macd,
        rsi,
        signal,
        metrics,
    })
}
