//! Analysis configuration.
//!
//! [`AnalysisConfig`] gathers every tunable parameter with its documented
//! default. It deserializes from partial JSON, filling absent fields from
//! [`Default`]:
//!
//! ```
//! use fxsignal::config::AnalysisConfig;
//!
//! let config: AnalysisConfig =
//!     serde_json::from_str(r#"{ "moving_average_windows": [5, 10, 50] }"#).unwrap();
//! assert_eq!(config.moving_average_windows, vec![5, 10, 50]);
//! assert_eq!(config.rsi.get_window(), 14);
//! config.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicators::bollinger::Bollinger;
use crate::indicators::macd::Macd;
use crate::indicators::rsi::Rsi;
use crate::signal::Thresholds;
use crate::traits::validate_period;

/// Default moving-average windows.
pub const DEFAULT_MOVING_AVERAGE_WINDOWS: [usize; 2] = [7, 30];

/// Parameters for a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// One simple moving average of close prices per window.
    pub moving_average_windows: Vec<usize>,
    /// Bollinger Bands parameters.
    pub bollinger: Bollinger,
    /// MACD spans.
    pub macd: Macd,
    /// RSI window.
    pub rsi: Rsi,
    /// Signal classification thresholds.
    pub thresholds: Thresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            moving_average_windows: DEFAULT_MOVING_AVERAGE_WINDOWS.to_vec(),
            bollinger: Bollinger::default(),
            macd: Macd::default(),
            rsi: Rsi::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Rejects invalid parameters before any computation.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeriod` for a zero moving-average window, RSI window
    ///   or MACD span, or a Bollinger window below 2
    /// - `Error::InvalidParameter` for a bad Bollinger multiplier or thresholds
    pub fn validate(&self) -> Result<()> {
        for &window in &self.moving_average_windows {
            validate_period(window)?;
        }
        self.bollinger.validate()?;
        self.macd.validate()?;
        validate_period(self.rsi.get_window())?;
        self.thresholds.validate()
    }

    /// Longest leading gap across the windowed indicators.
    ///
    /// A series longer than this yields at least one defined value for
    /// every configured indicator.
    #[must_use]
    pub fn max_lookback(&self) -> usize {
        self.moving_average_windows
            .iter()
            .map(|w| w.saturating_sub(1))
            .chain([self.bollinger.lookback(), self.rsi.lookback()])
            .max()
            .unwrap_or(0)
    }
}
