//! Rule-based trading signal classification.
//!
//! A [`SignalClassifier`] maps the most recent MACD, signal-line and RSI
//! values to a [`SignalLabel`]. It is stateless: every call is evaluated
//! from scratch, with no history or hysteresis.
//!
//! Rules, first match wins:
//!
//! 1. `MACD > signal` and `RSI < oversold` → [`SignalLabel::Buy`]
//! 2. `MACD < signal` and `RSI > overbought` → [`SignalLabel::Sell`]
//! 3. otherwise → [`SignalLabel::Neutral`]
//!
//! A missing input short-circuits to `Neutral` with
//! [`SignalReason::InsufficientData`].
//!
//! # Example
//!
//! ```
//! use fxsignal::signal::{SignalClassifier, SignalLabel};
//!
//! let classifier = SignalClassifier::default();
//! let signal = classifier.classify(Some(1.2), Some(0.8), Some(25.0));
//! assert_eq!(signal.label, SignalLabel::Buy);
//! assert_eq!(signal.reason.message(), "Momentum is shifting upwards");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::indicators::macd::MacdSeries;
use crate::series::IndicatorSeries;
use crate::utils::defined;

/// Discrete trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLabel {
    /// Bullish momentum out of an oversold market.
    Buy,
    /// Bearish momentum out of an overbought market.
    Sell,
    /// No rule matched, or inputs were missing.
    Neutral,
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

/// Why a label was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalReason {
    /// MACD above its signal line while RSI is oversold.
    MomentumUp,
    /// MACD below its signal line while RSI is overbought.
    MomentumDown,
    /// Inputs present but no rule matched.
    NoClearSignal,
    /// At least one input was missing.
    InsufficientData,
}

impl SignalReason {
    /// User-facing description.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MomentumUp => "Momentum is shifting upwards",
            Self::MomentumDown => "Market is overbought and momentum is shifting downwards",
            Self::NoClearSignal => "No clear trading signal",
            Self::InsufficientData => "Insufficient data",
        }
    }
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// RSI levels bounding the oversold and overbought regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// RSI strictly below this is oversold.
    pub oversold: f64,
    /// RSI strictly above this is overbought.
    pub overbought: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl Thresholds {
    /// Checks that both levels lie in `[0, 100]` and are ordered.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` naming the offending level.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(self.oversold) {
            return Err(Error::InvalidParameter {
                name: "oversold",
                reason: "threshold must be a finite value in [0, 100]",
            });
        }
        if !in_range(self.overbought) {
            return Err(Error::InvalidParameter {
                name: "overbought",
                reason: "threshold must be a finite value in [0, 100]",
            });
        }
        if self.oversold > self.overbought {
            return Err(Error::InvalidParameter {
                name: "oversold",
                reason: "oversold threshold must not exceed overbought threshold",
            });
        }
        Ok(())
    }
}

/// A classified signal together with the inputs it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// The decision.
    pub label: SignalLabel,
    /// Why the decision was made.
    pub reason: SignalReason,
    /// MACD value used, if present.
    pub macd: Option<f64>,
    /// Signal-line value used, if present.
    pub signal_line: Option<f64>,
    /// RSI value used, if present.
    pub rsi: Option<f64>,
}

/// Stateless classifier over the latest indicator values.
///
/// Serializes as its [`Thresholds`]; deserialization validates them the
/// same way [`SignalClassifier::new`] does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Thresholds", into = "Thresholds")]
pub struct SignalClassifier {
    thresholds: Thresholds,
}

impl TryFrom<Thresholds> for SignalClassifier {
    type Error = Error;

    fn try_from(thresholds: Thresholds) -> Result<Self> {
        Self::new(thresholds)
    }
}

impl From<SignalClassifier> for Thresholds {
    fn from(classifier: SignalClassifier) -> Self {
        classifier.thresholds
    }
}

impl SignalClassifier {
    /// Creates a classifier with custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if the thresholds are invalid.
    pub fn new(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// The thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classifies one set of values. `NaN` counts as missing.
    #[must_use]
    pub fn classify(&self, macd: Option<f64>, signal_line: Option<f64>, rsi: Option<f64>) -> Signal {
        let macd = macd.and_then(defined);
        let signal_line = signal_line.and_then(defined);
        let rsi = rsi.and_then(defined);

        let (label, reason) = match (macd, signal_line, rsi) {
            (Some(m), Some(s), Some(r)) => self.decide(m, s, r),
            _ => (SignalLabel::Neutral, SignalReason::InsufficientData),
        };
        trace!(?label, ?macd, ?signal_line, ?rsi, "classified");

        Signal {
            label,
            reason,
            macd,
            signal_line,
            rsi,
        }
    }

    fn decide(&self, macd: f64, signal_line: f64, rsi: f64) -> (SignalLabel, SignalReason) {
        if macd > signal_line && rsi < self.thresholds.oversold {
            (SignalLabel::Buy, SignalReason::MomentumUp)
        } else if macd < signal_line && rsi > self.thresholds.overbought {
            (SignalLabel::Sell, SignalReason::MomentumDown)
        } else {
            (SignalLabel::Neutral, SignalReason::NoClearSignal)
        }
    }

    /// Classifies the most recent defined value of each series.
    #[must_use]
    pub fn classify_latest(&self, macd: &MacdSeries, rsi: &IndicatorSeries) -> Signal {
        let last = |series: &IndicatorSeries| series.last_defined().map(|(_, v)| v);
        self.classify(last(&macd.macd_line), last(&macd.signal_line), last(rsi))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::indicators::macd::Macd;
    use crate::indicators::rsi::Rsi;
    use crate::series::{Bar, TimeSeries};
    use chrono::NaiveDate;

    fn classifier() -> SignalClassifier {
        SignalClassifier::default()
    }

    #[test]
    fn test_buy() {
        let s = classifier().classify(Some(1.2), Some(0.8), Some(25.0));
        assert_eq!(s.label, SignalLabel::Buy);
        assert_eq!(s.reason, SignalReason::MomentumUp);
    }

    #[test]
    fn test_sell() {
        let s = classifier().classify(Some(-0.5), Some(0.1), Some(75.0));
        assert_eq!(s.label, SignalLabel::Sell);
        assert_eq!(
            s.reason.message(),
            "Market is overbought and momentum is shifting downwards"
        );
    }

    #[test]
    fn test_neutral() {
        let s = classifier().classify(Some(0.3), Some(0.3), Some(50.0));
        assert_eq!(s.label, SignalLabel::Neutral);
        assert_eq!(s.reason, SignalReason::NoClearSignal);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let c = classifier();
        assert_eq!(c.classify(Some(1.0), Some(0.0), Some(30.0)).label, SignalLabel::Neutral);
        assert_eq!(c.classify(Some(-1.0), Some(0.0), Some(70.0)).label, SignalLabel::Neutral);
    }

    #[test]
    fn test_momentum_without_extreme_rsi_is_neutral() {
        let c = classifier();
        assert_eq!(c.classify(Some(1.0), Some(0.0), Some(75.0)).label, SignalLabel::Neutral);
        assert_eq!(c.classify(Some(-1.0), Some(0.0), Some(25.0)).label, SignalLabel::Neutral);
    }

    #[test]
    fn test_missing_inputs() {
        let c = classifier();
        for s in [
            c.classify(None, Some(0.8), Some(25.0)),
            c.classify(Some(1.2), None, Some(25.0)),
            c.classify(Some(1.2), Some(0.8), None),
            c.classify(Some(1.2), Some(0.8), Some(f64::NAN)),
        ] {
            assert_eq!(s.label, SignalLabel::Neutral);
            assert_eq!(s.reason, SignalReason::InsufficientData);
            assert_eq!(s.reason.message(), "Insufficient data");
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let c = SignalClassifier::new(Thresholds {
            oversold: 40.0,
            overbought: 60.0,
        })
        .unwrap();
        assert_eq!(c.classify(Some(1.0), Some(0.5), Some(35.0)).label, SignalLabel::Buy);
        assert_eq!(c.classify(Some(0.0), Some(0.5), Some(65.0)).label, SignalLabel::Sell);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Thresholds::default().validate().is_ok());
        let bad = [
            Thresholds { oversold: -1.0, overbought: 70.0 },
            Thresholds { oversold: 30.0, overbought: 101.0 },
            Thresholds { oversold: 80.0, overbought: 20.0 },
            Thresholds { oversold: f64::NAN, overbought: 70.0 },
        ];
        for t in bad {
            assert!(matches!(
                SignalClassifier::new(t),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_classify_latest_short_series() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series: TimeSeries = (0..5)
            .zip(start.iter_days())
            .map(|(i, d)| {
                let c = 1.0 + i as f64 * 0.01;
                Bar::new(d, c, c, c, c)
            })
            .collect();
        let macd = Macd::default().compute(&series).unwrap();
        let rsi = series.indicator(vec![f64::NAN; 5]);
        let s = classifier().classify_latest(&macd, &rsi);
        assert_eq!(s.reason, SignalReason::InsufficientData);
        assert!(s.macd.is_some());
        assert!(s.rsi.is_none());
        assert!(Rsi::default().compute(&series).is_err());
    }

    #[test]
    fn test_label_display_and_serde() {
        assert_eq!(SignalLabel::Buy.to_string(), "Buy");
        assert_eq!(SignalReason::NoClearSignal.to_string(), "No clear trading signal");
        assert_eq!(serde_json::to_string(&SignalLabel::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn test_classifier_deserialize_validates_thresholds() {
        let c: SignalClassifier = serde_json::from_str(r#"{"oversold": 25.0, "overbought": 75.0}"#).unwrap();
        assert_eq!(c.thresholds(), Thresholds { oversold: 25.0, overbought: 75.0 });
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"{"oversold":25.0,"overbought":75.0}"#);

        let err = serde_json::from_str::<SignalClassifier>(r#"{"oversold": 80.0, "overbought": 20.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("oversold"), "{err}");
        assert!(serde_json::from_str::<SignalClassifier>(r#"{"overbought": 150.0}"#).is_err());
    }
}
