//! Error types for fxsignal.
//!
//! Every engine is a pure function, so failures are reported synchronously
//! through [`Result`] and never leave a partially written output behind.

use thiserror::Error;

/// The main error type for fxsignal operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input series is too short to produce even one defined value.
    ///
    /// Leading bars without enough history are marked missing rather than
    /// failing; this error is only reported when *no* bar can be defined.
    #[error("insufficient data for {indicator}: required {required} bars, got {actual}")]
    InsufficientData {
        /// The number of bars required for the first defined value.
        required: usize,
        /// The number of bars provided.
        actual: usize,
        /// Name of the indicator that reported the error.
        indicator: &'static str,
    },

    /// The input series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// A window or span parameter is invalid.
    ///
    /// Raised at call time, before any computation starts.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid window or span value.
        period: usize,
        /// Description of why the value is invalid.
        reason: &'static str,
    },

    /// A non-window parameter is invalid (band multiplier, signal thresholds).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of why the value is invalid.
        reason: &'static str,
    },

    /// Failed to convert a numeric value to the target type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },

    /// Bar dates are not strictly increasing.
    #[error("bar {index} is not dated strictly after its predecessor")]
    UnorderedDates {
        /// Index of the first offending bar.
        index: usize,
    },
}

impl Error {
    /// Returns `true` for the configuration class of errors, which are
    /// detected before any computation runs.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidPeriod { .. } | Self::InvalidParameter { .. })
    }
}

/// Convenience type alias for Results using the fxsignal Error type.
pub type Result<T> = std::result::Result<T, Error>;
