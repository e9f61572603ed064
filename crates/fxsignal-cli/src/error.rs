//! CLI error types for file I/O, CSV parsing and export, configuration and
//! analysis.
//!
//! Messages are meant to be actionable: they say what went wrong and, where
//! possible, how to fix it.

use std::io;

use thiserror::Error;

/// CLI error type encompassing all possible error conditions.
#[derive(Debug, Error)]
pub enum CliError {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error{}: {source}", path.as_deref().map(|p| format!(" with file '{p}'")).unwrap_or_default())]
    Io {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },

    /// The input CSV could not be parsed.
    #[error(
        "CSV parse error{}: {message}. Expected a date column and numeric open, high, low, close columns",
        line.map(|l| format!(" on line {l}")).unwrap_or_default()
    )]
    CsvParse {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred, if known.
        line: Option<u64>,
    },

    /// The processed data could not be written as CSV.
    #[error("failed to write processed data: {0}")]
    Export(#[source] csv::Error),

    /// The analysis core rejected the input or the configuration.
    #[error("analysis error: {0}")]
    Analysis(#[from] fxsignal::Error),

    /// An invalid argument was provided.
    #[error("invalid argument '{argument}': {reason}{}", suggestion.as_deref().map(|s| format!(". {s}")).unwrap_or_default())]
    InvalidArgument {
        /// Name of the invalid argument.
        argument: String,
        /// Description of why it is invalid.
        reason: String,
        /// Suggestion for valid values.
        suggestion: Option<String>,
    },

    /// The JSON configuration file could not be read.
    #[error("invalid config file '{path}': {source}")]
    Config {
        /// Path of the config file.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io_at(source: io::Error, path: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }

    /// Process exit code for this error: 2 for usage problems, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::Config { .. } => 2,
            Self::Analysis(err) if err.is_configuration() => 2,
            _ => 1,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::CsvParse {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
