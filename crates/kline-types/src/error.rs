//! Error types for kline.

use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::Category;

/// Result type alias for kline operations.
pub type Result<T> = std::result::Result<T, KlineError>;

/// Errors that can occur while building and exporting klines.
///
/// Every variant is fatal to the run that produced it.
#[derive(Error, Debug)]
pub enum KlineError {
    /// Malformed trade line or archive content.
    #[error("Parse error in {location}: {message}")]
    Parse {
        /// Where the malformed content was found (file and line).
        location: String,
        /// What was wrong with it.
        message: String,
    },

    /// Archive contents do not have the expected shape.
    #[error("Unexpected archive contents in {}: {message}", path.display())]
    Structural {
        /// The offending archive.
        path: PathBuf,
        /// What was unexpected.
        message: String,
    },

    /// The previous day's last trade could not be obtained.
    #[error("No previous-day trade for {instrument} ({category}) on {date}: {message}")]
    Lookup {
        /// Instrument being seeded.
        instrument: String,
        /// Category of the instrument.
        category: Category,
        /// The previous day that was consulted.
        date: NaiveDate,
        /// Why the lookup failed.
        message: String,
    },

    /// A trade falls outside the trading day of its series.
    #[error(
        "Trade at {timestamp} for {instrument} is {offset_minutes} minutes from the day start {day_start}, outside 0..1440"
    )]
    Range {
        /// Instrument the trade was routed to.
        instrument: String,
        /// Trade timestamp in seconds.
        timestamp: i64,
        /// Start of the trading day.
        day_start: DateTime<Utc>,
        /// Signed minute offset of the trade from the day start.
        offset_minutes: i64,
    },

    /// A trade whose volume or turnover no longer fits in a decimal.
    #[error("Arithmetic overflow applying trade at {timestamp} to {instrument}")]
    Overflow {
        /// Instrument the trade was routed to.
        instrument: String,
        /// Trade timestamp in seconds.
        timestamp: i64,
    },

    /// A timestamp that cannot be represented as a date.
    #[error("Timestamp {0} is out of range")]
    Timestamp(i64),

    /// Operation called at the wrong point of the dataset lifecycle.
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Export of a dataset without instruments.
    #[error("No instruments to export for {category} on {date}")]
    EmptyDataset {
        /// Category of the dataset.
        category: Category,
        /// Trading date of the dataset.
        date: NaiveDate,
    },

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KlineError {
    /// Creates a parse error for `location`.
    pub fn parse(location: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Creates a structural error for the archive at `path`.
    pub fn structural(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Structural {
            path: path.into(),
            message: message.into(),
        }
    }
}
