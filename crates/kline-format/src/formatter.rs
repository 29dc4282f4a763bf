//! Output format abstraction.

use kline_aggregate::{PivotTable, SeriesTable};
use kline_types::KlineError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;
use thiserror::Error;

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// Tab-separated values.
    Tsv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Tsv, Self::Json, Self::Ndjson, Self::Parquet]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

impl From<FormatError> for KlineError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::Io(e) => Self::Io(e),
            FormatError::Json(e) => Self::Json(e),
            other => Self::Format(other.to_string()),
        }
    }
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes a metric pivot table to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_pivot<W: Write + Send>(&self, table: &PivotTable, writer: W) -> Result<(), FormatError>;

    /// Writes a per-instrument table to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_series<W: Write + Send>(&self, table: &SeriesTable, writer: W) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

/// Renders a decimal as plain text.
///
/// With a scale the value is rounded half away from zero and printed with
/// exactly that many decimal places; without one it is printed exactly,
/// without trailing zeros.
#[must_use]
pub fn decimal_text(value: Decimal, scale: Option<u32>) -> String {
    match scale {
        Some(dp) => {
            let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.prec$}", prec = dp as usize)
        }
        None => value.normalize().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_decimal_text() {
        assert_eq!(decimal_text(d("101.500"), None), "101.5");
        assert_eq!(decimal_text(d("0.00001500"), None), "0.000015");
        assert_eq!(decimal_text(d("0"), None), "0");
        assert_eq!(decimal_text(d("302"), Some(2)), "302.00");
        assert_eq!(decimal_text(d("1.005"), Some(2)), "1.01");
        assert_eq!(decimal_text(d("12.3449"), Some(2)), "12.34");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert_eq!("pq".parse::<OutputFormat>().unwrap(), OutputFormat::Parquet);
        assert!(matches!(
            "xlsx".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_format_error_into_kline_error() {
        let err: KlineError = FormatError::Parquet("bad schema".to_string()).into();
        assert!(matches!(err, KlineError::Format(msg) if msg.contains("bad schema")));
    }
}
