//! JSON output format.

use kline_aggregate::{PivotTable, SeriesTable};
use serde_json::{Map, Value};
use std::io::Write;

use crate::{FormatError, Formatter, decimal_text};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Each minute becomes one object. Decimals are written as strings so no
/// precision is lost.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_records<W, T>(&self, records: &[T], mut writer: W) -> Result<(), FormatError>
    where
        W: Write,
        T: serde::Serialize,
    {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, records)?;
                } else {
                    serde_json::to_writer(&mut writer, records)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_pivot<W: Write + Send>(&self, table: &PivotTable, writer: W) -> Result<(), FormatError> {
        let scale = table.metric.pivot_scale();
        let records: Vec<Map<String, Value>> = table
            .rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert("timestamp".to_string(), Value::from(row.timestamp));
                for (instrument, value) in table.instruments.iter().zip(&row.values) {
                    record.insert(instrument.clone(), Value::String(decimal_text(*value, scale)));
                }
                record
            })
            .collect();

        self.write_records(&records, writer)
    }

    fn write_series<W: Write + Send>(&self, table: &SeriesTable, writer: W) -> Result<(), FormatError> {
        self.write_records(&table.rows, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_export;
    use kline_aggregate::Metric;
    use std::io::Cursor;

    #[test]
    fn test_json_pivot_array() {
        let export = sample_export();
        let mut output = Cursor::new(Vec::new());

        JsonFormatter::new()
            .write_pivot(export.pivot(Metric::Turnover).unwrap(), &mut output)
            .unwrap();

        let parsed: Value = serde_json::from_slice(&output.into_inner()).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 1440);
        assert_eq!(rows[0]["timestamp"], 1_704_067_200_000_i64);
        assert_eq!(rows[0]["BTCUSDT"], "302.00");
        assert_eq!(rows[0]["ADAUSDT"], "5.00");
    }

    #[test]
    fn test_ndjson_series() {
        let export = sample_export();
        let formatter = JsonFormatter::ndjson();
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_series(export.series_table("BTCUSDT").unwrap(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 1440);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["timestamp"], 1_704_067_200_000_i64);
        assert_eq!(first["sellvol"], "2");
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let export = sample_export();
        let mut output = Cursor::new(Vec::new());

        JsonFormatter::new()
            .with_pretty(true)
            .write_series(export.series_table("ADAUSDT").unwrap(), &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with('['));
        assert!(result.contains("  ")); // Indentation
    }
}
