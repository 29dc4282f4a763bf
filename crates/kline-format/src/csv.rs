//! CSV output format.

use kline_aggregate::{PivotTable, SeriesTable};
use std::io::Write;

use crate::{FormatError, Formatter, decimal_text};

/// CSV formatter.
///
/// Timestamps are minute starts in epoch milliseconds. Values are plain
/// decimal text; pivots of metrics with a fixed scale (turnover) are rounded
/// to it.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_pivot<W: Write + Send>(
        &self,
        table: &PivotTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;
        let scale = table.metric.pivot_scale();

        if self.include_header {
            write!(writer, "Timestamp")?;
            for instrument in &table.instruments {
                write!(writer, "{d}{instrument}")?;
            }
            writeln!(writer)?;
        }

        for row in &table.rows {
            write!(writer, "{}", row.timestamp)?;
            for value in &row.values {
                write!(writer, "{d}{}", decimal_text(*value, scale))?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    fn write_series<W: Write + Send>(
        &self,
        table: &SeriesTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "timestamp{d}open{d}high{d}low{d}close{d}buyvol{d}sellvol{d}turnover"
            )?;
        }

        for row in &table.rows {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                row.timestamp,
                decimal_text(row.open, None),
                decimal_text(row.high, None),
                decimal_text(row.low, None),
                decimal_text(row.close, None),
                decimal_text(row.buy_volume, None),
                decimal_text(row.sell_volume, None),
                decimal_text(row.turnover, None),
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
