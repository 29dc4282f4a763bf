//! Apache Parquet output format.

use arrow::array::{ArrayRef, Float64Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use kline_aggregate::{Metric, PivotTable, SeriesTable};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
///
/// Values are stored as `Float64`; timestamps as UTC milliseconds.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn timestamp_field() -> Field {
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            false,
        )
    }

    /// Creates the Arrow schema for a pivot over `instruments`.
    fn pivot_schema(instruments: &[String]) -> Schema {
        let mut fields = vec![Self::timestamp_field()];
        fields.extend(
            instruments
                .iter()
                .map(|name| Field::new(name, DataType::Float64, false)),
        );
        Schema::new(fields)
    }

    /// Creates the Arrow schema for a per-instrument table.
    fn series_schema() -> Schema {
        let mut fields = vec![Self::timestamp_field()];
        fields.extend(
            Metric::all()
                .iter()
                .map(|metric| Field::new(metric.key(), DataType::Float64, false)),
        );
        Schema::new(fields)
    }

    fn float_column(values: impl Iterator<Item = Decimal>) -> Result<ArrayRef, FormatError> {
        let values = values
            .map(|value| {
                f64::try_from(value).map_err(|e| FormatError::Parquet(format!("{value}: {e}")))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(Arc::new(Float64Array::from(values)))
    }

    fn timestamp_column(values: impl Iterator<Item = i64>) -> ArrayRef {
        Arc::new(TimestampMillisecondArray::from(values.collect::<Vec<_>>()).with_timezone("UTC"))
    }

    /// Converts a pivot table to an Arrow RecordBatch.
    fn pivot_to_batch(table: &PivotTable) -> Result<RecordBatch, FormatError> {
        let mut columns = vec![Self::timestamp_column(table.rows.iter().map(|r| r.timestamp))];
        for i in 0..table.instruments.len() {
            columns.push(Self::float_column(table.rows.iter().map(|r| r.values[i]))?);
        }

        RecordBatch::try_new(Arc::new(Self::pivot_schema(&table.instruments)), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    /// Converts a per-instrument table to an Arrow RecordBatch.
    fn series_to_batch(table: &SeriesTable) -> Result<RecordBatch, FormatError> {
        let rows = &table.rows;
        let mut columns = vec![Self::timestamp_column(rows.iter().map(|r| r.timestamp))];
        for &metric in Metric::all() {
            columns.push(Self::float_column(rows.iter().map(|r| r.value(metric)))?);
        }

        RecordBatch::try_new(Arc::new(Self::series_schema()), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    fn write_batch<W: Write + Send>(&self, batch: &RecordBatch, writer: W) -> Result<(), FormatError> {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        arrow_writer
            .write(batch)
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_pivot<W: Write + Send>(&self, table: &PivotTable, writer: W) -> Result<(), FormatError> {
        self.write_batch(&Self::pivot_to_batch(table)?, writer)
    }

    fn write_series<W: Write + Send>(&self, table: &SeriesTable, writer: W) -> Result<(), FormatError> {
        self.write_batch(&Self::series_to_batch(table)?, writer)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
