//! Output formatters for the kline minute-bar builder.
//!
//! This crate writes exported datasets to various output formats:
//!
//! - [`CsvFormatter`] - CSV/TSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format
//! - [`DatasetWriter`] - Pivot and per-instrument file layout

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod writer;

#[cfg(feature = "parquet")]
mod parquet;

#[cfg(test)]
mod test_support;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat, decimal_text};
pub use json::{JsonFormatter, JsonStyle};
pub use writer::DatasetWriter;

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
