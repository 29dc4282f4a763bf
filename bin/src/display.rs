//! Display utilities and output writing for the kline CLI.

use anyhow::Result;
use clap::ValueEnum;
use indicatif::ProgressStyle;
use kline_lib::prelude::*;
use std::path::{Path, PathBuf};

/// Output format for kline tables.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Tsv => Self::Tsv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", OutputFormat::from(*self))
    }
}

/// Progress bar style for one pipeline.
pub(crate) fn pipeline_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} archives {msg}")
        .expect("Invalid progress template")
        .progress_chars("=>-")
}

/// Writes every table of `export` under `root` in `format`.
pub(crate) fn write_export(
    export: &DatasetExport,
    root: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let paths = match format {
        OutputFormat::Csv => DatasetWriter::new(root, CsvFormatter::new()).write(export)?,
        OutputFormat::Tsv => DatasetWriter::new(root, CsvFormatter::tsv()).write(export)?,
        OutputFormat::Json => DatasetWriter::new(root, JsonFormatter::new()).write(export)?,
        OutputFormat::Ndjson => DatasetWriter::new(root, JsonFormatter::ndjson()).write(export)?,
        OutputFormat::Parquet => write_parquet(export, root)?,
    };
    Ok(paths)
}

#[cfg(feature = "parquet")]
fn write_parquet(export: &DatasetExport, root: &Path) -> Result<Vec<PathBuf>> {
    Ok(DatasetWriter::new(root, ParquetFormatter::new()).write(export)?)
}

#[cfg(not(feature = "parquet"))]
fn write_parquet(_export: &DatasetExport, _root: &Path) -> Result<Vec<PathBuf>> {
    anyhow::bail!("Parquet support not compiled in")
}

/// Formats a byte count for humans.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
