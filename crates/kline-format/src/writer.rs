//! Output directory layout.

use chrono::NaiveDate;
use kline_aggregate::{DatasetExport, Metric};
use kline_types::Category;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{FormatError, Formatter};

/// Writes dataset exports under an output root.
///
/// Layout, with `{catdir}` being `spotkdata` or `kdata`:
///
/// - pivots: `{root}/{catdir}/{metric}/{date}_{category}_{Metric}.{ext}`
/// - per instrument: `{root}/{catdir}/{date}/{SYMBOL}_{category}.{ext}`
#[derive(Debug, Clone)]
pub struct DatasetWriter<F> {
    root: PathBuf,
    formatter: F,
}

impl<F: Formatter> DatasetWriter<F> {
    /// Creates a writer rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, formatter: F) -> Self {
        Self {
            root: root.into(),
            formatter,
        }
    }

    /// Returns the output root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the formatter.
    #[must_use]
    pub const fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Returns the path of one metric pivot.
    #[must_use]
    pub fn pivot_path(&self, category: Category, date: NaiveDate, metric: Metric) -> PathBuf {
        self.root
            .join(category.output_dir())
            .join(metric.key())
            .join(format!(
                "{date}_{}_{}.{}",
                category.as_str(),
                metric.name(),
                self.formatter.extension()
            ))
    }

    /// Returns the path of one instrument's table.
    #[must_use]
    pub fn series_path(&self, category: Category, date: NaiveDate, instrument: &str) -> PathBuf {
        self.root
            .join(category.output_dir())
            .join(date.to_string())
            .join(format!(
                "{instrument}_{}.{}",
                category.as_str(),
                self.formatter.extension()
            ))
    }

    /// Writes every table of `export`, replacing existing files.
    ///
    /// Returns the written paths, pivots first.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be written.
    pub fn write(&self, export: &DatasetExport) -> Result<Vec<PathBuf>, FormatError> {
        let mut written = Vec::with_capacity(export.pivots.len() + export.series.len());

        for pivot in &export.pivots {
            let path = self.pivot_path(export.category, export.date, pivot.metric);
            Self::write_file(&path, |w| self.formatter.write_pivot(pivot, w))?;
            written.push(path);
        }

        for table in &export.series {
            let path = self.series_path(export.category, export.date, &table.instrument);
            Self::write_file(&path, |w| self.formatter.write_series(table, w))?;
            written.push(path);
        }

        info!(
            category = %export.category,
            date = %export.date,
            files = written.len(),
            root = %self.root.display(),
            "dataset written"
        );
        Ok(written)
    }

    fn write_file<G>(path: &Path, write: G) -> Result<(), FormatError>
    where
        G: FnOnce(&mut BufWriter<File>) -> Result<(), FormatError>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        write(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), "file written");
        Ok(())
    }
}
