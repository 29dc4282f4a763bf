//! Archive directory layout.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use kline_types::Category;

/// Separator between the symbol and the date in archive file names.
pub const ARCHIVE_MARKER: &str = "-aggTrades-";

/// Extension of archive files.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Daily aggregated-trade archives on disk.
///
/// Layout: `{root}/{category}/{YYYY-MM-DD}/{SYMBOL}-aggTrades-{YYYY-MM-DD}.zip`
///
/// # Example
///
/// ```
/// use kline_archive::ArchiveLayout;
/// use kline_types::Category;
/// use chrono::NaiveDate;
///
/// let layout = ArchiveLayout::new("/data/bn");
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let path = layout.archive_path("BTCUSDT", Category::UsdMargined, date);
/// assert_eq!(
///     path.to_str().unwrap(),
///     "/data/bn/um/2024-01-15/BTCUSDT-aggTrades-2024-01-15.zip"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding every day of `category`.
    #[must_use]
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Returns the directory holding the archives of one day.
    #[must_use]
    pub fn day_dir(&self, category: Category, date: NaiveDate) -> PathBuf {
        self.category_dir(category).join(date.to_string())
    }

    /// Returns the archive path of one instrument and day.
    #[must_use]
    pub fn archive_path(&self, instrument: &str, category: Category, date: NaiveDate) -> PathBuf {
        self.day_dir(category, date)
            .join(archive_file_name(instrument, date))
    }
}

/// Builds the archive file name of one instrument and day.
#[must_use]
pub fn archive_file_name(instrument: &str, date: NaiveDate) -> String {
    format!("{instrument}{ARCHIVE_MARKER}{date}.{ARCHIVE_EXTENSION}")
}

/// Extracts the instrument symbol from an archive file name.
///
/// Returns `None` for names that are not archives.
#[must_use]
pub fn symbol_from_file_name(name: &str) -> Option<&str> {
    let stem = name.strip_suffix(ARCHIVE_EXTENSION)?.strip_suffix('.')?;
    let (symbol, _) = stem.split_once(ARCHIVE_MARKER)?;
    (!symbol.is_empty()).then_some(symbol)
}
