//! Day ingestion: archive discovery and dataset building.

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use kline_aggregate::{DailyDataset, DatasetConfig, PreviousDayLookup};
use kline_types::{Category, Result};

use crate::{ArchiveLayout, ArchiveLookup, TradeArchive, layout::symbol_from_file_name};

/// One instrument's archive for a day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveEntry {
    /// Instrument symbol taken from the file name.
    pub instrument: String,
    /// Path to the archive.
    pub path: PathBuf,
}

/// Progress report after one archive has been ingested.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveProgress<'a> {
    /// Number of archives ingested so far, including this one.
    pub position: usize,
    /// Number of archives in the day.
    pub total: usize,
    /// The archive just ingested.
    pub entry: &'a ArchiveEntry,
    /// Trades read from it.
    pub trades: u64,
}

/// Lists the archives of one day, sorted by file name.
///
/// Sub-directories and files that are not archives are skipped.
///
/// # Errors
///
/// Returns an I/O error if the day directory cannot be read.
pub fn day_archives(
    layout: &ArchiveLayout,
    category: Category,
    date: NaiveDate,
) -> Result<Vec<ArchiveEntry>> {
    let dir = layout.day_dir(category, date);
    let mut entries = Vec::new();

    for item in std::fs::read_dir(&dir)? {
        let item = item?;
        if item.file_type()?.is_dir() {
            debug!(path = %item.path().display(), "skipping directory");
            continue;
        }

        let name = item.file_name();
        match name.to_str().and_then(symbol_from_file_name) {
            Some(symbol) => entries.push(ArchiveEntry {
                instrument: symbol.to_string(),
                path: item.path(),
            }),
            None => warn!(path = %item.path().display(), "skipping non-archive file"),
        }
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(entries)
}

/// Feeds one archive into `dataset`.
///
/// The instrument is registered before any trade is read, so an archive
/// without trades still yields a series.
///
/// Returns the number of trades ingested.
///
/// # Errors
///
/// Returns the first archive, parse, range or lookup error.
pub fn ingest_archive<L: PreviousDayLookup>(
    dataset: &mut DailyDataset<L>,
    entry: &ArchiveEntry,
) -> Result<u64> {
    let mut archive = TradeArchive::open(&entry.path)?;
    dataset.register(&entry.instrument)?;

    let mut count = 0;
    for trade in archive.trades()? {
        dataset.add_trade(&entry.instrument, &trade?)?;
        count += 1;
    }

    debug!(instrument = %entry.instrument, trades = count, "archive ingested");
    Ok(count)
}

/// Builds and finalizes the dataset of one category and day.
///
/// Archives are ingested sequentially in file-name order; `on_archive` is
/// called after each one. Previous-day seeds come from the same layout.
///
/// # Errors
///
/// Returns the first error; nothing is partially built.
pub fn build_dataset<F>(
    layout: &ArchiveLayout,
    config: DatasetConfig,
    mut on_archive: F,
) -> Result<DailyDataset<ArchiveLookup>>
where
    F: FnMut(ArchiveProgress<'_>),
{
    let archives = day_archives(layout, config.category, config.date)?;
    let total = archives.len();
    info!(
        category = %config.category,
        date = %config.date,
        archives = total,
        "building dataset"
    );

    let mut dataset = DailyDataset::new(config, ArchiveLookup::new(layout.clone()))?;
    for (i, entry) in archives.iter().enumerate() {
        let trades = ingest_archive(&mut dataset, entry)?;
        on_archive(ArchiveProgress {
            position: i + 1,
            total,
            entry,
            trades,
        });
    }

    dataset.finalize()?;
    Ok(dataset)
}
