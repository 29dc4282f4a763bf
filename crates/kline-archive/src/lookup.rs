//! Previous-day lookup backed by the archive tree.

use chrono::NaiveDate;
use tracing::debug;

use kline_aggregate::PreviousDayLookup;
use kline_types::{Category, KlineError, Result, Trade};

use crate::{ArchiveLayout, TradeArchive};

/// Reads the last line of the previous day's archive.
#[derive(Debug, Clone)]
pub struct ArchiveLookup {
    layout: ArchiveLayout,
}

impl ArchiveLookup {
    /// Creates a lookup over `layout`.
    #[must_use]
    pub const fn new(layout: ArchiveLayout) -> Self {
        Self { layout }
    }

    /// Returns the archive layout.
    #[must_use]
    pub const fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }
}

impl PreviousDayLookup for ArchiveLookup {
    fn last_trade(&self, instrument: &str, category: Category, date: NaiveDate) -> Result<Trade> {
        let path = self.layout.archive_path(instrument, category, date);
        debug!(path = %path.display(), "reading previous-day archive");

        let lookup_error = |message: String| KlineError::Lookup {
            instrument: instrument.to_string(),
            category,
            date,
            message,
        };

        if !path.is_file() {
            return Err(lookup_error(format!("missing archive {}", path.display())));
        }

        TradeArchive::open(&path)
            .and_then(|mut archive| archive.last_trade())
            .map_err(|e| lookup_error(e.to_string()))?
            .ok_or_else(|| lookup_error(format!("no trades in {}", path.display())))
    }
}
