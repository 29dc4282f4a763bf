//! Per-day collection of instrument series.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info};

use kline_types::{Category, DayBoundary, KlineError, Result, Trade, TradingDay};

use crate::{DatasetExport, InstrumentSeries, PreviousDayLookup};

/// What a dataset is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Trading date.
    pub date: NaiveDate,
    /// Market category of every instrument in the dataset.
    pub category: Category,
    /// Where trading days start.
    pub boundary: DayBoundary,
}

impl DatasetConfig {
    /// Creates a dataset configuration.
    #[must_use]
    pub const fn new(date: NaiveDate, category: Category, boundary: DayBoundary) -> Self {
        Self {
            date,
            category,
            boundary,
        }
    }
}

/// Every instrument series of one category for one trading day.
///
/// Lifecycle: trades are added (series are created on first sight), then
/// [`finalize`](Self::finalize) is called exactly once, then the dataset can
/// be exported any number of times.
#[derive(Debug)]
pub struct DailyDataset<L> {
    category: Category,
    day: TradingDay,
    boundary: DayBoundary,
    series: Vec<InstrumentSeries>,
    index: BTreeMap<String, usize>,
    lookup: L,
    finalized: bool,
}

impl<L: PreviousDayLookup> DailyDataset<L> {
    /// Creates an empty dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the day boundary is invalid.
    pub fn new(config: DatasetConfig, lookup: L) -> Result<Self> {
        let day = config.boundary.trading_day(config.date)?;
        Ok(Self {
            category: config.category,
            day,
            boundary: config.boundary,
            series: Vec::new(),
            index: BTreeMap::new(),
            lookup,
            finalized: false,
        })
    }

    /// Returns the market category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the trading day.
    #[must_use]
    pub const fn day(&self) -> TradingDay {
        self.day
    }

    /// Returns the trading date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.day.date()
    }

    /// Returns the previous-day lookup.
    #[must_use]
    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Returns the number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if no instrument has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Returns true once [`finalize`](Self::finalize) has run.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns the series for `instrument`.
    #[must_use]
    pub fn get(&self, instrument: &str) -> Option<&InstrumentSeries> {
        self.index.get(instrument).map(|&slot| &self.series[slot])
    }

    /// Iterates series sorted by instrument id.
    pub fn iter(&self) -> impl Iterator<Item = &InstrumentSeries> + '_ {
        self.index.values().map(|&slot| &self.series[slot])
    }

    /// Returns the instrument ids, sorted.
    pub fn instruments(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    /// Ensures a series exists for `instrument`, even if it never trades.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::InvalidState`] after finalize.
    pub fn register(&mut self, instrument: &str) -> Result<&InstrumentSeries> {
        if self.finalized {
            return Err(KlineError::InvalidState("instrument registered after finalize"));
        }
        let existing = self.index.get(instrument).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => self.insert(instrument),
        };
        Ok(&self.series[slot])
    }

    /// Routes a trade to its instrument's series.
    ///
    /// Returns the minute slot the trade landed in.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Range`] if the trade belongs to another day,
    /// [`KlineError::Lookup`] if a needed previous-day seed is unavailable,
    /// [`KlineError::Overflow`] if the bar's volume or turnover would overflow
    /// and [`KlineError::InvalidState`] after finalize.
    pub fn add_trade(&mut self, instrument: &str, trade: &Trade) -> Result<usize> {
        if self.finalized {
            return Err(KlineError::InvalidState("trade added after finalize"));
        }

        let existing = self.index.get(instrument).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let start = self.boundary.day_start_for(trade.timestamp)?;
                if start != self.day.start() {
                    return Err(KlineError::Range {
                        instrument: instrument.to_string(),
                        timestamp: trade.timestamp,
                        day_start: self.day.start(),
                        offset_minutes: self.day.minute_offset(trade.timestamp),
                    });
                }
                self.insert(instrument)
            }
        };

        self.series[slot].add_trade(trade, &self.lookup)
    }

    /// Closes the trailing gaps of every series.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Lookup`] if a series without trades cannot be
    /// seeded, and [`KlineError::InvalidState`] when called twice.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(KlineError::InvalidState("dataset finalized twice"));
        }
        for series in &mut self.series {
            series.fill_trailing_gaps(&self.lookup)?;
        }
        self.finalized = true;

        info!(
            category = %self.category,
            date = %self.day.date(),
            instruments = self.series.len(),
            trades = self.series.iter().map(InstrumentSeries::trade_count).sum::<u64>(),
            "dataset finalized"
        );
        Ok(())
    }

    /// Exports the pivot and per-instrument tables.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::InvalidState`] before finalize and
    /// [`KlineError::EmptyDataset`] when there is no instrument.
    pub fn export(&self) -> Result<DatasetExport> {
        if !self.finalized {
            return Err(KlineError::InvalidState("dataset exported before finalize"));
        }
        if self.series.is_empty() {
            return Err(KlineError::EmptyDataset {
                category: self.category,
                date: self.day.date(),
            });
        }

        let series: Vec<&InstrumentSeries> = self.iter().collect();
        Ok(DatasetExport::build(self.category, self.day, &series))
    }

    fn insert(&mut self, instrument: &str) -> usize {
        debug!(instrument, category = %self.category, "new series");
        let slot = self.series.len();
        self.series
            .push(InstrumentSeries::new(instrument, self.category, self.day));
        self.index.insert(instrument.to_string(), slot);
        slot
    }
}
