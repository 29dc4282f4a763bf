//! Previous-day fallback source.

use chrono::NaiveDate;

use kline_types::{Category, KlineError, Result, Trade};

/// Source of the last trade an instrument recorded on a given day.
///
/// Consulted when a series has no earlier bar to carry a price from. A
/// failure is fatal: an invented seed would corrupt every carried minute.
pub trait PreviousDayLookup {
    /// Returns the last trade of `instrument` in `category` on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Lookup`] if the trade cannot be obtained.
    fn last_trade(&self, instrument: &str, category: Category, date: NaiveDate) -> Result<Trade>;
}

impl<F> PreviousDayLookup for F
where
    F: Fn(&str, Category, NaiveDate) -> Result<Trade>,
{
    fn last_trade(&self, instrument: &str, category: Category, date: NaiveDate) -> Result<Trade> {
        self(instrument, category, date)
    }
}

/// Lookup that never finds a previous day.
///
/// For runs that must not reach back across days: any series needing a seed
/// fails with [`KlineError::Lookup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreviousDay;

impl PreviousDayLookup for NoPreviousDay {
    fn last_trade(&self, instrument: &str, category: Category, date: NaiveDate) -> Result<Trade> {
        Err(KlineError::Lookup {
            instrument: instrument.to_string(),
            category,
            date,
            message: "previous-day lookup is disabled".to_string(),
        })
    }
}
