//! Dense per-instrument minute series with carry-forward filling.

use rust_decimal::Decimal;
use tracing::debug;

use kline_types::{Category, KlineError, MINUTES_PER_DAY, Result, Trade, TradingDay};

use crate::{MinuteBar, PreviousDayLookup};

/// The 1440 minute bars of one instrument for one trading day.
///
/// Bars between trades are carried forward from the nearest earlier bar.
/// When no earlier bar exists the series is seeded from the previous day's
/// last trade, fetched at most once.
#[derive(Debug, Clone)]
pub struct InstrumentSeries {
    instrument: String,
    category: Category,
    day: TradingDay,
    bars: Vec<MinuteBar>,
    seed: Option<Decimal>,
    trade_count: u64,
}

impl InstrumentSeries {
    /// Creates a series with every bar empty.
    #[must_use]
    pub fn new(instrument: impl Into<String>, category: Category, day: TradingDay) -> Self {
        Self {
            instrument: instrument.into(),
            category,
            day,
            bars: vec![MinuteBar::default(); MINUTES_PER_DAY],
            seed: None,
            trade_count: 0,
        }
    }

    /// Returns the instrument identifier.
    #[must_use]
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Returns the market category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the trading day the series spans.
    #[must_use]
    pub const fn day(&self) -> TradingDay {
        self.day
    }

    /// Returns all bars in minute order.
    #[must_use]
    pub fn bars(&self) -> &[MinuteBar] {
        &self.bars
    }

    /// Returns the bar for minute `index`.
    #[must_use]
    pub fn bar(&self, index: usize) -> Option<&MinuteBar> {
        self.bars.get(index)
    }

    /// Returns the number of trades ingested.
    #[must_use]
    pub const fn trade_count(&self) -> u64 {
        self.trade_count
    }

    /// Returns the previous-day seed price, if one was needed.
    #[must_use]
    pub const fn seed(&self) -> Option<Decimal> {
        self.seed
    }

    /// Returns the number of minutes that received trades.
    #[must_use]
    pub fn traded_minutes(&self) -> usize {
        self.bars.iter().filter(|bar| !bar.is_empty()).count()
    }

    /// Returns true when every bar holds a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.bars.iter().all(|bar| !bar.is_vacant())
    }

    /// Iterates bars paired with their minute start in epoch milliseconds.
    pub fn rows(&self) -> impl Iterator<Item = (i64, &MinuteBar)> + '_ {
        self.bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (self.day.minute_start_millis(i), bar))
    }

    /// Returns the minute slot of `timestamp` (seconds).
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Range`] if the timestamp lies outside the day.
    pub fn minute_index(&self, timestamp: i64) -> Result<usize> {
        self.day.minute_index(timestamp).ok_or_else(|| KlineError::Range {
            instrument: self.instrument.clone(),
            timestamp,
            day_start: self.day.start(),
            offset_minutes: self.day.minute_offset(timestamp),
        })
    }

    /// Applies a trade and backfills the empty minutes before it.
    ///
    /// Returns the minute slot the trade landed in. On error the series is
    /// left as it was, apart from a previous-day seed that was fetched.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Range`] for trades outside the day,
    /// [`KlineError::Lookup`] when a previous-day seed is needed but
    /// unavailable and [`KlineError::Overflow`] when the minute's volume or
    /// turnover no longer fits.
    pub fn add_trade<L>(&mut self, trade: &Trade, lookup: &L) -> Result<usize>
    where
        L: PreviousDayLookup + ?Sized,
    {
        let minute = self.minute_index(trade.timestamp)?;

        let first = self.vacant_run_start(minute);
        let carry = match first {
            f if f == minute => None,
            0 => Some(self.previous_close(lookup)?),
            f => Some(self.bars[f - 1].close),
        };

        self.bars[minute]
            .apply(trade)
            .ok_or_else(|| KlineError::Overflow {
                instrument: self.instrument.clone(),
                timestamp: trade.timestamp,
            })?;
        self.trade_count += 1;

        if let Some(close) = carry {
            for bar in &mut self.bars[first..minute] {
                *bar = MinuteBar::carried(close);
            }
        }
        self.recarry_after(minute);
        Ok(minute)
    }

    /// Carries the last known price through every empty minute at the end
    /// of the day.
    ///
    /// A series without any bar is seeded entirely from the previous day.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Lookup`] when the previous-day seed is needed
    /// but unavailable.
    pub fn fill_trailing_gaps<L>(&mut self, lookup: &L) -> Result<()>
    where
        L: PreviousDayLookup + ?Sized,
    {
        let (from, close) = match self.bars.iter().rposition(|bar| !bar.is_vacant()) {
            Some(last) => (last + 1, self.bars[last].close),
            None => (0, self.previous_close(lookup)?),
        };

        for bar in &mut self.bars[from..] {
            *bar = MinuteBar::carried(close);
        }
        Ok(())
    }

    /// Returns the start of the run of vacant bars ending just before
    /// `minute`, or `minute` itself when there is none.
    fn vacant_run_start(&self, minute: usize) -> usize {
        let mut first = minute;
        while first > 0 && self.bars[first - 1].is_vacant() {
            first -= 1;
        }
        first
    }

    /// Re-carries the carried run right after `minute` from its new close.
    ///
    /// Only does work when trades arrive out of time order.
    fn recarry_after(&mut self, minute: usize) {
        let close = self.bars[minute].close;
        for bar in &mut self.bars[minute + 1..] {
            if !bar.is_carried() {
                break;
            }
            *bar = MinuteBar::carried(close);
        }
    }

    fn previous_close<L>(&mut self, lookup: &L) -> Result<Decimal>
    where
        L: PreviousDayLookup + ?Sized,
    {
        if let Some(seed) = self.seed {
            return Ok(seed);
        }

        let date = self.day.previous_date().ok_or_else(|| KlineError::Lookup {
            instrument: self.instrument.clone(),
            category: self.category,
            date: self.day.date(),
            message: "no previous date".to_string(),
        })?;
        debug!(
            instrument = %self.instrument,
            category = %self.category,
            %date,
            "seeding series from previous day"
        );

        let trade = lookup.last_trade(&self.instrument, self.category, date)?;
        self.seed = Some(trade.price);
        Ok(trade.price)
    }
}
