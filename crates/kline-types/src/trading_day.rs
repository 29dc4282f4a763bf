//! Trading day boundaries and minute indexing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{KlineError, Result};

/// Number of one-minute slots in a trading day.
pub const MINUTES_PER_DAY: usize = 1440;

/// Number of seconds in one minute slot.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// The fixed instant at which every trading day starts.
///
/// A day starts at `hour:00` local time in a fixed UTC offset. The default
/// (08:00 at UTC+8) coincides with midnight UTC, which is where the exchange
/// cuts its daily archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DayBoundary {
    /// Offset of the boundary's local time from UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// Local hour at which the day starts.
    pub hour: u32,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 8 * 60,
            hour: 8,
        }
    }
}

impl DayBoundary {
    /// Creates a validated day boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour is not in `0..24` or the offset is not
    /// strictly within one day.
    pub fn new(utc_offset_minutes: i32, hour: u32) -> Result<Self> {
        let boundary = Self {
            utc_offset_minutes,
            hour,
        };
        boundary.validate()?;
        Ok(boundary)
    }

    /// A boundary at midnight UTC.
    #[must_use]
    pub const fn utc_midnight() -> Self {
        Self {
            utc_offset_minutes: 0,
            hour: 0,
        }
    }

    /// Checks that the boundary describes a real instant.
    ///
    /// # Errors
    ///
    /// Returns [`KlineError::Config`] describing the invalid field.
    pub fn validate(&self) -> Result<()> {
        self.offset()?;
        self.local_time()?;
        Ok(())
    }

    fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            KlineError::Config(format!(
                "utc_offset_minutes {} is out of range",
                self.utc_offset_minutes
            ))
        })
    }

    fn local_time(&self) -> Result<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, 0, 0)
            .ok_or_else(|| KlineError::Config(format!("boundary hour {} is not in 0..24", self.hour)))
    }

    /// Returns the instant at which the trading day `date` starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is invalid.
    pub fn start_of(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        let offset = self.offset()?;
        let local = date.and_time(self.local_time()?);
        offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| KlineError::Config(format!("no boundary instant for {date}")))
    }

    /// Returns the trading date a timestamp (seconds) belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is invalid or the timestamp cannot be
    /// represented.
    pub fn trading_date_for(&self, timestamp: i64) -> Result<NaiveDate> {
        let offset = self.offset()?;
        let utc = DateTime::from_timestamp(timestamp, 0).ok_or(KlineError::Timestamp(timestamp))?;
        let local = utc.with_timezone(&offset);
        let date = local.date_naive();
        if local.time() < self.local_time()? {
            date.pred_opt().ok_or(KlineError::Timestamp(timestamp))
        } else {
            Ok(date)
        }
    }

    /// Returns the start of the trading day containing `timestamp`.
    ///
    /// # Errors
    ///
    /// See [`DayBoundary::trading_date_for`].
    pub fn day_start_for(&self, timestamp: i64) -> Result<DateTime<Utc>> {
        self.start_of(self.trading_date_for(timestamp)?)
    }

    /// Builds the [`TradingDay`] for `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is invalid.
    pub fn trading_day(&self, date: NaiveDate) -> Result<TradingDay> {
        Ok(TradingDay::new(date, self.start_of(date)?))
    }
}

impl std::fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.utc_offset_minutes < 0 { '-' } else { '+' };
        let abs = self.utc_offset_minutes.unsigned_abs();
        write!(f, "{:02}:00 UTC{}{:02}:{:02}", self.hour, sign, abs / 60, abs % 60)
    }
}

/// One trading day: its calendar date and the instant its minute 0 starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradingDay {
    date: NaiveDate,
    start: DateTime<Utc>,
}

impl TradingDay {
    /// Creates a trading day starting at `start`.
    #[must_use]
    pub const fn new(date: NaiveDate, start: DateTime<Utc>) -> Self {
        Self { date, start }
    }

    /// Returns the calendar date of the day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the instant minute 0 starts.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the instant the next trading day starts.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + TimeDelta::days(1)
    }

    /// Returns the previous calendar date.
    #[must_use]
    pub fn previous_date(&self) -> Option<NaiveDate> {
        self.date.pred_opt()
    }

    /// Returns the signed minute offset of `timestamp` (seconds) from the
    /// day start, rounded towards negative infinity.
    #[must_use]
    pub fn minute_offset(&self, timestamp: i64) -> i64 {
        (timestamp - self.start.timestamp()).div_euclid(SECONDS_PER_MINUTE)
    }

    /// Returns the minute slot for `timestamp`, or `None` if it falls outside
    /// the day.
    #[must_use]
    pub fn minute_index(&self, timestamp: i64) -> Option<usize> {
        let offset = self.minute_offset(timestamp);
        if offset >= 0 && offset < MINUTES_PER_DAY as i64 {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Returns the start of minute slot `index` in epoch milliseconds.
    #[must_use]
    pub fn minute_start_millis(&self, index: usize) -> i64 {
        self.start.timestamp_millis() + index as i64 * SECONDS_PER_MINUTE * 1000
    }
}

impl std::fmt::Display for TradingDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (from {})", self.date, self.start.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_boundary_is_utc_midnight() {
        let boundary = DayBoundary::default();
        let start = boundary.start_of(date(2024, 1, 15)).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(start, DayBoundary::utc_midnight().start_of(date(2024, 1, 15)).unwrap());
    }

    #[test]
    fn test_trading_date_for() {
        let boundary = DayBoundary::new(0, 6).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 1, 15, 5, 59, 59).unwrap().timestamp();
        let after = Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap().timestamp();

        assert_eq!(boundary.trading_date_for(before).unwrap(), date(2024, 1, 14));
        assert_eq!(boundary.trading_date_for(after).unwrap(), date(2024, 1, 15));
        assert_eq!(
            boundary.day_start_for(before).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 14, 6, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_boundary() {
        assert!(matches!(DayBoundary::new(0, 24), Err(KlineError::Config(_))));
        assert!(matches!(DayBoundary::new(24 * 60, 0), Err(KlineError::Config(_))));
    }

    #[test]
    fn test_minute_index() {
        let day = DayBoundary::utc_midnight().trading_day(date(2024, 1, 1)).unwrap();
        let start = day.start().timestamp();

        assert_eq!(day.minute_index(start), Some(0));
        assert_eq!(day.minute_index(start + 59), Some(0));
        assert_eq!(day.minute_index(start + 60), Some(1));
        assert_eq!(day.minute_index(start + 86_399), Some(1439));
        assert_eq!(day.minute_index(start + 86_400), None);
        assert_eq!(day.minute_index(start - 1), None);
        assert_eq!(day.minute_offset(start - 1), -1);
    }

    #[test]
    fn test_minute_start_millis() {
        let day = DayBoundary::utc_midnight().trading_day(date(2024, 1, 1)).unwrap();
        assert_eq!(day.minute_start_millis(0), 1_704_067_200_000);
        assert_eq!(day.minute_start_millis(3), 1_704_067_380_000);
        assert_eq!(day.end().timestamp() - day.start().timestamp(), 86_400);
    }

    #[test]
    fn test_display() {
        assert_eq!(DayBoundary::default().to_string(), "08:00 UTC+08:00");
        assert_eq!(DayBoundary::new(-330, 0).unwrap().to_string(), "00:00 UTC-05:30");
    }
}
