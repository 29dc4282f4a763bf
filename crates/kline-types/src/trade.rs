//! Trade record representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single aggregated trade.
///
/// Timestamps are whole seconds since the Unix epoch; sources that report
/// milliseconds go through [`Trade::from_millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Sequence id assigned by the exchange (traceability only).
    pub id: u64,
    /// Execution price.
    pub price: Decimal,
    /// Executed quantity.
    pub volume: Decimal,
    /// Execution time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// True when the aggressor was the seller.
    pub is_sell: bool,
}

impl Trade {
    /// Creates a new trade from a timestamp in seconds.
    #[must_use]
    pub const fn new(id: u64, price: Decimal, volume: Decimal, timestamp: i64, is_sell: bool) -> Self {
        Self {
            id,
            price,
            volume,
            timestamp,
            is_sell,
        }
    }

    /// Creates a new trade from a timestamp in milliseconds.
    ///
    /// The timestamp is truncated to whole seconds.
    #[must_use]
    pub const fn from_millis(
        id: u64,
        price: Decimal,
        volume: Decimal,
        timestamp_ms: u64,
        is_sell: bool,
    ) -> Self {
        Self::new(id, price, volume, (timestamp_ms / 1000) as i64, is_sell)
    }

    /// Returns the notional value of the trade (price × volume), or `None`
    /// if the product does not fit in a [`Decimal`].
    #[must_use]
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.volume)
    }

    /// Returns true if the aggressor was the buyer.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        !self.is_sell
    }

    /// Returns the execution time as a UTC datetime, if representable.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = if self.is_sell { "sell" } else { "buy" };
        write!(
            f,
            "#{} {} {} @ {} (t={})",
            self.id, side, self.volume, self.price, self.timestamp
        )
    }
}
