//! Minute bar (one OHLCV bucket) data structure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kline_types::Trade;

/// How a minute bar got its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarState {
    /// Untouched since the series was created.
    Empty,
    /// Filled from an earlier price; no trades, zero volume.
    Carried,
    /// Received at least one trade.
    Traded,
}

/// OHLCV accumulator for one instrument and one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinuteBar {
    /// First trade price of the minute.
    pub open: Decimal,
    /// Highest trade price of the minute.
    pub high: Decimal,
    /// Lowest trade price of the minute.
    pub low: Decimal,
    /// Last trade price of the minute.
    pub close: Decimal,
    /// Volume bought by aggressive buyers.
    pub buy_volume: Decimal,
    /// Volume sold by aggressive sellers.
    pub sell_volume: Decimal,
    /// Sum of price × volume.
    pub turnover: Decimal,
    /// Number of trades applied.
    pub trade_count: u32,
    /// Timestamp (seconds) of the last trade applied, if any.
    pub last_trade: Option<i64>,
    /// True when the values were carried from an earlier bar.
    pub carried: bool,
}

impl MinuteBar {
    /// Creates a bar carrying `price` forward with zero volume.
    #[must_use]
    pub const fn carried(price: Decimal) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            buy_volume: Decimal::ZERO,
            sell_volume: Decimal::ZERO,
            turnover: Decimal::ZERO,
            trade_count: 0,
            last_trade: None,
            carried: true,
        }
    }

    /// Merges a trade into the bar.
    ///
    /// The first trade on a bar without trades resets open/high/low/close to
    /// its price, discarding any carried values.
    ///
    /// Returns `None`, leaving the bar untouched, if a volume (or their sum),
    /// the turnover or the trade count would overflow.
    #[must_use]
    pub fn apply(&mut self, trade: &Trade) -> Option<()> {
        let (buy_volume, sell_volume) = if trade.is_sell {
            (self.buy_volume, self.sell_volume.checked_add(trade.volume)?)
        } else {
            (self.buy_volume.checked_add(trade.volume)?, self.sell_volume)
        };
        buy_volume.checked_add(sell_volume)?;
        let turnover = self.turnover.checked_add(trade.notional()?)?;
        let trade_count = self.trade_count.checked_add(1)?;

        let price = trade.price;
        if self.last_trade.is_none() {
            self.open = price;
            self.high = price;
            self.low = price;
            self.carried = false;
        } else {
            self.high = self.high.max(price);
            self.low = self.low.min(price);
        }
        self.close = price;
        self.buy_volume = buy_volume;
        self.sell_volume = sell_volume;
        self.turnover = turnover;
        self.trade_count = trade_count;
        self.last_trade = Some(trade.timestamp);
        Some(())
    }

    /// Returns the bar's state.
    #[must_use]
    pub const fn state(&self) -> BarState {
        if self.last_trade.is_some() {
            BarState::Traded
        } else if self.carried {
            BarState::Carried
        } else {
            BarState::Empty
        }
    }

    /// Returns true if the bar received no trade directly.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last_trade.is_none()
    }

    /// Returns true if the bar holds neither trades nor carried values.
    #[must_use]
    pub const fn is_vacant(&self) -> bool {
        self.last_trade.is_none() && !self.carried
    }

    /// Returns true if the bar holds only carried values.
    #[must_use]
    pub const fn is_carried(&self) -> bool {
        matches!(self.state(), BarState::Carried)
    }

    /// Returns the total traded volume (buy + sell).
    #[must_use]
    pub fn volume(&self) -> Decimal {
        self.buy_volume + self.sell_volume
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Returns the volume-weighted average price, if anything traded.
    #[must_use]
    pub fn vwap(&self) -> Option<Decimal> {
        let volume = self.volume();
        if volume.is_zero() {
            return None;
        }
        self.turnover.checked_div(volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn trade(ts: i64, price: &str, volume: &str, is_sell: bool) -> Trade {
        Trade::new(ts as u64, d(price), d(volume), ts, is_sell)
    }

    #[test]
    fn test_first_trade_sets_all_prices() {
        let mut bar = MinuteBar::default();
        assert_eq!(bar.state(), BarState::Empty);

        bar.apply(&trade(5, "100", "1", false)).unwrap();

        assert_eq!(bar.state(), BarState::Traded);
        assert_eq!((bar.open, bar.high, bar.low, bar.close), (d("100"), d("100"), d("100"), d("100")));
        assert_eq!(bar.last_trade, Some(5));
    }

    #[test]
    fn test_ohlc_tracks_extremes_and_order() {
        let prices = ["10.5", "12.25", "9.75", "11", "10"];
        let mut bar = MinuteBar::default();
        for (i, price) in prices.iter().enumerate() {
            bar.apply(&trade(i as i64, price, "1", false)).unwrap();
        }

        assert_eq!(bar.open, d("10.5"));
        assert_eq!(bar.high, d("12.25"));
        assert_eq!(bar.low, d("9.75"));
        assert_eq!(bar.close, d("10"));
        assert_eq!(bar.trade_count, 5);
    }

    #[test]
    fn test_volume_conservation() {
        let mut bar = MinuteBar::default();
        bar.apply(&trade(1, "100", "0.1", false)).unwrap();
        bar.apply(&trade(2, "101", "0.2", true)).unwrap();
        bar.apply(&trade(3, "102", "0.3", false)).unwrap();
        bar.apply(&trade(4, "103", "0.4", true)).unwrap();

        assert_eq!(bar.buy_volume, d("0.4"));
        assert_eq!(bar.sell_volume, d("0.6"));
        assert_eq!(bar.volume(), d("1.0"));
        // 10 + 20.2 + 30.6 + 41.2
        assert_eq!(bar.turnover, d("102.0"));
    }

    #[test]
    fn test_trade_replaces_carried_values() {
        let mut bar = MinuteBar::carried(d("50"));
        assert!(bar.is_carried());
        assert!(bar.is_empty());
        assert!(!bar.is_vacant());

        bar.apply(&trade(1, "52", "2", true)).unwrap();

        assert!(!bar.is_carried());
        assert_eq!(bar.open, d("52"));
        assert_eq!(bar.low, d("52"));
        assert_eq!(bar.sell_volume, d("2"));
    }

    #[test]
    fn test_overflow_leaves_bar_untouched() {
        let mut bar = MinuteBar::default();
        bar.apply(&Trade::new(1, Decimal::ONE, Decimal::MAX, 1, false)).unwrap();

        assert_eq!(bar.apply(&Trade::new(2, d("2"), Decimal::MAX, 2, false)), None);
        assert_eq!(bar.buy_volume, Decimal::MAX);
        assert_eq!(bar.close, Decimal::ONE);
        assert_eq!(bar.trade_count, 1);
        assert_eq!(bar.last_trade, Some(1));

        assert_eq!(bar.apply(&Trade::new(3, Decimal::ONE, Decimal::ONE, 3, true)), None);
        assert!(bar.sell_volume.is_zero());
    }

    #[test]
    fn test_total_volume_overflow() {
        let mut bar = MinuteBar::default();
        bar.apply(&Trade::new(1, d("0.5"), Decimal::MAX, 1, false)).unwrap();

        // Turnover fits, buy plus sell volume does not.
        assert_eq!(bar.apply(&Trade::new(2, d("0.1"), Decimal::ONE, 2, true)), None);
        assert!(bar.sell_volume.is_zero());
        assert_eq!(bar.volume(), Decimal::MAX);
    }

    #[test]
    fn test_vwap() {
        let mut bar = MinuteBar::carried(d("1"));
        assert_eq!(bar.vwap(), None);

        bar.apply(&trade(1, "10", "1", false)).unwrap();
        bar.apply(&trade(2, "20", "3", false)).unwrap();
        assert_eq!(bar.vwap(), Some(d("17.5")));
        assert_eq!(bar.range(), d("10"));
    }
}
