//! Benchmark utilities for kline.
//!
//! Deterministic synthetic trades and archive fixtures, so benchmark runs are
//! comparable without real market data.

use chrono::NaiveDate;
use kline_lib::{ArchiveLayout, Category, Decimal, Trade, TradingDay};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Header line of an aggregated-trade CSV entry.
pub const HEADER: &str =
    "agg_trade_id,price,quantity,first_trade_id,last_trade_id,transact_time,is_buyer_maker";

/// Deterministic random-walk trade generator.
#[derive(Debug, Clone)]
pub struct TradeGenerator {
    state: u64,
    price_cents: i64,
    next_id: u64,
}

impl TradeGenerator {
    /// Creates a generator seeded with `seed`, starting at `price_cents / 100`.
    pub fn new(seed: u64, price_cents: i64) -> Self {
        Self {
            state: seed.max(1),
            price_cents,
            next_id: 1,
        }
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns one trade at `timestamp` (seconds).
    pub fn trade(&mut self, timestamp: i64) -> Trade {
        let r = self.next_u64();
        let step = (r % 21) as i64 - 10;
        self.price_cents = (self.price_cents + step).max(1);

        let id = self.next_id;
        self.next_id += 1;
        Trade::new(
            id,
            Decimal::new(self.price_cents, 2),
            Decimal::new(((r >> 8) % 100_000 + 1) as i64, 5),
            timestamp,
            r & (1 << 40) != 0,
        )
    }

    /// Returns `count` trades spread evenly over `day`, in time order.
    pub fn day(&mut self, day: &TradingDay, count: usize) -> Vec<Trade> {
        let start = day.start().timestamp();
        let count = count.max(1);
        (0..count)
            .map(|i| self.trade(start + (i as i64 * 86_400) / count as i64))
            .collect()
    }
}

/// Formats a trade as an archive line.
pub fn trade_line(trade: &Trade) -> String {
    format!(
        "{id},{price},{volume},{id},{id},{ts},{sell}",
        id = trade.id,
        price = trade.price,
        volume = trade.volume,
        ts = trade.timestamp * 1000,
        sell = trade.is_sell
    )
}

/// Writes one archive per instrument for `date` under `layout`.
///
/// # Errors
///
/// Returns an error if a file cannot be written.
pub fn write_day_archives(
    layout: &ArchiveLayout,
    category: Category,
    date: NaiveDate,
    trades: &[(String, Vec<Trade>)],
) -> io::Result<()> {
    for (symbol, trades) in trades {
        let path = layout.archive_path(symbol, category, date);
        write_archive(&path, trades)?;
    }
    Ok(())
}

fn write_archive(path: &Path, trades: &[Trade]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut zip = ZipWriter::new(File::create(path)?);
    let name = path
        .file_stem()
        .map(|s| format!("{}.csv", s.to_string_lossy()))
        .unwrap_or_else(|| "trades.csv".to_string());
    zip.start_file(name, SimpleFileOptions::default())?;
    writeln!(zip, "{HEADER}")?;
    for trade in trades {
        writeln!(zip, "{}", trade_line(trade))?;
    }
    zip.finish()?;
    Ok(())
}

/// Formats a throughput for humans.
pub fn format_rate(per_sec: f64) -> String {
    if per_sec >= 1_000_000.0 {
        format!("{:.2}M/s", per_sec / 1_000_000.0)
    } else if per_sec >= 1_000.0 {
        format!("{:.1}K/s", per_sec / 1_000.0)
    } else {
        format!("{per_sec:.0}/s")
    }
}
