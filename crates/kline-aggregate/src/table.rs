//! Export shapes: metric-pivoted tables and per-instrument tables.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use kline_types::{Category, MINUTES_PER_DAY, TradingDay};

use crate::{InstrumentSeries, MinuteBar};

/// A per-minute value exported as its own pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Opening price.
    #[serde(rename = "open")]
    Open,
    /// Highest price.
    #[serde(rename = "high")]
    High,
    /// Lowest price.
    #[serde(rename = "low")]
    Low,
    /// Closing price.
    #[serde(rename = "close")]
    Close,
    /// Aggressive buy volume.
    #[serde(rename = "buyvol")]
    BuyVolume,
    /// Aggressive sell volume.
    #[serde(rename = "sellvol")]
    SellVolume,
    /// Sum of price × volume.
    #[serde(rename = "turnover")]
    Turnover,
}

impl Metric {
    /// Returns all metrics in export order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Open,
            Self::High,
            Self::Low,
            Self::Close,
            Self::BuyVolume,
            Self::SellVolume,
            Self::Turnover,
        ]
    }

    /// Returns the lowercase key, used for directory and column names.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::BuyVolume => "buyvol",
            Self::SellVolume => "sellvol",
            Self::Turnover => "turnover",
        }
    }

    /// Returns the capitalized name used in pivot file names.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::BuyVolume => "BuyVol",
            Self::SellVolume => "SellVol",
            Self::Turnover => "TurnOver",
        }
    }

    /// Returns the fixed number of decimal places pivot values are rounded
    /// to, or `None` to print them exactly.
    #[must_use]
    pub const fn pivot_scale(&self) -> Option<u32> {
        match self {
            Self::Turnover => Some(2),
            _ => None,
        }
    }

    /// Reads this metric from a bar.
    #[must_use]
    pub const fn value(&self, bar: &MinuteBar) -> Decimal {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
            Self::BuyVolume => bar.buy_volume,
            Self::SellVolume => bar.sell_volume,
            Self::Turnover => bar.turnover,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|m| m.key().eq_ignore_ascii_case(s) || m.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown metric '{s}'"))
    }
}

/// One metric for every instrument, one row per minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotTable {
    /// The metric in the cells.
    pub metric: Metric,
    /// Column names after the timestamp, sorted by instrument id.
    pub instruments: Vec<String>,
    /// Rows in minute order.
    pub rows: Vec<PivotRow>,
}

/// One minute of a [`PivotTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    /// Minute start in epoch milliseconds.
    pub timestamp: i64,
    /// One value per instrument, in column order.
    pub values: Vec<Decimal>,
}

/// Every metric for one instrument, one row per minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesTable {
    /// Instrument identifier.
    pub instrument: String,
    /// Market category.
    pub category: Category,
    /// Trading date.
    pub date: NaiveDate,
    /// Rows in minute order.
    pub rows: Vec<BarRow>,
}

/// One minute of a [`SeriesTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarRow {
    /// Minute start in epoch milliseconds.
    pub timestamp: i64,
    /// Opening price.
    pub open: Decimal,
    /// Highest price.
    pub high: Decimal,
    /// Lowest price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Aggressive buy volume.
    #[serde(rename = "buyvol")]
    pub buy_volume: Decimal,
    /// Aggressive sell volume.
    #[serde(rename = "sellvol")]
    pub sell_volume: Decimal,
    /// Sum of price × volume.
    pub turnover: Decimal,
}

impl BarRow {
    /// Builds a row from a bar and its minute start.
    #[must_use]
    pub const fn new(timestamp: i64, bar: &MinuteBar) -> Self {
        Self {
            timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            buy_volume: bar.buy_volume,
            sell_volume: bar.sell_volume,
            turnover: bar.turnover,
        }
    }

    /// Returns the value of `metric` in this row.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Decimal {
        match metric {
            Metric::Open => self.open,
            Metric::High => self.high,
            Metric::Low => self.low,
            Metric::Close => self.close,
            Metric::BuyVolume => self.buy_volume,
            Metric::SellVolume => self.sell_volume,
            Metric::Turnover => self.turnover,
        }
    }
}

/// Everything a finalized dataset exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetExport {
    /// Market category.
    pub category: Category,
    /// Trading date.
    pub date: NaiveDate,
    /// Start of minute 0.
    pub day_start: DateTime<Utc>,
    /// One pivot per metric, in [`Metric::all`] order.
    pub pivots: Vec<PivotTable>,
    /// One table per instrument, sorted by instrument id.
    pub series: Vec<SeriesTable>,
}

impl DatasetExport {
    /// Builds the export from complete series given in column order.
    pub(crate) fn build(category: Category, day: TradingDay, series: &[&InstrumentSeries]) -> Self {
        let instruments: Vec<String> = series.iter().map(|s| s.instrument().to_string()).collect();

        let pivots = Metric::all()
            .iter()
            .map(|&metric| PivotTable {
                metric,
                instruments: instruments.clone(),
                rows: (0..MINUTES_PER_DAY)
                    .map(|minute| PivotRow {
                        timestamp: day.minute_start_millis(minute),
                        values: series.iter().map(|s| metric.value(&s.bars()[minute])).collect(),
                    })
                    .collect(),
            })
            .collect();

        let series = series
            .iter()
            .map(|s| SeriesTable {
                instrument: s.instrument().to_string(),
                category,
                date: day.date(),
                rows: s.rows().map(|(ts, bar)| BarRow::new(ts, bar)).collect(),
            })
            .collect();

        Self {
            category,
            date: day.date(),
            day_start: day.start(),
            pivots,
            series,
        }
    }

    /// Returns the pivot table for `metric`.
    #[must_use]
    pub fn pivot(&self, metric: Metric) -> Option<&PivotTable> {
        self.pivots.iter().find(|p| p.metric == metric)
    }

    /// Returns the table for `instrument`.
    #[must_use]
    pub fn series_table(&self, instrument: &str) -> Option<&SeriesTable> {
        self.series.iter().find(|s| s.instrument == instrument)
    }
}
