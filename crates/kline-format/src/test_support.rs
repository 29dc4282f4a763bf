//! Shared fixture for formatter tests.

use chrono::NaiveDate;
use kline_aggregate::{DailyDataset, DatasetConfig, DatasetExport, NoPreviousDay};
use kline_types::{Category, DayBoundary, Trade};
use rust_decimal::Decimal;
use std::str::FromStr;

const DAY_START: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

fn trade(offset_secs: i64, price: &str, volume: &str, is_sell: bool) -> Trade {
    Trade::new(
        1,
        Decimal::from_str(price).unwrap(),
        Decimal::from_str(volume).unwrap(),
        DAY_START + offset_secs,
        is_sell,
    )
}

/// Two futures instruments on 2024-01-01, both trading in minute 0.
pub(crate) fn sample_export() -> DatasetExport {
    let config = DatasetConfig::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        Category::UsdMargined,
        DayBoundary::default(),
    );
    let mut dataset = DailyDataset::new(config, NoPreviousDay).unwrap();
    dataset.add_trade("BTCUSDT", &trade(5, "100", "1", false)).unwrap();
    dataset.add_trade("BTCUSDT", &trade(40, "101", "2", true)).unwrap();
    dataset.add_trade("BTCUSDT", &trade(190, "99", "1", false)).unwrap();
    dataset.add_trade("ADAUSDT", &trade(12, "0.5", "10", false)).unwrap();
    dataset.finalize().unwrap();
    dataset.export().unwrap()
}
