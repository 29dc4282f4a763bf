//! Generates a markdown benchmark table of aggregation throughput.
//!
//! Run with: `cargo run -p kline-bench --bin benchmark_table --release`

use chrono::NaiveDate;
use kline_bench::{TradeGenerator, format_rate, write_day_archives};
use kline_lib::prelude::*;
use std::time::{Duration, Instant};

const ITERATIONS: u32 = 3;
const INSTRUMENTS: usize = 8;

fn main() {
    let Some(date) = NaiveDate::from_ymd_opt(2024, 6, 3) else {
        eprintln!("Invalid benchmark date");
        std::process::exit(1);
    };
    let config = DatasetConfig::new(date, Category::UsdMargined, DayBoundary::default());

    println!("Running aggregation benchmarks ({ITERATIONS} iterations each)...\n");
    println!("| Trades / instrument | Instruments | Avg Time | Throughput |");
    println!("|---------------------|-------------|----------|------------|");

    for per_instrument in [1_000usize, 10_000, 100_000] {
        match run_case(config, per_instrument) {
            Ok(avg) => {
                let total = (per_instrument * INSTRUMENTS) as f64;
                println!(
                    "| {:>19} | {:>11} | {:>7.2}s | {:>10} |",
                    per_instrument,
                    INSTRUMENTS,
                    avg.as_secs_f64(),
                    format_rate(total / avg.as_secs_f64().max(f64::EPSILON))
                );
            }
            Err(e) => eprintln!("Benchmark with {per_instrument} trades failed: {e}"),
        }
    }
}

fn run_case(
    config: DatasetConfig,
    per_instrument: usize,
) -> std::result::Result<Duration, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let layout = ArchiveLayout::new(dir.path());
    let day = config.boundary.trading_day(config.date)?;

    let trades: Vec<(String, Vec<Trade>)> = (0..INSTRUMENTS)
        .map(|i| {
            let trades = TradeGenerator::new(i as u64 + 1, 50_000).day(&day, per_instrument);
            (format!("SYM{i}USDT"), trades)
        })
        .collect();
    write_day_archives(&layout, config.category, config.date, &trades)?;

    let mut total = Duration::ZERO;
    for _ in 0..ITERATIONS {
        let start = Instant::now();
        let dataset = build_dataset(&layout, config, |_| {})?;
        let export = dataset.export()?;
        std::hint::black_box(export);
        total += start.elapsed();
    }
    Ok(total / ITERATIONS)
}
