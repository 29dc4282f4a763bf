//! Criterion benchmarks for kline aggregation.
//!
//! Run with: `cargo bench -p kline-bench`

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kline_bench::{TradeGenerator, write_day_archives};
use kline_lib::NoPreviousDay;
use kline_lib::prelude::*;
use std::hint::black_box;

const TRADE_COUNTS: [usize; 3] = [10_000, 100_000, 500_000];

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
}

fn bench_config() -> DatasetConfig {
    DatasetConfig::new(bench_date(), Category::UsdMargined, DayBoundary::default())
}

fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("series_add_trade");
    group.sample_size(10);

    let day = DayBoundary::default()
        .trading_day(bench_date())
        .expect("valid day");

    for count in TRADE_COUNTS {
        let trades = TradeGenerator::new(42, 6_500_000).day(&day, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &trades, |b, trades| {
            b.iter(|| {
                let mut series = InstrumentSeries::new("BTCUSDT", Category::UsdMargined, day);
                for trade in trades {
                    series.add_trade(trade, &NoPreviousDay).expect("in range");
                }
                series.fill_trailing_gaps(&NoPreviousDay).expect("seeded");
                black_box(series)
            });
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataset_export");
    group.sample_size(10);

    for instruments in [10usize, 100] {
        let mut dataset = DailyDataset::new(bench_config(), NoPreviousDay).expect("valid config");
        let day = dataset.day();
        for i in 0..instruments {
            let symbol = format!("SYM{i:03}USDT");
            for trade in TradeGenerator::new(i as u64 + 1, 10_000).day(&day, 2_000) {
                dataset.add_trade(&symbol, &trade).expect("in range");
            }
        }
        dataset.finalize().expect("seeded");

        group.throughput(Throughput::Elements(instruments as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(instruments),
            &dataset,
            |b, dataset| b.iter(|| black_box(dataset.export().expect("finalized"))),
        );
    }

    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_ingest");
    group.sample_size(10);

    let dir = tempfile::tempdir().expect("temp dir");
    let layout = ArchiveLayout::new(dir.path());
    let day = DayBoundary::default()
        .trading_day(bench_date())
        .expect("valid day");

    let per_instrument = 50_000;
    let trades: Vec<(String, Vec<Trade>)> = ["BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT"]
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let trades = TradeGenerator::new(i as u64 + 7, 100_000).day(&day, per_instrument);
            ((*symbol).to_string(), trades)
        })
        .collect();
    write_day_archives(&layout, Category::UsdMargined, bench_date(), &trades)
        .expect("write archives");

    group.throughput(Throughput::Elements((trades.len() * per_instrument) as u64));
    group.bench_function("four_instruments", |b| {
        b.iter(|| {
            let dataset =
                build_dataset(&layout, bench_config(), |_| {}).expect("dataset builds");
            black_box(dataset)
        });
    });

    group.finish();
}

fn bench_write_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_write");
    group.sample_size(10);

    let mut dataset = DailyDataset::new(bench_config(), NoPreviousDay).expect("valid config");
    let day = dataset.day();
    for i in 0..20u64 {
        let symbol = format!("SYM{i:02}USDT");
        for trade in TradeGenerator::new(i + 1, 10_000).day(&day, 5_000) {
            dataset.add_trade(&symbol, &trade).expect("in range");
        }
    }
    dataset.finalize().expect("seeded");
    let export = dataset.export().expect("finalized");

    group.bench_function("twenty_instruments", |b| {
        b.iter(|| {
            let dir = tempfile::tempdir().expect("temp dir");
            let paths = DatasetWriter::new(dir.path(), CsvFormatter::new())
                .write(&export)
                .expect("write");
            black_box(paths)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_series,
    bench_export,
    bench_ingest,
    bench_write_csv
);
criterion_main!(benches);
