//! Show command implementation.
//!
//! Aggregates a single instrument's archive and prints a summary of its day.

use crate::settings::{RunArgs, Settings};
use anyhow::{Context, Result, anyhow};
use kline_lib::prelude::*;
use kline_lib::{ArchiveEntry, BarState, ingest_archive};

/// Aggregate one instrument and print its day summary.
pub(crate) fn show_instrument(symbol: &str, run: &RunArgs, category: &str) -> Result<()> {
    let settings = Settings::resolve(run)?;
    let category: Category = category.parse().map_err(|e| anyhow!("{e}"))?;
    let layout = settings.layout();

    let entry = ArchiveEntry {
        instrument: symbol.to_string(),
        path: layout.archive_path(symbol, category, settings.date),
    };

    let mut dataset = DailyDataset::new(
        settings.dataset_config(category),
        ArchiveLookup::new(layout.clone()),
    )?;
    ingest_archive(&mut dataset, &entry)
        .with_context(|| format!("Failed to aggregate {}", entry.path.display()))?;
    dataset.finalize()?;

    let series = dataset
        .get(symbol)
        .with_context(|| format!("No series for {symbol}"))?;
    print_summary(series);
    Ok(())
}

fn print_summary(series: &InstrumentSeries) {
    let bars = series.bars();
    let traded: Vec<&MinuteBar> = bars
        .iter()
        .filter(|bar| bar.state() == BarState::Traded)
        .collect();

    println!("Instrument: {}", series.instrument());
    println!("Category:   {}", series.category());
    println!("Day:        {}", series.day());
    println!("Trades:     {}", series.trade_count());
    println!("Traded minutes:  {}", traded.len());
    println!("Carried minutes: {}", bars.len() - traded.len());
    if let Some(seed) = series.seed() {
        println!("Previous close:  {seed}");
    }

    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return;
    };
    let high = traded.iter().map(|bar| bar.high).max();
    let low = traded.iter().map(|bar| bar.low).min();
    let buy = total(bars.iter().map(|bar| bar.buy_volume));
    let sell = total(bars.iter().map(|bar| bar.sell_volume));
    let turnover = total(bars.iter().map(|bar| bar.turnover));
    let dash = || "-".to_string();
    let overflow = || "overflow".to_string();

    println!();
    println!("Open:     {}", first.open.normalize());
    println!("High:     {}", high.map_or_else(dash, |v| v.normalize().to_string()));
    println!("Low:      {}", low.map_or_else(dash, |v| v.normalize().to_string()));
    println!("Close:    {}", last.close.normalize());
    println!("Buy vol:  {}", buy.map_or_else(overflow, |v| v.normalize().to_string()));
    println!("Sell vol: {}", sell.map_or_else(overflow, |v| v.normalize().to_string()));
    println!("Turnover: {}", turnover.map_or_else(overflow, |v| v.round_dp(2).to_string()));
}

/// Sums `values`, or `None` if the total does not fit in a [`Decimal`].
fn total(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        assert_eq!(total([Decimal::ONE, Decimal::TWO]), Some(Decimal::from(3)));
        assert_eq!(total([]), Some(Decimal::ZERO));
        assert_eq!(total([Decimal::MAX, Decimal::ONE]), None);
    }
}
