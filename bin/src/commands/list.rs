//! List command implementation.
//!
//! This module lists the archives found for a trading day.

use crate::display::format_bytes;
use crate::settings::{RunArgs, Settings};
use anyhow::{Context, Result};
use kline_lib::prelude::*;

/// List the day's archives of every selected category.
pub(crate) fn list_archives(run: &RunArgs, category: Option<&str>) -> Result<()> {
    let settings = Settings::resolve(run)?;
    let layout = settings.layout();

    let mut total = 0;
    for category in settings.categories(category)? {
        let archives = day_archives(&layout, category, settings.date).with_context(|| {
            format!(
                "Failed to read {}",
                layout.day_dir(category, settings.date).display()
            )
        })?;

        println!("{} ({}):", category, layout.day_dir(category, settings.date).display());
        if archives.is_empty() {
            println!("  No archives found.");
            continue;
        }

        println!("  {:<20} {:>10}", "SYMBOL", "SIZE");
        for entry in &archives {
            let size = std::fs::metadata(&entry.path).map(|m| m.len()).unwrap_or(0);
            println!("  {:<20} {:>10}", entry.instrument, format_bytes(size));
        }
        total += archives.len();
    }

    println!("\nTotal: {total} archives");
    Ok(())
}
