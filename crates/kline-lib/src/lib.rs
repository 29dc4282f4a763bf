//! Daily minute-kline builder.
//!
//! This is a facade crate that re-exports functionality from the kline
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use kline_lib::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let layout = ArchiveLayout::new("/share/agg_database/bn");
//!     let config = DatasetConfig::new(date, Category::UsdMargined, DayBoundary::default());
//!
//!     let dataset = build_dataset(&layout, config, |p| {
//!         println!("{}/{} {}", p.position, p.total, p.entry.instrument);
//!     })?;
//!
//!     let writer = DatasetWriter::new("/share", CsvFormatter::new());
//!     for path in writer.write(&dataset.export()?)? {
//!         println!("wrote {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use kline_types::*;

// Re-export aggregation
pub use kline_aggregate::{
    BarRow, BarState, DailyDataset, DatasetConfig, DatasetExport, InstrumentSeries, Metric,
    MinuteBar, NoPreviousDay, PivotRow, PivotTable, PreviousDayLookup, SeriesTable,
};

// Re-export archive reading
#[cfg(feature = "archive")]
pub use kline_archive::{
    ArchiveEntry, ArchiveLayout, ArchiveLookup, ArchiveProgress, ParseError, TradeArchive,
    TradeLines, build_dataset, day_archives, ingest_archive, parse_trade,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use kline_format::{
    CsvFormatter, DatasetWriter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use kline_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use kline_lib::prelude::*;
/// ```
pub mod prelude {
    pub use kline_types::{
        Category, DayBoundary, Decimal, KlineConfig, KlineError, Result, Trade, TradingDay,
    };

    pub use kline_aggregate::{
        DailyDataset, DatasetConfig, DatasetExport, InstrumentSeries, Metric, MinuteBar,
        PreviousDayLookup,
    };

    #[cfg(feature = "archive")]
    pub use kline_archive::{ArchiveLayout, ArchiveLookup, build_dataset, day_archives};

    #[cfg(feature = "format")]
    pub use kline_format::{CsvFormatter, DatasetWriter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use kline_format::ParquetFormatter;
}
