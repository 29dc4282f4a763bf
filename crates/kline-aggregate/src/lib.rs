//! Minute-bar aggregation for the kline builder.
//!
//! This crate turns trades into dense per-minute OHLCV series:
//!
//! - [`MinuteBar`] - OHLCV bucket for one minute
//! - [`InstrumentSeries`] - 1440 bars of one instrument with carry-forward filling
//! - [`DailyDataset`] - All series of one category for one trading day
//! - [`PreviousDayLookup`] - Source of the seed price for series that open without a trade
//! - [`DatasetExport`] - Pivot and per-instrument tables of a finalized dataset

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod dataset;
mod lookup;
mod series;
mod table;

pub use bar::{BarState, MinuteBar};
pub use dataset::{DailyDataset, DatasetConfig};
pub use lookup::{NoPreviousDay, PreviousDayLookup};
pub use series::InstrumentSeries;
pub use table::{BarRow, DatasetExport, Metric, PivotRow, PivotTable, SeriesTable};
