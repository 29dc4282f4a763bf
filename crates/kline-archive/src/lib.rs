//! Archive reading for the kline minute-bar builder.
//!
//! This crate turns daily aggregated-trade archives into datasets:
//!
//! - [`ArchiveLayout`] - Where each day's archives live
//! - [`TradeArchive`] - Single-entry zip reader
//! - [`parse_trade`] / [`TradeLines`] - Trade line parsing with header detection
//! - [`ArchiveLookup`] - Previous-day seed from the prior day's archive
//! - [`build_dataset`] - Full ingestion of one category and day

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod ingest;
pub mod layout;
mod lookup;
mod parse;
mod reader;

pub use ingest::{ArchiveEntry, ArchiveProgress, build_dataset, day_archives, ingest_archive};
pub use layout::ArchiveLayout;
pub use lookup::ArchiveLookup;
pub use parse::{FIELD_COUNT, ParseError, TradeLines, is_header, parse_trade};
pub use reader::TradeArchive;
