//! Core types for the kline minute-bar builder.
//!
//! This crate provides the fundamental data structures used throughout kline:
//!
//! - [`Trade`] - A single aggregated trade with price, volume, timestamp and side
//! - [`Category`] - Market category (spot or USD-margined futures)
//! - [`DayBoundary`] / [`TradingDay`] - Where a trading day starts and how minutes are indexed
//! - [`KlineConfig`] - Run configuration
//! - [`KlineError`] - Error taxonomy shared by every crate

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kline/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod category;
mod config;
mod error;
mod trade;
mod trading_day;

pub use category::{Category, CategoryParseError};
pub use config::KlineConfig;
pub use error::{KlineError, Result};
pub use trade::Trade;
pub use trading_day::{DayBoundary, MINUTES_PER_DAY, SECONDS_PER_MINUTE, TradingDay};

/// Re-exported decimal type used for every price and volume.
pub use rust_decimal::Decimal;
