//! Run settings: config file, then command-line overrides.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Args;
use kline_lib::prelude::*;
use std::path::PathBuf;

/// Options shared by every command that reads archives.
#[derive(Args, Clone, Debug)]
pub(crate) struct RunArgs {
    /// Trading date (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(short, long)]
    pub(crate) date: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Root of the aggregated-trade archive tree
    #[arg(long)]
    pub(crate) archive_root: Option<PathBuf>,

    /// UTC offset of the day boundary, in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) utc_offset_minutes: Option<i32>,

    /// Local hour at which the trading day starts
    #[arg(long)]
    pub(crate) boundary_hour: Option<u32>,
}

/// Resolved configuration and trading date.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) config: KlineConfig,
    pub(crate) date: NaiveDate,
}

impl Settings {
    /// Loads the config file (or defaults) and applies `args` over it.
    pub(crate) fn resolve(args: &RunArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => KlineConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => KlineConfig::default(),
        };

        if let Some(root) = &args.archive_root {
            config.archive_root.clone_from(root);
        }
        if let Some(offset) = args.utc_offset_minutes {
            config.boundary.utc_offset_minutes = offset;
        }
        if let Some(hour) = args.boundary_hour {
            config.boundary.hour = hour;
        }

        let date = match args.date.as_deref() {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date: {s}"))?,
            None => chrono::Utc::now().date_naive(),
        };

        let settings = Self { config, date };
        settings.validate()?;
        Ok(settings)
    }

    /// Re-checks the configuration after further overrides.
    pub(crate) fn validate(&self) -> Result<()> {
        self.config.validate().context("Invalid configuration")
    }

    /// Returns the categories selected by `filter` (`spot`, `um` or `all`),
    /// or the configured ones when no filter is given.
    pub(crate) fn categories(&self, filter: Option<&str>) -> Result<Vec<Category>> {
        match filter {
            None => Ok(self.config.categories.clone()),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Category::all().to_vec()),
            Some(s) => s
                .parse::<Category>()
                .map(|category| vec![category])
                .map_err(|e| anyhow!("{e}. Valid options: spot, um, all")),
        }
    }

    /// Returns the archive layout of the configured root.
    pub(crate) fn layout(&self) -> ArchiveLayout {
        ArchiveLayout::new(&self.config.archive_root)
    }

    /// Returns the dataset configuration of one category.
    pub(crate) const fn dataset_config(&self, category: Category) -> DatasetConfig {
        DatasetConfig::new(self.date, category, self.config.boundary)
    }
}
