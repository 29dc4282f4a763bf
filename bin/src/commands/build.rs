//! Build command implementation.
//!
//! Runs one pipeline per category concurrently. Each pipeline ingests the
//! day's archives and finalizes the dataset. Tables are written only after
//! every pipeline has succeeded.

use crate::display::{Format, pipeline_style, write_export};
use crate::settings::{RunArgs, Settings};
use anyhow::{Context, Result, bail};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use kline_lib::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Build and write the klines of every selected category.
pub(crate) async fn build(
    run: &RunArgs,
    category: Option<&str>,
    output_root: Option<PathBuf>,
    format: Option<Format>,
    quiet: bool,
) -> Result<()> {
    let mut settings = Settings::resolve(run)?;
    if let Some(root) = output_root {
        settings.config.output_root = root;
    }
    if let Some(format) = format {
        settings.config.format = format.to_string();
    }
    settings.validate()?;

    let output_format: OutputFormat = settings
        .config
        .format
        .parse()
        .context("Invalid output format")?;
    let categories = settings.categories(category)?;

    let multi_progress = MultiProgress::new();
    if quiet {
        multi_progress.set_draw_target(ProgressDrawTarget::hidden());
    }

    let layout = settings.layout();
    let mut pipelines = Vec::with_capacity(categories.len());
    for category in categories {
        let pb = multi_progress.add(ProgressBar::new(0));
        pb.set_style(pipeline_style());
        pb.set_prefix(format!("{:>5}", category.as_str()));

        let layout = layout.clone();
        let config = settings.dataset_config(category);

        let handle =
            tokio::task::spawn_blocking(move || run_pipeline(&layout, config, &pb));
        pipelines.push((category, handle));
    }

    let mut results = Vec::with_capacity(pipelines.len());
    for (category, handle) in pipelines {
        let result = handle
            .await
            .with_context(|| format!("{category} pipeline panicked"))?;
        results.push((category, result));
    }

    let files = write_all(results, &settings.config.output_root, output_format)
        .with_context(|| format!("Failed to build klines for {}", settings.date))?;

    if !quiet {
        println!(
            "Wrote {files} files under {}",
            settings.config.output_root.display()
        );
    }
    Ok(())
}

/// Writes every export once all pipelines have succeeded.
///
/// Nothing is written if any pipeline failed. Returns the number of files
/// written.
fn write_all(
    results: Vec<(Category, Result<DatasetExport>)>,
    output_root: &Path,
    format: OutputFormat,
) -> Result<usize> {
    let mut exports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (category, result) in results {
        match result {
            Ok(export) => exports.push(export),
            Err(e) => {
                error!(%category, "{e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} pipeline(s) failed, no output written");
    }

    let mut files = 0;
    for export in &exports {
        let paths = write_export(export, output_root, format)
            .with_context(|| format!("Failed to write {} klines", export.category))?;
        info!(category = %export.category, files = paths.len(), "klines written");
        files += paths.len();
    }
    Ok(files)
}

/// Build, finalize and export one category's dataset.
fn run_pipeline(
    layout: &ArchiveLayout,
    config: DatasetConfig,
    progress: &ProgressBar,
) -> Result<DatasetExport> {
    let dataset = build_dataset(layout, config, |p| {
        progress.set_length(p.total as u64);
        progress.set_position(p.position as u64);
        progress.set_message(p.entry.instrument.clone());
    })
    .with_context(|| format!("Failed to build {} klines for {}", config.category, config.date))?;

    let export = dataset
        .export()
        .with_context(|| format!("Failed to export {} klines for {}", config.category, config.date))?;

    info!(
        category = %config.category,
        instruments = dataset.len(),
        "pipeline finished"
    );
    progress.finish_with_message(format!("{} instruments", dataset.len()));
    Ok(export)
}
