//! CLI entry point for the tracker scraper.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracker_core::address::{AddressNormalizer, MemoryNormalizer, address_sheet};
use tracker_core::{Scraper, build_workbook, write_json};

mod app_config;
mod cli;
mod progress;

use app_config::{load_default_file_config, resolve_run_settings};
use cli::Args;
use progress::WalkProgress;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded = load_default_file_config()?;
    let settings = resolve_run_settings(&args, loaded.as_ref().map(|(_, config)| config));

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");
    if let Some((path, _)) = &loaded {
        debug!(path = %path.display(), "loaded config file");
    }
    info!(client_id = %settings.client_id, base_url = %settings.scraper.base_url, "Tracker scraper starting");

    let scraper = Scraper::new(&settings.scraper).context("Failed to initialize scraper")?;

    let show_progress = !args.no_progress && !args.quiet && io::stderr().is_terminal();
    let progress = WalkProgress::new(show_progress, &settings.client_id);
    let outcome = scraper
        .walk_with_progress(&settings.client_id, |done, total| progress.update(done, total))
        .await;
    progress.finish();
    let outcome = outcome.with_context(|| format!("Scrape failed for client {}", settings.client_id))?;

    let stats = scraper.stats();
    info!(
        total_requests = stats.total_requests,
        successful = stats.successful_requests,
        failed = stats.failed_requests,
        retries = stats.retries,
        rate_limit_waits = stats.rate_limit_waits,
        elapsed_ms = stats.elapsed_ms,
        "Run statistics"
    );

    if outcome.is_empty() {
        bail!("no projects found for client {}", settings.client_id);
    }

    info!(
        rows = outcome.total_rows,
        projects = outcome.summaries.len(),
        details = outcome.details.len(),
        skipped = outcome.skipped.len(),
        incomplete = outcome.incomplete.len(),
        "Scrape complete"
    );
    for row in &outcome.incomplete {
        warn!(index = row.index, link = %row.link, error = %row.error, "project kept without details");
    }

    let mut workbook =
        build_workbook(&settings.client_id, &outcome.summaries, &outcome.details).with_stats(stats);

    if args.addresses {
        let normalizer = MemoryNormalizer::new();
        let sheet = address_sheet(&normalizer, &outcome.details)
            .await
            .with_context(|| format!("Address normalization via '{}' failed", normalizer.name()))?;
        workbook.push_sheet(sheet);
    }

    let path = write_json(&workbook, &settings.output_dir).with_context(|| {
        format!("Failed to write export to '{}'", settings.output_dir.display())
    })?;
    info!(path = %path.display(), "Export written");

    Ok(())
}
