//! Subcommand implementations.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use datastd_core::{EntryCheck, StandardizeOptions, Standardizer};
use datastd_ingest::{CsvConnector, load_mapping_payload};
use datastd_model::StandardizeReport;

use crate::cli::{CheckArgs, RunArgs};
use crate::logging::log_data_enabled;

/// Run the mapping payload named by `args` between CSV directories.
pub fn run_standardize(args: &RunArgs) -> Result<StandardizeReport> {
    let span = info_span!("run", mapping = %args.mapping.display());
    let _guard = span.enter();
    let start = Instant::now();

    let payload = load_mapping_payload(&args.mapping)
        .with_context(|| format!("load mapping {}", args.mapping.display()))?;
    let target_dir = args.target_dir();
    let standardizer = Standardizer::new(args.target.defaults()).with_options(StandardizeOptions {
        dry_run: args.dry_run,
        log_data: log_data_enabled(),
    });

    let report = standardizer
        .run_with_connectors(
            &payload,
            &CsvConnector::source(&args.source_dir),
            &CsvConnector::target(&target_dir),
        )
        .with_context(|| {
            format!(
                "standardize {} into {}",
                args.source_dir.display(),
                target_dir.display()
            )
        })?;

    info!(
        entries = report.results.len(),
        targets = report.target_count(),
        rows = report.total_rows(),
        dry_run = args.dry_run,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(report)
}

/// Validate the mapping payload named by `args`.
pub fn run_check(args: &CheckArgs) -> Result<Vec<EntryCheck>> {
    let payload = load_mapping_payload(&args.mapping)
        .with_context(|| format!("load mapping {}", args.mapping.display()))?;
    Standardizer::new(args.target.defaults())
        .check(&payload)
        .with_context(|| format!("check mapping {}", args.mapping.display()))
}
