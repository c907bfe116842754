//! Standardization run coordinator.
//!
//! A run has two stages:
//!
//! 1. **Map**: each payload entry, in document order, is read from the source
//!    store, mapped by its rule list and staged into the batch of its target
//!    table ([`Standardizer::plan`]).
//! 2. **Write**: each batch, in order of first appearance, is merged on its
//!    join key or stacked, then written with replace semantics.
//!
//! Any error aborts the run. Targets written before the failure stay written.

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, trace, warn};

use datastd_common::{drop_all_null_columns, normalize_nulls};
use datastd_map::{JoinKeys, attach_join_key, extract_join_keys, map_columns};
use datastd_model::{
    MappingEntry, MappingPayload, Result, RunDefaults, StandardizeError, StandardizeReport,
    TableResult, TargetRef,
};
use datastd_transform::{MappedFrame, TargetBatch, TargetBatches};

use crate::source::source_table_name;
use crate::store::{Connector, RelationReader, RelationWriter, WriteMode};

/// Rows shown when data logging is enabled.
const PREVIEW_ROWS: usize = 5;

/// Behaviour switches for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardizeOptions {
    /// Map and merge every target but skip the writes.
    pub dry_run: bool,
    /// Allow row-level values in trace logs.
    pub log_data: bool,
}

/// The outcome of the map stage.
#[derive(Debug, Clone)]
pub struct StandardizePlan {
    /// Mapped frames grouped per target, in order of first appearance.
    pub batches: TargetBatches,
    /// One result per payload entry, in document order.
    pub report: StandardizeReport,
}

/// What [`Standardizer::check`] learned about one entry without reading data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCheck {
    pub entry: String,
    pub source_table: String,
    pub source_schema: Option<String>,
    pub target: TargetRef,
    pub join_keys: Option<JoinKeys>,
    pub rule_count: usize,
}

/// Runs mapping payloads against relation stores.
#[derive(Debug, Clone, Default)]
pub struct Standardizer {
    pub defaults: RunDefaults,
    pub options: StandardizeOptions,
}

impl Standardizer {
    pub fn new(defaults: RunDefaults) -> Self {
        Self {
            defaults,
            options: StandardizeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: StandardizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate `payload` without touching any store.
    ///
    /// Catches every configuration error that does not depend on the data:
    /// unresolvable targets, ambiguous join keys and incompatible entries
    /// sharing a target.
    pub fn check(&self, payload: &MappingPayload) -> Result<Vec<EntryCheck>> {
        let mut batches = TargetBatches::new();
        let mut checks = Vec::with_capacity(payload.len());
        for entry in payload.iter() {
            let config = &entry.config;
            let source_table = source_table_name(&entry.name);
            let target = self
                .defaults
                .resolve(config)
                .map_err(|error| error.for_entry(&entry.name))?;
            let join_keys = if config.mode.is_relational() {
                Some(extract_join_keys(&config.mapping).map_err(|error| error.for_entry(&entry.name))?)
            } else {
                None
            };
            let placeholder = MappedFrame::new(source_table, DataFrame::empty(), 0);
            batches
                .stage(
                    &target,
                    join_keys.as_ref().map(|keys| keys.target_key.as_str()),
                    placeholder,
                )
                .map_err(|error| error.for_entry(&entry.name))?;
            checks.push(EntryCheck {
                entry: entry.name.clone(),
                source_table: source_table.to_string(),
                source_schema: config.source_schema.clone(),
                target,
                join_keys,
                rule_count: config.mapping.len(),
            });
        }
        Ok(checks)
    }

    /// Run the map stage: read and map every entry and stage it per target.
    pub fn plan<R>(&self, payload: &MappingPayload, reader: &R) -> Result<StandardizePlan>
    where
        R: RelationReader + ?Sized,
    {
        let mut batches = TargetBatches::new();
        let mut results = Vec::with_capacity(payload.len());

        for entry in payload.iter() {
            let source_table = source_table_name(&entry.name);
            let entry_span = info_span!("entry", source_table = %source_table);
            let _entry_guard = entry_span.enter();
            let start = Instant::now();

            let (target, join_key, frame) = self
                .map_entry(entry, source_table, reader)
                .map_err(|error| scope_to_entry(error, &entry.name))?;
            let rows_written = frame.row_count();
            let columns = frame.data.width();
            batches
                .stage(&target, join_key.as_deref(), frame)
                .map_err(|error| error.for_entry(&entry.name))?;

            info!(
                source_table = %source_table,
                target = %target,
                rows = rows_written,
                columns,
                relational = join_key.is_some(),
                duration_ms = start.elapsed().as_millis(),
                "entry mapped"
            );
            results.push(TableResult {
                source_table: source_table.to_string(),
                target_schema: target.schema,
                target_table: target.table,
                rows_written,
            });
        }

        Ok(StandardizePlan {
            batches,
            report: StandardizeReport { results },
        })
    }

    /// Run `payload` from `reader` to `writer`.
    ///
    /// Returns one result per entry. In dry-run mode every target is still
    /// merged but nothing is written.
    pub fn run<R, W>(
        &self,
        payload: &MappingPayload,
        reader: &R,
        writer: &W,
    ) -> Result<StandardizeReport>
    where
        R: RelationReader + ?Sized,
        W: RelationWriter + ?Sized,
    {
        let run_span = info_span!(
            "standardize",
            entry_count = payload.len(),
            dry_run = self.options.dry_run
        );
        let _run_guard = run_span.enter();
        let start = Instant::now();

        let StandardizePlan { batches, report } = self.plan(payload, reader)?;
        for batch in batches.iter() {
            let write_span = info_span!("write", target = %batch.target);
            write_span.in_scope(|| self.write_batch(batch, writer))?;
        }

        info!(
            entry_count = payload.len(),
            target_count = batches.len(),
            rows_written = report.total_rows(),
            duration_ms = start.elapsed().as_millis(),
            "standardization complete"
        );
        Ok(report)
    }

    /// Acquire connections from `source` and `target`, run, then dispose of
    /// both connections whatever the outcome.
    pub fn run_with_connectors<S, T>(
        &self,
        payload: &MappingPayload,
        source: &S,
        target: &T,
    ) -> Result<StandardizeReport>
    where
        S: Connector + ?Sized,
        S::Connection: RelationReader,
        T: Connector + ?Sized,
        T::Connection: RelationWriter,
    {
        let reader = source.acquire()?;
        let writer = match target.acquire() {
            Ok(writer) => writer,
            Err(error) => {
                release(source, reader);
                return Err(error.into());
            }
        };

        let result = self.run(payload, &reader, &writer);

        release(target, writer);
        release(source, reader);
        result
    }

    fn map_entry<R>(
        &self,
        entry: &MappingEntry,
        source_table: &str,
        reader: &R,
    ) -> Result<(TargetRef, Option<String>, MappedFrame)>
    where
        R: RelationReader + ?Sized,
    {
        let config = &entry.config;
        let target = self.defaults.resolve(config)?;

        let source = reader.read_relation(source_table, config.source_schema.as_deref())?;
        let source = normalize_nulls(&source)?;
        let source_rows = source.height();
        debug!(
            rows = source_rows,
            columns = source.width(),
            "read source relation"
        );

        let (mapped, join_key) = if config.mode.is_relational() {
            let keys = extract_join_keys(&config.mapping)?;
            let mapping = map_columns(&source, &config.mapping)?;
            if mapping.has_missing_sources() {
                debug!(missing = ?mapping.missing_sources, "skipped missing source columns");
            }
            let mapped = attach_join_key(mapping.frame, &source, &keys, source_table)?;
            (mapped, Some(keys.target_key))
        } else {
            let mapping = map_columns(&source, &config.mapping)?;
            if mapping.has_missing_sources() {
                warn!(
                    missing = ?mapping.missing_sources,
                    "source columns not found, skipping their rules"
                );
            }
            (mapping.frame, None)
        };

        let mapped = drop_all_null_columns(&mapped)?;
        if self.options.log_data {
            trace!(preview = %mapped.head(Some(PREVIEW_ROWS)), "mapped rows");
        }
        Ok((target, join_key, MappedFrame::new(source_table, mapped, source_rows)))
    }

    fn write_batch<W>(&self, batch: &TargetBatch, writer: &W) -> Result<()>
    where
        W: RelationWriter + ?Sized,
    {
        let start = Instant::now();
        let table = batch.consolidate()?;
        if self.options.dry_run {
            info!(
                rows = table.height(),
                columns = table.width(),
                "dry run, write skipped"
            );
            return Ok(());
        }
        writer.write_relation(
            &table,
            &batch.target.table,
            &batch.target.schema,
            WriteMode::Replace,
        )?;
        info!(
            frames = batch.frames.len(),
            relational = batch.is_relational(),
            rows = table.height(),
            columns = table.width(),
            duration_ms = start.elapsed().as_millis(),
            "target written"
        );
        Ok(())
    }
}

fn scope_to_entry(error: StandardizeError, entry: &str) -> StandardizeError {
    match error {
        StandardizeError::Config(config) => config.for_entry(entry).into(),
        other => other,
    }
}

fn release<C>(connector: &C, connection: C::Connection)
where
    C: Connector + ?Sized,
{
    if let Err(error) = connector.dispose(connection) {
        warn!(store = %connector.describe(), %error, "failed to dispose connection");
    }
}
