//! Rule-driven column mapping.

use polars::prelude::{Column, DataFrame, IntoColumn, PolarsResult};
use tracing::trace;

use datastd_common::normalize_nulls;
use datastd_model::MappingRule;

/// A source frame reshaped by one rule list.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Columns named after the rules' target columns, rows aligned with the source.
    pub frame: DataFrame,
    /// Source columns referenced by a rule but absent from the source, in rule order.
    pub missing_sources: Vec<String>,
}

impl ColumnMapping {
    pub fn has_missing_sources(&self) -> bool {
        !self.missing_sources.is_empty()
    }
}

/// Apply `rules` to `source`.
///
/// Rules whose source column does not exist are skipped and reported in
/// [`ColumnMapping::missing_sources`]. A target column named by several rules
/// keeps the position of its first rule and the data of its last one. Float
/// NaN values in the result are replaced with nulls.
pub fn map_columns(source: &DataFrame, rules: &[MappingRule]) -> PolarsResult<ColumnMapping> {
    let mut columns: Vec<Column> = Vec::with_capacity(rules.len());
    let mut missing_sources = Vec::new();

    for rule in rules {
        let Ok(column) = source.column(&rule.source_column) else {
            missing_sources.push(rule.source_column.clone());
            continue;
        };
        trace!(
            source_column = %rule.source_column,
            target_column = %rule.target_column,
            "map column"
        );
        let mapped = column
            .as_materialized_series()
            .clone()
            .with_name(rule.target_column.as_str().into())
            .into_column();
        match columns
            .iter()
            .position(|existing| existing.name().as_str() == rule.target_column)
        {
            Some(idx) => columns[idx] = mapped,
            None => columns.push(mapped),
        }
    }

    let frame = normalize_nulls(&DataFrame::new(columns)?)?;
    Ok(ColumnMapping {
        frame,
        missing_sources,
    })
}
