//! Join key resolution for relational entries.

use std::collections::BTreeSet;

use polars::prelude::{DataFrame, IntoColumn};

use datastd_model::{ConfigError, MappingRule, Result};

/// The column pair a relational entry joins on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKeys {
    /// Key column in the source table.
    pub source_key: String,
    /// Key column in the target table; frames are merged on this name.
    pub target_key: String,
}

/// Resolve the single join key pair declared across `rules`.
///
/// Empty key strings are ignored. Fails unless exactly one distinct source
/// key and exactly one distinct target key are declared.
pub fn extract_join_keys(rules: &[MappingRule]) -> std::result::Result<JoinKeys, ConfigError> {
    let source_keys = distinct_keys(rules.iter().map(|rule| rule.source_key.as_deref()));
    let target_keys = distinct_keys(rules.iter().map(|rule| rule.target_key.as_deref()));

    match (source_keys.as_slice(), target_keys.as_slice()) {
        ([source_key], [target_key]) => Ok(JoinKeys {
            source_key: (*source_key).to_string(),
            target_key: (*target_key).to_string(),
        }),
        _ => Err(ConfigError::AmbiguousJoinKeys {
            source_keys: source_keys.iter().map(ToString::to_string).collect(),
            target_keys: target_keys.iter().map(ToString::to_string).collect(),
        }),
    }
}

fn distinct_keys<'a>(keys: impl Iterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    keys.flatten()
        .filter(|key| !key.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Make sure `mapped` carries the join key column.
///
/// When no rule produced the target key, the source key column is copied in
/// under the target key name as the last column.
pub fn attach_join_key(
    mapped: DataFrame,
    source: &DataFrame,
    keys: &JoinKeys,
    source_table: &str,
) -> Result<DataFrame> {
    if mapped.column(&keys.target_key).is_ok() {
        return Ok(mapped);
    }
    let Ok(source_key) = source.column(&keys.source_key) else {
        return Err(ConfigError::MissingSourceKey {
            source_key: keys.source_key.clone(),
            source_table: source_table.to_string(),
        }
        .into());
    };
    let key_column = source_key
        .as_materialized_series()
        .clone()
        .with_name(keys.target_key.as_str().into())
        .into_column();
    let mut columns = mapped.get_columns().to_vec();
    columns.push(key_column);
    Ok(DataFrame::new(columns)?)
}
