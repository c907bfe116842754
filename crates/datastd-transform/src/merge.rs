//! Keyed outer merge of mapped frames.
//!
//! Frames are folded left to right. Each step outer-joins the accumulator
//! with the next frame on the join key:
//!
//! - accumulator rows come first, in order, each repeated once per matching
//!   incoming row (or kept once when nothing matches);
//! - incoming rows that matched nothing follow, in order;
//! - a column present on both sides takes the accumulator's value unless it
//!   is null, then the incoming value;
//! - incoming-only columns are appended after the accumulator's columns.
//!
//! Numeric keys match on their rendered value across dtypes; a numeric key
//! never matches a string key. Null keys never match. Because later frames
//! only fill nulls, earlier frames take precedence.
//!
//! Unlike a sort-based outer join, the result is not ordered by key: it
//! follows the accumulator's row order with unmatched incoming rows last.

use std::collections::HashMap;

use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::debug;

use datastd_common::{KeyValue, build_column, column_values, key_value};
use datastd_model::{ConfigError, Result};

/// Merge `frames` into one frame by repeated outer join on `join_key`.
///
/// Every frame must carry `join_key`. An empty sequence gives an empty frame
/// and a single frame is returned unchanged.
pub fn merge_frames_on_key<'a>(
    frames: impl IntoIterator<Item = &'a DataFrame>,
    join_key: &str,
) -> Result<DataFrame> {
    let frames: Vec<&DataFrame> = frames.into_iter().collect();
    if let Some(position) = frames
        .iter()
        .position(|frame| frame.column(join_key).is_err())
    {
        return Err(ConfigError::MissingJoinKey {
            join_key: join_key.to_string(),
            position,
        }
        .into());
    }

    let Some((first, rest)) = frames.split_first() else {
        return Ok(DataFrame::empty());
    };
    rest.iter().try_fold((*first).clone(), |merged, frame| {
        let next = merge_pair(&merged, frame, join_key)?;
        debug!(
            join_key,
            left_rows = merged.height(),
            right_rows = frame.height(),
            merged_rows = next.height(),
            "merged frame"
        );
        Ok(next)
    })
}

/// Row pairing of one join step: left row, right row (either may be absent).
type RowPair = (Option<usize>, Option<usize>);

fn pair_rows(left: &Column, right: &Column) -> Result<Vec<RowPair>> {
    let right_keys: Vec<Option<KeyValue>> = column_values(right)?.iter().map(key_value).collect();
    let mut right_index: HashMap<&KeyValue, Vec<usize>> = HashMap::new();
    for (row, key) in right_keys.iter().enumerate() {
        if let Some(key) = key {
            right_index.entry(key).or_default().push(row);
        }
    }

    let mut matched = vec![false; right_keys.len()];
    let mut pairs = Vec::with_capacity(left.len().max(right_keys.len()));
    for (left_row, value) in column_values(left)?.iter().enumerate() {
        let matches = key_value(value).and_then(|key| right_index.get(&key));
        match matches {
            Some(rows) => {
                for &right_row in rows {
                    matched[right_row] = true;
                    pairs.push((Some(left_row), Some(right_row)));
                }
            }
            None => pairs.push((Some(left_row), None)),
        }
    }
    pairs.extend(
        matched
            .iter()
            .enumerate()
            .filter(|(_, was_matched)| !**was_matched)
            .map(|(right_row, _)| (None, Some(right_row))),
    );
    Ok(pairs)
}

fn merge_pair(left: &DataFrame, right: &DataFrame, join_key: &str) -> Result<DataFrame> {
    let pairs = pair_rows(left.column(join_key)?, right.column(join_key)?)?;
    let mut columns = Vec::with_capacity(left.width() + right.width());

    for column in left.get_columns() {
        let name = column.name().as_str();
        let left_values = column_values(column)?;
        let right_values = match right.column(name) {
            Ok(other) => Some(column_values(other)?),
            Err(_) => None,
        };
        let values: Vec<AnyValue<'_>> = pairs
            .iter()
            .map(|&(left_row, right_row)| {
                let kept = pick(&left_values, left_row);
                if !kept.is_null() {
                    return kept;
                }
                right_values
                    .as_deref()
                    .map_or(AnyValue::Null, |values| pick(values, right_row))
            })
            .collect();
        columns.push(build_column(name, &values)?);
    }

    for column in right.get_columns() {
        let name = column.name().as_str();
        if left.column(name).is_ok() {
            continue;
        }
        let right_values = column_values(column)?;
        let values: Vec<AnyValue<'_>> = pairs
            .iter()
            .map(|&(_, right_row)| pick(&right_values, right_row))
            .collect();
        columns.push(build_column(name, &values)?);
    }

    Ok(DataFrame::new(columns)?)
}

fn pick<'a>(values: &[AnyValue<'a>], row: Option<usize>) -> AnyValue<'a> {
    row.and_then(|idx| values.get(idx))
        .cloned()
        .unwrap_or(AnyValue::Null)
}
