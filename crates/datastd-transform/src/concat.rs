//! Row stacking for independent entries.

use std::iter;

use polars::prelude::{AnyValue, DataFrame};

use datastd_common::{build_column, column_values};
use datastd_model::Result;

use crate::frame::MappedFrame;

/// Stack `frames` vertically.
///
/// The result has the union of all columns in first-seen order. Rows keep
/// frame order, then row order within each frame; a frame missing a column
/// contributes nulls for it. A frame whose columns were all dropped still
/// contributes its source rows, as all-null rows.
pub fn stack_frames<'a>(frames: impl IntoIterator<Item = &'a MappedFrame>) -> Result<DataFrame> {
    let frames: Vec<&MappedFrame> = frames.into_iter().collect();

    let mut names: Vec<&str> = Vec::new();
    for frame in &frames {
        for column in frame.data.get_columns() {
            let name = column.name().as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let total_rows: usize = frames.iter().map(|frame| stacked_height(frame)).sum();
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let mut values: Vec<AnyValue<'_>> = Vec::with_capacity(total_rows);
        for frame in &frames {
            match frame.data.column(name) {
                Ok(column) => values.extend(column_values(column)?),
                Err(_) => values.extend(iter::repeat_n(AnyValue::Null, stacked_height(frame))),
            }
        }
        columns.push(build_column(name, &values)?);
    }

    Ok(DataFrame::new_with_height(total_rows, columns)?)
}

// Polars reports height 0 for a frame without columns.
fn stacked_height(frame: &MappedFrame) -> usize {
    if frame.data.width() == 0 {
        frame.rows
    } else {
        frame.data.height()
    }
}
