//! Mapped frame type.
//!
//! This module provides the [`MappedFrame`] type which wraps a Polars
//! DataFrame produced from one payload entry with the provenance the run
//! summary needs.

use polars::prelude::DataFrame;

/// One payload entry's contribution to a target table.
///
/// # Fields
///
/// - `source_table`: Source table name with any file suffix stripped
/// - `data`: The mapped rows as a Polars DataFrame
/// - `rows`: Number of source rows the frame was mapped from
#[derive(Debug, Clone)]
pub struct MappedFrame {
    pub source_table: String,
    pub data: DataFrame,
    /// Kept separately from `data` because a frame whose columns were all
    /// dropped reports a height of zero.
    pub rows: usize,
}

impl MappedFrame {
    pub fn new(source_table: impl Into<String>, data: DataFrame, rows: usize) -> Self {
        Self {
            source_table: source_table.into(),
            data,
            rows,
        }
    }

    /// Returns the number of rows this entry contributes.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }
}
