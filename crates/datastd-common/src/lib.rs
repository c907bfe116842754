//! Shared utilities for datastd crates.
//!
//! This crate provides the Polars helpers the mapping and merge stages share:
//! value rendering, null normalization and column rebuilding.

pub mod frame;

// Re-export commonly used functions at crate root for convenience
pub use frame::{
    KeyValue, any_to_string, build_column, column_values, drop_all_null_columns, format_numeric,
    key_value, normalize_nulls,
};
