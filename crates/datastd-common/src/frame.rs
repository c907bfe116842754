//! Polars `AnyValue` and column helpers.
//!
//! Mapped relations are rebuilt value by value when they are merged or
//! stacked, so this module provides the conversions both directions need.

use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, Float32Chunked, Float64Chunked, IntoColumn, PolarsResult,
    Series,
};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, properly formats numeric types without
/// unnecessary trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use datastd_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(42.0)), "42");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use datastd_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Join-key form of a value.
///
/// Numbers compare by rendered value across dtypes, so `1` and `1.0` match.
/// A number never matches a string or any other kind of value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Number(String),
    Text(String),
    Other(String),
}

/// Join key for `value`; `None` for nulls, which never match.
pub fn key_value(value: &AnyValue<'_>) -> Option<KeyValue> {
    if value.is_null() {
        return None;
    }
    let text = any_to_string(value.clone());
    let key = match value {
        v if v.is_primitive_numeric() => KeyValue::Number(text),
        AnyValue::String(_) | AnyValue::StringOwned(_) => KeyValue::Text(text),
        _ => KeyValue::Other(text),
    };
    Some(key)
}

/// Replace floating point NaN with null in every float column.
pub fn normalize_nulls(df: &DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(normalize_column)
        .collect::<PolarsResult<Vec<_>>>()?;
    DataFrame::new(columns)
}

fn normalize_column(column: &Column) -> PolarsResult<Column> {
    let name = column.name().clone();
    let normalized = match column.dtype() {
        DataType::Float64 => column
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect::<Float64Chunked>()
            .with_name(name)
            .into_column(),
        DataType::Float32 => column
            .f32()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect::<Float32Chunked>()
            .with_name(name)
            .into_column(),
        _ => column.clone(),
    };
    Ok(normalized)
}

/// Drop every column whose values are all null.
///
/// A frame without rows keeps no columns.
pub fn drop_all_null_columns(df: &DataFrame) -> PolarsResult<DataFrame> {
    let kept: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|column| column.null_count() < column.len())
        .cloned()
        .collect();
    DataFrame::new(kept)
}

/// All values of a column, in row order.
pub fn column_values(column: &Column) -> PolarsResult<Vec<AnyValue<'_>>> {
    (0..column.len()).map(|idx| column.get(idx)).collect()
}

/// Build a column from values that may mix dtypes; mixed values are cast to
/// their common supertype.
pub fn build_column(name: &str, values: &[AnyValue<'_>]) -> PolarsResult<Column> {
    Series::from_any_values(name.into(), values, false).map(IntoColumn::into_column)
}
