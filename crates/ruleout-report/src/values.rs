//! Cell value helpers for string-typed cohort tables.

use polars::prelude::{AnyValue, Column};

/// Cell text, or `None` for nulls and non-string cells.
pub fn cell_text(column: &Column, row: usize) -> Option<String> {
    match column.get(row).unwrap_or(AnyValue::Null) {
        AnyValue::String(value) => Some(value.to_string()),
        AnyValue::StringOwned(value) => Some(value.to_string()),
        AnyValue::Null => None,
        other => Some(other.to_string()),
    }
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<i64>().ok()
}
