//! Display rendering of engine result sets.
//!
//! Converts raw result tuples into ordered column-name-to-string mappings
//! ready for the UI. serde_json's `preserve_order` feature keeps the map
//! in declared column order when the rows are serialized back out.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;

use crate::db::{CellValue, ResultSet};

/// One display-ready row: column name mapped to its rendered value, in the
/// result set's declared column order.
pub type ResultRow = serde_json::Map<String, Value>;

/// Placeholder rendered for SQL NULL.
pub const NULL_PLACEHOLDER: &str = "NULL";

/// Render a cell for display.
pub fn display_value(value: &CellValue) -> String {
    match value {
        CellValue::Null => NULL_PLACEHOLDER.to_string(),
        CellValue::Integer(i) => i.to_string(),
        CellValue::Real(r) => {
            let mut buffer = ryu::Buffer::new();
            buffer.format(*r).to_string()
        }
        CellValue::Text(t) => t.clone(),
        CellValue::Blob(b) => BASE64.encode(b),
    }
}

/// Pair each tuple value positionally with its declared column name.
///
/// Row order is preserved from the engine response. An empty result set
/// yields an empty vector; deciding whether that warrants a "no results"
/// notice is the caller's concern.
pub fn render_rows(result: &ResultSet) -> Vec<ResultRow> {
    result
        .rows
        .iter()
        .map(|tuple| {
            result
                .columns
                .iter()
                .zip(tuple.iter())
                .map(|(col, value)| (col.clone(), Value::String(display_value(value))))
                .collect()
        })
        .collect()
}
