//! Row normalization and the `vaccine_types` field parser

use crate::models::{CellValue, TabularRow};
use serde_json::{Map, Value};

/// Convert a row into a JSON object with the same keys in the same order.
///
/// Missing cells become `null`; numeric cells become plain JSON numbers.
pub fn normalize_row(row: &TabularRow<'_>) -> Map<String, Value> {
    row.iter()
        .map(|(column, cell)| (column.to_string(), cell.to_json()))
        .collect()
}

/// A string cell that was not valid JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFallback {
    /// Cell text as read from the table
    pub raw: String,
    /// Decoder message
    pub reason: String,
}

impl FieldFallback {
    /// Replacement value: the raw text wrapped in a one-element array
    pub fn into_value(self) -> Value {
        Value::Array(vec![Value::String(self.raw)])
    }
}

/// Decode a `vaccine_types` cell.
///
/// - missing or empty → `Ok([])`
/// - string holding JSON → `Ok(decoded)`, exactly as decoded
/// - string that is not JSON → `Err(FieldFallback)`; callers substitute
///   [`FieldFallback::into_value`] and carry on
/// - any other cell → `Ok(value)` unchanged
pub fn parse_vaccine_types(cell: &CellValue) -> Result<Value, FieldFallback> {
    match cell {
        CellValue::Null => Ok(Value::Array(Vec::new())),
        CellValue::String(text) if text.is_empty() => Ok(Value::Array(Vec::new())),
        CellValue::String(text) => {
            serde_json::from_str::<Value>(text).map_err(|e| FieldFallback {
                raw: text.clone(),
                reason: e.to_string(),
            })
        }
        other => Ok(other.to_json()),
    }
}
