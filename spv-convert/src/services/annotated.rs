//! Annotated table → flat record list

use super::normalizer::{normalize_row, parse_vaccine_types};
use crate::models::{AnnotatedRecord, ParseError, Table, VACCINE_TYPES};
use serde_json::Value;
use tracing::debug;

/// Records in input order, plus one [`ParseError`] for every row whose
/// `vaccine_types` fell back to its raw text
#[derive(Debug, Clone, Default)]
pub struct AnnotatedOutput {
    pub records: Vec<AnnotatedRecord>,
    pub parse_errors: Vec<ParseError>,
}

/// Convert every annotated row. Never fails: bad cells are recovered per row.
pub fn convert_annotated(table: &Table) -> AnnotatedOutput {
    let mut output = AnnotatedOutput {
        records: Vec::with_capacity(table.len()),
        parse_errors: Vec::new(),
    };

    for (index, row) in table.rows().enumerate() {
        let mut fields = normalize_row(&row);

        let vaccine_types = match parse_vaccine_types(row.get(VACCINE_TYPES)) {
            Ok(value) => value,
            Err(fallback) => {
                debug!(row = index, raw = %fallback.raw, "vaccine_types fallback");
                output.parse_errors.push(ParseError {
                    row: index,
                    message: fallback.reason.clone(),
                });
                fallback.into_value()
            }
        };
        fields.insert(VACCINE_TYPES.to_string(), vaccine_types);

        output.records.push(AnnotatedRecord::new(fields));
    }

    output
}

/// Truthiness used to spot empty `vaccine_types`: null, false, zero and empty
/// containers all count as empty
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
