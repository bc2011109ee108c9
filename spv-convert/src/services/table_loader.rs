//! CSV table loading
//!
//! This is the only place where raw cell text is interpreted. Each column is
//! given one type (Int, Float, Bool or String) from its non-missing cells,
//! and every cell becomes a [`CellValue`].
//!
//! # Missing values
//! Cells whose text exactly matches one of [`MISSING_MARKERS`] are missing,
//! including the empty string.
//!
//! # Column inference
//! 1. All present cells parse as `i64` → Int (missing cells stay null)
//! 2. All present cells parse as `f64` → Float
//! 3. All present cells are `true`/`false` literals → Bool
//! 4. Otherwise → String

use crate::error::{ConvertError, Result};
use crate::models::{CellValue, Table};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Cell texts treated as missing
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_LITERALS: &[&str] = &["true", "True", "TRUE"];
const FALSE_LITERALS: &[&str] = &["false", "False", "FALSE"];

/// Expected header of a source table
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub required_columns: &'static [&'static str],
}

/// Flat annotation table. Columns beyond these pass through untouched.
pub const ANNOTATED_SCHEMA: TableSchema = TableSchema {
    name: "annotated",
    required_columns: &["thread_id", "vaccine_types"],
};

/// Thread post table
pub const THREADS_SCHEMA: TableSchema = TableSchema {
    name: "threads",
    required_columns: &[
        "thread_id",
        "post_id",
        "author_role",
        "timestamp",
        "content",
        "sentiment",
        "has_vaccine_keyword",
        "replies_to_post_number",
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Int,
    Float,
    Bool,
    Text,
}

/// Load a CSV file in full
pub fn load_table(path: &Path, schema: &TableSchema) -> Result<Table> {
    if !path.is_file() {
        return Err(ConvertError::Input(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    read_table(file, schema, path)
}

/// Parse CSV from any reader. `source` is only used in error messages.
pub fn read_table<R: Read>(reader: R, schema: &TableSchema, source: &Path) -> Result<Table> {
    let csv_error = |e: csv::Error| ConvertError::Csv {
        path: source.to_path_buf(),
        source: e,
    };

    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = schema
        .required_columns
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConvertError::Schema {
            table: schema.name.to_string(),
            missing,
        });
    }

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        raw_rows.push(
            record
                .iter()
                .map(|cell| (!is_missing(cell)).then(|| cell.to_string()))
                .collect(),
        );
    }

    let kinds: Vec<ColumnKind> = (0..columns.len())
        .map(|col| infer_kind(raw_rows.iter().filter_map(|row| row[col].as_deref())))
        .collect();

    for (column, kind) in columns.iter().zip(&kinds) {
        debug!(table = schema.name, column = %column, kind = ?kind, "Inferred column type");
    }

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(cell, kind)| match cell {
                    Some(text) => convert_cell(text, *kind),
                    None => CellValue::Null,
                })
                .collect()
        })
        .collect();

    Ok(Table::new(schema.name, columns, rows))
}

pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for cell in cells {
        seen = true;
        if all_int && cell.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && cell.parse::<f64>().is_err() {
            all_float = false;
        }
        if all_bool && !TRUE_LITERALS.contains(&cell) && !FALSE_LITERALS.contains(&cell) {
            all_bool = false;
        }
        if !all_int && !all_float && !all_bool {
            return ColumnKind::Text;
        }
    }

    if !seen {
        ColumnKind::Empty
    } else if all_int {
        ColumnKind::Int
    } else if all_float {
        ColumnKind::Float
    } else if all_bool {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn convert_cell(text: String, kind: ColumnKind) -> CellValue {
    match kind {
        ColumnKind::Int => text.parse().map(CellValue::Int).unwrap_or(CellValue::String(text)),
        ColumnKind::Float => text.parse().map(CellValue::Float).unwrap_or(CellValue::String(text)),
        ColumnKind::Bool => CellValue::Bool(TRUE_LITERALS.contains(&text.as_str())),
        ColumnKind::Empty | ColumnKind::Text => CellValue::String(text),
    }
}
