//! Tagged cell values
//!
//! Every CSV cell is classified exactly once, when the table is loaded.
//! Downstream code matches on [`CellValue`] instead of probing strings.

use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// One normalized table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Plain JSON value. Non-finite floats have no JSON form and become null.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::String(s) => Value::String(s.clone()),
        }
    }

    /// Integer view: floats truncate, strings are parsed, bools map to 0/1.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Null => None,
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => float_to_i64(f.trunc()),
            CellValue::Bool(b) => Some(i64::from(*b)),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(|f| float_to_i64(f.trunc())))
            }
        }
    }

    /// Integer view that refuses to drop a fractional part
    pub fn as_exact_i64(&self) -> Option<i64> {
        match self {
            CellValue::Float(f) if f.fract() != 0.0 => None,
            CellValue::Bool(_) => None,
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0)
                        .and_then(float_to_i64)
                })
            }
            other => other.as_i64(),
        }
    }

    /// Textual form, `None` for missing cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Boolean view, `None` for missing cells
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(*b),
            CellValue::Int(i) => Some(*i != 0),
            CellValue::Float(f) => Some(*f != 0.0),
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
                    Some(true)
                } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
                    Some(false)
                } else {
                    Some(!s.is_empty())
                }
            }
        }
    }

    /// Sort order used when ordering rows. Cells are ranked by kind first
    /// (numbers, booleans, text, missing), then by value within a kind, so
    /// mixed columns still get a total order.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        self.sort_rank()
            .cmp(&other.sort_rank())
            .then_with(|| match (self, other) {
                (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
                (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
                (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
                (a, b) => match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    _ => Ordering::Equal,
                },
            })
    }

    fn sort_rank(&self) -> u8 {
        match self {
            CellValue::Int(_) | CellValue::Float(_) => 0,
            CellValue::Bool(_) => 1,
            CellValue::String(_) => 2,
            CellValue::Null => 3,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Int(i) => write!(f, "{}", i),
            // Integral floats keep one decimal so 3.0 does not read as an int
            CellValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}
