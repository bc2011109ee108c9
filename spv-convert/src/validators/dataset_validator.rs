//! Dataset Validator
//!
//! Cross-checks the transformed structures against their source tables
//! before anything is written.
//!
//! # Checks
//! 1. **Annotated count**: one record per source row (hard error)
//! 2. **Thread post count**: one post per source row (hard error)
//! 3. **Thread coverage**: distinct thread ids referenced by records but
//!    absent from the thread map (warning)
//! 4. **Empty vaccine_types**: records with nothing decoded (warning)
//!
//! # Status Determination
//! - Pass: no errors, no warnings
//! - Warning: warnings only, output proceeds
//! - Fail: at least one hard error, output is blocked

use crate::error::{ConvertError, Result};
use crate::models::{AnnotatedRecord, ThreadMap};
use crate::services::annotated::is_empty_value;
use serde_json::Value;
use std::collections::HashSet;

/// Row counts of the source tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCounts {
    pub annotated_rows: usize,
    pub thread_rows: usize,
}

/// Validation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// All checks passed
    Pass,
    /// Non-blocking findings
    Warning,
    /// Hard errors, pipeline must stop
    Fail,
}

/// Findings of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Distinct record thread ids with no thread
    pub missing_thread_ids: usize,
    /// Records whose vaccine_types is empty
    pub empty_vaccine_types: usize,
}

impl ValidationReport {
    pub fn status(&self) -> ValidationStatus {
        if !self.errors.is_empty() {
            ValidationStatus::Fail
        } else if !self.warnings.is_empty() {
            ValidationStatus::Warning
        } else {
            ValidationStatus::Pass
        }
    }

    /// `Err(ConvertError::Validation)` if any hard error was found
    pub fn into_result(self) -> Result<Self> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(ConvertError::Validation(self.errors))
        }
    }
}

/// Thread reference as it appears in an annotated record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ThreadRef {
    Id(i64),
    /// Null, text, or fractional values; never match a thread
    Other(String),
}

impl ThreadRef {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(id) => ThreadRef::Id(id),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        ThreadRef::Id(f as i64)
                    }
                    _ => ThreadRef::Other(n.to_string()),
                },
            },
            other => ThreadRef::Other(other.to_string()),
        }
    }
}

/// Run every check
pub fn validate_dataset(
    records: &[AnnotatedRecord],
    threads: &ThreadMap,
    counts: SourceCounts,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    // Check 1: Annotated count
    if records.len() != counts.annotated_rows {
        report.errors.push(format!(
            "Annotated count mismatch: {} vs {}",
            records.len(),
            counts.annotated_rows
        ));
    }

    // Check 2: Thread post count
    let total_posts = threads.total_posts();
    if total_posts != counts.thread_rows {
        report.errors.push(format!(
            "Threads post count mismatch: {} vs {}",
            total_posts, counts.thread_rows
        ));
    }

    // Check 3: Thread coverage
    let referenced: HashSet<ThreadRef> = records
        .iter()
        .map(|r| ThreadRef::from_value(r.thread_id()))
        .collect();
    report.missing_thread_ids = referenced
        .iter()
        .filter(|r| match r {
            ThreadRef::Id(id) => !threads.contains_thread(*id),
            ThreadRef::Other(_) => true,
        })
        .count();
    if report.missing_thread_ids > 0 {
        report.warnings.push(format!(
            "Thread IDs in annotated but not in threads: {}",
            report.missing_thread_ids
        ));
    }

    // Check 4: Empty vaccine_types
    report.empty_vaccine_types = records
        .iter()
        .filter(|r| is_empty_value(r.vaccine_types()))
        .count();
    if report.empty_vaccine_types > 0 {
        report.warnings.push(format!(
            "Records with empty vaccine_types: {}",
            report.empty_vaccine_types
        ));
    }

    report
}
