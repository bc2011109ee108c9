//! Console reporting helpers

use crate::models::ParseError;
use crate::validators::{ValidationReport, ValidationStatus};
use tracing::{error, info, warn};

/// Parse errors listed individually; the rest are only counted
pub const MAX_REPORTED_PARSE_ERRORS: usize = 10;

pub fn log_parse_errors(errors: &[ParseError]) {
    if errors.is_empty() {
        return;
    }
    warn!("Parse errors:");
    for err in errors.iter().take(MAX_REPORTED_PARSE_ERRORS) {
        warn!("  - {}", err);
    }
    if errors.len() > MAX_REPORTED_PARSE_ERRORS {
        warn!("  ... and {} more", errors.len() - MAX_REPORTED_PARSE_ERRORS);
    }
}

pub fn log_validation(report: &ValidationReport) {
    match report.status() {
        ValidationStatus::Pass => info!("Validation passed"),
        ValidationStatus::Warning => warn!(
            "Validation passed with {} warning(s)",
            report.warnings.len()
        ),
        ValidationStatus::Fail => error!(
            "Validation failed with {} error(s)",
            report.errors.len()
        ),
    }
    if !report.errors.is_empty() {
        error!("ERRORS:");
        for err in &report.errors {
            error!("  - {}", err);
        }
    }
    if !report.warnings.is_empty() {
        warn!("WARNINGS:");
        for warning in &report.warnings {
            warn!("  - {}", warning);
        }
    }
}

pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
}
