//! Pre-write validation gate

pub mod dataset_validator;

pub use dataset_validator::{validate_dataset, SourceCounts, ValidationReport, ValidationStatus};
