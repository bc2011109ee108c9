//! spv-convert library
//!
//! Turns the two research CSV tables into the viewer's data set: a plain
//! `annotated.json`, the AES-encrypted thread map and its parameter record.

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod validators;

pub use config::{ConvertPaths, PathOverrides};
pub use error::{ConvertError, Result};
pub use pipeline::{run_conversion, validate_password, ConversionSummary};
