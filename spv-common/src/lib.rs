//! # SPV Common Library
//!
//! Shared code for the SPV viewer data tools including:
//! - Error types
//! - Configuration loading (CLI → ENV → TOML → compiled defaults)
//! - Output directory initialization
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
