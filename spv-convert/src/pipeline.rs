//! Conversion pipeline
//!
//! **Stages:**
//! 1. Check both input files exist
//! 2. Load both tables
//! 3. Transform: annotated records + grouped threads
//! 4. Validate (hard errors stop here, nothing written)
//! 5. Serialize threads compactly and encrypt
//! 6. Render and write all three artifacts as one set
//!
//! Every fatal path returns before stage 6 touches the output folder, and
//! stage 6 itself is all-or-nothing.

use crate::config::ConvertPaths;
use crate::crypto::{encrypt_data, EncryptionParams};
use crate::error::{ConvertError, Result};
use crate::models::{AnnotatedRecord, ParseError, ThreadMap};
use crate::output::{ArtifactInfo, ArtifactWriter, RenderedArtifacts};
use crate::report;
use crate::services::{
    convert_annotated, convert_threads, load_table, ANNOTATED_SCHEMA, THREADS_SCHEMA,
};
use crate::validators::{validate_dataset, SourceCounts, ValidationReport};
use spv_common::Error as CommonError;
use tracing::info;

/// Shortest password accepted by the command-line tool
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Reject passwords shorter than [`MIN_PASSWORD_CHARS`] characters
pub fn validate_password(password: &str) -> std::result::Result<(), CommonError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(CommonError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

/// Transformed data before encryption
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub records: Vec<AnnotatedRecord>,
    pub parse_errors: Vec<ParseError>,
    pub threads: ThreadMap,
    pub source_counts: SourceCounts,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub annotated_records: usize,
    pub thread_groups: usize,
    pub total_posts: usize,
    pub parse_errors: Vec<ParseError>,
    pub validation: ValidationReport,
    /// Size of the compact thread JSON before encryption
    pub plaintext_bytes: usize,
    pub params: EncryptionParams,
    pub artifacts: Vec<ArtifactInfo>,
}

/// Stages 1–3
pub fn load_and_transform(paths: &ConvertPaths) -> Result<TransformOutput> {
    info!("Checking input files...");
    for path in [&paths.annotated_csv, &paths.threads_csv] {
        if !path.is_file() {
            return Err(ConvertError::Input(path.clone()));
        }
        info!("  - {}: OK", path.display());
    }

    info!("Loading CSV files...");
    let annotated_table = load_table(&paths.annotated_csv, &ANNOTATED_SCHEMA)?;
    let threads_table = load_table(&paths.threads_csv, &THREADS_SCHEMA)?;
    for table in [&annotated_table, &threads_table] {
        info!(
            "  - {}: {} rows, {} columns",
            table.name(),
            table.len(),
            table.columns().len()
        );
    }

    info!("Converting data...");
    let annotated = convert_annotated(&annotated_table);
    let threads = convert_threads(&threads_table)?;
    info!("  - Annotated records: {}", annotated.records.len());
    info!("  - Thread groups: {}", threads.len());

    Ok(TransformOutput {
        records: annotated.records,
        parse_errors: annotated.parse_errors,
        threads,
        source_counts: SourceCounts {
            annotated_rows: annotated_table.len(),
            thread_rows: threads_table.len(),
        },
    })
}

/// Stages 4–6 on already transformed data
pub fn validate_encrypt_write(
    transformed: TransformOutput,
    password: &str,
    writer: &ArtifactWriter,
) -> Result<ConversionSummary> {
    report::log_parse_errors(&transformed.parse_errors);

    info!("Validating data...");
    let validation = validate_dataset(
        &transformed.records,
        &transformed.threads,
        transformed.source_counts,
    );
    report::log_validation(&validation);
    let validation = validation.into_result()?;

    info!("Encrypting threads data...");
    let threads_json = serde_json::to_string(&transformed.threads)?;
    let plaintext_bytes = threads_json.len();
    info!("  Original size: {}", report::format_mb(plaintext_bytes as u64));

    let payload = encrypt_data(&threads_json, password)?;
    info!(
        "  Encrypted size: {}",
        report::format_mb(payload.ciphertext.len() as u64)
    );

    let artifacts = RenderedArtifacts::render(&transformed.records, &payload)?;

    info!("Saving files to {}...", writer.output_dir().display());
    let written = writer.write_all(&artifacts)?;
    for artifact in &written {
        info!("  - {} ({})", artifact.name, report::format_kb(artifact.bytes));
    }

    Ok(ConversionSummary {
        annotated_records: transformed.records.len(),
        thread_groups: transformed.threads.len(),
        total_posts: transformed.threads.total_posts(),
        parse_errors: transformed.parse_errors,
        validation,
        plaintext_bytes,
        params: payload.params,
        artifacts: written,
    })
}

/// Full run from injected paths
pub fn run_conversion(paths: &ConvertPaths, password: &str) -> Result<ConversionSummary> {
    let transformed = load_and_transform(paths)?;
    let writer = ArtifactWriter::new(paths.output_dir.clone());
    validate_encrypt_write(transformed, password, &writer)
}
