//! Path configuration for a conversion run
//!
//! The transform code never looks up paths itself; the binary resolves a
//! [`ConvertPaths`] once and hands it to the pipeline.
//!
//! **Resolution:**
//! - output folder: CLI → `SPV_OUTPUT_DIR` → TOML `output_dir` → `./data`
//! - input folder: CLI → `SPV_INPUT_DIR` → TOML `input_dir` → `./webapp/data`
//! - each CSV: CLI file flag → TOML file key → `<input folder>/<default name>`

use spv_common::config::{resolve_path, CompiledDefaults, TomlConfig, ENV_INPUT_DIR, ENV_OUTPUT_DIR};
use std::path::{Path, PathBuf};

/// Default annotated table file name
pub const ANNOTATED_CSV: &str = "all_annotated.csv";

/// Default thread table file name
pub const THREADS_CSV: &str = "all_threads_anonymized.csv";

/// Path overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub input_dir: Option<PathBuf>,
    pub annotated_csv: Option<PathBuf>,
    pub threads_csv: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Every location a run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertPaths {
    pub annotated_csv: PathBuf,
    pub threads_csv: PathBuf,
    pub output_dir: PathBuf,
}

impl ConvertPaths {
    /// Input files inside one folder
    pub fn in_folders(input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            annotated_csv: input_dir.join(ANNOTATED_CSV),
            threads_csv: input_dir.join(THREADS_CSV),
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn resolve(cli: &PathOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::new();

        let input_dir = resolve_path(
            cli.input_dir.as_deref(),
            ENV_INPUT_DIR,
            toml.input_dir.as_deref(),
            &defaults.input_dir,
        );
        let output_dir = resolve_path(
            cli.output_dir.as_deref(),
            ENV_OUTPUT_DIR,
            toml.output_dir.as_deref(),
            &defaults.output_dir,
        );

        let pick = |cli_file: &Option<PathBuf>, toml_file: &Option<PathBuf>, name: &str| {
            cli_file
                .clone()
                .or_else(|| toml_file.clone())
                .unwrap_or_else(|| input_dir.join(name))
        };

        Self {
            annotated_csv: pick(&cli.annotated_csv, &toml.annotated_csv, ANNOTATED_CSV),
            threads_csv: pick(&cli.threads_csv, &toml.threads_csv, THREADS_CSV),
            output_dir,
        }
    }
}
