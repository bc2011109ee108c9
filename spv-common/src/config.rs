//! Configuration loading and folder resolution
//!
//! Every path setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Missing TOML files never cause termination: a warning is logged and
//! compiled defaults are used. A TOML file that exists but cannot be parsed
//! is a configuration error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit TOML config file
pub const ENV_CONFIG_FILE: &str = "SPV_CONFIG";

/// Environment variable overriding the input directory
pub const ENV_INPUT_DIR: &str = "SPV_INPUT_DIR";

/// Environment variable overriding the output directory
pub const ENV_OUTPUT_DIR: &str = "SPV_OUTPUT_DIR";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory holding the source CSV files
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the generated artifacts
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Explicit path of the annotated CSV (overrides `input_dir`)
    #[serde(default)]
    pub annotated_csv: Option<PathBuf>,

    /// Explicit path of the threads CSV (overrides `input_dir`)
    #[serde(default)]
    pub threads_csv: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Compiled defaults used when no other source provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl CompiledDefaults {
    /// Defaults relative to the working directory
    pub fn new() -> Self {
        Self {
            input_dir: PathBuf::from("webapp").join("data"),
            output_dir: PathBuf::from("data"),
        }
    }
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the bootstrap config came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Named by `--config` or `SPV_CONFIG` but absent
    MissingRequested(PathBuf),
    /// Nothing at the default location
    MissingDefault(PathBuf),
    /// Platform has no config directory
    NoConfigDir,
}

/// Config plus its origin.
///
/// Loading happens before the tracing subscriber exists, so the origin is
/// returned and logged later by [`LoadedConfig::log_source`].
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

impl LoadedConfig {
    fn defaults(source: ConfigSource) -> Self {
        Self {
            config: TomlConfig::default(),
            source,
        }
    }

    /// Report where the config came from. Call after logging is initialized.
    pub fn log_source(&self) {
        match &self.source {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::MissingRequested(path) => {
                warn!("Config file {} not found, using defaults", path.display())
            }
            ConfigSource::MissingDefault(path) => {
                debug!("No config file at {}, using defaults", path.display())
            }
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using compiled defaults")
            }
        }
    }
}

/// Locate and parse the TOML config file for a tool.
///
/// Lookup order: explicit path, then `SPV_CONFIG`, then
/// `<config_dir>/spv/<module_name>.toml`. A missing file yields defaults;
/// a file that cannot be read or parsed is an [`Error::Config`].
pub fn load_toml_config(explicit: Option<&Path>, module_name: &str) -> Result<LoadedConfig> {
    let requested = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(ENV_CONFIG_FILE).map(PathBuf::from));

    let path = match requested {
        Some(path) if !path.exists() => {
            return Ok(LoadedConfig::defaults(ConfigSource::MissingRequested(path)))
        }
        Some(path) => path,
        None => match default_config_path(module_name) {
            None => return Ok(LoadedConfig::defaults(ConfigSource::NoConfigDir)),
            Some(path) if !path.exists() => {
                return Ok(LoadedConfig::defaults(ConfigSource::MissingDefault(path)))
            }
            Some(path) => path,
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path),
    })
}

/// Default config file location for the platform
fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spv").join(format!("{}.toml", module_name)))
}

/// Resolve one path setting following the 4-tier priority order
pub fn resolve_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
    default: &Path,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Some(path) = std::env::var_os(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    // Priority 4: Compiled default
    default.to_path_buf()
}

/// Creates the output folder and names the files inside it
#[derive(Debug, Clone)]
pub struct OutputFolderInitializer {
    folder: PathBuf,
}

impl OutputFolderInitializer {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    /// Create the folder (and parents) if missing. Safe to call repeatedly.
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.folder.exists() {
            info!("Creating output folder: {}", self.folder.display());
            std::fs::create_dir_all(&self.folder)?;
        } else if !self.folder.is_dir() {
            return Err(Error::Config(format!(
                "Output path {} exists and is not a directory",
                self.folder.display()
            )));
        }
        Ok(())
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.folder.join(name)
    }
}
