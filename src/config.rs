//! Configuration file support
//!
//! Refinement options can be stored in a TOML file:
//!
//! ```toml
//! [refine]
//! threshold = 0.0
//! search_range = 20
//! tolerance = 20
//! expand_ratio = 0.1
//! ```
//!
//! Lookup order for [`Config::load`]: `./crop-adjust.toml`, then
//! `<config dir>/crop-adjust/config.toml`. Command-line values override
//! file values; a `--preset` replaces the file values as a whole.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::crop::CropOptions;

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "crop-adjust.toml";

/// Application directory under the user config dir
const APP_DIR: &str = "crop-adjust";

/// Config file name under the application directory
const USER_CONFIG_FILE: &str = "config.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `[refine]` section; unset fields fall back to the defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefineSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_range: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_ratio: Option<f64>,
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub refine: RefineSection,
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// Replaces the file values as the base the flags below apply to
    pub preset: Option<CropOptions>,
    pub threshold: Option<f64>,
    pub search_range: Option<u32>,
    pub tolerance: Option<i32>,
    pub expand_ratio: Option<f64>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Candidate config file locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_DIR).join(USER_CONFIG_FILE));
        }
        paths
    }

    /// Load the first config file found; defaults when none exists
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::search_paths() {
            if path.is_file() {
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// File values as options, defaults for anything unset
    pub fn to_options(&self) -> CropOptions {
        let defaults = CropOptions::default();
        let section = &self.refine;

        CropOptions::builder()
            .threshold(section.threshold.unwrap_or(defaults.threshold))
            .search_range(section.search_range.unwrap_or(defaults.search_range))
            .tolerance(section.tolerance.unwrap_or(defaults.tolerance))
            .expand_ratio(section.expand_ratio.unwrap_or(defaults.expand_ratio))
            .build()
    }

    /// Merge with command-line values (CLI takes precedence)
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> CropOptions {
        let base = cli.preset.unwrap_or_else(|| self.to_options());

        CropOptions::builder()
            .threshold(cli.threshold.unwrap_or(base.threshold))
            .search_range(cli.search_range.unwrap_or(base.search_range))
            .tolerance(cli.tolerance.unwrap_or(base.tolerance))
            .expand_ratio(cli.expand_ratio.unwrap_or(base.expand_ratio))
            .build()
    }
}
