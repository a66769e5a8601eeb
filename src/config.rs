//! Analysis settings, read from an optional JSON file.

use crate::data::Strictness;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input dataset location used when no config overrides it.
pub const DEFAULT_CSV_PATH: &str = "WA_Fn-UseC_-Telco-Customer-Churn.csv";
/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "churnscope.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where the charts go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OutputTarget {
    /// Interactive chart windows
    #[default]
    Window,
    /// PNG files in a directory
    Export { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub strictness: Strictness,
    pub output: OutputTarget,
    /// Open exported images with the system viewer
    pub open_exports: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            strictness: Strictness::default(),
            output: OutputTarget::default(),
            open_exports: false,
        }
    }
}

impl AnalysisConfig {
    /// Load `churnscope.json` from the working directory, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}
