//! Run settings. A missing settings file is created with defaults and the run
//! stops so the user can review it before anything is processed.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::probability::OutputOptions;
use crate::table::loader::is_yaml_path;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_OUTPUT_DIR: &str = "Output";

const DEFAULT_LOOT_FILES: &[&str] = &[
    "default_loottable.json",
    "default_heli_loottable.json",
    "default_bradley_loottable.json",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Loot-table files to process, relative to the working directory.
    pub loot_files: Vec<String>,
    /// Record MinCondition/MaxCondition per item.
    pub output_min_max_condition: bool,
    /// Record Min/Max amounts per item.
    pub output_min_max_amount: bool,
    /// Snap every written percentage to the nearest 0.5.
    pub round_percentages: bool,
    /// Directory receiving the result documents. Created on demand.
    pub output_dir: String,
    /// Also write the aggregated report as CSV.
    pub output_csv: bool,
    /// Worker threads for processing files. 0 uses all cores.
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loot_files: DEFAULT_LOOT_FILES.iter().map(|s| s.to_string()).collect(),
            output_min_max_condition: true,
            output_min_max_amount: true,
            round_percentages: false,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            output_csv: false,
            workers: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config JSON '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse config YAML '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to encode config '{}' as JSON: {source}", .path.display())]
    EncodeJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode config '{}' as YAML: {source}", .path.display())]
    EncodeYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to write default config '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigStatus {
    Loaded(Settings),
    /// No settings existed; defaults were written to this path.
    Created(PathBuf),
}

impl Settings {
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            include_condition: self.output_min_max_condition,
            include_amount: self.output_min_max_amount,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if is_yaml_path(path) {
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Write these settings, JSON with 4-space indentation or YAML by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_yaml_path(path) {
            serde_yaml::to_string(self).map_err(|source| ConfigError::EncodeYaml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            crate::output::to_pretty_json(self).map_err(|source| ConfigError::EncodeJson {
                path: path.to_path_buf(),
                source,
            })?
        };
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_create(path: impl AsRef<Path>) -> Result<ConfigStatus, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path).map(ConfigStatus::Loaded);
        }
        info!(
            "config '{}' not found, writing defaults",
            path.display()
        );
        Self::default().save(path)?;
        Ok(ConfigStatus::Created(path.to_path_buf()))
    }
}
