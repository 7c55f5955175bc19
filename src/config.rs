// src/config.rs

//! TOML configuration file.
//!
//! ```toml
//! # rheology.toml
//! [output]
//! directory = "results"
//!
//! [plot]
//! width = 1600
//! height = 1200
//! marker_size = 4
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_OUTPUT_DIR, MARKER_SIZE_SWEEP, PLOT_HEIGHT, PLOT_WIDTH};
use crate::error::ConfigError;

/// Root configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub plot: PlotSettings,
}

/// Where plots and exports are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

/// Image size and marker size for rendered plots.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub marker_size: i32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: PLOT_WIDTH,
            height: PLOT_HEIGHT,
            marker_size: MARKER_SIZE_SWEEP,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [output]
            directory = "results"

            [plot]
            width = 1600
            marker_size = 4
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("results"));
        assert_eq!(config.plot.width, 1600);
        assert_eq!(config.plot.height, PLOT_HEIGHT);
        assert_eq!(config.plot.marker_size, 4);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.directory, PathBuf::from("output"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[plot]\nwidth = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
