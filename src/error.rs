// src/error.rs

use std::path::PathBuf;

/// Errors raised while computing metrics from a phased sample.
///
/// The metrics engine never lets these escape as a panic; callers receive
/// them as the `Err` side of the outcome and render them as an `Error` entry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A required field or phase/sweep label is absent, or a required cell is not numeric.
    #[error("{0}")]
    Validation(String),

    /// A computed denominator is zero.
    #[error("Division by zero while computing {metric}: {detail}")]
    Division { metric: &'static str, detail: String },

    /// A required filtered subset is empty.
    #[error("{0}")]
    EmptyData(String),
}

impl AnalysisError {
    pub fn missing_columns(columns: &[&str]) -> Self {
        AnalysisError::Validation(format!(
            "Data is missing required columns: {}",
            columns.join(", ")
        ))
    }

    pub fn missing_phases(phases: &[&str]) -> Self {
        AnalysisError::Validation(format!(
            "Data is missing required phases: {}",
            phases.join(", ")
        ))
    }
}

/// Errors raised while reading an instrument export.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("The file '{path}' is missing required sections: {missing}")]
    MissingSections { path: PathBuf, missing: String },

    #[error("Section '{0}' has no header row")]
    MissingHeader(String),

    #[error("The file '{0}' contains no recognised sections or labelled table")]
    UnrecognisedLayout(PathBuf),
}

/// Errors raised while writing result files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Nothing to export")]
    Empty,
}

/// Errors raised while loading the TOML configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_phase_message_names_phase() {
        let err = AnalysisError::missing_phases(&["HIGHSHEAR"]);
        assert_eq!(err.to_string(), "Data is missing required phases: HIGHSHEAR");
    }

    #[test]
    fn test_division_message() {
        let err = AnalysisError::Division {
            metric: "Thixotropic Index",
            detail: "high-shear viscosity is zero".to_string(),
        };
        assert!(err.to_string().starts_with("Division by zero while computing Thixotropic Index"));
    }
}
