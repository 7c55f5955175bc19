// src/data_analysis/batch.rs

use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::data_analysis::thixotropy::{compute_metrics, MetricRecord};
use crate::data_input::export_parser::load_peak_hold;
use crate::series_names::sample_name;

/// Metrics for one analysed file.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    pub sample: String,
    pub path: PathBuf,
    pub record: MetricRecord,
}

/// Loads one peak-hold export and computes its metrics.
///
/// Load failures are folded into an `Error` record so a batch never stops early.
pub fn analyze_file(path: &Path) -> SampleResult {
    let sample = sample_name(path);
    let record = match load_peak_hold(path) {
        Ok(table) => MetricRecord::from_outcome(&compute_metrics(&table)),
        Err(e) => MetricRecord::error(format!("Failed to analyze file: {e}")),
    };
    if record.is_error() {
        warn!("Analysis of '{}' failed", path.display());
    }
    SampleResult {
        sample,
        path: path.to_path_buf(),
        record,
    }
}

/// Analyses files one after another; results keep the input order.
pub fn analyze_files<P: AsRef<Path>>(paths: &[P]) -> Vec<SampleResult> {
    info!("Analysing {} thixotropy file(s)", paths.len());
    paths.iter().map(|p| analyze_file(p.as_ref())).collect()
}
