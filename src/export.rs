// src/export.rs

use csv::Writer;
use log::info;
use std::fs;
use std::path::Path;

use crate::constants::{METRIC_ERROR, METRIC_KEYS};
use crate::data_analysis::batch::SampleResult;
use crate::data_analysis::derivative::DerivativeSeries;
use crate::data_analysis::thixotropy::MetricRecord;
use crate::error::ExportError;

fn create_writer(path: &Path) -> Result<Writer<fs::File>, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(Writer::from_path(path)?)
}

/// Writes one sample's metrics as `Metric,Value` rows.
pub fn export_single(record: &MetricRecord, path: &Path) -> Result<(), ExportError> {
    let mut writer = create_writer(path)?;
    writer.write_record(["Metric", "Value"])?;
    for (key, value) in record.entries() {
        writer.write_record([key.as_str(), value.export_text().as_str()])?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported metrics to '{}'", path.display());
    Ok(())
}

/// Writes one row per sample with a column per metric (wide layout).
///
/// An `Error` column is added only when at least one sample failed.
pub fn export_wide(results: &[SampleResult], path: &Path) -> Result<(), ExportError> {
    if results.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut columns: Vec<&str> = METRIC_KEYS.to_vec();
    if results.iter().any(|r| r.record.is_error()) {
        columns.push(METRIC_ERROR);
    }

    let mut writer = create_writer(path)?;
    let mut header = vec!["Sample"];
    header.extend(columns.iter().copied());
    writer.write_record(&header)?;

    for result in results {
        let mut row = vec![result.sample.clone()];
        row.extend(columns.iter().map(|column| {
            result
                .record
                .get(column)
                .map(|value| value.export_text())
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} samples (wide) to '{}'", results.len(), path.display());
    Ok(())
}

/// Writes one `Sample,Metric,Value` row per entry (long layout).
pub fn export_long(results: &[SampleResult], path: &Path) -> Result<(), ExportError> {
    if results.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = create_writer(path)?;
    writer.write_record(["Sample", "Metric", "Value"])?;
    for result in results {
        for (key, value) in result.record.entries() {
            writer.write_record([
                result.sample.as_str(),
                key.as_str(),
                value.export_text().as_str(),
            ])?;
        }
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} samples (long) to '{}'", results.len(), path.display());
    Ok(())
}

/// Writes a log-log derivative series as two columns.
pub fn export_derivative(series: &DerivativeSeries, path: &Path) -> Result<(), ExportError> {
    let mut writer = create_writer(path)?;
    writer.write_record(["Shear rate", "d(log Viscosity)/d(log Shear rate)"])?;
    for (x, d) in series.x.iter().zip(series.dydx.iter()) {
        writer.write_record([x.to_string(), d.to_string()])?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
