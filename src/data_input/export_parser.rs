// src/data_input/export_parser.rs

use csv::ReaderBuilder;
use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::constants::{COLUMN_PHASE, COLUMN_SWEEP, COLUMN_TIME, THIXOTROPY_TIME_STEP_S};
use crate::data_input::export_data::{coerce_numeric, DataTable};
use crate::error::LoadError;
use crate::series_names::{Phase, Sweep};

/// Which kind of test an export holds, and therefore which sections it must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Flow sweep: forward and reverse shear-rate scans.
    FlowSweep,
    /// Peak hold: pre-shear, high-shear and recovery holds.
    PeakHold,
}

impl ExportKind {
    /// Column that receives the section label.
    pub fn label_column(self) -> &'static str {
        match self {
            ExportKind::FlowSweep => COLUMN_SWEEP,
            ExportKind::PeakHold => COLUMN_PHASE,
        }
    }

    /// Required sections as `(title, label)` pairs, in merge order.
    pub fn sections(self) -> Vec<(&'static str, &'static str)> {
        match self {
            ExportKind::FlowSweep => Sweep::ALL
                .iter()
                .map(|s| (s.section_title(), s.label()))
                .collect(),
            ExportKind::PeakHold => Phase::ALL
                .iter()
                .map(|p| (p.section_title(), p.label()))
                .collect(),
        }
    }
}

/// Section being collected while scanning the file.
struct SectionBuilder {
    title: &'static str,
    table: Option<DataTable>,
    units_row_pending: bool,
}

/// Reads a flow-sweep export and labels its rows FORWARD / REVERSE in the `Sweep` column.
pub fn load_flow_sweep(path: &Path) -> Result<DataTable, LoadError> {
    load_export(path, ExportKind::FlowSweep)
}

/// Reads a peak-hold export, labels its rows in the `peak` column and appends a `Time` column.
pub fn load_peak_hold(path: &Path) -> Result<DataTable, LoadError> {
    load_export(path, ExportKind::PeakHold)
}

pub fn load_export(path: &Path, kind: ExportKind) -> Result<DataTable, LoadError> {
    let content = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Reading {:?} export '{}'", kind, path.display());
    parse_export(&content, path, kind)
}

/// Parses export text. `path` is only used in error messages.
///
/// Cells that are not valid UTF-8 fail the whole file with `LoadError::Csv`.
pub fn parse_export<C: AsRef<[u8]>>(
    content: C,
    path: &Path,
    kind: ExportKind,
) -> Result<DataTable, LoadError> {
    let known_sections = kind.sections();
    let label_column = kind.label_column();

    let mut metadata: Vec<(String, String)> = Vec::new();
    let mut sections: Vec<SectionBuilder> = Vec::new();
    let mut flat_table: Option<DataTable> = None;
    // Title and line count of an unrequired section whose lines are being dropped.
    let mut skipped_section: Option<(String, usize)> = None;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_ref());

    for (line_index, result) in reader.records().enumerate() {
        let record = result?;
        let cells: Vec<String> = record
            .iter()
            .map(|cell| cell.trim_matches('"').to_string())
            .collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        if let Some(&(title, _)) = known_sections.iter().find(|(title, _)| cells[0] == *title) {
            debug!("Found section '{}' at line {}", title, line_index + 1);
            sections.push(SectionBuilder {
                title,
                table: None,
                units_row_pending: false,
            });
            log_skipped_section(skipped_section.take());
            continue;
        }

        if is_section_title(&cells, !sections.is_empty()) {
            debug!("Ignoring section '{}' at line {}", cells[0], line_index + 1);
            log_skipped_section(skipped_section.replace((cells[0].clone(), 0)));
            continue;
        }

        if let Some((_, skipped_rows)) = skipped_section.as_mut() {
            *skipped_rows += 1;
            continue;
        }

        if let Some(table) = flat_table.as_mut() {
            table.push_row(cells);
            continue;
        }

        match sections.last_mut() {
            Some(section) => {
                if section.table.is_none() {
                    section.table = Some(DataTable::new(cells));
                    section.units_row_pending = true;
                } else if section.units_row_pending {
                    debug!("Skipping units row of '{}': {:?}", section.title, cells);
                    section.units_row_pending = false;
                } else if let Some(table) = section.table.as_mut() {
                    table.push_row(cells);
                }
            }
            None if cells.iter().any(|cell| cell == label_column) => {
                debug!("Found pre-labelled header at line {}", line_index + 1);
                flat_table = Some(DataTable::new(cells));
            }
            None => {
                if cells.len() >= 2 && !cells[0].is_empty() {
                    metadata.push((cells[0].clone(), cells[1].clone()));
                }
            }
        }
    }

    log_skipped_section(skipped_section);
    debug!("Extracted {} metadata entries", metadata.len());

    let mut merged = match flat_table {
        Some(table) => {
            info!("Read {} pre-labelled rows", table.len());
            table
        }
        None => merge_sections(sections, &known_sections, label_column, path)?,
    };

    if kind == ExportKind::PeakHold && !merged.has_column(COLUMN_TIME) {
        merged.push_column(COLUMN_TIME, |row_index| {
            (row_index as f64 * THIXOTROPY_TIME_STEP_S).to_string()
        });
    }
    merged.set_metadata(metadata);
    Ok(merged)
}

fn log_skipped_section(section: Option<(String, usize)>) {
    if let Some((title, lines)) = section {
        debug!("Dropped {lines} lines of section '{title}'");
    }
}

/// Whether a line starts a new section: a single non-numeric cell such as
/// `Peak hold - 4`. Before the first section only `<name> - <n>` titles count,
/// so single-cell preamble lines stay metadata.
fn is_section_title(cells: &[String], inside_sections: bool) -> bool {
    let Some((first, rest)) = cells.split_first() else {
        return false;
    };
    if first.is_empty() || rest.iter().any(|cell| !cell.is_empty()) || coerce_numeric(first).is_some() {
        return false;
    }
    if inside_sections {
        return true;
    }
    first
        .rsplit_once(" - ")
        .is_some_and(|(name, number)| !name.trim().is_empty() && number.trim().parse::<u32>().is_ok())
}

fn merge_sections(
    sections: Vec<SectionBuilder>,
    known_sections: &[(&'static str, &'static str)],
    label_column: &str,
    path: &Path,
) -> Result<DataTable, LoadError> {
    if sections.is_empty() {
        return Err(LoadError::UnrecognisedLayout(path.to_path_buf()));
    }

    let missing: Vec<&str> = known_sections
        .iter()
        .map(|(title, _)| *title)
        .filter(|title| !sections.iter().any(|s| s.title == *title))
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingSections {
            path: path.to_path_buf(),
            missing: missing.join(", "),
        });
    }

    let mut merged = DataTable::default();
    for &(title, label) in known_sections {
        for section in sections.iter().filter(|s| s.title == title) {
            let mut table = section
                .table
                .clone()
                .ok_or_else(|| LoadError::MissingHeader(title.to_string()))?;
            table.push_column(label_column, |_| label.to_string());
            info!("  Section '{}' ({}): {} rows", title, label, table.len());
            merged.append(table);
        }
    }
    Ok(merged)
}
