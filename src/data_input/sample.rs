// src/data_input/sample.rs

use log::{debug, warn};

use crate::constants::{
    COLUMN_PHASE, COLUMN_SHEAR_RATE, COLUMN_STEP_TIME, COLUMN_SWEEP, COLUMN_TIME,
    COLUMN_VISCOSITY,
};
use crate::data_input::export_data::DataTable;
use crate::error::AnalysisError;
use crate::series_names::{Phase, Sweep};
use crate::types::PlotPoints;

/// One row of a peak-hold phase after numeric coercion.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhaseObservation {
    pub elapsed_time: Option<f64>, // Synthetic run time (s), when the table carries one.
    pub step_time: Option<f64>,    // Time since the start of the hold step (s).
    pub viscosity: Option<f64>,    // Pa.s
}

impl PhaseObservation {
    pub fn new(step_time: f64, viscosity: f64) -> Self {
        Self {
            elapsed_time: None,
            step_time: Some(step_time),
            viscosity: Some(viscosity),
        }
    }
}

/// A thixotropy run split into its three consecutive phases, each non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasedSample {
    preshear: Vec<PhaseObservation>,
    highshear: Vec<PhaseObservation>,
    recovery: Vec<PhaseObservation>,
}

impl PhasedSample {
    /// Builds a sample from per-phase observations. Empty phases are a validation error.
    pub fn new(
        preshear: Vec<PhaseObservation>,
        highshear: Vec<PhaseObservation>,
        recovery: Vec<PhaseObservation>,
    ) -> Result<Self, AnalysisError> {
        let sample = Self {
            preshear,
            highshear,
            recovery,
        };
        let missing: Vec<&str> = Phase::ALL
            .into_iter()
            .filter(|&phase| sample.phase(phase).is_empty())
            .map(Phase::label)
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::missing_phases(&missing));
        }
        Ok(sample)
    }

    /// Validates required fields and phases, then groups rows by phase label.
    ///
    /// Rows whose label is not one of the three phases are ignored.
    pub fn from_table(table: &DataTable) -> Result<Self, AnalysisError> {
        let (Some(viscosity), Some(labels), Some(step_time)) = (
            table.numeric_column(COLUMN_VISCOSITY),
            table.text_column(COLUMN_PHASE),
            table.numeric_column(COLUMN_STEP_TIME),
        ) else {
            let missing = table.missing_columns(&[COLUMN_VISCOSITY, COLUMN_PHASE, COLUMN_STEP_TIME]);
            return Err(AnalysisError::missing_columns(&missing));
        };
        let elapsed = table.numeric_column(COLUMN_TIME);

        let mut phases: [Vec<PhaseObservation>; 3] = Default::default();
        let mut ignored = 0usize;
        for (row_index, label) in labels.iter().enumerate() {
            let Ok(phase) = label.parse::<Phase>() else {
                ignored += 1;
                continue;
            };
            phases[phase as usize].push(PhaseObservation {
                elapsed_time: elapsed.as_ref().and_then(|column| column[row_index]),
                step_time: step_time[row_index],
                viscosity: viscosity[row_index],
            });
        }
        if ignored > 0 {
            warn!("Ignored {ignored} rows without a recognised phase label");
        }

        let [preshear, highshear, recovery] = phases;
        debug!(
            "Phase sizes: PRESHEAR={} HIGHSHEAR={} RECOVERY={}",
            preshear.len(),
            highshear.len(),
            recovery.len()
        );
        Self::new(preshear, highshear, recovery)
    }

    pub fn phase(&self, phase: Phase) -> &[PhaseObservation] {
        match phase {
            Phase::Preshear => &self.preshear,
            Phase::Highshear => &self.highshear,
            Phase::Recovery => &self.recovery,
        }
    }

    /// Viscosity at the end of the hold step: the last observation of the phase.
    pub fn anchor_viscosity(&self, phase: Phase) -> Result<f64, AnalysisError> {
        let last = self
            .phase(phase)
            .last()
            .ok_or_else(|| AnalysisError::missing_phases(&[phase.label()]))?;
        last.viscosity.ok_or_else(|| {
            AnalysisError::Validation(format!(
                "Last {} viscosity value is not numeric",
                phase.label()
            ))
        })
    }

    /// `(elapsed_time, viscosity)` points over the whole run, for plotting.
    pub fn time_series(&self) -> PlotPoints {
        Phase::ALL
            .into_iter()
            .flat_map(|phase| self.phase(phase).iter())
            .filter_map(|obs| Some((obs.elapsed_time?, obs.viscosity?)))
            .collect()
    }
}

/// One flow-sweep run: forward and reverse `(shear_rate, viscosity)` pairs in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepSeries {
    forward: Vec<(f64, f64)>,
    reverse: Vec<(f64, f64)>,
}

impl SweepSeries {
    pub fn new(forward: Vec<(f64, f64)>, reverse: Vec<(f64, f64)>) -> Self {
        Self { forward, reverse }
    }

    /// Groups rows by sweep label, keeping rows where both fields are numeric.
    pub fn from_table(table: &DataTable) -> Result<Self, AnalysisError> {
        let (Some(shear_rate), Some(viscosity), Some(labels)) = (
            table.numeric_column(COLUMN_SHEAR_RATE),
            table.numeric_column(COLUMN_VISCOSITY),
            table.text_column(COLUMN_SWEEP),
        ) else {
            let missing = table.missing_columns(&[COLUMN_SHEAR_RATE, COLUMN_VISCOSITY, COLUMN_SWEEP]);
            return Err(AnalysisError::missing_columns(&missing));
        };

        let mut series = Self::default();
        let mut skipped = 0usize;
        for (row_index, label) in labels.iter().enumerate() {
            let (Ok(sweep), Some(x), Some(y)) = (
                label.parse::<Sweep>(),
                shear_rate[row_index],
                viscosity[row_index],
            ) else {
                skipped += 1;
                continue;
            };
            match sweep {
                Sweep::Forward => series.forward.push((x, y)),
                Sweep::Reverse => series.reverse.push((x, y)),
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} sweep rows with missing label or non-numeric values");
        }
        Ok(series)
    }

    pub fn direction(&self, sweep: Sweep) -> &[(f64, f64)] {
        match sweep {
            Sweep::Forward => &self.forward,
            Sweep::Reverse => &self.reverse,
        }
    }

    /// Splits one direction into separate shear-rate and viscosity vectors.
    pub fn columns(&self, sweep: Sweep) -> (Vec<f64>, Vec<f64>) {
        self.direction(sweep).iter().copied().unzip()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}
