// src/data_analysis/thixotropy.rs

use log::{debug, info};

use crate::constants::{
    METRIC_ERROR, METRIC_KEYS, METRIC_RECOVERY_TIME_80, METRIC_STRUCTURAL_RECOVERY,
    METRIC_THIXOTROPIC_INDEX, METRIC_VISCOSITY_RATIO, RECOVERY_TARGET_FRACTION,
};
use crate::data_input::export_data::DataTable;
use crate::data_input::sample::PhasedSample;
use crate::error::AnalysisError;
use crate::series_names::Phase;
use crate::types::MetricOutcome;

/// The four recovery/index metrics of one thixotropy run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResultSet {
    pub viscosity_ratio_pct: f64,
    pub thixotropic_index: f64,
    pub recovery_time_80_s: f64,
    pub structural_recovery_pct: f64,
}

impl MetricResultSet {
    /// Metric values keyed by their display names, in output order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            (METRIC_VISCOSITY_RATIO, self.viscosity_ratio_pct),
            (METRIC_THIXOTROPIC_INDEX, self.thixotropic_index),
            (METRIC_RECOVERY_TIME_80, self.recovery_time_80_s),
            (METRIC_STRUCTURAL_RECOVERY, self.structural_recovery_pct),
        ]
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

/// Value of one rendered metric entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Error(String),
}

impl MetricValue {
    /// Display text: numbers rounded to `decimals` places.
    pub fn display(&self, decimals: usize) -> String {
        match self {
            MetricValue::Number(value) => format!("{value:.decimals$}"),
            MetricValue::Error(message) => message.clone(),
        }
    }

    /// Full-precision text for file export.
    pub fn export_text(&self) -> String {
        match self {
            MetricValue::Number(value) => value.to_string(),
            MetricValue::Error(message) => message.clone(),
        }
    }
}

/// Ordered `(key, value)` rendering of a metric outcome.
///
/// A successful outcome yields the four metric keys; a failed one yields the
/// single `Error` entry carrying the error message.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    entries: Vec<(String, MetricValue)>,
}

impl MetricRecord {
    pub fn from_outcome(outcome: &MetricOutcome) -> Self {
        let entries = match outcome {
            Ok(metrics) => metrics
                .entries()
                .into_iter()
                .map(|(key, value)| (key.to_string(), MetricValue::Number(value)))
                .collect(),
            Err(err) => vec![(METRIC_ERROR.to_string(), MetricValue::Error(err.to_string()))],
        };
        Self { entries }
    }

    /// A record holding only an `Error` entry with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            entries: vec![(METRIC_ERROR.to_string(), MetricValue::Error(message.into()))],
        }
    }

    pub fn entries(&self) -> &[(String, MetricValue)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn is_error(&self) -> bool {
        self.get(METRIC_ERROR).is_some()
    }
}

/// Viscosity Ratio (%) = η_rec / η_pre × 100.
pub fn viscosity_ratio(eta_pre: f64, eta_rec: f64) -> Result<f64, AnalysisError> {
    if eta_pre == 0.0 {
        return Err(AnalysisError::Division {
            metric: METRIC_VISCOSITY_RATIO,
            detail: "pre-shear viscosity is zero".to_string(),
        });
    }
    Ok(eta_rec / eta_pre * 100.0)
}

/// Thixotropic Index = η_pre / η_high.
pub fn thixotropic_index(eta_pre: f64, eta_high: f64) -> Result<f64, AnalysisError> {
    if eta_high == 0.0 {
        return Err(AnalysisError::Division {
            metric: METRIC_THIXOTROPIC_INDEX,
            detail: "high-shear viscosity is zero".to_string(),
        });
    }
    Ok(eta_pre / eta_high)
}

/// Structural Recovery (%) = (η_rec − η_high) / (η_pre − η_high) × 100.
pub fn structural_recovery(eta_pre: f64, eta_high: f64, eta_rec: f64) -> Result<f64, AnalysisError> {
    if eta_pre == eta_high {
        return Err(AnalysisError::Division {
            metric: METRIC_STRUCTURAL_RECOVERY,
            detail: "pre-shear and high-shear viscosities are equal".to_string(),
        });
    }
    Ok((eta_rec - eta_high) / (eta_pre - eta_high) * 100.0)
}

/// Step time of the recovery observation whose viscosity is closest to 80% of η_pre.
///
/// Observations with a non-numeric viscosity are excluded. Equal distances keep
/// the earliest observation.
pub fn recovery_time_80(sample: &PhasedSample, eta_pre: f64) -> Result<f64, AnalysisError> {
    let target = eta_pre * RECOVERY_TARGET_FRACTION;

    let mut closest: Option<(f64, Option<f64>)> = None; // (distance, step time)
    for obs in sample.phase(Phase::Recovery) {
        let Some(viscosity) = obs.viscosity else {
            continue;
        };
        let distance = (viscosity - target).abs();
        // Strict comparison keeps the first of equally close observations.
        if closest.map_or(true, |(best, _)| distance < best) {
            closest = Some((distance, obs.step_time));
        }
    }

    let (distance, step_time) = closest.ok_or_else(|| {
        AnalysisError::EmptyData("RECOVERY phase has no numeric viscosity values".to_string())
    })?;
    debug!("80% recovery target {target}, closest distance {distance}");

    step_time.ok_or_else(|| {
        AnalysisError::Validation(
            "Step time of the closest RECOVERY observation is not numeric".to_string(),
        )
    })
}

/// Computes all four metrics for a validated sample.
pub fn compute_sample_metrics(sample: &PhasedSample) -> MetricOutcome {
    let eta_pre = sample.anchor_viscosity(Phase::Preshear)?;
    let eta_high = sample.anchor_viscosity(Phase::Highshear)?;
    let eta_rec = sample.anchor_viscosity(Phase::Recovery)?;
    debug!("Anchors: pre-shear {eta_pre}, high-shear {eta_high}, recovery {eta_rec}");

    let metrics = MetricResultSet {
        viscosity_ratio_pct: viscosity_ratio(eta_pre, eta_rec)?,
        thixotropic_index: thixotropic_index(eta_pre, eta_high)?,
        recovery_time_80_s: recovery_time_80(sample, eta_pre)?,
        structural_recovery_pct: structural_recovery(eta_pre, eta_high, eta_rec)?,
    };
    info!(
        "Thixotropy metrics: ratio {:.2}%, index {:.2}, 80% recovery {} s, structural recovery {:.2}%",
        metrics.viscosity_ratio_pct,
        metrics.thixotropic_index,
        metrics.recovery_time_80_s,
        metrics.structural_recovery_pct
    );
    Ok(metrics)
}

/// Validates a peak-hold table and computes its metrics.
///
/// Every failure, from a missing column to a zero denominator, is returned as
/// the `Err` side; nothing unwinds past this call.
pub fn compute_metrics(table: &DataTable) -> MetricOutcome {
    let sample = PhasedSample::from_table(table)?;
    compute_sample_metrics(&sample)
}

/// Metric keys in output order.
pub fn metric_keys() -> &'static [&'static str] {
    &METRIC_KEYS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::sample::PhaseObservation;

    fn sample(pre: &[(f64, f64)], high: &[(f64, f64)], rec: &[(f64, f64)]) -> PhasedSample {
        let to_obs = |points: &[(f64, f64)]| {
            points
                .iter()
                .map(|&(t, v)| PhaseObservation::new(t, v))
                .collect::<Vec<_>>()
        };
        PhasedSample::new(to_obs(pre), to_obs(high), to_obs(rec)).unwrap()
    }

    #[test]
    fn test_closest_match_prefers_first_on_tie() {
        // 70 and 90 are both 10 away from the 80 target.
        let s = sample(&[(0.0, 100.0)], &[(0.0, 10.0)], &[(1.0, 70.0), (2.0, 90.0)]);
        assert_eq!(recovery_time_80(&s, 100.0), Ok(1.0));
    }

    #[test]
    fn test_recovery_time_skips_missing_viscosity() {
        let mut rec = vec![PhaseObservation::new(0.0, 20.0)];
        rec.push(PhaseObservation {
            elapsed_time: None,
            step_time: Some(1.0),
            viscosity: None,
        });
        rec.push(PhaseObservation::new(2.0, 60.0));
        let s = PhasedSample::new(
            vec![PhaseObservation::new(0.0, 100.0)],
            vec![PhaseObservation::new(0.0, 10.0)],
            rec,
        )
        .unwrap();
        assert_eq!(recovery_time_80(&s, 100.0), Ok(2.0));
    }

    #[test]
    fn test_zero_high_shear_is_division_error() {
        let s = sample(&[(0.0, 100.0)], &[(0.0, 0.0)], &[(0.0, 80.0)]);
        assert!(matches!(
            compute_sample_metrics(&s),
            Err(AnalysisError::Division { metric: METRIC_THIXOTROPIC_INDEX, .. })
        ));
    }

    #[test]
    fn test_zero_pre_shear_is_division_error() {
        assert!(matches!(
            viscosity_ratio(0.0, 5.0),
            Err(AnalysisError::Division { metric: METRIC_VISCOSITY_RATIO, .. })
        ));
    }

    #[test]
    fn test_record_rendering() {
        let s = sample(&[(0.0, 100.0)], &[(0.0, 10.0)], &[(0.0, 80.0)]);
        let record = MetricRecord::from_outcome(&compute_sample_metrics(&s));
        assert_eq!(record.keys().collect::<Vec<_>>(), metric_keys());
        assert_eq!(
            record.get(METRIC_STRUCTURAL_RECOVERY).unwrap().display(2),
            "77.78"
        );
        assert!(!record.is_error());
    }

    #[test]
    fn test_error_record_has_single_entry() {
        let outcome: MetricOutcome = Err(AnalysisError::EmptyData("nothing".into()));
        let record = MetricRecord::from_outcome(&outcome);
        assert_eq!(record.entries().len(), 1);
        assert_eq!(
            record.get(METRIC_ERROR),
            Some(&MetricValue::Error("nothing".to_string()))
        );
    }
}
