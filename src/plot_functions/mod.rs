// src/plot_functions/mod.rs

pub mod plot_diff_viscosity;
pub mod plot_flow_curve;
pub mod plot_loglog_derivative;
pub mod plot_thixotropy;

use crate::series_names::Sweep;

/// File-name suffix for a sweep selection: the sweep label, or `BOTH`.
pub fn sweep_suffix(sweeps: &[Sweep]) -> String {
    match sweeps {
        [single] => single.label().to_string(),
        _ => "BOTH".to_string(),
    }
}

/// Legend label of one (dataset, sweep) series in a flow-curve plot.
pub fn sweep_series_label(dataset: &str, sweep: Sweep, dataset_count: usize, sweep_count: usize) -> String {
    match (dataset_count, sweep_count) {
        (1, 1) => dataset.to_string(),
        (1, _) => format!("{sweep} Sweep"),
        _ => format!("{dataset} - {sweep} Sweep"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_suffix() {
        assert_eq!(sweep_suffix(&[Sweep::Reverse]), "REVERSE");
        assert_eq!(sweep_suffix(&Sweep::ALL), "BOTH");
    }

    #[test]
    fn test_sweep_series_label() {
        assert_eq!(sweep_series_label("A", Sweep::Forward, 1, 1), "A");
        assert_eq!(sweep_series_label("A", Sweep::Forward, 1, 2), "FORWARD Sweep");
        assert_eq!(sweep_series_label("A", Sweep::Reverse, 2, 1), "A - REVERSE Sweep");
    }
}

// src/plot_functions/mod.rs
