// src/plot_functions/plot_flow_curve.rs

use std::error::Error;
use std::path::Path;

use crate::config::PlotSettings;
use crate::data_input::sample::SweepSeries;
use crate::plot_framework::{
    draw_loglog_plot, log_axis_range, series_color, series_marker, PlotConfig, PlotSeries,
    SeriesStyle,
};
use crate::plot_functions::sweep_series_label;
use crate::series_names::Sweep;

pub const FLOW_CURVE_X_LABEL: &str = "Shear rate (1/s)";
pub const FLOW_CURVE_Y_LABEL: &str = "Viscosity (Pa.s)";

/// Builds one scatter series per (dataset, sweep), skipping sweeps a dataset does not contain.
pub fn flow_curve_series(
    datasets: &[(String, SweepSeries)],
    sweeps: &[Sweep],
    marker_size: i32,
) -> Vec<PlotSeries> {
    let mut series = Vec::new();
    for (i, (name, data)) in datasets.iter().enumerate() {
        for (j, &sweep) in sweeps.iter().enumerate() {
            let points = data.direction(sweep);
            if points.is_empty() {
                continue;
            }
            let style_index = i * sweeps.len() + j;
            series.push(PlotSeries {
                data: points.to_vec(),
                label: sweep_series_label(name, sweep, datasets.len(), sweeps.len()),
                color: series_color(style_index),
                marker: series_marker(style_index),
                marker_size,
                style: SeriesStyle::Markers,
            });
        }
    }
    series
}

/// Generates the viscosity vs shear rate plot on log-log axes for one or more datasets.
pub fn plot_flow_curve(
    datasets: &[(String, SweepSeries)],
    sweeps: &[Sweep],
    output_file: &Path,
    root_name: &str,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let series = flow_curve_series(datasets, sweeps, settings.marker_size);
    let all_points = || series.iter().flat_map(|s| s.data.iter().copied());

    let x_range = log_axis_range(all_points().map(|(x, _)| x)).unwrap_or(0.0..0.0);
    let y_range = log_axis_range(all_points().map(|(_, y)| y)).unwrap_or(0.0..0.0);

    let config = PlotConfig {
        title: "Viscosity vs Shear Rate".to_string(),
        x_range,
        y_range,
        series,
        x_label: FLOW_CURVE_X_LABEL.to_string(),
        y_label: FLOW_CURVE_Y_LABEL.to_string(),
    };
    draw_loglog_plot(output_file, root_name, &config, None, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_curve_series_labels_and_styles() {
        let a = SweepSeries::new(vec![(1.0, 10.0)], vec![(1.0, 11.0)]);
        let b = SweepSeries::new(vec![(2.0, 5.0)], vec![]);
        let datasets = vec![("A".to_string(), a), ("B".to_string(), b)];

        let series = flow_curve_series(&datasets, &Sweep::ALL, 5);
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A - FORWARD Sweep", "A - REVERSE Sweep", "B - FORWARD Sweep"]);
        assert_eq!(series[2].color, series_color(2));
    }
}
