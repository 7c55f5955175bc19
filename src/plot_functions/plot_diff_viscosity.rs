// src/plot_functions/plot_diff_viscosity.rs

use log::debug;
use std::error::Error;
use std::path::Path;

use crate::config::PlotSettings;
use crate::data_analysis::derivative::compute_linear_derivative;
use crate::data_input::sample::SweepSeries;
use crate::plot_framework::{
    draw_loglog_plot, linear_axis_range, log_axis_range, series_color, series_marker, MarkerShape,
    PlotConfig, PlotSeries, SecondaryAxis, SeriesStyle,
};
use crate::plot_functions::plot_flow_curve::{FLOW_CURVE_X_LABEL, FLOW_CURVE_Y_LABEL};
use crate::series_names::Sweep;

const DIFF_Y_LABEL: &str = "d(Viscosity)/d(Shear rate) (Pa.s²)";

/// Generates the viscosity scatter plot with its linear-space derivative dη/dγ̇
/// overlaid as dashed lines on a secondary y axis.
pub fn plot_diff_viscosity(
    datasets: &[(String, SweepSeries)],
    sweeps: &[Sweep],
    output_file: &Path,
    root_name: &str,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let mut viscosity_series = Vec::new();
    let mut derivative_series = Vec::new();

    for (i, (name, data)) in datasets.iter().enumerate() {
        for (j, &sweep) in sweeps.iter().enumerate() {
            let (shear_rate, viscosity) = data.columns(sweep);
            if shear_rate.is_empty() {
                continue;
            }
            let derivative = compute_linear_derivative(&shear_rate, &viscosity);
            debug!("{name} {sweep}: {} derivative points", derivative.len());

            let style_index = i * sweeps.len() + j;
            let color = series_color(style_index);
            viscosity_series.push(PlotSeries {
                data: data.direction(sweep).to_vec(),
                label: format!("{name} - {sweep} Sweep"),
                color,
                marker: series_marker(style_index),
                marker_size: settings.marker_size,
                style: SeriesStyle::Markers,
            });
            derivative_series.push(PlotSeries {
                data: derivative.finite_points(),
                label: format!("dVisc/dShear ({name} - {sweep})"),
                color,
                marker: MarkerShape::Circle,
                marker_size: 0,
                style: SeriesStyle::Dashed,
            });
        }
    }

    let primary_points = || viscosity_series.iter().flat_map(|s| s.data.iter().copied());
    let x_range = log_axis_range(primary_points().map(|(x, _)| x)).unwrap_or(0.0..0.0);
    let y_range = log_axis_range(primary_points().map(|(_, y)| y)).unwrap_or(0.0..0.0);
    let y2_range = linear_axis_range(
        derivative_series
            .iter()
            .flat_map(|s| s.data.iter().map(|&(_, d)| d)),
    )
    .unwrap_or(-1.0..1.0);

    let config = PlotConfig {
        title: "Viscosity and dη/dγ̇ vs Shear Rate".to_string(),
        x_range,
        y_range,
        series: viscosity_series,
        x_label: FLOW_CURVE_X_LABEL.to_string(),
        y_label: FLOW_CURVE_Y_LABEL.to_string(),
    };
    let secondary = SecondaryAxis {
        y_range: y2_range,
        y_label: DIFF_Y_LABEL.to_string(),
        series: derivative_series,
    };
    draw_loglog_plot(output_file, root_name, &config, Some(&secondary), settings)
}
