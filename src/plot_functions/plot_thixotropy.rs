// src/plot_functions/plot_thixotropy.rs

use std::error::Error;
use std::path::Path;

use crate::config::PlotSettings;
use crate::constants::MARKER_SIZE_THIXOTROPY;
use crate::plot_framework::{
    draw_semilog_y_plot, linear_axis_range, log_axis_range, series_color, series_marker,
    PlotConfig, PlotSeries, SeriesStyle,
};
use crate::types::LabelledPoints;

/// Generates viscosity vs elapsed time for one or more peak-hold runs, log y axis.
pub fn plot_thixotropy(
    datasets: &[LabelledPoints],
    output_file: &Path,
    root_name: &str,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let series: Vec<PlotSeries> = datasets
        .iter()
        .enumerate()
        .filter(|(_, (_, points))| !points.is_empty())
        .map(|(i, (label, points))| PlotSeries {
            data: points.clone(),
            label: label.clone(),
            color: series_color(i),
            marker: series_marker(i),
            marker_size: MARKER_SIZE_THIXOTROPY,
            style: SeriesStyle::Markers,
        })
        .collect();

    let all_points = || series.iter().flat_map(|s| s.data.iter().copied());
    let x_range = linear_axis_range(all_points().map(|(t, _)| t)).unwrap_or(0.0..0.0);
    let y_range = log_axis_range(all_points().map(|(_, v)| v)).unwrap_or(0.0..0.0);

    let config = PlotConfig {
        title: "Viscosity vs Time".to_string(),
        x_range,
        y_range,
        series,
        x_label: "Time (s)".to_string(),
        y_label: "Viscosity (Pa.s)".to_string(),
    };
    draw_semilog_y_plot(output_file, root_name, &config, settings)
}
