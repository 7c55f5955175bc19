// src/plot_functions/plot_loglog_derivative.rs

use log::warn;
use std::error::Error;
use std::path::Path;

use crate::config::PlotSettings;
use crate::constants::MARKER_SIZE_DERIVATIVE;
use crate::data_analysis::derivative::{compute_loglog_derivative, DerivativeSeries};
use crate::data_input::sample::SweepSeries;
use crate::plot_framework::{
    draw_stacked_plot, linear_axis_range, log_axis_range, series_color, MarkerShape, PlotConfig,
    PlotSeries, SeriesStyle,
};
use crate::series_names::Sweep;

/// Log-log derivative of one dataset's sweep.
#[derive(Debug, Clone)]
pub struct SweepDerivative {
    pub dataset: String,
    pub sweep: Sweep,
    pub derivative: DerivativeSeries,
}

/// Computes d(log η)/d(log γ̇) for every dataset and sweep direction, in input order.
pub fn loglog_derivatives(datasets: &[(String, SweepSeries)]) -> Vec<SweepDerivative> {
    let mut results = Vec::new();
    for (name, data) in datasets {
        for sweep in Sweep::ALL {
            let (shear_rate, viscosity) = data.columns(sweep);
            let derivative = compute_loglog_derivative(&shear_rate, &viscosity);
            if derivative.is_empty() && !shear_rate.is_empty() {
                warn!("{name} {sweep}: log-log derivative could not be calculated");
            }
            results.push(SweepDerivative {
                dataset: name.clone(),
                sweep,
                derivative,
            });
        }
    }
    results
}

/// Generates the stacked Forward / Reverse log-log derivative plot.
///
/// Each panel shows one line-and-marker series per dataset; colours follow the
/// dataset order so a sample keeps its colour in both panels.
pub fn plot_loglog_derivative(
    derivatives: &[SweepDerivative],
    output_file: &Path,
    root_name: &str,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let plot_type_name = "Log-Log Derivative";
    let panel_names: Vec<&str> = Sweep::ALL.iter().map(|s| s.title()).collect();

    let mut dataset_order: Vec<&str> = Vec::new();
    for d in derivatives {
        if !dataset_order.contains(&d.dataset.as_str()) {
            dataset_order.push(&d.dataset);
        }
    }

    let mut panels: Vec<Option<PlotConfig>> = Vec::new();
    for sweep in Sweep::ALL {
        let series: Vec<PlotSeries> = derivatives
            .iter()
            .filter(|d| d.sweep == sweep && !d.derivative.is_empty())
            .map(|d| {
                let color_index = dataset_order
                    .iter()
                    .position(|name| *name == d.dataset)
                    .unwrap_or(0);
                PlotSeries {
                    data: d.derivative.finite_points(),
                    label: d.dataset.clone(),
                    color: series_color(color_index),
                    marker: MarkerShape::Circle,
                    marker_size: MARKER_SIZE_DERIVATIVE,
                    style: SeriesStyle::LineAndMarkers,
                }
            })
            .collect();

        if series.is_empty() {
            panels.push(None);
            continue;
        }

        let points = || series.iter().flat_map(|s| s.data.iter().copied());
        let (Some(x_range), Some(y_range)) = (
            log_axis_range(points().map(|(x, _)| x)),
            linear_axis_range(points().map(|(_, d)| d)),
        ) else {
            panels.push(None);
            continue;
        };

        panels.push(Some(PlotConfig {
            title: format!("{} Derivative", sweep.title()),
            x_range,
            y_range,
            series,
            x_label: "Shear rate (1/s)".to_string(),
            y_label: "d(log η)/d(log γ̇)".to_string(),
        }));
    }

    draw_stacked_plot(
        output_file,
        root_name,
        plot_type_name,
        &panel_names,
        settings,
        move |panel_index| panels.get_mut(panel_index).and_then(Option::take),
    )
}
