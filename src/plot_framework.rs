// src/plot_framework.rs

use plotters::prelude::*;
use plotters::coord::Shift;
use plotters::series::DashedLineSeries;

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::Path;

use log::{info, warn};

use crate::config::PlotSettings;
use crate::constants::{
    COLOR_UNAVAILABLE_MESSAGE, COLOR_ZERO_LINE, DASH_SIZE, DASH_SPACING, FONT_SIZE_AXIS_LABEL,
    FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE, FONT_SIZE_MESSAGE,
    LINE_WIDTH_LEGEND, LINE_WIDTH_PLOT, LOG_RANGE_PADDING_DECADES, MARKER_OPACITY,
};

/// Marker glyph used for scatter series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Markers cycled through for successive series.
pub const MARKER_CYCLE: [MarkerShape; 4] = [
    MarkerShape::Circle,
    MarkerShape::Square,
    MarkerShape::Triangle,
    MarkerShape::Cross,
];

/// How a series is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Markers,
    /// Line through the points with markers on top.
    LineAndMarkers,
    /// Dashed line, no markers.
    Dashed,
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub marker: MarkerShape,
    pub marker_size: i32,
    pub style: SeriesStyle,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
}

/// Secondary (right-hand, linear) y axis sharing the primary x axis.
#[derive(Clone)]
pub struct SecondaryAxis {
    pub y_range: Range<f64>,
    pub y_label: String,
    pub series: Vec<PlotSeries>,
}

/// Colour of the `index`-th series, cycling through the 10-colour category palette.
pub fn series_color(index: usize) -> RGBColor {
    let palette = colorous::CATEGORY10;
    let c = palette[index % palette.len()];
    RGBColor(c.r, c.g, c.b)
}

pub fn series_marker(index: usize) -> MarkerShape {
    MARKER_CYCLE[index % MARKER_CYCLE.len()]
}

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Padded linear axis range over the finite values, or `None` when there are none.
pub fn linear_axis_range<I>(values: I) -> Option<Range<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let finite = Array1::from_iter(values.into_iter().filter(|v| v.is_finite()));
    let min = *finite.min().ok()?;
    let max = *finite.max().ok()?;
    let (lo, hi) = calculate_range(min, max);
    Some(lo..hi)
}

/// Log axis range over the positive finite values, padded by a fraction of a decade.
pub fn log_axis_range<I>(values: I) -> Option<Range<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let positive = Array1::from_iter(values.into_iter().filter(|v| v.is_finite() && *v > 0.0));
    let min = *positive.min().ok()?;
    let max = *positive.max().ok()?;
    let padding_decades = if (max / min).log10() < 1e-6 {
        0.5
    } else {
        LOG_RANGE_PADDING_DECADES
    };
    let factor = 10f64.powf(padding_decades);
    Some(min / factor..max * factor)
}

/// Tick label text: scientific notation for very large or small magnitudes.
pub fn format_axis_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e4).contains(&magnitude) {
        format!("{value:.0e}")
    } else if magnitude >= 10.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn ensure_parent_dir(output_file: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel_name: &str,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    // Approximate character width relative to font size
    const CHAR_WIDTH_RATIO: f32 = 0.6;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{panel_name} {plot_type} Data Unavailable: {reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_text_width = (message.len() as i32).saturating_mul(estimated_char_width);

    let center_x = width / 2 - estimated_text_width / 2;
    let center_y = height / 2 - FONT_SIZE_MESSAGE / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE)
        .into_font()
        .color(COLOR_UNAVAILABLE_MESSAGE);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

/// Draws the markers of one series, registering a legend entry when it has a label.
fn draw_markers<'a, X, Y>(
    chart: &mut ChartContext<'a, BitMapBackend<'a>, Cartesian2d<X, Y>>,
    series: &PlotSeries,
    points: &[(f64, f64)],
) -> Result<(), Box<dyn Error>>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let style = series.color.mix(MARKER_OPACITY).filled();
    let size = series.marker_size;
    let has_label = !series.label.is_empty();

    match series.marker {
        MarkerShape::Circle => {
            let anno = chart.draw_series(points.iter().map(|&p| Circle::new(p, size, style)))?;
            if has_label {
                anno.label(&series.label)
                    .legend(move |p| Circle::new(p, size, style));
            }
        }
        MarkerShape::Square => {
            let square = move |s: i32| Rectangle::new([(-s, -s), (s, s)], style);
            let anno = chart.draw_series(
                points
                    .iter()
                    .map(|&p| EmptyElement::at(p) + square(size)),
            )?;
            if has_label {
                anno.label(&series.label)
                    .legend(move |p| EmptyElement::at(p) + square(size));
            }
        }
        MarkerShape::Triangle => {
            let anno =
                chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, size, style)))?;
            if has_label {
                anno.label(&series.label)
                    .legend(move |p| TriangleMarker::new(p, size, style));
            }
        }
        MarkerShape::Cross => {
            let anno = chart.draw_series(points.iter().map(|&p| Cross::new(p, size, style)))?;
            if has_label {
                anno.label(&series.label)
                    .legend(move |p| Cross::new(p, size, style));
            }
        }
    }
    Ok(())
}

/// Draws one series on the primary coordinates of a chart.
pub fn draw_series_on_chart<'a, X, Y>(
    chart: &mut ChartContext<'a, BitMapBackend<'a>, Cartesian2d<X, Y>>,
    series: &PlotSeries,
) -> Result<(), Box<dyn Error>>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let points: Vec<(f64, f64)> = series
        .data
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if points.len() < series.data.len() {
        warn!(
            "Series '{}': skipped {} non-finite points",
            series.label,
            series.data.len() - points.len()
        );
    }

    match series.style {
        SeriesStyle::Markers => draw_markers(chart, series, &points)?,
        SeriesStyle::LineAndMarkers => {
            chart.draw_series(LineSeries::new(
                points.iter().copied(),
                series.color.stroke_width(LINE_WIDTH_PLOT),
            ))?;
            draw_markers(chart, series, &points)?;
        }
        SeriesStyle::Dashed => {
            let color = series.color;
            let anno = chart.draw_series(DashedLineSeries::new(
                points.iter().copied(),
                DASH_SIZE,
                DASH_SPACING,
                color.stroke_width(LINE_WIDTH_PLOT),
            ))?;
            if !series.label.is_empty() {
                anno.label(&series.label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
                });
            }
        }
    }
    Ok(())
}

fn draw_legend<'a, X, Y>(
    chart: &mut ChartContext<'a, BitMapBackend<'a>, Cartesian2d<X, Y>>,
) -> Result<(), Box<dyn Error>>
where
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", FONT_SIZE_LEGEND))
        .draw()?;
    Ok(())
}

fn has_labels(series: &[PlotSeries]) -> bool {
    series.iter().any(|s| !s.label.is_empty() && !s.data.is_empty())
}

fn has_data(config: &PlotConfig) -> bool {
    config.series.iter().any(|s| !s.data.is_empty())
}

fn open_root<'a>(
    output_file: &'a Path,
    root_name: &str,
    settings: &PlotSettings,
) -> Result<DrawingArea<BitMapBackend<'a>, Shift>, Box<dyn Error>> {
    ensure_parent_dir(output_file)?;
    let root_area =
        BitMapBackend::new(output_file, (settings.width, settings.height)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name.to_string(),
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE).into_font().color(&BLACK),
    ))?;
    Ok(root_area)
}

/// Renders a scatter plot on log-log axes, optionally with a linear secondary y axis.
pub fn draw_loglog_plot(
    output_file: &Path,
    root_name: &str,
    config: &PlotConfig,
    secondary: Option<&SecondaryAxis>,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let root_area = open_root(output_file, root_name, settings)?;
    let area = root_area.margin(40, 10, 10, 10);

    if !has_data(config) || config.x_range.start <= 0.0 || config.y_range.start <= 0.0 {
        draw_unavailable_message(&area, &config.title, "", "No positive data points")?;
        root_area.present()?;
        warn!("Skipping '{}': no data to plot", output_file.display());
        return Ok(());
    }

    let mut builder = ChartBuilder::on(&area);
    builder
        .caption(&config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80);
    if secondary.is_some() {
        builder.right_y_label_area_size(90);
    }

    let mut chart = builder.build_cartesian_2d(
        config.x_range.clone().log_scale(),
        config.y_range.clone().log_scale(),
    )?;
    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_label_formatter(&|x| format_axis_value(*x))
        .y_label_formatter(&|y| format_axis_value(*y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    for series in &config.series {
        draw_series_on_chart(&mut chart, series)?;
    }

    match secondary {
        Some(axis) => {
            let mut dual = chart.set_secondary_coord(
                config.x_range.clone().log_scale(),
                axis.y_range.clone(),
            );
            dual.configure_secondary_axes()
                .y_desc(&axis.y_label)
                .y_label_formatter(&|y| format_axis_value(*y))
                .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
                .draw()?;
            for series in &axis.series {
                let color = series.color;
                let points = series
                    .data
                    .iter()
                    .copied()
                    .filter(|(x, y)| x.is_finite() && y.is_finite());
                let anno = dual.draw_secondary_series(DashedLineSeries::new(
                    points,
                    DASH_SIZE,
                    DASH_SPACING,
                    color.stroke_width(LINE_WIDTH_PLOT),
                ))?;
                if !series.label.is_empty() {
                    anno.label(&series.label).legend(move |(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + 20, y)],
                            color.stroke_width(LINE_WIDTH_LEGEND),
                        )
                    });
                }
            }
            if has_labels(&config.series) || has_labels(&axis.series) {
                dual.configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .label_font(("sans-serif", FONT_SIZE_LEGEND))
                    .draw()?;
            }
        }
        None => {
            if has_labels(&config.series) {
                draw_legend(&mut chart)?;
            }
        }
    }

    root_area.present()?;
    info!("  Plot saved as '{}'.", output_file.display());
    Ok(())
}

/// Renders a time series with a linear x axis and a log y axis.
pub fn draw_semilog_y_plot(
    output_file: &Path,
    root_name: &str,
    config: &PlotConfig,
    settings: &PlotSettings,
) -> Result<(), Box<dyn Error>> {
    let root_area = open_root(output_file, root_name, settings)?;
    let area = root_area.margin(40, 10, 10, 10);

    let valid_ranges = config.x_range.end > config.x_range.start && config.y_range.start > 0.0;
    if !has_data(config) || !valid_ranges {
        draw_unavailable_message(&area, &config.title, "", "No data points")?;
        root_area.present()?;
        warn!("Skipping '{}': no data to plot", output_file.display());
        return Ok(());
    }

    let mut chart = ChartBuilder::on(&area)
        .caption(&config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(config.x_range.clone(), config.y_range.clone().log_scale())?;
    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .y_label_formatter(&|y| format_axis_value(*y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    for series in &config.series {
        draw_series_on_chart(&mut chart, series)?;
    }
    if has_labels(&config.series) {
        draw_legend(&mut chart)?;
    }

    root_area.present()?;
    info!("  Plot saved as '{}'.", output_file.display());
    Ok(())
}

/// Creates a stacked plot image with one panel per entry of `panel_names`.
///
/// Each panel has a log x axis and a linear y axis. `get_panel_data` returns
/// `None` when a panel could not be computed; an "unavailable" message is drawn instead.
pub fn draw_stacked_plot<F>(
    output_file: &Path,
    root_name: &str,
    plot_type_name: &str,
    panel_names: &[&str],
    settings: &PlotSettings,
    mut get_panel_data: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(usize) -> Option<PlotConfig>,
{
    let root_area = open_root(output_file, root_name, settings)?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((panel_names.len(), 1));
    let mut any_panel_plotted = false;

    for (panel_index, area) in sub_plot_areas.iter().enumerate() {
        let panel_name = panel_names[panel_index];
        let Some(config) = get_panel_data(panel_index) else {
            draw_unavailable_message(area, panel_name, plot_type_name, "Calculation/Data Extraction Failed")?;
            continue;
        };

        let valid_ranges = config.x_range.start > 0.0
            && config.x_range.end > config.x_range.start
            && config.y_range.end > config.y_range.start;
        if !has_data(&config) || !valid_ranges {
            let reason = if !has_data(&config) {
                "No data points"
            } else {
                "Invalid ranges"
            };
            draw_unavailable_message(area, panel_name, plot_type_name, reason)?;
            continue;
        }

        let mut chart = ChartBuilder::on(area)
            .caption(&config.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
            .margin(5)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(config.x_range.clone().log_scale(), config.y_range.clone())?;
        chart
            .configure_mesh()
            .x_desc(&config.x_label)
            .y_desc(&config.y_label)
            .x_label_formatter(&|x| format_axis_value(*x))
            .y_label_formatter(&|y| format_axis_value(*y))
            .light_line_style(WHITE.mix(0.7))
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        if config.y_range.start < 0.0 && config.y_range.end > 0.0 {
            chart.draw_series(LineSeries::new(
                vec![(config.x_range.start, 0.0), (config.x_range.end, 0.0)],
                COLOR_ZERO_LINE.stroke_width(1),
            ))?;
        }

        for series in &config.series {
            draw_series_on_chart(&mut chart, series)?;
        }
        if has_labels(&config.series) {
            draw_legend(&mut chart)?;
        }
        any_panel_plotted = true;
    }

    root_area.present()?;
    if any_panel_plotted {
        info!("  Stacked plot saved as '{}'.", output_file.display());
    } else {
        warn!(
            "  '{}' contains only placeholder messages: no data available for any panel.",
            output_file.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_pads() {
        let (lo, hi) = calculate_range(10.0, 0.0);
        assert!((lo + 1.5).abs() < 1e-12 && (hi - 11.5).abs() < 1e-12);
        assert_eq!(calculate_range(2.0, 2.0), (1.5, 2.5));
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(0.0), "0");
        assert_eq!(format_axis_value(100_000.0), "1e5");
        assert_eq!(format_axis_value(0.001), "1e-3");
        assert_eq!(format_axis_value(250.0), "250");
        assert_eq!(format_axis_value(2.0), "2");
        assert_eq!(format_axis_value(1.5), "1.5");
        assert_eq!(format_axis_value(0.25), "0.25");
        assert_eq!(format_axis_value(-0.5), "-0.5");
    }

    #[test]
    fn test_log_axis_range_ignores_non_positive() {
        let range = log_axis_range(vec![-1.0, 0.0, 1.0, 100.0, f64::NAN]).unwrap();
        let factor = 10f64.powf(LOG_RANGE_PADDING_DECADES);
        assert!((range.start - 1.0 / factor).abs() < 1e-12);
        assert!((range.end - 100.0 * factor).abs() < 1e-9);
        assert!(log_axis_range(vec![0.0, -2.0]).is_none());
    }

    #[test]
    fn test_linear_axis_range_skips_non_finite() {
        let range = linear_axis_range(vec![f64::INFINITY, -1.0, 1.0]).unwrap();
        assert!((range.start + 1.3).abs() < 1e-12);
        assert!((range.end - 1.3).abs() < 1e-12);
        assert!(linear_axis_range(Vec::new()).is_none());
    }

    #[test]
    fn test_series_draw_into_log_chart() {
        let (width, height) = (200u32, 150u32);
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        {
            let area = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let mut chart = ChartBuilder::on(&area)
                .build_cartesian_2d((0.1..1000.0).log_scale(), (0.1..1000.0).log_scale())
                .unwrap();

            for (i, style) in [SeriesStyle::Markers, SeriesStyle::LineAndMarkers, SeriesStyle::Dashed]
                .into_iter()
                .enumerate()
            {
                let series = PlotSeries {
                    data: vec![(1.0, 100.0), (10.0, 10.0), (100.0, 1.0), (f64::NAN, 1.0)],
                    label: format!("series {i}"),
                    color: series_color(i),
                    marker: series_marker(i + 1),
                    marker_size: 3,
                    style,
                };
                draw_series_on_chart(&mut chart, &series).unwrap();
            }
            area.present().unwrap();
        }
        assert!(buffer.iter().any(|&channel| channel != 255));
    }

    #[test]
    fn test_series_color_cycles() {
        assert_eq!(series_color(0), series_color(10));
        assert_ne!(series_color(0), series_color(1));
        assert_eq!(series_marker(4), MarkerShape::Circle);
    }
}
