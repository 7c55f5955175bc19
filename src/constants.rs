// src/constants.rs

use plotters::style::colors::full_palette::{GREY_600, RED};
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Font sizes.
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 15;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Marker sizes (pixels).
pub const MARKER_SIZE_SWEEP: i32 = 5;
pub const MARKER_SIZE_THIXOTROPY: i32 = 2;
pub const MARKER_SIZE_DERIVATIVE: i32 = 3;

// Opacity applied to scatter markers.
pub const MARKER_OPACITY: f64 = 0.7;

// Dash pattern for the differential viscosity overlay (pixels).
pub const DASH_SIZE: u32 = 8;
pub const DASH_SPACING: u32 = 6;

// Log-space padding (decades) added around log-scaled axis ranges.
pub const LOG_RANGE_PADDING_DECADES: f64 = 0.1;

// --- Plot Color Assignments ---
pub const COLOR_UNAVAILABLE_MESSAGE: &RGBColor = &RED;
pub const COLOR_ZERO_LINE: &RGBColor = &GREY_600;

// --- Column names in instrument exports ---
pub const COLUMN_SHEAR_RATE: &str = "Shear rate";
pub const COLUMN_VISCOSITY: &str = "Viscosity";
pub const COLUMN_STEP_TIME: &str = "Step time";
pub const COLUMN_TIME: &str = "Time";
pub const COLUMN_SWEEP: &str = "Sweep";
pub const COLUMN_PHASE: &str = "peak";

// --- Section titles written by the rheometer software ---
pub const SECTION_FORWARD_SWEEP: &str = "Flow sweep - 1";
pub const SECTION_REVERSE_SWEEP: &str = "Flow sweep - 2";
pub const SECTION_PRESHEAR: &str = "Peak hold - 1";
pub const SECTION_HIGHSHEAR: &str = "Peak hold - 2";
pub const SECTION_RECOVERY: &str = "Peak hold - 3";

// Synthetic time step between merged peak-hold rows, in seconds.
pub const THIXOTROPY_TIME_STEP_S: f64 = 0.1;

// Fraction of the pre-shear viscosity used as the recovery target.
pub const RECOVERY_TARGET_FRACTION: f64 = 0.8;

// --- Metric result keys, in output order ---
pub const METRIC_VISCOSITY_RATIO: &str = "Viscosity Ratio (%)";
pub const METRIC_THIXOTROPIC_INDEX: &str = "Thixotropic Index";
pub const METRIC_RECOVERY_TIME_80: &str = "80% Recovery Time (s)";
pub const METRIC_STRUCTURAL_RECOVERY: &str = "Structural Recovery (%)";
pub const METRIC_ERROR: &str = "Error";

pub const METRIC_KEYS: [&str; 4] = [
    METRIC_VISCOSITY_RATIO,
    METRIC_THIXOTROPIC_INDEX,
    METRIC_RECOVERY_TIME_80,
    METRIC_STRUCTURAL_RECOVERY,
];

// Decimal places used when displaying metric values.
pub const METRIC_DISPLAY_DECIMALS: usize = 2;

// Default output directory when neither the config nor the CLI name one.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// src/constants.rs
