// src/types.rs

use crate::data_analysis::thixotropy::MetricResultSet;
use crate::error::AnalysisError;

// Result of the metrics engine for one sample.
pub type MetricOutcome = Result<MetricResultSet, AnalysisError>;

// Plot data types
pub type PlotPoints = Vec<(f64, f64)>; // (x, y) pairs for scatter and line series

// One dataset of a multi-file plot: legend label and the points to draw.
pub type LabelledPoints = (String, PlotPoints);

// src/types.rs
