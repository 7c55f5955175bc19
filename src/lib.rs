// src/lib.rs - Library interface for the rheology analysis and plotting modules

pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod export;
pub mod plot_framework;
pub mod plot_functions;
pub mod series_names;
pub mod types;

pub use data_analysis::derivative::{compute_linear_derivative, compute_loglog_derivative, DerivativeSeries};
pub use data_analysis::thixotropy::{compute_metrics, MetricRecord, MetricResultSet};
pub use error::AnalysisError;
