// src/data_analysis/mod.rs

pub mod batch;
pub mod derivative;
pub mod thixotropy;

// src/data_analysis/mod.rs
