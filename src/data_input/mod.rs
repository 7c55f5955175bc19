// src/data_input/mod.rs

pub mod export_data;
pub mod export_parser;
pub mod sample;

// src/data_input/mod.rs
