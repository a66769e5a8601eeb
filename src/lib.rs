//! Churnscope - Telecom Customer Churn Exploratory Analysis
//!
//! Loads the Telco customer churn CSV, cleans and enriches it with Polars,
//! computes grouped churn summaries and renders descriptive charts.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;

pub use analysis::{analyze_frame, run_analysis, AnalysisError, ChurnReport};
pub use config::{AnalysisConfig, OutputTarget};
