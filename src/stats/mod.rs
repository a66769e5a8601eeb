//! Stats module - grouped summaries and density estimation

mod aggregator;
mod kde;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use aggregator::{
    round_half_even, ChurnAggregator, ChurnChargeSummary, ContractChurnCount, CrossTab,
    PaymentChurnRate, CHURN_RATE_LABEL, TOTAL_LABEL,
};
pub use kde::{DensityCurve, KernelDensity, KDE_GRID_POINTS};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Cannot estimate a density from {size} value(s): {reason}")]
    DegenerateSample { size: usize, reason: &'static str },
    #[error("Distribution error: {0}")]
    Distribution(String),
}
