//! Shared error type and miscoding policy for the cleaning and feature steps.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' has no usable values to compute a median")]
    EmptyColumn(String),
    #[error("Unexpected value '{value}' in column '{column}'")]
    UnexpectedCategory { column: String, value: String },
}

/// How unexpected categorical values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown values pass through (SeniorCitizen) or become missing (tenure_ratio)
    #[default]
    Lenient,
    /// Unknown values abort the run
    Strict,
}

impl Strictness {
    /// Apply the policy to one unexpected value.
    pub(crate) fn check(self, column: &str, value: Option<&str>) -> Result<(), ProcessorError> {
        match self {
            Strictness::Lenient => Ok(()),
            Strictness::Strict => Err(ProcessorError::UnexpectedCategory {
                column: column.to_string(),
                value: value.unwrap_or("<missing>").to_string(),
            }),
        }
    }
}

/// Extract a column as owned optional strings, casting non-text columns.
pub(crate) fn column_as_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// Extract a column as optional floats. NaN is treated as missing.
pub(crate) fn column_as_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}
