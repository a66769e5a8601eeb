//! CSV Data Loader Module
//! Loads the customer record table using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
    #[error("CSV row {line} has {found} fields, header has {expected}")]
    RaggedRow { line: u64, expected: u64, found: u64 },
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file has no data rows: {0}")]
    Empty(PathBuf),
}

/// Number of rows Polars scans to infer column types.
const INFER_SCHEMA_ROWS: usize = 10000;

/// Handles CSV file loading with Polars.
pub struct CustomerLoader;

impl CustomerLoader {
    /// Load a CSV file with a header row, preserving row and column order.
    ///
    /// Rows with more or fewer fields than the header are reported as
    /// errors rather than skipped or padded.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::FileNotFound(file_path.to_path_buf()));
        }
        Self::check_row_widths(file_path)?;

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        if df.height() == 0 {
            return Err(LoaderError::Empty(file_path.to_path_buf()));
        }

        log::info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        log::debug!("Columns: {:?}", Self::column_names(&df));

        Ok(df)
    }

    /// Polars pads short rows with nulls, so field counts are checked first.
    fn check_row_widths(file_path: &Path) -> Result<(), LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(file_path)?;

        for record in reader.byte_records() {
            if let Err(e) = record {
                if let csv::ErrorKind::UnequalLengths {
                    pos,
                    expected_len,
                    len,
                } = e.kind()
                {
                    return Err(LoaderError::RaggedRow {
                        line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                        expected: *expected_len,
                        found: *len,
                    });
                }
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Get list of column names from a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
