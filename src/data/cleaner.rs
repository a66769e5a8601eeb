//! Data Cleaner Module
//! Numeric coercion, median imputation and label recoding, applied in place.

use super::processor::{column_as_f64, column_as_strings, ProcessorError, Strictness};
use super::schema::{NO, SENIOR_CITIZEN, TOTAL_CHARGES, YES};
use polars::prelude::*;

/// Counts reported by a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningSummary {
    pub imputed_total_charges: usize,
    pub total_charges_median: f64,
    pub recoded_senior_citizen: usize,
    pub unrecognised_senior_citizen: usize,
}

/// Cleans the customer record table.
pub struct DataCleaner;

impl DataCleaner {
    /// Run all cleaning steps. The row count never changes.
    pub fn clean(df: &mut DataFrame, strictness: Strictness) -> Result<CleaningSummary, ProcessorError> {
        let (imputed, median) = Self::impute_total_charges(df)?;
        let (recoded, unrecognised) = Self::recode_senior_citizen(df, strictness)?;

        log::info!(
            "Imputed {} missing {} values with median {:.4}",
            imputed,
            TOTAL_CHARGES,
            median
        );

        Ok(CleaningSummary {
            imputed_total_charges: imputed,
            total_charges_median: median,
            recoded_senior_citizen: recoded,
            unrecognised_senior_citizen: unrecognised,
        })
    }

    /// Coerce TotalCharges to Float64 and fill missing values with the median.
    ///
    /// Returns the number of imputed rows and the median used.
    pub fn impute_total_charges(df: &mut DataFrame) -> Result<(usize, f64), ProcessorError> {
        let coerced = Self::coerce_numeric(df, TOTAL_CHARGES)?;

        let present: Vec<f64> = coerced.iter().filter_map(|v| *v).collect();
        let median = Self::median(&present)
            .ok_or_else(|| ProcessorError::EmptyColumn(TOTAL_CHARGES.to_string()))?;

        let imputed = coerced.len() - present.len();
        let filled: Vec<f64> = coerced.into_iter().map(|v| v.unwrap_or(median)).collect();

        df.with_column(Column::new(TOTAL_CHARGES.into(), filled))?;
        Ok((imputed, median))
    }

    /// Parse a column as decimals. Anything unparseable becomes missing.
    pub fn coerce_numeric(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let series = df.column(column)?;
        if series.dtype() == &DataType::String {
            Ok(series
                .str()?
                .into_iter()
                .map(|v| v.and_then(Self::parse_decimal))
                .collect())
        } else {
            Ok(column_as_f64(df, column)?)
        }
    }

    fn parse_decimal(text: &str) -> Option<f64> {
        text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }

    /// Median of a slice: middle value, or mean of the two middle values.
    pub fn median(values: &[f64]) -> Option<f64> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if n % 2 == 0 {
            Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
        } else {
            Some(sorted[n / 2])
        }
    }

    /// Replace SeniorCitizen 0/1 with "No"/"Yes".
    ///
    /// Returns (recoded, unrecognised) counts.
    pub fn recode_senior_citizen(
        df: &mut DataFrame,
        strictness: Strictness,
    ) -> Result<(usize, usize), ProcessorError> {
        let raw = column_as_strings(df, SENIOR_CITIZEN)?;

        let mut recoded = 0usize;
        let mut unrecognised = 0usize;
        let mut labels: Vec<Option<String>> = Vec::with_capacity(raw.len());

        for value in raw {
            match value.as_deref().and_then(Self::senior_label) {
                Some(label) => {
                    recoded += 1;
                    labels.push(Some(label.to_string()));
                }
                None => {
                    strictness.check(SENIOR_CITIZEN, value.as_deref())?;
                    unrecognised += 1;
                    labels.push(value);
                }
            }
        }

        if unrecognised > 0 {
            log::warn!(
                "{} {} values were not 0/1 and were left unchanged",
                unrecognised,
                SENIOR_CITIZEN
            );
        }

        df.with_column(Column::new(SENIOR_CITIZEN.into(), labels))?;
        Ok((recoded, unrecognised))
    }

    fn senior_label(text: &str) -> Option<&'static str> {
        match text.trim().parse::<f64>().ok()? {
            v if v == 0.0 => Some(NO),
            v if v == 1.0 => Some(YES),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        column_as_strings(df, name).unwrap()
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(DataCleaner::median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(DataCleaner::median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(DataCleaner::median(&[]), None);
    }

    #[test]
    fn test_blank_total_charges_get_median() {
        let mut df = df![
            TOTAL_CHARGES => ["100.0", " ", "300.0", "", "abc", "200.0"],
        ]
        .unwrap();

        let (imputed, median) = DataCleaner::impute_total_charges(&mut df).unwrap();
        assert_eq!(imputed, 3);
        assert_eq!(median, 200.0);

        let values: Vec<Option<f64>> = df.column(TOTAL_CHARGES).unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(
            values,
            vec![Some(100.0), Some(200.0), Some(300.0), Some(200.0), Some(200.0), Some(200.0)]
        );
    }

    #[test]
    fn test_numeric_total_charges_with_nulls() {
        let mut df = df![TOTAL_CHARGES => [Some(10.0), None, Some(30.0)]].unwrap();
        let (imputed, median) = DataCleaner::impute_total_charges(&mut df).unwrap();
        assert_eq!((imputed, median), (1, 20.0));
        assert_eq!(df.column(TOTAL_CHARGES).unwrap().null_count(), 0);
    }

    #[test]
    fn test_all_blank_total_charges_is_error() {
        let mut df = df![TOTAL_CHARGES => ["", " ", "  "]].unwrap();
        let err = DataCleaner::impute_total_charges(&mut df).unwrap_err();
        assert!(matches!(err, ProcessorError::EmptyColumn(ref c) if c == TOTAL_CHARGES));
    }

    #[test]
    fn test_senior_citizen_recoding() {
        let mut df = df![SENIOR_CITIZEN => [0i64, 1, 0]].unwrap();
        let (recoded, unrecognised) =
            DataCleaner::recode_senior_citizen(&mut df, Strictness::Lenient).unwrap();
        assert_eq!((recoded, unrecognised), (3, 0));
        assert_eq!(
            strings(&df, SENIOR_CITIZEN),
            vec![Some("No".to_string()), Some("Yes".to_string()), Some("No".to_string())]
        );
    }

    #[test]
    fn test_senior_citizen_lenient_passthrough() {
        let mut df = df![SENIOR_CITIZEN => [Some(1i64), Some(2), None]].unwrap();
        let (recoded, unrecognised) =
            DataCleaner::recode_senior_citizen(&mut df, Strictness::Lenient).unwrap();
        assert_eq!((recoded, unrecognised), (1, 2));
        assert_eq!(
            strings(&df, SENIOR_CITIZEN),
            vec![Some("Yes".to_string()), Some("2".to_string()), None]
        );
    }

    #[test]
    fn test_senior_citizen_strict_rejects() {
        let mut df = df![SENIOR_CITIZEN => [0i64, 7]].unwrap();
        let err = DataCleaner::recode_senior_citizen(&mut df, Strictness::Strict).unwrap_err();
        assert!(matches!(err, ProcessorError::UnexpectedCategory { ref value, .. } if value == "7"));
    }

    #[test]
    fn test_clean_keeps_row_count() {
        let mut df = df![
            TOTAL_CHARGES => ["1.5", ""],
            SENIOR_CITIZEN => [1i64, 0],
            "customerID" => ["x", "y"],
        ]
        .unwrap();
        let summary = DataCleaner::clean(&mut df, Strictness::Lenient).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(summary.imputed_total_charges, 1);
        assert_eq!(summary.recoded_senior_citizen, 2);
    }
}
