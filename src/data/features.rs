//! Feature Deriver Module
//! Appends the tenure-to-contract ratio and the high-risk flag.

use super::processor::{column_as_f64, column_as_strings, ProcessorError, Strictness};
use super::schema::{
    ContractTerm, CONTRACT, FLAGGED, HIGH_RISK_MONTHLY_CHARGE, MONTHLY_CHARGES, NO, TENURE,
    TENURE_RATIO, YES,
};
use polars::prelude::*;

/// Derives engineered columns from the cleaned table.
pub struct FeatureDeriver;

impl FeatureDeriver {
    /// Append `tenure_ratio` and `Flagged` in place.
    pub fn derive(df: &mut DataFrame, strictness: Strictness) -> Result<(), ProcessorError> {
        let ratio = Self::tenure_ratio(df, strictness)?;
        df.with_column(Column::new(TENURE_RATIO.into(), ratio))?;

        let flagged = Self::flag_high_risk(df)?;
        df.with_column(flagged)?;
        Ok(())
    }

    /// tenure divided by the contract length in months, or missing for an
    /// unrecognised contract.
    pub fn tenure_ratio(df: &DataFrame, strictness: Strictness) -> Result<Vec<Option<f64>>, ProcessorError> {
        let contracts = column_as_strings(df, CONTRACT)?;
        let tenure = column_as_f64(df, TENURE)?;

        let mut unknown = 0usize;
        let mut ratio = Vec::with_capacity(contracts.len());
        for (contract, months) in contracts.iter().zip(tenure) {
            match contract.as_deref().and_then(ContractTerm::classify) {
                Some(term) => ratio.push(months.map(|m| m / term.months())),
                None => {
                    strictness.check(CONTRACT, contract.as_deref())?;
                    unknown += 1;
                    ratio.push(None);
                }
            }
        }

        if unknown > 0 {
            log::warn!(
                "{} rows have an unrecognised {}; {} left missing",
                unknown,
                CONTRACT,
                TENURE_RATIO
            );
        }
        Ok(ratio)
    }

    /// "Yes" for month-to-month customers paying above the threshold.
    pub fn flag_high_risk(df: &DataFrame) -> Result<Column, ProcessorError> {
        let flagged = df
            .clone()
            .lazy()
            .select([when(
                col(CONTRACT)
                    .eq(lit(ContractTerm::MonthToMonth.label()))
                    .and(col(MONTHLY_CHARGES).cast(DataType::Float64).gt(lit(HIGH_RISK_MONTHLY_CHARGE))),
            )
            .then(lit(YES))
            .otherwise(lit(NO))
            .alias(FLAGGED)])
            .collect()?;

        let column = flagged.column(FLAGGED)?.clone();
        log::debug!(
            "Flagged {} high-risk customers",
            column.str()?.into_iter().filter(|v| *v == Some(YES)).count()
        );
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df![
            CONTRACT => ["Two year", "One year", "Month-to-month", "Month-to-month", "Month-to-month"],
            TENURE => [48i64, 6, 5, 30, 2],
            MONTHLY_CHARGES => [99.0, 80.0, 70.0, 70.01, 20.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_tenure_ratio_per_contract() {
        let df = sample();
        let ratio = FeatureDeriver::tenure_ratio(&df, Strictness::Lenient).unwrap();
        assert_eq!(ratio, vec![Some(2.0), Some(0.5), Some(5.0), Some(30.0), Some(2.0)]);
    }

    #[test]
    fn test_flag_requires_both_conditions() {
        let mut df = sample();
        FeatureDeriver::derive(&mut df, Strictness::Lenient).unwrap();
        let flags: Vec<Option<&str>> = df.column(FLAGGED).unwrap().str().unwrap().into_iter().collect();
        assert_eq!(
            flags,
            vec![Some("No"), Some("No"), Some("No"), Some("Yes"), Some("No")]
        );
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn test_unknown_contract_lenient() {
        let mut df = df![
            CONTRACT => [Some("Weekly"), None, Some("One year")],
            TENURE => [3i64, 4, 24],
            MONTHLY_CHARGES => [90.0, 90.0, 90.0],
        ]
        .unwrap();
        FeatureDeriver::derive(&mut df, Strictness::Lenient).unwrap();

        let ratio: Vec<Option<f64>> = df.column(TENURE_RATIO).unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(ratio, vec![None, None, Some(2.0)]);
    }

    #[test]
    fn test_unknown_contract_strict() {
        let mut df = df![
            CONTRACT => ["Weekly"],
            TENURE => [3i64],
            MONTHLY_CHARGES => [90.0],
        ]
        .unwrap();
        let err = FeatureDeriver::derive(&mut df, Strictness::Strict).unwrap_err();
        assert!(matches!(err, ProcessorError::UnexpectedCategory { ref column, .. } if column == CONTRACT));
    }

    #[test]
    fn test_missing_monthly_charge_is_not_flagged() {
        let df = df![
            CONTRACT => ["Month-to-month"],
            MONTHLY_CHARGES => [None::<f64>],
        ]
        .unwrap();
        let flags = FeatureDeriver::flag_high_risk(&df).unwrap();
        assert_eq!(flags.str().unwrap().get(0), Some("No"));
    }
}
