//! Churn Aggregator Module
//! Grouped churn rates, mean charges and the InternetService x Churn cross-tabulation.

use crate::data::schema::{CHURN, CONTRACT, INTERNET_SERVICE, MONTHLY_CHARGES, PAYMENT_METHOD, TENURE, YES};
use crate::data::{column_as_f64, column_as_strings};
use crate::stats::StatsError;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Label used for the margin row and column.
pub const TOTAL_LABEL: &str = "Total";
pub const CHURN_RATE_LABEL: &str = "Churn Rate (%)";

/// Churn rate of one payment method partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentChurnRate {
    pub payment_method: String,
    pub customers: usize,
    pub churned: usize,
    pub churn_rate_pct: f64,
}

/// Mean monthly charge for one churn status.
#[derive(Debug, Clone, PartialEq)]
pub struct ChurnChargeSummary {
    pub churn: String,
    pub customers: usize,
    pub mean_monthly_charges: f64,
}

/// Number of churned customers on one contract type.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractChurnCount {
    pub contract: String,
    pub churned: usize,
}

/// Contingency table of two categorical columns with margins.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub index_name: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
    pub row_totals: Vec<usize>,
    pub column_totals: Vec<usize>,
    pub grand_total: usize,
    /// Yes / Total x 100 per row, rounded to 1 decimal
    pub churn_rate_pct: Vec<f64>,
    pub overall_churn_rate_pct: f64,
    /// Each row's distribution across churn labels, in percent
    pub row_percentages: Vec<Vec<f64>>,
}

impl CrossTab {
    /// Build from paired labels; pairs with a missing side are skipped.
    pub fn from_pairs<'a, I>(index_name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
    {
        let mut joint: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
        let mut columns: BTreeSet<&str> = BTreeSet::new();

        for pair in pairs {
            if let (Some(row), Some(column)) = pair {
                *joint.entry(row).or_default().entry(column).or_insert(0) += 1;
                columns.insert(column);
            }
        }

        let row_labels: Vec<String> = joint.keys().map(|s| s.to_string()).collect();
        let column_labels: Vec<String> = columns.iter().map(|s| s.to_string()).collect();

        let counts: Vec<Vec<usize>> = joint
            .values()
            .map(|cells| {
                column_labels
                    .iter()
                    .map(|c| cells.get(c.as_str()).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        let row_totals: Vec<usize> = counts.iter().map(|row| row.iter().sum()).collect();
        let column_totals: Vec<usize> = (0..column_labels.len())
            .map(|j| counts.iter().map(|row| row[j]).sum())
            .collect();
        let grand_total: usize = row_totals.iter().sum();

        let yes_idx = column_labels.iter().position(|c| c == YES);
        let yes_count = |row: &[usize]| yes_idx.map(|j| row[j]).unwrap_or(0);

        let churn_rate_pct = counts
            .iter()
            .zip(&row_totals)
            .map(|(row, &total)| round_half_even(percent(yes_count(row), total), 1))
            .collect();
        let overall_churn_rate_pct =
            round_half_even(percent(yes_count(&column_totals), grand_total), 1);

        // Round the fraction to 4 places first, then scale to percent.
        let row_percentages = counts
            .iter()
            .zip(&row_totals)
            .map(|(row, &total)| {
                row.iter()
                    .map(|&count| round_half_even(count as f64 / total as f64, 4) * 100.0)
                    .collect()
            })
            .collect();

        Self {
            index_name: index_name.to_string(),
            row_labels,
            column_labels,
            counts,
            row_totals,
            column_totals,
            grand_total,
            churn_rate_pct,
            overall_churn_rate_pct,
            row_percentages,
        }
    }

    /// Counts with margins and the churn rate column as a DataFrame.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut index = self.row_labels.clone();
        index.push(TOTAL_LABEL.to_string());

        let mut columns = vec![Column::new(self.index_name.as_str().into(), index)];

        for (j, label) in self.column_labels.iter().enumerate() {
            let mut values: Vec<u64> = self.counts.iter().map(|row| row[j] as u64).collect();
            values.push(self.column_totals[j] as u64);
            columns.push(Column::new(label.as_str().into(), values));
        }

        let mut totals: Vec<u64> = self.row_totals.iter().map(|&t| t as u64).collect();
        totals.push(self.grand_total as u64);
        columns.push(Column::new(TOTAL_LABEL.into(), totals));

        let mut rates = self.churn_rate_pct.clone();
        rates.push(self.overall_churn_rate_pct);
        columns.push(Column::new(CHURN_RATE_LABEL.into(), rates));

        DataFrame::new(columns)
    }

    /// Row-normalized percentages as a DataFrame (no margins).
    pub fn percentages_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = vec![Column::new(
            self.index_name.as_str().into(),
            self.row_labels.clone(),
        )];
        for (j, label) in self.column_labels.iter().enumerate() {
            let values: Vec<f64> = self.row_percentages.iter().map(|row| row[j]).collect();
            columns.push(Column::new(label.as_str().into(), values));
        }
        DataFrame::new(columns)
    }
}

/// Round half to even at the given number of decimals (NumPy compatible).
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Read-only summaries over the cleaned and derived customer table.
pub struct ChurnAggregator;

impl ChurnAggregator {
    /// Percentage of churned customers per payment method, highest first.
    pub fn churn_rate_by_payment(df: &DataFrame) -> Result<Vec<PaymentChurnRate>, StatsError> {
        let grouped = df
            .clone()
            .lazy()
            .select([
                col(PAYMENT_METHOD).cast(DataType::String),
                col(CHURN).cast(DataType::String),
            ])
            .filter(col(PAYMENT_METHOD).is_not_null())
            .group_by([col(PAYMENT_METHOD)])
            .agg([
                col(CHURN).len().alias("customers"),
                col(CHURN)
                    .eq(lit(YES))
                    .fill_null(lit(false))
                    .cast(DataType::UInt64)
                    .sum()
                    .alias("churned"),
            ])
            .collect()?;

        let methods = column_as_strings(&grouped, PAYMENT_METHOD)?;
        let customers = Self::counts(&grouped, "customers")?;
        let churned = Self::counts(&grouped, "churned")?;

        let mut rates: Vec<PaymentChurnRate> = methods
            .into_iter()
            .zip(customers)
            .zip(churned)
            .filter_map(|((method, customers), churned)| {
                Some(PaymentChurnRate {
                    payment_method: method?,
                    customers,
                    churned,
                    churn_rate_pct: percent(churned, customers),
                })
            })
            .collect();

        rates.sort_by(|a, b| {
            b.churn_rate_pct
                .partial_cmp(&a.churn_rate_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.payment_method.cmp(&b.payment_method))
        });

        Ok(rates)
    }

    /// Mean MonthlyCharges per churn status, ordered by label.
    pub fn mean_charges_by_churn(df: &DataFrame) -> Result<Vec<ChurnChargeSummary>, StatsError> {
        let grouped = df
            .clone()
            .lazy()
            .select([
                col(CHURN).cast(DataType::String),
                col(MONTHLY_CHARGES).cast(DataType::Float64),
            ])
            .filter(col(CHURN).is_not_null())
            .group_by([col(CHURN)])
            .agg([
                col(MONTHLY_CHARGES).len().alias("customers"),
                col(MONTHLY_CHARGES).mean().alias("mean"),
            ])
            .collect()?;

        let labels = column_as_strings(&grouped, CHURN)?;
        let customers = Self::counts(&grouped, "customers")?;
        let means = column_as_f64(&grouped, "mean")?;

        let mut summary: Vec<ChurnChargeSummary> = labels
            .into_iter()
            .zip(customers)
            .zip(means)
            .filter_map(|((churn, customers), mean)| {
                Some(ChurnChargeSummary {
                    churn: churn?,
                    customers,
                    mean_monthly_charges: mean.unwrap_or(f64::NAN),
                })
            })
            .collect();
        summary.sort_by(|a, b| a.churn.cmp(&b.churn));

        Ok(summary)
    }

    /// InternetService x Churn contingency table.
    pub fn crosstab_internet_churn(df: &DataFrame) -> Result<CrossTab, StatsError> {
        let services = column_as_strings(df, INTERNET_SERVICE)?;
        let churn = column_as_strings(df, CHURN)?;

        Ok(CrossTab::from_pairs(
            INTERNET_SERVICE,
            services
                .iter()
                .zip(&churn)
                .map(|(s, c)| (s.as_deref(), c.as_deref())),
        ))
    }

    /// Count of churned customers per contract type, ordered by contract.
    pub fn churned_by_contract(df: &DataFrame) -> Result<Vec<ContractChurnCount>, StatsError> {
        let contracts = column_as_strings(df, CONTRACT)?;
        let churn = column_as_strings(df, CHURN)?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (contract, churn) in contracts.into_iter().zip(churn) {
            if let (Some(contract), Some(YES)) = (contract, churn.as_deref()) {
                *counts.entry(contract).or_insert(0) += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|(contract, churned)| ContractChurnCount { contract, churned })
            .collect())
    }

    /// Tenure values of churned customers.
    pub fn churned_tenure(df: &DataFrame) -> Result<Vec<f64>, StatsError> {
        let churned = df
            .clone()
            .lazy()
            .filter(col(CHURN).cast(DataType::String).eq(lit(YES)))
            .select([col(TENURE)])
            .collect()?;

        Ok(column_as_f64(&churned, TENURE)?.into_iter().flatten().collect())
    }

    /// Overall churn rate in percent; missing Churn counts as retained.
    pub fn overall_churn_rate(df: &DataFrame) -> Result<f64, StatsError> {
        let churn = column_as_strings(df, CHURN)?;
        let churned = churn.iter().filter(|c| c.as_deref() == Some(YES)).count();
        Ok(percent(churned, churn.len()))
    }

    fn counts(df: &DataFrame, name: &str) -> Result<Vec<usize>, StatsError> {
        let column = df.column(name)?.cast(&DataType::UInt64)?;
        Ok(column
            .u64()?
            .into_iter()
            .map(|v| v.unwrap_or(0) as usize)
            .collect())
    }
}
