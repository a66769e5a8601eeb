//! Column names and categorical labels of the Telco churn dataset.

pub const TOTAL_CHARGES: &str = "TotalCharges";
pub const SENIOR_CITIZEN: &str = "SeniorCitizen";
pub const CONTRACT: &str = "Contract";
pub const TENURE: &str = "tenure";
pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const CHURN: &str = "Churn";
pub const INTERNET_SERVICE: &str = "InternetService";

/// Derived columns
pub const TENURE_RATIO: &str = "tenure_ratio";
pub const FLAGGED: &str = "Flagged";

pub const YES: &str = "Yes";
pub const NO: &str = "No";

/// Monthly charge above which a month-to-month customer is flagged.
pub const HIGH_RISK_MONTHLY_CHARGE: f64 = 70.0;

/// Contract categories, in the priority order used for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractTerm {
    TwoYear,
    OneYear,
    MonthToMonth,
}

impl ContractTerm {
    /// First match wins.
    pub const PRIORITY: [ContractTerm; 3] = [
        ContractTerm::TwoYear,
        ContractTerm::OneYear,
        ContractTerm::MonthToMonth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContractTerm::TwoYear => "Two year",
            ContractTerm::OneYear => "One year",
            ContractTerm::MonthToMonth => "Month-to-month",
        }
    }

    /// Number of months tenure is divided by for the tenure ratio.
    pub fn months(self) -> f64 {
        match self {
            ContractTerm::TwoYear => 24.0,
            ContractTerm::OneYear => 12.0,
            ContractTerm::MonthToMonth => 1.0,
        }
    }

    pub fn classify(label: &str) -> Option<ContractTerm> {
        Self::PRIORITY.into_iter().find(|term| term.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_contracts() {
        assert_eq!(ContractTerm::classify("Two year"), Some(ContractTerm::TwoYear));
        assert_eq!(ContractTerm::classify("One year"), Some(ContractTerm::OneYear));
        assert_eq!(
            ContractTerm::classify("Month-to-month"),
            Some(ContractTerm::MonthToMonth)
        );
    }

    #[test]
    fn classify_is_exact_match() {
        assert_eq!(ContractTerm::classify("two year"), None);
        assert_eq!(ContractTerm::classify(" One year"), None);
        assert_eq!(ContractTerm::classify(""), None);
    }
}
