//! Income stream models.
//!
//! A taxpayer's income is a list of heterogeneous streams, each a variant
//! of the closed [`IncomeStream`] sum type.

use chrono::Month;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How often a salary amount is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryFrequency {
    /// The amount is paid every month.
    Monthly,
    /// The amount is the annual total.
    Annual,
}

impl SalaryFrequency {
    /// Number of payments per year.
    pub fn payments_per_year(self) -> Decimal {
        match self {
            SalaryFrequency::Monthly => Decimal::from(12),
            SalaryFrequency::Annual => Decimal::ONE,
        }
    }
}

/// How often a commuting allowance is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowanceFrequency {
    /// Paid every month.
    #[serde(rename = "monthly")]
    Monthly,
    /// Paid once per three months.
    #[serde(rename = "3-months")]
    ThreeMonths,
    /// Paid once per six months.
    #[serde(rename = "6-months")]
    SixMonths,
    /// Paid once per year.
    #[serde(rename = "annual")]
    Annual,
}

impl AllowanceFrequency {
    /// Number of months one payment covers.
    pub fn months_covered(self) -> Decimal {
        match self {
            AllowanceFrequency::Monthly => Decimal::ONE,
            AllowanceFrequency::ThreeMonths => Decimal::from(3),
            AllowanceFrequency::SixMonths => Decimal::from(6),
            AllowanceFrequency::Annual => Decimal::from(12),
        }
    }
}

/// Where the company granting stock compensation is domiciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuerDomicile {
    /// Issued by a Japanese company.
    Domestic,
    /// Issued by a foreign parent company.
    Foreign,
}

/// A single source of income.
///
/// # Example
///
/// ```
/// use takehome_engine::models::{IncomeStream, SalaryFrequency};
/// use rust_decimal::Decimal;
///
/// let json = r#"{"type": "salary", "amount": "400000", "frequency": "monthly"}"#;
/// let stream: IncomeStream = serde_json::from_str(json).unwrap();
/// assert_eq!(
///     stream,
///     IncomeStream::Salary {
///         amount: Decimal::from(400_000),
///         frequency: SalaryFrequency::Monthly,
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomeStream {
    /// Regular employment salary.
    Salary {
        /// Amount per payment.
        amount: Decimal,
        /// Payment frequency.
        frequency: SalaryFrequency,
    },
    /// A single bonus payment.
    Bonus {
        /// Bonus amount.
        amount: Decimal,
        /// Month the bonus is paid in.
        month: Month,
    },
    /// Business (self-employment) income after expenses.
    Business {
        /// Annual business income.
        amount: Decimal,
        /// Declared blue-filer special deduction.
        blue_filer_deduction: Decimal,
    },
    /// Miscellaneous income after expenses.
    Miscellaneous {
        /// Annual miscellaneous income.
        amount: Decimal,
    },
    /// Commuting allowance. Excluded from taxable income but counted as
    /// remuneration for social insurance.
    CommutingAllowance {
        /// Amount per payment.
        amount: Decimal,
        /// Payment frequency.
        frequency: AllowanceFrequency,
    },
    /// Stock compensation treated as employment income.
    StockCompensation {
        /// Annual taxable value.
        amount: Decimal,
        /// Domicile of the issuing company.
        issuer_domicile: IssuerDomicile,
    },
}

impl IncomeStream {
    /// Returns the category name used in errors and audit output.
    pub fn category(&self) -> &'static str {
        match self {
            IncomeStream::Salary { .. } => "salary",
            IncomeStream::Bonus { .. } => "bonus",
            IncomeStream::Business { .. } => "business",
            IncomeStream::Miscellaneous { .. } => "miscellaneous",
            IncomeStream::CommutingAllowance { .. } => "commuting_allowance",
            IncomeStream::StockCompensation { .. } => "stock_compensation",
        }
    }

    /// Returns the stream's amount per payment.
    pub fn amount(&self) -> Decimal {
        match self {
            IncomeStream::Salary { amount, .. }
            | IncomeStream::Bonus { amount, .. }
            | IncomeStream::Business { amount, .. }
            | IncomeStream::Miscellaneous { amount }
            | IncomeStream::CommutingAllowance { amount, .. }
            | IncomeStream::StockCompensation { amount, .. } => *amount,
        }
    }
}

/// A bonus payment extracted from the income streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPayment {
    /// Bonus amount.
    pub amount: Decimal,
    /// Month the bonus is paid in.
    pub month: Month,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_bonus_with_month_name() {
        let json = r#"{"type": "bonus", "amount": "600000", "month": "June"}"#;
        let stream: IncomeStream = serde_json::from_str(json).unwrap();

        assert_eq!(
            stream,
            IncomeStream::Bonus {
                amount: dec("600000"),
                month: Month::June,
            }
        );
    }

    #[test]
    fn test_deserialize_commuting_allowance_three_months() {
        let json = r#"{"type": "commuting_allowance", "amount": "45000", "frequency": "3-months"}"#;
        let stream: IncomeStream = serde_json::from_str(json).unwrap();

        match stream {
            IncomeStream::CommutingAllowance { amount, frequency } => {
                assert_eq!(amount, dec("45000"));
                assert_eq!(frequency, AllowanceFrequency::ThreeMonths);
                assert_eq!(frequency.months_covered(), dec("3"));
            }
            other => panic!("Expected CommutingAllowance, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_business_stream() {
        let json = r#"{"type": "business", "amount": "3000000", "blue_filer_deduction": "650000"}"#;
        let stream: IncomeStream = serde_json::from_str(json).unwrap();

        assert_eq!(stream.category(), "business");
        assert_eq!(stream.amount(), dec("3000000"));
    }

    #[test]
    fn test_unknown_stream_type_is_rejected() {
        let json = r#"{"type": "lottery", "amount": "100"}"#;
        let result: Result<IncomeStream, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_salary_frequency_payments_per_year() {
        assert_eq!(SalaryFrequency::Monthly.payments_per_year(), dec("12"));
        assert_eq!(SalaryFrequency::Annual.payments_per_year(), dec("1"));
    }
}
