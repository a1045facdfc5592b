//! Net income calculation.
//!
//! This module applies the statutory employment income deduction curve to
//! gross employment income and combines the result with business and
//! miscellaneous income after the blue-filer deduction.

use rust_decimal::Decimal;

use super::income_aggregation::IncomeSummary;
use super::rounding::{floor_to_unit, floor_yen, rate, yen};
use crate::models::AuditStep;

const NO_INCOME_BELOW: Decimal = yen(651_000);
const MINIMUM_DEDUCTION: Decimal = yen(650_000);
const FLAT_BAND_END: Decimal = yen(1_900_000);
const SEVENTY_PERCENT_BAND_END: Decimal = yen(3_600_000);
const EIGHTY_PERCENT_BAND_END: Decimal = yen(6_600_000);
const NINETY_PERCENT_BAND_END: Decimal = yen(8_500_000);
const MAXIMUM_DEDUCTION: Decimal = yen(1_950_000);
const ROUNDING_UNIT: Decimal = yen(4_000);

/// Net employment and total net income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetIncomeBreakdown {
    /// Salary, bonuses and stock compensation.
    pub gross_employment_income: Decimal,
    /// Employment income after the employment income deduction.
    pub net_employment_income: Decimal,
    /// Business and miscellaneous income after the blue-filer deduction.
    pub net_business_and_misc_income: Decimal,
    /// Total net income.
    pub net_income: Decimal,
}

impl NetIncomeBreakdown {
    /// Returns the employment income deduction actually applied.
    pub fn employment_income_deduction(&self) -> Decimal {
        self.gross_employment_income - self.net_employment_income
    }

    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "net_income".to_string(),
            rule_name: "Net Income".to_string(),
            statute_ref: "Income Tax Act Art. 28".to_string(),
            input: serde_json::json!({
                "gross_employment_income": self.gross_employment_income.to_string(),
                "net_business_and_misc_income": self.net_business_and_misc_income.to_string()
            }),
            output: serde_json::json!({
                "employment_income_deduction": self.employment_income_deduction().to_string(),
                "net_employment_income": self.net_employment_income.to_string(),
                "net_income": self.net_income.to_string()
            }),
            reasoning: format!(
                "¥{} employment income less ¥{} deduction = ¥{}; plus ¥{} business/misc = ¥{}",
                self.gross_employment_income,
                self.employment_income_deduction(),
                self.net_employment_income,
                self.net_business_and_misc_income,
                self.net_income
            ),
        }
    }
}

/// Applies the employment income deduction curve.
///
/// Between ¥1,900,000 and ¥6,600,000 the gross amount is first floored to
/// a multiple of ¥4,000, as in the statutory table.
///
/// # Examples
///
/// ```
/// use takehome_engine::calculation::calculate_net_employment_income;
/// use rust_decimal::Decimal;
///
/// assert_eq!(calculate_net_employment_income(Decimal::from(5_000_000)), Decimal::from(3_560_000));
/// assert_eq!(calculate_net_employment_income(Decimal::from(650_999)), Decimal::ZERO);
/// ```
pub fn calculate_net_employment_income(gross: Decimal) -> Decimal {
    let net = if gross < NO_INCOME_BELOW {
        Decimal::ZERO
    } else if gross < FLAT_BAND_END {
        gross - MINIMUM_DEDUCTION
    } else if gross < SEVENTY_PERCENT_BAND_END {
        floor_to_unit(gross, ROUNDING_UNIT) * rate(7, 1) - yen(80_000)
    } else if gross < EIGHTY_PERCENT_BAND_END {
        floor_to_unit(gross, ROUNDING_UNIT) * rate(8, 1) - yen(440_000)
    } else if gross < NINETY_PERCENT_BAND_END {
        gross * rate(9, 1) - yen(1_100_000)
    } else {
        gross - MAXIMUM_DEDUCTION
    };

    floor_yen(net)
}

/// Computes total net income from aggregated income.
pub fn calculate_net_income(summary: &IncomeSummary) -> NetIncomeBreakdown {
    let gross_employment_income = summary.gross_employment_income();
    let net_employment_income = calculate_net_employment_income(gross_employment_income);

    NetIncomeBreakdown {
        gross_employment_income,
        net_employment_income,
        net_business_and_misc_income: summary.net_business_and_misc_income,
        net_income: net_employment_income + summary.net_business_and_misc_income,
    }
}
