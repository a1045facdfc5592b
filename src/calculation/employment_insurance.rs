//! Employment insurance premium calculation.

use rust_decimal::Decimal;

use super::health_insurance::ensure_non_negative;
use super::rounding::round_social_insurance_premium;
use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{AuditStep, BonusPayment, EmploymentInsurancePremium};

/// Computes the annual employment insurance premium.
///
/// The employee rate applies to each monthly salary payment and to each
/// bonus, every premium rounded to the yen on its own.
///
/// # Errors
///
/// Returns `NegativeIncome` if the salary or a bonus is negative.
pub fn calculate_employment_insurance(
    tables: &RateTables,
    monthly_salary: Decimal,
    bonuses: &[BonusPayment],
) -> EngineResult<EmploymentInsurancePremium> {
    ensure_non_negative("monthly_salary", monthly_salary)?;
    for bonus in bonuses {
        ensure_non_negative("bonus", bonus.amount)?;
    }

    let rate = tables.social_insurance().employment_insurance_rate;
    let monthly_premium = round_social_insurance_premium(monthly_salary * rate);
    let bonus_portion: Decimal = bonuses
        .iter()
        .map(|bonus| round_social_insurance_premium(bonus.amount * rate))
        .sum();

    Ok(EmploymentInsurancePremium {
        total: monthly_premium * Decimal::from(12) + bonus_portion,
        bonus_portion,
    })
}

impl EmploymentInsurancePremium {
    /// A zero premium, for taxpayers with no employment income.
    pub const ZERO: EmploymentInsurancePremium = EmploymentInsurancePremium {
        total: Decimal::ZERO,
        bonus_portion: Decimal::ZERO,
    };

    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "employment_insurance".to_string(),
            rule_name: "Employment Insurance Premium".to_string(),
            statute_ref: "Labour Insurance Premium Collection Act Art. 31".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({
                "total": self.total.to_string(),
                "bonus_portion": self.bonus_portion.to_string()
            }),
            reasoning: format!(
                "¥{} annual premium including ¥{} on bonuses",
                self.total, self.bonus_portion
            ),
        }
    }
}
