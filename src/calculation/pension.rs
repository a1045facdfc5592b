//! Pension contribution calculation.
//!
//! Employees pay the employee share of the employees' pension on their
//! pension SMR and on each standard bonus amount. Everyone else pays the
//! flat national pension, unless covered as a dependent spouse.

use rust_decimal::Decimal;

use super::health_insurance::{STANDARD_BONUS_UNIT, ensure_non_negative};
use super::rounding::{floor_to_unit, round_social_insurance_premium};
use crate::config::{RateTables, find_smr_bracket};
use crate::error::EngineResult;
use crate::models::{AuditStep, BonusPayment, PensionContribution, PensionPlan};

/// Computes the annual employees' pension contribution.
///
/// Each bonus is floored to ¥1,000 and capped per payment before the rate
/// is applied.
///
/// # Errors
///
/// - `NegativeIncome` if the remuneration or a bonus is negative
/// - `CalculationError` if the pension SMR table is malformed
pub fn calculate_employee_pension(
    tables: &RateTables,
    monthly_remuneration: Decimal,
    bonuses: &[BonusPayment],
) -> EngineResult<PensionContribution> {
    ensure_non_negative("monthly_remuneration", monthly_remuneration)?;
    for bonus in bonuses {
        ensure_non_negative("bonus", bonus.amount)?;
    }

    let social = tables.social_insurance();
    let smr = find_smr_bracket(&social.pension_smr, monthly_remuneration)?;
    let monthly_premium = round_social_insurance_premium(smr.amount * social.pension_rate);

    let bonus_portion: Decimal = bonuses
        .iter()
        .map(|bonus| {
            let standard = floor_to_unit(bonus.amount, STANDARD_BONUS_UNIT)
                .min(social.pension_bonus_cap_per_payment);
            round_social_insurance_premium(standard * social.pension_rate)
        })
        .sum();

    Ok(PensionContribution {
        plan: PensionPlan::EmployeesPension,
        total: monthly_premium * Decimal::from(12) + bonus_portion,
        bonus_portion,
    })
}

/// Returns the annual national pension contribution.
pub fn calculate_national_pension(tables: &RateTables) -> PensionContribution {
    PensionContribution {
        plan: PensionPlan::NationalPension,
        total: tables.social_insurance().national_pension_monthly * Decimal::from(12),
        bonus_portion: Decimal::ZERO,
    }
}

impl PensionContribution {
    /// A zero contribution under the given plan.
    pub fn zero(plan: PensionPlan) -> Self {
        Self {
            plan,
            total: Decimal::ZERO,
            bonus_portion: Decimal::ZERO,
        }
    }

    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "pension".to_string(),
            rule_name: "Pension Contribution".to_string(),
            statute_ref: "Employees' Pension Insurance Act Art. 81; National Pension Act Art. 87"
                .to_string(),
            input: serde_json::json!({
                "plan": self.plan
            }),
            output: serde_json::json!({
                "total": self.total.to_string(),
                "bonus_portion": self.bonus_portion.to_string()
            }),
            reasoning: format!(
                "{:?}: ¥{} annual contribution including ¥{} on bonuses",
                self.plan, self.total, self.bonus_portion
            ),
        }
    }
}
