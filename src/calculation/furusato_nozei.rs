//! Furusato Nozei donation limit.
//!
//! A hometown donation is deducted from national income tax and credited
//! against residence tax. The limit is the largest donation for which the
//! two reductions together leave only the ¥2,000 self-pay behind. The
//! reductions are found by recomputing both taxes with the donation
//! applied, so every rounding step of the regular calculation is honoured.

use rust_decimal::Decimal;

use super::income_tax::{calculate_national_income_tax, marginal_income_tax_rate};
use super::residence_tax::ResidenceTaxInputs;
use super::rounding::{floor_to_unit, floor_yen, rate, yen};
use crate::config::RateTables;
use crate::models::{AuditStep, FurusatoNozeiDetails, IncomeTaxDetails, ResidenceTaxDetails};

/// The part of every donation that is never deducted.
pub const SELF_PAY: Decimal = yen(2_000);

const LIMIT_UNIT: Decimal = yen(1_000);
const SPECIAL_CREDIT_BASE_RATE: Decimal = rate(90, 2);
const SPECIAL_CREDIT_CAP_RATE: Decimal = rate(20, 2);
const TOTAL_INCOME_CAP_RATE: Decimal = rate(30, 2);

/// Returns the special-credit rate: 90% less the marginal income tax rate
/// grossed up by the reconstruction surtax.
fn special_credit_rate(tables: &RateTables, residence: &ResidenceTaxDetails) -> Decimal {
    let marginal = marginal_income_tax_rate(
        tables,
        residence.taxable_income - residence.personal_deduction_difference,
    );
    let surtax_factor = Decimal::ONE + tables.income_tax().reconstruction_surtax_rate;
    SPECIAL_CREDIT_BASE_RATE - marginal * surtax_factor
}

/// Computes the Furusato Nozei limit and the tax reductions a donation of
/// exactly that amount would produce.
///
/// `income_tax` and `residence_tax` are the results before any donation;
/// `residence_inputs` are the figures the residence tax was computed from,
/// so it can be recomputed with the donation credits.
///
/// Returns [`FurusatoNozeiDetails::ZERO`] when either taxable income is
/// zero.
pub fn calculate_furusato_nozei(
    tables: &RateTables,
    income_tax: &IncomeTaxDetails,
    residence_tax: &ResidenceTaxDetails,
    residence_inputs: &ResidenceTaxInputs<'_>,
) -> FurusatoNozeiDetails {
    if income_tax.taxable_income <= Decimal::ZERO || residence_tax.taxable_income <= Decimal::ZERO {
        return FurusatoNozeiDetails::ZERO;
    }

    let income_portion = residence_tax.income_portion_before_tax_credits();
    let special_rate = special_credit_rate(tables, residence_tax);

    let by_income_portion = SPECIAL_CREDIT_CAP_RATE * income_portion / special_rate + SELF_PAY;
    let by_total_income = TOTAL_INCOME_CAP_RATE * residence_tax.taxable_income;
    let limit = floor_to_unit(by_income_portion.min(by_total_income), LIMIT_UNIT);

    if limit <= SELF_PAY {
        return FurusatoNozeiDetails {
            limit,
            out_of_pocket_cost: limit,
            ..FurusatoNozeiDetails::ZERO
        };
    }

    let deductible = limit - SELF_PAY;

    let income_tax_after = calculate_national_income_tax(
        tables,
        income_tax.net_income,
        income_tax.income_deductions + deductible,
        income_tax.dependent_deduction,
    );
    let income_tax_reduction = income_tax.total - income_tax_after.total;

    let residence_tax_basic_deduction =
        floor_yen(deductible * tables.residence_tax().income_tax_rate);
    let residence_tax_special_deduction =
        floor_yen((deductible * special_rate).min(SPECIAL_CREDIT_CAP_RATE * income_portion));

    let residence_after = residence_inputs.calculate(
        tables,
        residence_tax_basic_deduction + residence_tax_special_deduction,
    );
    let residence_tax_reduction =
        residence_tax.total_residence_tax - residence_after.total_residence_tax;

    FurusatoNozeiDetails {
        limit,
        income_tax_reduction,
        residence_tax_basic_deduction,
        residence_tax_special_deduction,
        residence_tax_reduction,
        out_of_pocket_cost: limit - income_tax_reduction - residence_tax_reduction,
    }
}

impl FurusatoNozeiDetails {
    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "furusato_nozei".to_string(),
            rule_name: "Furusato Nozei Donation Limit".to_string(),
            statute_ref: "Income Tax Act Art. 78; Local Tax Act Art. 37-2, 314-7".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({
                "limit": self.limit.to_string(),
                "income_tax_reduction": self.income_tax_reduction.to_string(),
                "residence_tax_basic_deduction": self.residence_tax_basic_deduction.to_string(),
                "residence_tax_special_deduction": self.residence_tax_special_deduction.to_string(),
                "residence_tax_reduction": self.residence_tax_reduction.to_string(),
                "out_of_pocket_cost": self.out_of_pocket_cost.to_string()
            }),
            reasoning: format!(
                "Donating ¥{} reduces income tax by ¥{} and residence tax by ¥{}, costing ¥{}",
                self.limit,
                self.income_tax_reduction,
                self.residence_tax_reduction,
                self.out_of_pocket_cost
            ),
        }
    }
}
