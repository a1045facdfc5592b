//! Calculation result models.
//!
//! This module contains the [`TakeHomeResults`] type and the detail
//! structures it is assembled from. Intermediate bases and bonus splits are
//! exposed so a caller can render breakdowns without recomputing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

/// National income tax breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxDetails {
    /// Net income the tax is computed from.
    pub net_income: Decimal,
    /// Basic deduction for the net income.
    pub basic_deduction: Decimal,
    /// Social insurance and DC-plan deductions.
    pub income_deductions: Decimal,
    /// Spouse, dependent and disability deductions.
    pub dependent_deduction: Decimal,
    /// Taxable income, floored to 1,000 yen.
    pub taxable_income: Decimal,
    /// Tax from the progressive bracket table.
    pub base_tax: Decimal,
    /// Special reconstruction income tax.
    pub reconstruction_surtax: Decimal,
    /// Total tax, floored to 100 yen.
    pub total: Decimal,
}

/// One jurisdiction's share of the residence tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidenceTaxShare {
    /// Income portion before credits (taxable income × share × rate).
    pub income_portion: Decimal,
    /// Share of the adjustment credit.
    pub adjustment_credit: Decimal,
    /// Share of other tax credits, such as donation credits.
    pub tax_credit: Decimal,
    /// Income-based tax after credits, floored to 100 yen.
    pub income_tax: Decimal,
    /// Per-capita tax.
    pub per_capita_tax: Decimal,
}

impl ResidenceTaxShare {
    /// A share with every amount zero.
    pub const ZERO: ResidenceTaxShare = ResidenceTaxShare {
        income_portion: Decimal::ZERO,
        adjustment_credit: Decimal::ZERO,
        tax_credit: Decimal::ZERO,
        income_tax: Decimal::ZERO,
        per_capita_tax: Decimal::ZERO,
    };

    /// Returns the income-based tax plus the per-capita tax.
    pub fn total(&self) -> Decimal {
        self.income_tax + self.per_capita_tax
    }
}

/// Residence tax breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidenceTaxDetails {
    /// Taxable income, floored to 1,000 yen.
    pub taxable_income: Decimal,
    /// Residence-tax basic deduction.
    pub basic_deduction: Decimal,
    /// Statutory personal deduction difference used for the adjustment credit.
    pub personal_deduction_difference: Decimal,
    /// Total adjustment credit.
    pub adjustment_credit: Decimal,
    /// Municipal share.
    pub city: ResidenceTaxShare,
    /// Prefectural share.
    pub prefecture: ResidenceTaxShare,
    /// Forest environment tax.
    pub forest_environment_tax: Decimal,
    /// Total residence tax.
    pub total_residence_tax: Decimal,
}

/// The residence tax of a non-taxable household.
pub const NON_TAXABLE_RESIDENCE_TAX_DETAIL: ResidenceTaxDetails = ResidenceTaxDetails {
    taxable_income: Decimal::ZERO,
    basic_deduction: Decimal::ZERO,
    personal_deduction_difference: Decimal::ZERO,
    adjustment_credit: Decimal::ZERO,
    city: ResidenceTaxShare::ZERO,
    prefecture: ResidenceTaxShare::ZERO,
    forest_environment_tax: Decimal::ZERO,
    total_residence_tax: Decimal::ZERO,
};

impl ResidenceTaxDetails {
    /// Returns true for the non-taxable household result.
    pub fn is_non_taxable(&self) -> bool {
        *self == NON_TAXABLE_RESIDENCE_TAX_DETAIL
    }

    /// Income portion after the adjustment credit and before any tax credit.
    pub fn income_portion_before_tax_credits(&self) -> Decimal {
        (self.city.income_portion + self.prefecture.income_portion - self.adjustment_credit)
            .max(Decimal::ZERO)
    }
}

/// National Health Insurance portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NhiBreakdown {
    /// Net income minus the standard deduction, floored at zero.
    pub income_base: Decimal,
    /// Medical portion after its cap.
    pub medical: Decimal,
    /// Elderly-support portion after its cap.
    pub elderly_support: Decimal,
    /// Long-term care portion after its cap; zero when not owed.
    pub long_term_care: Decimal,
}

/// Annual health insurance premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInsurancePremium {
    /// Total annual premium, bonus portion included.
    pub total: Decimal,
    /// Portion charged on bonuses.
    pub bonus_portion: Decimal,
    /// Per-portion detail when covered by National Health Insurance.
    pub national_health_insurance: Option<NhiBreakdown>,
}

impl HealthInsurancePremium {
    /// A premium of zero, owed by dependents of insured employees.
    pub const ZERO: HealthInsurancePremium = HealthInsurancePremium {
        total: Decimal::ZERO,
        bonus_portion: Decimal::ZERO,
        national_health_insurance: None,
    };
}

/// Which public pension the taxpayer contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionPlan {
    /// Employees' pension, SMR based.
    EmployeesPension,
    /// National pension, flat amount.
    NationalPension,
    /// Covered through an insured spouse; nothing owed.
    DependentSpouse,
}

/// Annual pension contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionContribution {
    /// The pension plan.
    pub plan: PensionPlan,
    /// Total annual contribution, bonus portion included.
    pub total: Decimal,
    /// Portion charged on bonuses.
    pub bonus_portion: Decimal,
}

/// Annual employment insurance premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentInsurancePremium {
    /// Total annual premium, bonus portion included.
    pub total: Decimal,
    /// Portion charged on bonuses.
    pub bonus_portion: Decimal,
}

/// Furusato Nozei donation limit and the resulting deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurusatoNozeiDetails {
    /// Largest donation whose out-of-pocket cost stays at 2,000 yen.
    pub limit: Decimal,
    /// Reduction of national income tax.
    pub income_tax_reduction: Decimal,
    /// Residence-tax basic donation credit.
    pub residence_tax_basic_deduction: Decimal,
    /// Residence-tax special donation credit.
    pub residence_tax_special_deduction: Decimal,
    /// Reduction of residence tax.
    pub residence_tax_reduction: Decimal,
    /// Donation minus both reductions.
    pub out_of_pocket_cost: Decimal,
}

impl FurusatoNozeiDetails {
    /// Details with every amount zero.
    pub const ZERO: FurusatoNozeiDetails = FurusatoNozeiDetails {
        limit: Decimal::ZERO,
        income_tax_reduction: Decimal::ZERO,
        residence_tax_basic_deduction: Decimal::ZERO,
        residence_tax_special_deduction: Decimal::ZERO,
        residence_tax_reduction: Decimal::ZERO,
        out_of_pocket_cost: Decimal::ZERO,
    };
}

/// The deduction a single dependent qualifies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependentDeductionCategory {
    /// Spouse deduction, spouse under 70.
    Spouse,
    /// Spouse deduction, spouse 70 or older.
    ElderlySpouse,
    /// Spouse special deduction.
    SpouseSpecial,
    /// Under 16; counted for ceilings but no deduction.
    Under16,
    /// General dependent deduction.
    GeneralDependent,
    /// Specific dependent deduction (19 to 22).
    SpecificDependent,
    /// Elderly dependent deduction.
    ElderlyDependent,
    /// Elderly parent living with the taxpayer.
    ElderlyCohabitingParent,
    /// Income too high, or taxpayer income too high for a spouse deduction.
    NotEligible,
}

/// The disability deduction a single dependent qualifies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityDeductionCategory {
    /// Disabled person deduction.
    Regular,
    /// Specially disabled person deduction.
    Special,
    /// Specially disabled person living with the taxpayer.
    SpecialCohabiting,
}

/// Deductions attributed to one dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentDeductionLine {
    /// Position of the dependent in the input list.
    pub index: usize,
    /// Spouse or dependent category.
    pub category: DependentDeductionCategory,
    /// Disability category, if any.
    pub disability: Option<DisabilityDeductionCategory>,
    /// National income tax deduction.
    pub national_tax: Decimal,
    /// Residence tax deduction.
    pub residence_tax: Decimal,
    /// Statutory personal deduction difference.
    pub personal_deduction_difference: Decimal,
    /// Whether the dependent raises the residence non-taxable ceiling.
    pub counts_toward_non_taxable_ceiling: bool,
}

/// Totals of all dependent-related deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentDeductions {
    /// Total national income tax deduction.
    pub national_tax: Decimal,
    /// Total residence tax deduction.
    pub residence_tax: Decimal,
    /// Total personal deduction difference, excluding the basic deduction.
    pub personal_deduction_difference: Decimal,
    /// Number of dependents raising the residence non-taxable ceiling.
    pub ceiling_dependents: u32,
    /// Per-dependent breakdown.
    pub lines: Vec<DependentDeductionLine>,
}

impl DependentDeductions {
    /// The deductions of a taxpayer with no dependents.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The complete result of a take-home pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeHomeResults {
    /// Total annual income, commuting allowance excluded.
    pub annual_income: Decimal,
    /// Total net income after the employment income deduction and
    /// blue-filer deduction.
    pub net_income: Decimal,
    /// National income tax.
    pub national_income_tax: IncomeTaxDetails,
    /// Residence tax.
    pub residence_tax: ResidenceTaxDetails,
    /// Health insurance premium.
    pub health_insurance: HealthInsurancePremium,
    /// Pension contribution.
    pub pension: PensionContribution,
    /// Employment insurance premium.
    pub employment_insurance: EmploymentInsurancePremium,
    /// Social insurance deduction used for both taxes.
    pub social_insurance_total: Decimal,
    /// Whether the social insurance total was entered manually.
    pub manual_social_insurance: bool,
    /// DC-plan contributions.
    pub dc_plan_contributions: Decimal,
    /// Annual income after taxes, social insurance and DC contributions.
    pub take_home_income: Decimal,
    /// Furusato Nozei limit and deductions.
    pub furusato_nozei: FurusatoNozeiDetails,
    /// Dependent deduction breakdown.
    pub dependent_deductions: DependentDeductions,
    /// Health-insurance provider id, echoed from the inputs.
    pub health_insurance_provider: String,
    /// Region, echoed from the inputs.
    pub region: String,
    /// Long-term care flag, echoed from the inputs.
    pub is_subject_to_long_term_care_premium: bool,
    /// Audit trace of every rule applied.
    pub audit_trace: AuditTrace,
}
