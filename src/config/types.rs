//! Rate table types for one tax year.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a tax-year directory.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// Metadata about the tax year the tables describe.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxYearMetadata {
    /// The calendar year whose income the tables apply to.
    pub tax_year: i32,
    /// A human-readable name for the data set.
    pub name: String,
    /// URL to the official source of the figures.
    pub source_url: String,
}

/// One band of a progressive tax table.
///
/// The band covers amounts up to and including `up_to`; the last band has
/// no upper bound.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound, or `None` for the top band.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Marginal rate for the band.
    pub rate: Decimal,
    /// Quick-calculation deduction subtracted after applying the rate.
    pub deduction: Decimal,
}

/// One tier of a step-function deduction keyed on net income.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionTier {
    /// Inclusive upper bound of net income, or `None` for the last tier.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Deduction amount for incomes in this tier.
    pub amount: Decimal,
}

/// National income tax tables from `income_tax.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxConfig {
    /// Progressive brackets, ascending.
    pub brackets: Vec<TaxBracket>,
    /// Special reconstruction income tax rate applied to the base tax.
    pub reconstruction_surtax_rate: Decimal,
    /// Basic deduction schedule, ascending.
    pub basic_deduction: Vec<DeductionTier>,
}

/// Parameters of the residence-tax non-taxable ceilings.
#[derive(Debug, Clone, Deserialize)]
pub struct NonTaxableConfig {
    /// Net income at or below which a taxpayer without dependents owes nothing.
    pub single_ceiling: Decimal,
    /// Amount per household member (taxpayer plus qualifying dependents).
    pub per_member: Decimal,
    /// Fixed addition to the ceiling.
    pub base_addition: Decimal,
    /// Addition applied when the household has qualifying dependents.
    pub dependent_addition: Decimal,
}

/// Parameters of the residence-tax adjustment credit.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentCreditConfig {
    /// Credit rate applied to the personal deduction difference.
    pub rate: Decimal,
    /// Personal deduction difference arising from the basic deduction.
    pub basic_difference: Decimal,
    /// Taxable income above which the difference is phased down.
    pub taxable_income_threshold: Decimal,
    /// Net income above which no credit is available.
    pub net_income_limit: Decimal,
}

/// Residence tax tables from `residence_tax.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResidenceTaxConfig {
    /// Residence-tax basic deduction schedule, ascending.
    pub basic_deduction: Vec<DeductionTier>,
    /// Combined income-portion rate (municipal plus prefectural).
    pub income_tax_rate: Decimal,
    /// Municipal share of the income portion and credits.
    pub municipal_share: Decimal,
    /// Prefectural share of the income portion and credits.
    pub prefectural_share: Decimal,
    /// Municipal per-capita tax.
    pub municipal_per_capita: Decimal,
    /// Prefectural per-capita tax.
    pub prefectural_per_capita: Decimal,
    /// Forest environment tax, levied with the per-capita taxes.
    pub forest_environment_tax: Decimal,
    /// Non-taxable ceiling parameters.
    pub non_taxable: NonTaxableConfig,
    /// Adjustment credit parameters.
    pub adjustment_credit: AdjustmentCreditConfig,
}

/// A Standard Monthly Remuneration bracket.
///
/// Covers monthly remuneration in `[min, max)`; the final bracket has no
/// upper bound.
#[derive(Debug, Clone, Deserialize)]
pub struct SmrBracket {
    /// The grade number.
    pub grade: u32,
    /// Inclusive lower bound of monthly remuneration.
    pub min: Decimal,
    /// Exclusive upper bound, or `None` for the cap bracket.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// The standard monthly remuneration for the bracket.
    pub amount: Decimal,
}

/// Social insurance tables from `social_insurance.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialInsuranceConfig {
    /// Employee share of the employees' pension rate.
    pub pension_rate: Decimal,
    /// Maximum standard bonus amount per payment for pension.
    pub pension_bonus_cap_per_payment: Decimal,
    /// Maximum cumulative standard bonus amount per fiscal year for health insurance.
    pub health_bonus_annual_cap: Decimal,
    /// Employee share of the employment insurance rate.
    pub employment_insurance_rate: Decimal,
    /// Monthly national pension contribution.
    pub national_pension_monthly: Decimal,
    /// Annual income below which a person may be covered as a dependent.
    pub dependent_coverage_income_limit: Decimal,
    /// Health insurance SMR brackets, ascending.
    pub health_smr: Vec<SmrBracket>,
    /// Pension SMR brackets, ascending.
    pub pension_smr: Vec<SmrBracket>,
}

/// Employee-share rates of one provider in one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EmployeeHealthRates {
    /// Health insurance rate.
    pub health: Decimal,
    /// Long-term care rate, owed by insured persons aged 40 to 64.
    pub long_term_care: Decimal,
}

/// Provider rate tables from `health_insurance.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthInsuranceConfig {
    /// Provider id to region to rates.
    pub providers: HashMap<String, HashMap<String, EmployeeHealthRates>>,
}

/// One National Health Insurance portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NhiPortion {
    /// Rate applied to the income base.
    pub income_rate: Decimal,
    /// Per-insured-person amount.
    pub per_capita: Decimal,
    /// Per-household amount.
    pub household_flat: Decimal,
    /// Annual ceiling for the portion.
    pub cap: Decimal,
}

/// National Health Insurance parameters of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NhiRegionParams {
    /// Deduction subtracted from net income to form the income base.
    pub standard_deduction: Decimal,
    /// Medical portion.
    pub medical: NhiPortion,
    /// Elderly-support portion.
    pub elderly_support: NhiPortion,
    /// Long-term care portion.
    pub long_term_care: NhiPortion,
}

/// NHI tables from `national_health_insurance.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NationalHealthInsuranceConfig {
    /// Region to parameters.
    pub regions: HashMap<String, NhiRegionParams>,
}

/// The complete set of rate tables for one tax year.
///
/// Every calculator takes a `&RateTables`, so alternate years or regions
/// can be substituted without touching calculation logic.
#[derive(Debug, Clone)]
pub struct RateTables {
    metadata: TaxYearMetadata,
    income_tax: IncomeTaxConfig,
    residence_tax: ResidenceTaxConfig,
    social_insurance: SocialInsuranceConfig,
    health_insurance: HealthInsuranceConfig,
    national_health_insurance: NationalHealthInsuranceConfig,
}

impl RateTables {
    /// Creates a new RateTables from its component parts.
    ///
    /// Bracket tables are sorted ascending so lookups can scan in order.
    pub fn new(
        metadata: TaxYearMetadata,
        income_tax: IncomeTaxConfig,
        residence_tax: ResidenceTaxConfig,
        social_insurance: SocialInsuranceConfig,
        health_insurance: HealthInsuranceConfig,
        national_health_insurance: NationalHealthInsuranceConfig,
    ) -> Self {
        let mut social_insurance = social_insurance;
        social_insurance.health_smr.sort_by(|a, b| a.min.cmp(&b.min));
        social_insurance.pension_smr.sort_by(|a, b| a.min.cmp(&b.min));
        Self {
            metadata,
            income_tax,
            residence_tax,
            social_insurance,
            health_insurance,
            national_health_insurance,
        }
    }

    /// Returns the tax-year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        &self.metadata
    }

    /// Returns the national income tax tables.
    pub fn income_tax(&self) -> &IncomeTaxConfig {
        &self.income_tax
    }

    /// Returns the residence tax tables.
    pub fn residence_tax(&self) -> &ResidenceTaxConfig {
        &self.residence_tax
    }

    /// Returns the social insurance tables.
    pub fn social_insurance(&self) -> &SocialInsuranceConfig {
        &self.social_insurance
    }

    /// Looks up the employee-share rates for a provider in a region.
    pub fn employee_health_rates(
        &self,
        provider: &str,
        region: &str,
    ) -> EngineResult<&EmployeeHealthRates> {
        let regions = self.health_insurance.providers.get(provider).ok_or_else(|| {
            EngineError::ProviderNotFound {
                provider: provider.to_string(),
            }
        })?;

        regions
            .get(region)
            .ok_or_else(|| EngineError::RegionNotFound {
                table: format!("{} rates", provider),
                region: region.to_string(),
            })
    }

    /// Looks up the National Health Insurance parameters for a region.
    pub fn nhi_parameters(&self, region: &str) -> EngineResult<&NhiRegionParams> {
        self.national_health_insurance
            .regions
            .get(region)
            .ok_or_else(|| EngineError::RegionNotFound {
                table: "national health insurance".to_string(),
                region: region.to_string(),
            })
    }
}

/// Finds the amount of the first tier whose bound covers `value`.
///
/// Returns zero when the schedule is empty or every tier is bounded and
/// exceeded.
pub fn tier_amount(tiers: &[DeductionTier], value: Decimal) -> Decimal {
    tiers
        .iter()
        .find(|tier| tier.up_to.is_none_or(|limit| value <= limit))
        .map(|tier| tier.amount)
        .unwrap_or(Decimal::ZERO)
}

/// Finds the SMR bracket containing a monthly remuneration.
///
/// Remuneration above the last bounded bracket falls into the cap bracket.
pub fn find_smr_bracket(brackets: &[SmrBracket], remuneration: Decimal) -> EngineResult<&SmrBracket> {
    brackets
        .iter()
        .find(|b| remuneration >= b.min && b.max.is_none_or(|max| remuneration < max))
        .or_else(|| brackets.last().filter(|b| remuneration >= b.min))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("No standard monthly remuneration bracket for {}", remuneration),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(grade: u32, min: &str, max: Option<&str>, amount: &str) -> SmrBracket {
        SmrBracket {
            grade,
            min: dec(min),
            max: max.map(dec),
            amount: dec(amount),
        }
    }

    #[test]
    fn test_tier_amount_uses_inclusive_upper_bound() {
        let tiers = vec![
            DeductionTier {
                up_to: Some(dec("24000000")),
                amount: dec("430000"),
            },
            DeductionTier {
                up_to: None,
                amount: dec("0"),
            },
        ];

        assert_eq!(tier_amount(&tiers, dec("24000000")), dec("430000"));
        assert_eq!(tier_amount(&tiers, dec("24000001")), dec("0"));
    }

    #[test]
    fn test_tier_amount_empty_schedule_is_zero() {
        assert_eq!(tier_amount(&[], dec("100")), Decimal::ZERO);
    }

    #[test]
    fn test_find_smr_bracket_min_inclusive_max_exclusive() {
        let brackets = vec![
            bracket(1, "0", Some("63000"), "58000"),
            bracket(2, "63000", Some("73000"), "68000"),
            bracket(3, "73000", None, "78000"),
        ];

        assert_eq!(find_smr_bracket(&brackets, dec("62999")).unwrap().grade, 1);
        assert_eq!(find_smr_bracket(&brackets, dec("63000")).unwrap().grade, 2);
        assert_eq!(find_smr_bracket(&brackets, dec("9999999")).unwrap().grade, 3);
    }

    #[test]
    fn test_find_smr_bracket_empty_table_is_error() {
        let result = find_smr_bracket(&[], dec("300000"));
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }
}
