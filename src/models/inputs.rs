//! Calculation input model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Dependent, IncomeStream, SalaryFrequency};

/// Provider id for National Health Insurance.
pub const NATIONAL_HEALTH_INSURANCE: &str = "NationalHealthInsurance";

/// Provider id for coverage as a dependent of an insured employee.
pub const DEPENDENT_COVERAGE: &str = "DependentCoverage";

/// How the taxpayer is covered for health insurance and pension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageKind<'a> {
    /// Employee plan of the named provider; employees' pension.
    Employee(&'a str),
    /// National Health Insurance; national pension.
    NationalHealthInsurance,
    /// Covered as a dependent of an insured employee; no premiums.
    Dependent,
}

impl<'a> CoverageKind<'a> {
    /// Classifies a provider id.
    pub fn from_provider(provider: &'a str) -> Self {
        match provider {
            NATIONAL_HEALTH_INSURANCE => CoverageKind::NationalHealthInsurance,
            DEPENDENT_COVERAGE => CoverageKind::Dependent,
            other => CoverageKind::Employee(other),
        }
    }
}

/// Everything needed to compute one taxpayer's take-home pay for one year.
///
/// # Example
///
/// ```
/// use takehome_engine::models::TakeHomeInputs;
/// use rust_decimal::Decimal;
///
/// let inputs = TakeHomeInputs::salaried(Decimal::from(5_000_000), "KyokaiKenpo", "Tokyo");
/// assert_eq!(inputs.income_streams.len(), 1);
/// assert!(inputs.dependents.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeHomeInputs {
    /// All income streams for the year.
    pub income_streams: Vec<IncomeStream>,
    /// Whether the taxpayer is aged 40 to 64 and owes long-term care premiums.
    #[serde(default)]
    pub is_subject_to_long_term_care_premium: bool,
    /// Region used for health-insurance rate lookups.
    pub region: String,
    /// Health-insurance provider id.
    pub health_insurance_provider: String,
    /// Dependents supported by the taxpayer.
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    /// Annual defined-contribution (iDeCo) plan contributions.
    #[serde(default)]
    pub dc_plan_contributions: Decimal,
    /// Manually entered social insurance total, bypassing premium calculation.
    #[serde(default)]
    pub manual_social_insurance_entry: Option<Decimal>,
}

impl TakeHomeInputs {
    /// Creates inputs for a taxpayer with a single annual salary.
    pub fn salaried(annual_salary: Decimal, provider: &str, region: &str) -> Self {
        Self::new(
            vec![IncomeStream::Salary {
                amount: annual_salary,
                frequency: SalaryFrequency::Annual,
            }],
            provider,
            region,
        )
    }

    /// Creates inputs from income streams with no dependents or overrides.
    pub fn new(income_streams: Vec<IncomeStream>, provider: &str, region: &str) -> Self {
        Self {
            income_streams,
            is_subject_to_long_term_care_premium: false,
            region: region.to_string(),
            health_insurance_provider: provider.to_string(),
            dependents: Vec::new(),
            dc_plan_contributions: Decimal::ZERO,
            manual_social_insurance_entry: None,
        }
    }

    /// Returns how the taxpayer is covered for health insurance.
    pub fn coverage(&self) -> CoverageKind<'_> {
        CoverageKind::from_provider(&self.health_insurance_provider)
    }
}
