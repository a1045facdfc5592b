//! Core data models for the take-home pay engine.
//!
//! This module contains the input, output and audit models used
//! throughout the engine.

mod audit;
mod dependent;
mod income;
mod inputs;
mod results;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use dependent::{
    DEPENDENT_INCOME_LIMIT, Dependent, DependentAge, Disability, Relationship,
    SPOUSE_SPECIAL_INCOME_LIMIT, SpouseAge,
};
pub use income::{AllowanceFrequency, BonusPayment, IncomeStream, IssuerDomicile, SalaryFrequency};
pub use inputs::{CoverageKind, DEPENDENT_COVERAGE, NATIONAL_HEALTH_INSURANCE, TakeHomeInputs};
pub use results::{
    DependentDeductionCategory, DependentDeductionLine, DependentDeductions,
    DisabilityDeductionCategory, EmploymentInsurancePremium, FurusatoNozeiDetails,
    HealthInsurancePremium, IncomeTaxDetails, NON_TAXABLE_RESIDENCE_TAX_DETAIL, NhiBreakdown,
    PensionContribution, PensionPlan, ResidenceTaxDetails, ResidenceTaxShare, TakeHomeResults,
};
