//! Calculation logic for the take-home pay engine.
//!
//! This module contains the calculators for income aggregation, the
//! employment income deduction, spouse and dependent deductions, health
//! insurance, pension, employment insurance, national income tax, residence
//! tax and the Furusato Nozei donation limit, plus the [`calculate_taxes`]
//! orchestrator that runs them in order.

mod dependent_deductions;
mod employment_insurance;
mod furusato_nozei;
mod health_insurance;
mod income_aggregation;
mod income_tax;
mod net_income;
mod pension;
mod residence_tax;
mod rounding;
mod take_home;

pub use dependent_deductions::calculate_dependent_deductions;
pub use employment_insurance::calculate_employment_insurance;
pub use furusato_nozei::{SELF_PAY, calculate_furusato_nozei};
pub use health_insurance::{
    calculate_employee_health_insurance, calculate_health_insurance_premium,
    calculate_monthly_remuneration, calculate_national_health_insurance,
    is_dependent_coverage_eligible,
};
pub use income_aggregation::{IncomeSummary, aggregate_income, validate_income_streams};
pub use income_tax::{
    calculate_national_income_tax, income_tax_on_taxable_income, marginal_income_tax_rate,
    national_basic_deduction,
};
pub use net_income::{NetIncomeBreakdown, calculate_net_employment_income, calculate_net_income};
pub use pension::{calculate_employee_pension, calculate_national_pension};
pub use residence_tax::{
    ResidenceTaxInputs, calculate_residence_tax, calculate_residence_tax_with_credits,
    residence_basic_deduction,
};
pub use rounding::{floor_to_unit, floor_yen, round_social_insurance_premium};
pub use take_home::{DEPENDENT_COVERAGE_WARNING_CODE, calculate_taxes};
