//! Take-home pay orchestration.
//!
//! This module sequences the calculators: income aggregation, net income,
//! dependent deductions, social insurance, national income tax, residence
//! tax and the Furusato Nozei limit, and assembles the results with their
//! audit trace.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::dependent_deductions::calculate_dependent_deductions;
use super::employment_insurance::calculate_employment_insurance;
use super::furusato_nozei::calculate_furusato_nozei;
use super::health_insurance::{
    calculate_employee_health_insurance, calculate_monthly_remuneration,
    calculate_national_health_insurance, ensure_non_negative, is_dependent_coverage_eligible,
};
use super::income_aggregation::{IncomeSummary, aggregate_income};
use super::income_tax::calculate_national_income_tax;
use super::net_income::calculate_net_income;
use super::pension::{calculate_employee_pension, calculate_national_pension};
use super::residence_tax::ResidenceTaxInputs;
use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CoverageKind, EmploymentInsurancePremium,
    HealthInsurancePremium, PensionContribution, PensionPlan, TakeHomeInputs, TakeHomeResults,
};

/// Warning code for a dependent whose income exceeds the coverage limit.
pub const DEPENDENT_COVERAGE_WARNING_CODE: &str = "DEPENDENT_COVERAGE_INCOME_LIMIT";

/// Social insurance premiums for the year.
struct SocialInsurance {
    health: HealthInsurancePremium,
    pension: PensionContribution,
    employment: EmploymentInsurancePremium,
}

impl SocialInsurance {
    fn total(&self) -> Decimal {
        self.health.total + self.pension.total + self.employment.total
    }
}

fn pension_plan(coverage: CoverageKind<'_>) -> PensionPlan {
    match coverage {
        CoverageKind::Employee(_) => PensionPlan::EmployeesPension,
        CoverageKind::NationalHealthInsurance => PensionPlan::NationalPension,
        CoverageKind::Dependent => PensionPlan::DependentSpouse,
    }
}

fn calculate_social_insurance(
    tables: &RateTables,
    inputs: &TakeHomeInputs,
    summary: &IncomeSummary,
    net_income: Decimal,
) -> EngineResult<SocialInsurance> {
    let ltc = inputs.is_subject_to_long_term_care_premium;
    let region = inputs.region.as_str();

    let (health, pension) = match inputs.coverage() {
        CoverageKind::Employee(provider) => {
            let remuneration = calculate_monthly_remuneration(&inputs.income_streams)?;
            debug!(
                provider = %provider,
                monthly_remuneration = %remuneration,
                "Employee health insurance and pension"
            );
            (
                calculate_employee_health_insurance(
                    tables,
                    remuneration,
                    &summary.bonuses,
                    ltc,
                    provider,
                    region,
                )?,
                calculate_employee_pension(tables, remuneration, &summary.bonuses)?,
            )
        }
        CoverageKind::NationalHealthInsurance => (
            calculate_national_health_insurance(tables, net_income, ltc, region)?,
            calculate_national_pension(tables),
        ),
        CoverageKind::Dependent => (
            HealthInsurancePremium::ZERO,
            PensionContribution::zero(PensionPlan::DependentSpouse),
        ),
    };

    let employment = if summary.has_employment_income() {
        calculate_employment_insurance(
            tables,
            summary.salary_income / Decimal::from(12),
            &summary.bonuses,
        )?
    } else {
        EmploymentInsurancePremium::ZERO
    };

    Ok(SocialInsurance {
        health,
        pension,
        employment,
    })
}

fn manual_social_insurance_step(step_number: u32, total: Decimal) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "manual_social_insurance".to_string(),
        rule_name: "Manual Social Insurance Entry".to_string(),
        statute_ref: "Income Tax Act Art. 74".to_string(),
        input: serde_json::json!({
            "manual_social_insurance_entry": total.to_string()
        }),
        output: serde_json::json!({
            "social_insurance_total": total.to_string()
        }),
        reasoning: format!(
            "Premium calculation skipped; ¥{} entered as the social insurance deduction",
            total
        ),
    }
}

fn take_home_step(step_number: u32, results: &TakeHomeResults) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "take_home".to_string(),
        rule_name: "Take-Home Income".to_string(),
        statute_ref: String::new(),
        input: serde_json::json!({
            "annual_income": results.annual_income.to_string(),
            "national_income_tax": results.national_income_tax.total.to_string(),
            "residence_tax": results.residence_tax.total_residence_tax.to_string(),
            "social_insurance_total": results.social_insurance_total.to_string(),
            "dc_plan_contributions": results.dc_plan_contributions.to_string()
        }),
        output: serde_json::json!({
            "take_home_income": results.take_home_income.to_string()
        }),
        reasoning: format!(
            "¥{} − ¥{} income tax − ¥{} residence tax − ¥{} social insurance − ¥{} DC = ¥{}",
            results.annual_income,
            results.national_income_tax.total,
            results.residence_tax.total_residence_tax,
            results.social_insurance_total,
            results.dc_plan_contributions,
            results.take_home_income
        ),
    }
}

/// Calculates a taxpayer's annual taxes, social insurance and take-home
/// pay.
///
/// This is the main entry point of the engine. It is pure: the same inputs
/// and tables always produce the same results, audit trace included.
///
/// # Errors
///
/// - `NegativeIncome` for a negative income amount, DC contribution or
///   manual social insurance entry
/// - `MultipleBusinessIncome` for more than one business stream
/// - `UnsupportedConfiguration` for domestic-issued stock compensation
/// - `ProviderNotFound` / `RegionNotFound` for unknown rate-table keys
///
/// # Examples
///
/// ```no_run
/// use takehome_engine::calculation::calculate_taxes;
/// use takehome_engine::config::ConfigLoader;
/// use takehome_engine::models::TakeHomeInputs;
/// use rust_decimal::Decimal;
///
/// let tables = ConfigLoader::load("./config/2025").unwrap().into_tables();
/// let inputs = TakeHomeInputs::salaried(Decimal::from(5_000_000), "KyokaiKenpo", "Tokyo");
///
/// let results = calculate_taxes(&tables, &inputs).unwrap();
/// assert_eq!(results.national_income_tax.total, Decimal::from(120_700));
/// assert_eq!(results.furusato_nozei.limit, Decimal::from(61_000));
/// ```
pub fn calculate_taxes(
    tables: &RateTables,
    inputs: &TakeHomeInputs,
) -> EngineResult<TakeHomeResults> {
    ensure_non_negative("dc_plan_contributions", inputs.dc_plan_contributions)?;
    if let Some(manual) = inputs.manual_social_insurance_entry {
        ensure_non_negative("manual_social_insurance_entry", manual)?;
    }

    let mut trace = AuditTrace::default();

    // Income
    let summary = aggregate_income(&inputs.income_streams)?;
    trace.record(|n| summary.audit_step(n, inputs.income_streams.len()));
    debug!(
        total_annual_income = %summary.total_annual_income,
        streams = inputs.income_streams.len(),
        "Income aggregated"
    );

    let net = calculate_net_income(&summary);
    trace.record(|n| net.audit_step(n));
    debug!(net_income = %net.net_income, "Net income calculated");

    let dependent_deductions = calculate_dependent_deductions(&inputs.dependents, net.net_income);
    trace.record(|n| dependent_deductions.audit_step(n, net.net_income));
    debug!(
        national = %dependent_deductions.national_tax,
        residence = %dependent_deductions.residence_tax,
        ceiling_dependents = dependent_deductions.ceiling_dependents,
        "Dependent deductions calculated"
    );

    // Social insurance
    let coverage = inputs.coverage();
    if coverage == CoverageKind::Dependent
        && !is_dependent_coverage_eligible(tables, summary.total_annual_income)
    {
        let limit = tables.social_insurance().dependent_coverage_income_limit;
        warn!(
            annual_income = %summary.total_annual_income,
            limit = %limit,
            "Dependent coverage selected above the income limit"
        );
        trace.warnings.push(AuditWarning {
            code: DEPENDENT_COVERAGE_WARNING_CODE.to_string(),
            message: format!(
                "Annual income ¥{} is at or above the ¥{} dependent coverage limit",
                summary.total_annual_income, limit
            ),
            severity: "medium".to_string(),
        });
    }

    let (social, social_insurance_total, manual_social_insurance) =
        match inputs.manual_social_insurance_entry {
            Some(total) => {
                trace.record(|n| manual_social_insurance_step(n, total));
                debug!(social_insurance_total = %total, "Manual social insurance entry");
                let social = SocialInsurance {
                    health: HealthInsurancePremium::ZERO,
                    pension: PensionContribution::zero(pension_plan(coverage)),
                    employment: EmploymentInsurancePremium::ZERO,
                };
                (social, total, true)
            }
            None => {
                let social = calculate_social_insurance(tables, inputs, &summary, net.net_income)?;
                trace.record(|n| {
                    social
                        .health
                        .audit_step(n, &inputs.health_insurance_provider, &inputs.region)
                });
                trace.record(|n| social.pension.audit_step(n));
                trace.record(|n| social.employment.audit_step(n));
                let total = social.total();
                debug!(
                    health = %social.health.total,
                    pension = %social.pension.total,
                    employment = %social.employment.total,
                    "Social insurance calculated"
                );
                (social, total, false)
            }
        };

    let income_deductions = social_insurance_total + inputs.dc_plan_contributions;

    // Taxes
    let national_income_tax = calculate_national_income_tax(
        tables,
        net.net_income,
        income_deductions,
        dependent_deductions.national_tax,
    );
    trace.record(|n| national_income_tax.audit_step(n));
    debug!(
        taxable_income = %national_income_tax.taxable_income,
        total = %national_income_tax.total,
        "National income tax calculated"
    );

    let residence_inputs = ResidenceTaxInputs {
        net_income: net.net_income,
        income_deductions,
        dependent_deductions: &dependent_deductions,
    };
    let residence_tax = residence_inputs.calculate(tables, Decimal::ZERO);
    trace.record(|n| residence_tax.audit_step(n, net.net_income));
    debug!(
        taxable_income = %residence_tax.taxable_income,
        total = %residence_tax.total_residence_tax,
        "Residence tax calculated"
    );

    let furusato_nozei =
        calculate_furusato_nozei(tables, &national_income_tax, &residence_tax, &residence_inputs);
    trace.record(|n| furusato_nozei.audit_step(n));

    let take_home_income = summary.total_annual_income
        - national_income_tax.total
        - residence_tax.total_residence_tax
        - social_insurance_total
        - inputs.dc_plan_contributions;

    let mut results = TakeHomeResults {
        annual_income: summary.total_annual_income,
        net_income: net.net_income,
        national_income_tax,
        residence_tax,
        health_insurance: social.health,
        pension: social.pension,
        employment_insurance: social.employment,
        social_insurance_total,
        manual_social_insurance,
        dc_plan_contributions: inputs.dc_plan_contributions,
        take_home_income,
        furusato_nozei,
        dependent_deductions,
        health_insurance_provider: inputs.health_insurance_provider.clone(),
        region: inputs.region.clone(),
        is_subject_to_long_term_care_premium: inputs.is_subject_to_long_term_care_premium,
        audit_trace: AuditTrace::default(),
    };
    trace.record(|n| take_home_step(n, &results));
    results.audit_trace = trace;

    info!(
        annual_income = %results.annual_income,
        income_tax = %results.national_income_tax.total,
        residence_tax = %results.residence_tax.total_residence_tax,
        social_insurance = %results.social_insurance_total,
        take_home = %results.take_home_income,
        furusato_limit = %results.furusato_nozei.limit,
        "Take-home calculation completed"
    );

    Ok(results)
}
