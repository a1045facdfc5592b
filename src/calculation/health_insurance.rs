//! Health insurance premium calculation.
//!
//! Employees pay a share of a provider's rate on their Standard Monthly
//! Remuneration (SMR) and on each standard bonus amount. Taxpayers on
//! National Health Insurance pay income-based portions set by their region.
//! Dependents of insured employees pay nothing.

use chrono::Month;
use rust_decimal::Decimal;

use super::rounding::{floor_to_unit, floor_yen, round_social_insurance_premium, yen};
use crate::config::{NhiPortion, RateTables, find_smr_bracket};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AllowanceFrequency, AuditStep, BonusPayment, HealthInsurancePremium, IncomeStream,
    NhiBreakdown, SalaryFrequency,
};

/// Standard bonus amounts are floored to this unit.
pub(crate) const STANDARD_BONUS_UNIT: Decimal = yen(1_000);

pub(crate) fn ensure_non_negative(category: &str, amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::NegativeIncome {
            category: category.to_string(),
            amount,
        });
    }
    Ok(())
}

/// Sums salary and commuting allowance as a monthly amount.
///
/// Bonuses, stock compensation and self-employment income are not
/// remuneration for SMR purposes.
///
/// # Errors
///
/// Returns `NegativeIncome` if a salary or allowance amount is negative.
///
/// # Examples
///
/// ```
/// use takehome_engine::calculation::calculate_monthly_remuneration;
/// use takehome_engine::models::{AllowanceFrequency, IncomeStream, SalaryFrequency};
/// use rust_decimal::Decimal;
///
/// let streams = vec![
///     IncomeStream::Salary { amount: Decimal::from(300_000), frequency: SalaryFrequency::Monthly },
///     IncomeStream::CommutingAllowance { amount: Decimal::from(60_000), frequency: AllowanceFrequency::SixMonths },
/// ];
///
/// assert_eq!(calculate_monthly_remuneration(&streams).unwrap(), Decimal::from(310_000));
/// ```
pub fn calculate_monthly_remuneration(streams: &[IncomeStream]) -> EngineResult<Decimal> {
    let mut monthly = Decimal::ZERO;

    for stream in streams {
        match *stream {
            IncomeStream::Salary { amount, frequency } => {
                ensure_non_negative("salary", amount)?;
                monthly += match frequency {
                    SalaryFrequency::Monthly => amount,
                    SalaryFrequency::Annual => amount / Decimal::from(12),
                };
            }
            IncomeStream::CommutingAllowance { amount, frequency } => {
                ensure_non_negative("commuting_allowance", amount)?;
                monthly += match frequency {
                    AllowanceFrequency::Monthly => amount,
                    other => amount / other.months_covered(),
                };
            }
            _ => {}
        }
    }

    Ok(monthly)
}

/// The fiscal year (April to March) a month falls in, relative to the
/// calendar year: January to March belong to the previous fiscal year.
fn fiscal_year_offset(month: Month) -> usize {
    match month {
        Month::January | Month::February | Month::March => 0,
        _ => 1,
    }
}

/// Computes the standard bonus amount of each payment, applying the
/// cumulative fiscal-year cap in payment order.
///
/// Amounts are returned in calendar order.
fn standard_bonus_amounts(bonuses: &[BonusPayment], annual_cap: Decimal) -> Vec<Decimal> {
    let mut ordered: Vec<&BonusPayment> = bonuses.iter().collect();
    ordered.sort_by_key(|b| b.month.number_from_month());

    let mut cumulative = [Decimal::ZERO; 2];
    ordered
        .into_iter()
        .map(|bonus| {
            let fiscal_year = fiscal_year_offset(bonus.month);
            let room = (annual_cap - cumulative[fiscal_year]).max(Decimal::ZERO);
            let standard = floor_to_unit(bonus.amount, STANDARD_BONUS_UNIT).min(room);
            cumulative[fiscal_year] += standard;
            standard
        })
        .collect()
}

/// Computes an employee's annual health insurance premium.
///
/// The monthly premium is the SMR bracket amount times the provider's
/// employee-share rate, plus the long-term care rate when `ltc` is set,
/// rounded to the yen and paid twelve times. Each bonus is floored to
/// ¥1,000, capped cumulatively per fiscal year, and charged at the same
/// rate.
///
/// # Errors
///
/// - `NegativeIncome` if the remuneration or a bonus is negative
/// - `ProviderNotFound` / `RegionNotFound` if the rates are not configured
/// - `CalculationError` if the SMR table is malformed
pub fn calculate_employee_health_insurance(
    tables: &RateTables,
    monthly_remuneration: Decimal,
    bonuses: &[BonusPayment],
    ltc: bool,
    provider: &str,
    region: &str,
) -> EngineResult<HealthInsurancePremium> {
    ensure_non_negative("monthly_remuneration", monthly_remuneration)?;
    for bonus in bonuses {
        ensure_non_negative("bonus", bonus.amount)?;
    }

    let rates = tables.employee_health_rates(provider, region)?;
    let rate = if ltc {
        rates.health + rates.long_term_care
    } else {
        rates.health
    };

    let social = tables.social_insurance();
    let smr = find_smr_bracket(&social.health_smr, monthly_remuneration)?;
    let monthly_premium = round_social_insurance_premium(smr.amount * rate);

    let bonus_portion: Decimal = standard_bonus_amounts(bonuses, social.health_bonus_annual_cap)
        .into_iter()
        .map(|standard| round_social_insurance_premium(standard * rate))
        .sum();

    Ok(HealthInsurancePremium {
        total: monthly_premium * Decimal::from(12) + bonus_portion,
        bonus_portion,
        national_health_insurance: None,
    })
}

/// Computes the annual health insurance premium of a salaried employee
/// with no bonuses or allowances.
///
/// # Examples
///
/// ```no_run
/// use takehome_engine::calculation::calculate_health_insurance_premium;
/// use takehome_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let tables = ConfigLoader::load("./config/2025").unwrap().into_tables();
/// let premium = calculate_health_insurance_premium(
///     &tables, Decimal::from(5_000_000), false, "KyokaiKenpo", "Tokyo",
/// ).unwrap();
/// assert_eq!(premium, Decimal::from(243_792));
/// ```
pub fn calculate_health_insurance_premium(
    tables: &RateTables,
    annual_salary: Decimal,
    ltc: bool,
    provider: &str,
    region: &str,
) -> EngineResult<Decimal> {
    ensure_non_negative("salary", annual_salary)?;
    let monthly = annual_salary / Decimal::from(12);
    calculate_employee_health_insurance(tables, monthly, &[], ltc, provider, region)
        .map(|premium| premium.total)
}

fn nhi_portion(portion: &NhiPortion, income_base: Decimal) -> Decimal {
    let assessed =
        floor_yen(income_base * portion.income_rate) + portion.per_capita + portion.household_flat;
    assessed.min(portion.cap)
}

/// Computes the annual National Health Insurance premium.
///
/// The income base is net income less the region's standard deduction.
/// Premiums are assessed on the prior year's income; the current year's net
/// income is used in its place.
///
/// # Errors
///
/// - `NegativeIncome` if `net_income` is negative
/// - `RegionNotFound` if the region has no NHI parameters
pub fn calculate_national_health_insurance(
    tables: &RateTables,
    net_income: Decimal,
    ltc: bool,
    region: &str,
) -> EngineResult<HealthInsurancePremium> {
    ensure_non_negative("net_income", net_income)?;

    let params = tables.nhi_parameters(region)?;
    let income_base = (net_income - params.standard_deduction).max(Decimal::ZERO);

    let breakdown = NhiBreakdown {
        income_base,
        medical: nhi_portion(&params.medical, income_base),
        elderly_support: nhi_portion(&params.elderly_support, income_base),
        long_term_care: if ltc {
            nhi_portion(&params.long_term_care, income_base)
        } else {
            Decimal::ZERO
        },
    };

    Ok(HealthInsurancePremium {
        total: breakdown.medical + breakdown.elderly_support + breakdown.long_term_care,
        bonus_portion: Decimal::ZERO,
        national_health_insurance: Some(breakdown),
    })
}

/// Returns true if annual income is low enough to be covered as a
/// dependent of an insured employee.
pub fn is_dependent_coverage_eligible(tables: &RateTables, annual_income: Decimal) -> bool {
    annual_income < tables.social_insurance().dependent_coverage_income_limit
}

impl HealthInsurancePremium {
    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32, provider: &str, region: &str) -> AuditStep {
        let reasoning = match &self.national_health_insurance {
            Some(nhi) => format!(
                "NHI in {}: medical ¥{} + elderly support ¥{} + long-term care ¥{} = ¥{}",
                region, nhi.medical, nhi.elderly_support, nhi.long_term_care, self.total
            ),
            None => format!(
                "{} in {}: ¥{} annual premium including ¥{} on bonuses",
                provider, region, self.total, self.bonus_portion
            ),
        };

        AuditStep {
            step_number,
            rule_id: "health_insurance".to_string(),
            rule_name: "Health Insurance Premium".to_string(),
            statute_ref: "Health Insurance Act Art. 156; National Health Insurance Act Art. 76"
                .to_string(),
            input: serde_json::json!({
                "provider": provider,
                "region": region
            }),
            output: serde_json::json!({
                "total": self.total.to_string(),
                "bonus_portion": self.bonus_portion.to_string(),
                "national_health_insurance": self.national_health_insurance
            }),
            reasoning,
        }
    }
}
