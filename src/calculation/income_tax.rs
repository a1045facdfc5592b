//! National income tax calculation.
//!
//! Taxable income is net income less income deductions, the basic
//! deduction and dependent deductions, floored to ¥1,000. The progressive
//! bracket table gives the base tax; the special reconstruction income tax
//! is added on top and the total floored to ¥100.

use rust_decimal::Decimal;

use super::rounding::{floor_to_unit, floor_yen, yen};
use crate::config::{RateTables, TaxBracket, tier_amount};
use crate::models::{AuditStep, IncomeTaxDetails};

const TAXABLE_INCOME_UNIT: Decimal = yen(1_000);
const TAX_UNIT: Decimal = yen(100);

/// Returns the national basic deduction for a net income.
pub fn national_basic_deduction(tables: &RateTables, net_income: Decimal) -> Decimal {
    tier_amount(&tables.income_tax().basic_deduction, net_income)
}

fn bracket_for(tables: &RateTables, taxable_income: Decimal) -> Option<&TaxBracket> {
    tables
        .income_tax()
        .brackets
        .iter()
        .find(|b| b.up_to.is_none_or(|limit| taxable_income <= limit))
}

/// Returns the marginal income tax rate at an income level.
///
/// Amounts at or below zero have a marginal rate of zero.
pub fn marginal_income_tax_rate(tables: &RateTables, taxable_income: Decimal) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    bracket_for(tables, taxable_income)
        .map(|b| b.rate)
        .unwrap_or(Decimal::ZERO)
}

/// Base tax and reconstruction surtax, before rounding the total.
fn tax_components(tables: &RateTables, taxable_income: Decimal) -> (Decimal, Decimal) {
    if taxable_income <= Decimal::ZERO {
        return (Decimal::ZERO, Decimal::ZERO);
    }

    let base_tax = bracket_for(tables, taxable_income)
        .map(|b| floor_yen(taxable_income * b.rate - b.deduction).max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO);
    let surtax = floor_yen(base_tax * tables.income_tax().reconstruction_surtax_rate);

    (base_tax, surtax)
}

/// Computes income tax, surtax included, on an already-floored taxable
/// income.
///
/// # Examples
///
/// ```no_run
/// use takehome_engine::calculation::income_tax_on_taxable_income;
/// use takehome_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let tables = ConfigLoader::load("./config/2025").unwrap().into_tables();
/// // 2,158,000 × 10% − 97,500 = 118,300; surtax 2,484; floored to 120,700
/// let tax = income_tax_on_taxable_income(&tables, Decimal::from(2_158_000));
/// assert_eq!(tax, Decimal::from(120_700));
/// ```
pub fn income_tax_on_taxable_income(tables: &RateTables, taxable_income: Decimal) -> Decimal {
    let (base_tax, surtax) = tax_components(tables, taxable_income);
    floor_to_unit(base_tax + surtax, TAX_UNIT)
}

/// Computes national income tax.
///
/// `income_deductions` covers social insurance, DC-plan contributions and
/// any donation deduction; `dependent_deduction` is the national total from
/// the dependent deduction engine.
pub fn calculate_national_income_tax(
    tables: &RateTables,
    net_income: Decimal,
    income_deductions: Decimal,
    dependent_deduction: Decimal,
) -> IncomeTaxDetails {
    let basic_deduction = national_basic_deduction(tables, net_income);
    let taxable_income = floor_to_unit(
        (net_income - income_deductions - basic_deduction - dependent_deduction)
            .max(Decimal::ZERO),
        TAXABLE_INCOME_UNIT,
    );
    let (base_tax, reconstruction_surtax) = tax_components(tables, taxable_income);

    IncomeTaxDetails {
        net_income,
        basic_deduction,
        income_deductions,
        dependent_deduction,
        taxable_income,
        base_tax,
        reconstruction_surtax,
        total: floor_to_unit(base_tax + reconstruction_surtax, TAX_UNIT),
    }
}

impl IncomeTaxDetails {
    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "national_income_tax".to_string(),
            rule_name: "National Income Tax".to_string(),
            statute_ref: "Income Tax Act Art. 89; Reconstruction Funding Act Art. 13".to_string(),
            input: serde_json::json!({
                "net_income": self.net_income.to_string(),
                "basic_deduction": self.basic_deduction.to_string(),
                "income_deductions": self.income_deductions.to_string(),
                "dependent_deduction": self.dependent_deduction.to_string()
            }),
            output: serde_json::json!({
                "taxable_income": self.taxable_income.to_string(),
                "base_tax": self.base_tax.to_string(),
                "reconstruction_surtax": self.reconstruction_surtax.to_string(),
                "total": self.total.to_string()
            }),
            reasoning: format!(
                "Taxable ¥{}: base tax ¥{} + surtax ¥{} = ¥{}",
                self.taxable_income, self.base_tax, self.reconstruction_surtax, self.total
            ),
        }
    }
}
