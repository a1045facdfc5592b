//! Residence tax calculation.
//!
//! Residence tax has an income portion, split between the municipality and
//! the prefecture, and flat per-capita portions. Low-income households are
//! exempt from the whole tax or from the income portion, with the ceilings
//! raised by each dependent the taxpayer supports.

use rust_decimal::Decimal;

use super::rounding::{floor_to_unit, floor_yen, yen};
use crate::config::{RateTables, ResidenceTaxConfig, tier_amount};
use crate::models::{
    AuditStep, DependentDeductions, NON_TAXABLE_RESIDENCE_TAX_DETAIL, ResidenceTaxDetails,
    ResidenceTaxShare,
};

const TAXABLE_INCOME_UNIT: Decimal = yen(1_000);
const TAX_UNIT: Decimal = yen(100);

/// The figures a residence tax calculation is run on.
///
/// Kept together so the calculation can be repeated with donation credits.
#[derive(Debug, Clone, Copy)]
pub struct ResidenceTaxInputs<'a> {
    /// Total net income.
    pub net_income: Decimal,
    /// Social insurance and DC-plan deductions.
    pub income_deductions: Decimal,
    /// Dependent deductions of the taxpayer.
    pub dependent_deductions: &'a DependentDeductions,
}

/// Returns the residence-tax basic deduction for a net income.
pub fn residence_basic_deduction(tables: &RateTables, net_income: Decimal) -> Decimal {
    tier_amount(&tables.residence_tax().basic_deduction, net_income)
}

/// How much of the tax a household owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liability {
    None,
    PerCapitaOnly,
    Full,
}

fn liability(config: &ResidenceTaxConfig, net_income: Decimal, dependents: u32) -> Liability {
    let limits = &config.non_taxable;

    if net_income <= limits.single_ceiling {
        return Liability::None;
    }

    let members = Decimal::from(dependents + 1);
    if dependents > 0
        && net_income
            <= limits.per_member * members + limits.base_addition + limits.dependent_addition
    {
        return Liability::None;
    }

    let base_addition = if dependents > 0 {
        limits.base_addition
    } else {
        Decimal::ZERO
    };
    if net_income <= limits.per_member * members + base_addition + limits.dependent_addition {
        return Liability::PerCapitaOnly;
    }

    Liability::Full
}

fn adjustment_credit(
    config: &ResidenceTaxConfig,
    net_income: Decimal,
    taxable_income: Decimal,
    personal_deduction_difference: Decimal,
) -> Decimal {
    let params = &config.adjustment_credit;

    if net_income > params.net_income_limit {
        return Decimal::ZERO;
    }

    let credit = if taxable_income <= params.taxable_income_threshold {
        personal_deduction_difference.min(taxable_income) * params.rate
    } else {
        let reduced = personal_deduction_difference
            - (taxable_income - params.taxable_income_threshold);
        (reduced * params.rate).max(params.basic_difference * params.rate)
    };

    floor_yen(credit)
}

fn share(
    config: &ResidenceTaxConfig,
    taxable_income: Decimal,
    share: Decimal,
    adjustment_credit: Decimal,
    tax_credits: Decimal,
    per_capita_tax: Decimal,
) -> ResidenceTaxShare {
    let income_portion = taxable_income * share * config.income_tax_rate;
    let adjustment_credit = adjustment_credit * share;
    let tax_credit = tax_credits * share;

    ResidenceTaxShare {
        income_portion,
        adjustment_credit,
        tax_credit,
        income_tax: floor_to_unit(
            (income_portion - adjustment_credit - tax_credit).max(Decimal::ZERO),
            TAX_UNIT,
        ),
        per_capita_tax,
    }
}

/// Computes residence tax with no tax credits.
///
/// # Examples
///
/// ```no_run
/// use takehome_engine::calculation::calculate_residence_tax;
/// use takehome_engine::config::ConfigLoader;
/// use takehome_engine::models::DependentDeductions;
/// use rust_decimal::Decimal;
///
/// let tables = ConfigLoader::load("./config/2025").unwrap().into_tables();
/// let details = calculate_residence_tax(
///     &tables,
///     Decimal::from(5_000_000),
///     Decimal::from(1_000_000),
///     &DependentDeductions::empty(),
/// );
/// assert_eq!(details.total_residence_tax, Decimal::from(359_500));
/// ```
pub fn calculate_residence_tax(
    tables: &RateTables,
    net_income: Decimal,
    income_deductions: Decimal,
    dependent_deductions: &DependentDeductions,
) -> ResidenceTaxDetails {
    calculate_residence_tax_with_credits(
        tables,
        net_income,
        income_deductions,
        dependent_deductions,
        Decimal::ZERO,
    )
}

/// Computes residence tax, subtracting `tax_credits` from the income
/// portion after the adjustment credit.
///
/// Credits are split between the municipality and the prefecture in the
/// same proportion as the income portion and never push either share
/// below zero. The per-capita taxes are unaffected.
pub fn calculate_residence_tax_with_credits(
    tables: &RateTables,
    net_income: Decimal,
    income_deductions: Decimal,
    dependent_deductions: &DependentDeductions,
    tax_credits: Decimal,
) -> ResidenceTaxDetails {
    let config = tables.residence_tax();

    let liability = liability(config, net_income, dependent_deductions.ceiling_dependents);
    if liability == Liability::None {
        return NON_TAXABLE_RESIDENCE_TAX_DETAIL;
    }

    let basic_deduction = residence_basic_deduction(tables, net_income);
    let personal_deduction_difference = config.adjustment_credit.basic_difference
        + dependent_deductions.personal_deduction_difference;

    let taxable_income = if liability == Liability::Full {
        floor_to_unit(
            (net_income - income_deductions - basic_deduction - dependent_deductions.residence_tax)
                .max(Decimal::ZERO),
            TAXABLE_INCOME_UNIT,
        )
    } else {
        Decimal::ZERO
    };

    let adjustment_credit =
        adjustment_credit(config, net_income, taxable_income, personal_deduction_difference);

    let city = share(
        config,
        taxable_income,
        config.municipal_share,
        adjustment_credit,
        tax_credits,
        config.municipal_per_capita,
    );
    let prefecture = share(
        config,
        taxable_income,
        config.prefectural_share,
        adjustment_credit,
        tax_credits,
        config.prefectural_per_capita,
    );

    ResidenceTaxDetails {
        taxable_income,
        basic_deduction,
        personal_deduction_difference,
        adjustment_credit,
        city,
        prefecture,
        forest_environment_tax: config.forest_environment_tax,
        total_residence_tax: city.total() + prefecture.total() + config.forest_environment_tax,
    }
}

impl ResidenceTaxInputs<'_> {
    /// Computes residence tax for these inputs with the given tax credits.
    pub fn calculate(&self, tables: &RateTables, tax_credits: Decimal) -> ResidenceTaxDetails {
        calculate_residence_tax_with_credits(
            tables,
            self.net_income,
            self.income_deductions,
            self.dependent_deductions,
            tax_credits,
        )
    }
}

impl ResidenceTaxDetails {
    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32, net_income: Decimal) -> AuditStep {
        let reasoning = if self.is_non_taxable() {
            format!("Net income ¥{} within the non-taxable ceiling", net_income)
        } else {
            format!(
                "Taxable ¥{}: city ¥{} + prefecture ¥{} + forest environment ¥{} = ¥{}",
                self.taxable_income,
                self.city.total(),
                self.prefecture.total(),
                self.forest_environment_tax,
                self.total_residence_tax
            )
        };

        AuditStep {
            step_number,
            rule_id: "residence_tax".to_string(),
            rule_name: "Residence Tax".to_string(),
            statute_ref: "Local Tax Act Art. 295, 314-3, 314-6".to_string(),
            input: serde_json::json!({
                "net_income": net_income.to_string(),
                "basic_deduction": self.basic_deduction.to_string(),
                "personal_deduction_difference": self.personal_deduction_difference.to_string()
            }),
            output: serde_json::json!({
                "taxable_income": self.taxable_income.to_string(),
                "adjustment_credit": self.adjustment_credit.to_string(),
                "city": self.city.total().to_string(),
                "prefecture": self.prefecture.total().to_string(),
                "forest_environment_tax": self.forest_environment_tax.to_string(),
                "total": self.total_residence_tax.to_string(),
                "non_taxable": self.is_non_taxable()
            }),
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::calculate_dependent_deductions;
    use crate::config::test_tables;
    use crate::models::{Dependent, DependentAge, Disability, Relationship};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn children(count: usize) -> DependentDeductions {
        let child = Dependent {
            relationship: Relationship::Child {
                age: DependentAge::Under16,
            },
            net_income: Decimal::ZERO,
            disability: Disability::None,
            is_cohabiting: true,
        };
        calculate_dependent_deductions(&vec![child; count], dec("1000000"))
    }

    fn residence(net: &str, deductions: &str) -> ResidenceTaxDetails {
        let tables = test_tables();
        calculate_residence_tax(&tables, dec(net), dec(deductions), &DependentDeductions::empty())
    }

    #[test]
    fn test_single_ceiling_non_taxable() {
        let details = residence("450000", "0");
        assert!(details.is_non_taxable());
        assert_eq!(details.total_residence_tax, Decimal::ZERO);
    }

    #[test]
    fn test_just_above_single_ceiling_pays_per_capita_only() {
        let details = residence("450001", "0");
        assert_eq!(details.taxable_income, Decimal::ZERO);
        assert_eq!(details.city.income_tax, Decimal::ZERO);
        assert_eq!(details.total_residence_tax, dec("5000"));
    }

    #[test]
    fn test_income_portion_exemption_ends_above_560000() {
        let details = residence("560000", "0");
        assert_eq!(details.total_residence_tax, dec("5000"));

        // 560,001 − 430,000 = 130,001 → 130,000 taxable
        let details = residence("560001", "0");
        assert_eq!(details.taxable_income, dec("130000"));
        // credit 2,500 wipes out part of 13,000: city 7,800 − 1,500, prefecture 5,200 − 1,000
        assert_eq!(details.city.income_tax, dec("6300"));
        assert_eq!(details.prefecture.income_tax, dec("4200"));
        assert_eq!(details.total_residence_tax, dec("15500"));
    }

    #[test]
    fn test_golden_5m_net_1m_deductions() {
        let details = residence("5000000", "1000000");

        assert_eq!(details.taxable_income, dec("3570000"));
        assert_eq!(details.basic_deduction, dec("430000"));
        assert_eq!(details.adjustment_credit, dec("2500"));
        assert_eq!(details.city.income_tax, dec("212700"));
        assert_eq!(details.prefecture.income_tax, dec("141800"));
        assert_eq!(details.forest_environment_tax, dec("1000"));
        assert_eq!(details.total_residence_tax, dec("359500"));
    }

    #[test]
    fn test_non_taxable_ceiling_with_one_dependent() {
        let tables = test_tables();
        let deductions = children(1);
        // 350,000 × 2 + 100,000 + 210,000
        let at = calculate_residence_tax(&tables, dec("1010000"), Decimal::ZERO, &deductions);
        assert_eq!(at, NON_TAXABLE_RESIDENCE_TAX_DETAIL);

        let above = calculate_residence_tax(&tables, dec("1010001"), Decimal::ZERO, &deductions);
        assert!(!above.is_non_taxable());
    }

    #[test]
    fn test_non_taxable_ceiling_with_two_dependents() {
        let tables = test_tables();
        let deductions = children(2);
        let at = calculate_residence_tax(&tables, dec("1360000"), Decimal::ZERO, &deductions);
        assert_eq!(at, NON_TAXABLE_RESIDENCE_TAX_DETAIL);

        let above = calculate_residence_tax(&tables, dec("1360001"), Decimal::ZERO, &deductions);
        assert!(above.total_residence_tax > Decimal::ZERO);
    }

    #[test]
    fn test_adjustment_credit_below_threshold_uses_smaller_of_difference_and_taxable() {
        let tables = test_tables();
        let config = tables.residence_tax();

        assert_eq!(
            adjustment_credit(config, dec("1000000"), dec("30000"), dec("50000")),
            dec("1500")
        );
        assert_eq!(
            adjustment_credit(config, dec("2000000"), dec("1500000"), dec("230000")),
            dec("11500")
        );
    }

    #[test]
    fn test_adjustment_credit_above_threshold_has_minimum() {
        let tables = test_tables();
        let config = tables.residence_tax();

        // (230,000 − 100,000) × 5%
        assert_eq!(
            adjustment_credit(config, dec("3000000"), dec("2100000"), dec("230000")),
            dec("6500")
        );
        assert_eq!(
            adjustment_credit(config, dec("5000000"), dec("3570000"), dec("50000")),
            dec("2500")
        );
    }

    #[test]
    fn test_adjustment_credit_zero_above_net_income_limit() {
        let tables = test_tables();
        let config = tables.residence_tax();
        assert_eq!(
            adjustment_credit(config, dec("25000001"), dec("24000000"), dec("50000")),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_tax_credits_split_before_flooring() {
        let tables = test_tables();
        let empty = DependentDeductions::empty();
        let inputs = ResidenceTaxInputs {
            net_income: dec("3560000"),
            income_deductions: dec("721476"),
            dependent_deductions: &empty,
        };

        let before = inputs.calculate(&tables, Decimal::ZERO);
        assert_eq!(before.taxable_income, dec("2408000"));
        assert_eq!(before.city.income_tax, dec("142900"));
        assert_eq!(before.prefecture.income_tax, dec("95300"));
        assert_eq!(before.income_portion_before_tax_credits(), dec("238300"));

        let after = inputs.calculate(&tables, dec("52976"));
        assert_eq!(after.city.income_tax, dec("111100"));
        assert_eq!(after.prefecture.income_tax, dec("74100"));
        assert_eq!(after.city.per_capita_tax, dec("3000"));
    }

    #[test]
    fn test_tax_credits_never_make_share_negative() {
        let tables = test_tables();
        let details = calculate_residence_tax_with_credits(
            &tables,
            dec("3560000"),
            dec("721476"),
            &DependentDeductions::empty(),
            dec("10000000"),
        );
        assert_eq!(details.city.income_tax, Decimal::ZERO);
        assert_eq!(details.total_residence_tax, dec("5000"));
    }

    #[test]
    fn test_residence_basic_deduction_tiers() {
        let tables = test_tables();
        assert_eq!(residence_basic_deduction(&tables, dec("24000000")), dec("430000"));
        assert_eq!(residence_basic_deduction(&tables, dec("24500000")), dec("290000"));
        assert_eq!(residence_basic_deduction(&tables, dec("25000000")), dec("150000"));
        assert_eq!(residence_basic_deduction(&tables, dec("25000001")), dec("0"));
    }

    #[test]
    fn test_audit_step_marks_non_taxable() {
        let details = residence("100000", "0");
        let step = details.audit_step(7, dec("100000"));
        assert_eq!(step.output["non_taxable"], true);
    }
}
