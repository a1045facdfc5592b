//! Spouse, dependent and disability deductions.
//!
//! Each dependent is classified into exactly one spouse or dependent
//! category, plus an optional disability category. National income tax and
//! residence tax allow different amounts for the same category, and the
//! residence-tax adjustment credit uses a third, statutory figure: the
//! personal deduction difference.

use rust_decimal::Decimal;

use super::rounding::yen;
use crate::models::{
    AuditStep, Dependent, DependentAge, DependentDeductionCategory, DependentDeductionLine,
    DependentDeductions, Disability, DisabilityDeductionCategory, Relationship,
    SPOUSE_SPECIAL_INCOME_LIMIT, SpouseAge,
};

/// Amounts one category is worth under each tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeductionAmounts {
    national: Decimal,
    residence: Decimal,
    difference: Decimal,
}

const fn amounts(national: u32, residence: u32, difference: u32) -> DeductionAmounts {
    DeductionAmounts {
        national: yen(national),
        residence: yen(residence),
        difference: yen(difference),
    }
}

const NONE: DeductionAmounts = amounts(0, 0, 0);

/// Taxpayer net income bands for spouse deductions (inclusive upper bounds).
const TAXPAYER_INCOME_BANDS: [u32; 3] = [9_000_000, 9_500_000, 10_000_000];

/// Spouse deduction per taxpayer band, spouse under 70.
const SPOUSE: [DeductionAmounts; 3] = [
    amounts(380_000, 330_000, 50_000),
    amounts(260_000, 220_000, 40_000),
    amounts(130_000, 110_000, 20_000),
];

/// Spouse deduction per taxpayer band, spouse 70 or older.
const ELDERLY_SPOUSE: [DeductionAmounts; 3] = [
    amounts(480_000, 380_000, 100_000),
    amounts(320_000, 260_000, 60_000),
    amounts(160_000, 130_000, 30_000),
];

/// Spouse special deduction: spouse income upper bound, then national and
/// residence amounts per taxpayer band.
const SPOUSE_SPECIAL: [(u32, [u32; 3], [u32; 3]); 9] = [
    (950_000, [380_000, 260_000, 130_000], [330_000, 220_000, 110_000]),
    (1_000_000, [360_000, 240_000, 120_000], [330_000, 220_000, 110_000]),
    (1_050_000, [310_000, 210_000, 110_000], [310_000, 210_000, 110_000]),
    (1_100_000, [260_000, 180_000, 90_000], [260_000, 180_000, 90_000]),
    (1_150_000, [210_000, 140_000, 70_000], [210_000, 140_000, 70_000]),
    (1_200_000, [160_000, 110_000, 60_000], [160_000, 110_000, 60_000]),
    (1_250_000, [110_000, 80_000, 40_000], [110_000, 80_000, 40_000]),
    (1_300_000, [60_000, 40_000, 20_000], [60_000, 40_000, 20_000]),
    (1_330_000, [30_000, 20_000, 10_000], [30_000, 20_000, 10_000]),
];

const GENERAL_DEPENDENT: DeductionAmounts = amounts(380_000, 330_000, 50_000);
const SPECIFIC_DEPENDENT: DeductionAmounts = amounts(630_000, 450_000, 180_000);
const ELDERLY_DEPENDENT: DeductionAmounts = amounts(480_000, 380_000, 100_000);
const ELDERLY_COHABITING_PARENT: DeductionAmounts = amounts(580_000, 450_000, 130_000);

const DISABILITY_REGULAR: DeductionAmounts = amounts(270_000, 260_000, 10_000);
const DISABILITY_SPECIAL: DeductionAmounts = amounts(400_000, 300_000, 100_000);
const DISABILITY_SPECIAL_COHABITING: DeductionAmounts = amounts(750_000, 530_000, 220_000);

/// Returns the taxpayer's spouse-deduction band, or `None` above ¥10M.
fn taxpayer_band(taxpayer_net_income: Decimal) -> Option<usize> {
    TAXPAYER_INCOME_BANDS
        .iter()
        .position(|&limit| taxpayer_net_income <= yen(limit))
}

fn spouse_special_amounts(spouse_income: Decimal, band: usize) -> DeductionAmounts {
    SPOUSE_SPECIAL
        .iter()
        .find(|(limit, _, _)| spouse_income <= yen(*limit))
        .map(|(_, national, residence)| DeductionAmounts {
            national: yen(national[band]),
            residence: yen(residence[band]),
            difference: Decimal::ZERO,
        })
        .unwrap_or(NONE)
}

fn classify_spouse(
    age: SpouseAge,
    dependent: &Dependent,
    band: Option<usize>,
) -> (DependentDeductionCategory, DeductionAmounts) {
    match band {
        None => (DependentDeductionCategory::NotEligible, NONE),
        Some(band) if dependent.within_dependent_income_limit() => match age {
            SpouseAge::Under70 => (DependentDeductionCategory::Spouse, SPOUSE[band]),
            SpouseAge::Age70Plus => (
                DependentDeductionCategory::ElderlySpouse,
                ELDERLY_SPOUSE[band],
            ),
        },
        Some(band) if dependent.net_income <= SPOUSE_SPECIAL_INCOME_LIMIT => (
            DependentDeductionCategory::SpouseSpecial,
            spouse_special_amounts(dependent.net_income, band),
        ),
        Some(_) => (DependentDeductionCategory::NotEligible, NONE),
    }
}

fn classify_relative(
    age: DependentAge,
    dependent: &Dependent,
) -> (DependentDeductionCategory, DeductionAmounts) {
    if !dependent.within_dependent_income_limit() {
        return (DependentDeductionCategory::NotEligible, NONE);
    }

    match age {
        DependentAge::Under16 => (DependentDeductionCategory::Under16, NONE),
        DependentAge::Age16To18 | DependentAge::Age23To69 => (
            DependentDeductionCategory::GeneralDependent,
            GENERAL_DEPENDENT,
        ),
        DependentAge::Age19To22 => (
            DependentDeductionCategory::SpecificDependent,
            SPECIFIC_DEPENDENT,
        ),
        DependentAge::Age70Plus => {
            let is_parent = matches!(dependent.relationship, Relationship::Parent { .. });
            if is_parent && dependent.is_cohabiting {
                (
                    DependentDeductionCategory::ElderlyCohabitingParent,
                    ELDERLY_COHABITING_PARENT,
                )
            } else {
                (
                    DependentDeductionCategory::ElderlyDependent,
                    ELDERLY_DEPENDENT,
                )
            }
        }
    }
}

fn classify_disability(
    dependent: &Dependent,
) -> Option<(DisabilityDeductionCategory, DeductionAmounts)> {
    if !dependent.within_dependent_income_limit() {
        return None;
    }

    match dependent.disability {
        Disability::None => None,
        Disability::Regular => Some((DisabilityDeductionCategory::Regular, DISABILITY_REGULAR)),
        Disability::Special if dependent.is_cohabiting => Some((
            DisabilityDeductionCategory::SpecialCohabiting,
            DISABILITY_SPECIAL_COHABITING,
        )),
        Disability::Special => Some((DisabilityDeductionCategory::Special, DISABILITY_SPECIAL)),
    }
}

/// Evaluates one dependent.
fn evaluate_dependent(
    index: usize,
    dependent: &Dependent,
    band: Option<usize>,
) -> DependentDeductionLine {
    let (category, base) = match dependent.relationship {
        Relationship::Spouse { age } => classify_spouse(age, dependent, band),
        Relationship::Child { age } | Relationship::Parent { age } | Relationship::Other { age } => {
            classify_relative(age, dependent)
        }
    };

    let disability = classify_disability(dependent);
    let extra = disability.map(|(_, a)| a).unwrap_or(NONE);

    DependentDeductionLine {
        index,
        category,
        disability: disability.map(|(c, _)| c),
        national_tax: base.national + extra.national,
        residence_tax: base.residence + extra.residence,
        personal_deduction_difference: base.difference + extra.difference,
        counts_toward_non_taxable_ceiling: dependent.within_dependent_income_limit(),
    }
}

/// Computes spouse, dependent and disability deductions.
///
/// Spouse deductions depend on the taxpayer's own net income and vanish
/// above ¥10,000,000; disability deductions for a spouse or relative with
/// income within the dependent limit apply regardless.
///
/// # Examples
///
/// ```
/// use takehome_engine::calculation::calculate_dependent_deductions;
/// use takehome_engine::models::{Dependent, DependentAge, Disability, Relationship};
/// use rust_decimal::Decimal;
///
/// let student = Dependent {
///     relationship: Relationship::Child { age: DependentAge::Age19To22 },
///     net_income: Decimal::ZERO,
///     disability: Disability::None,
///     is_cohabiting: false,
/// };
///
/// let deductions = calculate_dependent_deductions(&[student], Decimal::from(5_000_000));
/// assert_eq!(deductions.national_tax, Decimal::from(630_000));
/// assert_eq!(deductions.residence_tax, Decimal::from(450_000));
/// assert_eq!(deductions.personal_deduction_difference, Decimal::from(180_000));
/// ```
pub fn calculate_dependent_deductions(
    dependents: &[Dependent],
    taxpayer_net_income: Decimal,
) -> DependentDeductions {
    let band = taxpayer_band(taxpayer_net_income);

    let lines: Vec<DependentDeductionLine> = dependents
        .iter()
        .enumerate()
        .map(|(index, dependent)| evaluate_dependent(index, dependent, band))
        .collect();

    DependentDeductions {
        national_tax: lines.iter().map(|l| l.national_tax).sum(),
        residence_tax: lines.iter().map(|l| l.residence_tax).sum(),
        personal_deduction_difference: lines.iter().map(|l| l.personal_deduction_difference).sum(),
        ceiling_dependents: lines
            .iter()
            .filter(|l| l.counts_toward_non_taxable_ceiling)
            .count() as u32,
        lines,
    }
}

impl DependentDeductions {
    /// Builds the audit step recording this calculation.
    pub fn audit_step(&self, step_number: u32, taxpayer_net_income: Decimal) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "dependent_deductions".to_string(),
            rule_name: "Spouse, Dependent and Disability Deductions".to_string(),
            statute_ref: "Income Tax Act Art. 79, 83, 83-2, 84".to_string(),
            input: serde_json::json!({
                "dependent_count": self.lines.len(),
                "taxpayer_net_income": taxpayer_net_income.to_string()
            }),
            output: serde_json::json!({
                "national_tax": self.national_tax.to_string(),
                "residence_tax": self.residence_tax.to_string(),
                "personal_deduction_difference": self.personal_deduction_difference.to_string(),
                "ceiling_dependents": self.ceiling_dependents,
                "categories": self.lines.iter().map(|l| l.category).collect::<Vec<_>>()
            }),
            reasoning: format!(
                "{} dependent(s): ¥{} national, ¥{} residence deduction",
                self.lines.len(),
                self.national_tax,
                self.residence_tax
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn spouse(age: SpouseAge, income: &str) -> Dependent {
        Dependent {
            relationship: Relationship::Spouse { age },
            net_income: dec(income),
            disability: Disability::None,
            is_cohabiting: true,
        }
    }

    fn relative(relationship: Relationship, income: &str, cohabiting: bool) -> Dependent {
        Dependent {
            relationship,
            net_income: dec(income),
            disability: Disability::None,
            is_cohabiting: cohabiting,
        }
    }

    fn single(dependent: Dependent, taxpayer_income: &str) -> DependentDeductionLine {
        calculate_dependent_deductions(&[dependent], dec(taxpayer_income)).lines[0]
    }

    #[test]
    fn test_no_dependents_is_empty() {
        let result = calculate_dependent_deductions(&[], dec("5000000"));
        assert_eq!(result, DependentDeductions::empty());
    }

    #[test]
    fn test_spouse_deduction_by_taxpayer_band() {
        let line = single(spouse(SpouseAge::Under70, "0"), "9000000");
        assert_eq!(line.category, DependentDeductionCategory::Spouse);
        assert_eq!(line.national_tax, dec("380000"));
        assert_eq!(line.residence_tax, dec("330000"));
        assert_eq!(line.personal_deduction_difference, dec("50000"));

        let line = single(spouse(SpouseAge::Under70, "0"), "9500000");
        assert_eq!(line.national_tax, dec("260000"));
        assert_eq!(line.personal_deduction_difference, dec("40000"));

        let line = single(spouse(SpouseAge::Under70, "0"), "10000000");
        assert_eq!(line.national_tax, dec("130000"));
        assert_eq!(line.residence_tax, dec("110000"));
        assert_eq!(line.personal_deduction_difference, dec("20000"));
    }

    #[test]
    fn test_spouse_deduction_unavailable_above_10m() {
        let line = single(spouse(SpouseAge::Under70, "0"), "10000001");
        assert_eq!(line.category, DependentDeductionCategory::NotEligible);
        assert_eq!(line.national_tax, Decimal::ZERO);
        assert!(line.counts_toward_non_taxable_ceiling);
    }

    #[test]
    fn test_elderly_spouse_deduction() {
        let line = single(spouse(SpouseAge::Age70Plus, "580000"), "5000000");
        assert_eq!(line.category, DependentDeductionCategory::ElderlySpouse);
        assert_eq!(line.national_tax, dec("480000"));
        assert_eq!(line.residence_tax, dec("380000"));
        assert_eq!(line.personal_deduction_difference, dec("100000"));
    }

    #[test]
    fn test_spouse_special_deduction_bands() {
        let line = single(spouse(SpouseAge::Under70, "580001"), "5000000");
        assert_eq!(line.category, DependentDeductionCategory::SpouseSpecial);
        assert_eq!(line.national_tax, dec("380000"));
        assert_eq!(line.residence_tax, dec("330000"));
        assert_eq!(line.personal_deduction_difference, Decimal::ZERO);
        assert!(!line.counts_toward_non_taxable_ceiling);

        let line = single(spouse(SpouseAge::Under70, "1000000"), "5000000");
        assert_eq!(line.national_tax, dec("360000"));
        assert_eq!(line.residence_tax, dec("330000"));

        let line = single(spouse(SpouseAge::Under70, "1330000"), "9400000");
        assert_eq!(line.national_tax, dec("20000"));
        assert_eq!(line.residence_tax, dec("20000"));
    }

    #[test]
    fn test_spouse_above_special_limit_not_eligible() {
        let line = single(spouse(SpouseAge::Under70, "1330001"), "5000000");
        assert_eq!(line.category, DependentDeductionCategory::NotEligible);
        assert_eq!(line.national_tax, Decimal::ZERO);
    }

    #[test]
    fn test_under16_child_counts_but_no_deduction() {
        let child = relative(
            Relationship::Child {
                age: DependentAge::Under16,
            },
            "0",
            true,
        );
        let result = calculate_dependent_deductions(&[child], dec("5000000"));

        assert_eq!(result.lines[0].category, DependentDeductionCategory::Under16);
        assert_eq!(result.national_tax, Decimal::ZERO);
        assert_eq!(result.ceiling_dependents, 1);
    }

    #[test]
    fn test_general_and_specific_dependents() {
        let teen = relative(
            Relationship::Child {
                age: DependentAge::Age16To18,
            },
            "0",
            true,
        );
        let student = relative(
            Relationship::Child {
                age: DependentAge::Age19To22,
            },
            "0",
            false,
        );
        let result = calculate_dependent_deductions(&[teen, student], dec("6000000"));

        assert_eq!(result.national_tax, dec("1010000"));
        assert_eq!(result.residence_tax, dec("780000"));
        assert_eq!(result.personal_deduction_difference, dec("230000"));
        assert_eq!(result.ceiling_dependents, 2);
    }

    #[test]
    fn test_elderly_parent_cohabiting_vs_not() {
        let parent = |cohabiting| {
            relative(
                Relationship::Parent {
                    age: DependentAge::Age70Plus,
                },
                "0",
                cohabiting,
            )
        };

        let line = single(parent(true), "5000000");
        assert_eq!(line.category, DependentDeductionCategory::ElderlyCohabitingParent);
        assert_eq!(line.national_tax, dec("580000"));
        assert_eq!(line.residence_tax, dec("450000"));
        assert_eq!(line.personal_deduction_difference, dec("130000"));

        let line = single(parent(false), "5000000");
        assert_eq!(line.category, DependentDeductionCategory::ElderlyDependent);
        assert_eq!(line.national_tax, dec("480000"));
        assert_eq!(line.personal_deduction_difference, dec("100000"));
    }

    #[test]
    fn test_elderly_other_relative_cohabiting_is_not_parent_rate() {
        let line = single(
            relative(
                Relationship::Other {
                    age: DependentAge::Age70Plus,
                },
                "0",
                true,
            ),
            "5000000",
        );
        assert_eq!(line.category, DependentDeductionCategory::ElderlyDependent);
    }

    #[test]
    fn test_dependent_over_income_limit_not_eligible() {
        let line = single(
            relative(
                Relationship::Child {
                    age: DependentAge::Age19To22,
                },
                "580001",
                true,
            ),
            "5000000",
        );
        assert_eq!(line.category, DependentDeductionCategory::NotEligible);
        assert_eq!(line.national_tax, Decimal::ZERO);
        assert!(!line.counts_toward_non_taxable_ceiling);
    }

    #[test]
    fn test_disability_adds_to_base_deduction() {
        let mut child = relative(
            Relationship::Child {
                age: DependentAge::Under16,
            },
            "0",
            true,
        );
        child.disability = Disability::Special;

        let line = single(child.clone(), "5000000");
        assert_eq!(
            line.disability,
            Some(DisabilityDeductionCategory::SpecialCohabiting)
        );
        assert_eq!(line.national_tax, dec("750000"));
        assert_eq!(line.residence_tax, dec("530000"));
        assert_eq!(line.personal_deduction_difference, dec("220000"));

        child.is_cohabiting = false;
        let line = single(child, "5000000");
        assert_eq!(line.disability, Some(DisabilityDeductionCategory::Special));
        assert_eq!(line.national_tax, dec("400000"));
    }

    #[test]
    fn test_regular_disability_on_general_dependent() {
        let mut teen = relative(
            Relationship::Child {
                age: DependentAge::Age16To18,
            },
            "0",
            true,
        );
        teen.disability = Disability::Regular;

        let line = single(teen, "5000000");
        assert_eq!(line.national_tax, dec("650000"));
        assert_eq!(line.residence_tax, dec("590000"));
        assert_eq!(line.personal_deduction_difference, dec("60000"));
    }

    #[test]
    fn test_disabled_spouse_of_high_earner_keeps_disability_deduction() {
        let mut wife = spouse(SpouseAge::Under70, "0");
        wife.disability = Disability::Regular;

        let line = single(wife, "12000000");
        assert_eq!(line.category, DependentDeductionCategory::NotEligible);
        assert_eq!(line.national_tax, dec("270000"));
        assert_eq!(line.residence_tax, dec("260000"));
    }

    #[test]
    fn test_residence_never_exceeds_national() {
        let dependents = vec![
            spouse(SpouseAge::Age70Plus, "0"),
            relative(
                Relationship::Parent {
                    age: DependentAge::Age70Plus,
                },
                "0",
                true,
            ),
            relative(
                Relationship::Child {
                    age: DependentAge::Age19To22,
                },
                "0",
                true,
            ),
        ];
        let result = calculate_dependent_deductions(&dependents, dec("7000000"));

        for line in &result.lines {
            assert!(line.residence_tax <= line.national_tax);
        }
        assert_eq!(result.ceiling_dependents, 3);
    }

    #[test]
    fn test_audit_step_lists_categories() {
        let result =
            calculate_dependent_deductions(&[spouse(SpouseAge::Under70, "0")], dec("5000000"));
        let step = result.audit_step(3, dec("5000000"));

        assert_eq!(step.rule_id, "dependent_deductions");
        assert_eq!(step.output["categories"][0], "spouse");
        assert_eq!(step.output["ceiling_dependents"], 1);
    }
}
