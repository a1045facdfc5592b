//! Income aggregation.
//!
//! This module partitions a taxpayer's income streams into salary, bonus,
//! stock compensation, business, miscellaneous and commuting-allowance
//! totals, enforcing the cardinality and sign rules on the way.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, BonusPayment, IncomeStream, IssuerDomicile};

/// Income streams partitioned by category, all amounts annual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeSummary {
    /// Annual salary.
    pub salary_income: Decimal,
    /// Individual bonus payments, in input order.
    pub bonuses: Vec<BonusPayment>,
    /// Foreign-issued stock compensation taxed as employment income.
    pub stock_compensation_income: Decimal,
    /// Annual commuting allowance. Not part of taxable or total income.
    pub commuting_allowance: Decimal,
    /// Business plus miscellaneous income before the blue-filer deduction.
    pub net_business_and_misc_income_before_deduction: Decimal,
    /// Blue-filer deduction actually applied.
    pub blue_filer_deduction: Decimal,
    /// Business plus miscellaneous income after the blue-filer deduction.
    pub net_business_and_misc_income: Decimal,
    /// Total annual income, commuting allowance excluded.
    pub total_annual_income: Decimal,
}

impl IncomeSummary {
    /// Returns the sum of all bonus payments.
    pub fn bonus_income(&self) -> Decimal {
        self.bonuses.iter().map(|b| b.amount).sum()
    }

    /// Returns gross employment income: salary, bonuses and stock compensation.
    pub fn gross_employment_income(&self) -> Decimal {
        self.salary_income + self.bonus_income() + self.stock_compensation_income
    }

    /// Returns true if any salary or bonus is paid.
    pub fn has_employment_income(&self) -> bool {
        self.salary_income > Decimal::ZERO || self.bonus_income() > Decimal::ZERO
    }

    /// Builds the audit step recording this aggregation.
    pub fn audit_step(&self, step_number: u32, stream_count: usize) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "income_aggregation".to_string(),
            rule_name: "Income Aggregation".to_string(),
            statute_ref: "Income Tax Act Art. 21".to_string(),
            input: serde_json::json!({
                "stream_count": stream_count
            }),
            output: serde_json::json!({
                "salary_income": self.salary_income.to_string(),
                "bonus_income": self.bonus_income().to_string(),
                "stock_compensation_income": self.stock_compensation_income.to_string(),
                "commuting_allowance": self.commuting_allowance.to_string(),
                "blue_filer_deduction": self.blue_filer_deduction.to_string(),
                "net_business_and_misc_income": self.net_business_and_misc_income.to_string(),
                "total_annual_income": self.total_annual_income.to_string()
            }),
            reasoning: format!(
                "Total annual income ¥{} from {} stream(s); commuting allowance ¥{} excluded",
                self.total_annual_income, stream_count, self.commuting_allowance
            ),
        }
    }
}

/// Checks the sign and cardinality rules on a list of income streams.
///
/// # Errors
///
/// - `NegativeIncome` if any stream carries a negative amount or a negative
///   blue-filer deduction
/// - `MultipleBusinessIncome` if more than one business stream is present
/// - `UnsupportedConfiguration` for domestic-issued stock compensation
pub fn validate_income_streams(streams: &[IncomeStream]) -> EngineResult<()> {
    if let Some(stream) = streams.iter().find(|s| s.amount() < Decimal::ZERO) {
        return Err(EngineError::NegativeIncome {
            category: stream.category().to_string(),
            amount: stream.amount(),
        });
    }

    let negative_deduction = streams.iter().find_map(|s| match *s {
        IncomeStream::Business {
            blue_filer_deduction,
            ..
        } if blue_filer_deduction < Decimal::ZERO => Some(blue_filer_deduction),
        _ => None,
    });
    if let Some(amount) = negative_deduction {
        return Err(EngineError::NegativeIncome {
            category: "blue-filer deduction".to_string(),
            amount,
        });
    }

    let business_count = streams
        .iter()
        .filter(|s| matches!(s, IncomeStream::Business { .. }))
        .count();
    if business_count > 1 {
        return Err(EngineError::MultipleBusinessIncome {
            count: business_count,
        });
    }

    let has_domestic_stock = streams.iter().any(|s| {
        matches!(
            s,
            IncomeStream::StockCompensation {
                issuer_domicile: IssuerDomicile::Domestic,
                ..
            }
        )
    });
    if has_domestic_stock {
        return Err(EngineError::UnsupportedConfiguration {
            message: "stock compensation issued by a domestic company is withheld at source \
                      and cannot be modelled"
                .to_string(),
        });
    }

    Ok(())
}

/// Partitions income streams into annual totals per category.
///
/// Salary streams are normalised to annual amounts. The blue-filer
/// deduction is capped at the business income it is claimed against.
///
/// # Examples
///
/// ```
/// use takehome_engine::calculation::aggregate_income;
/// use takehome_engine::models::{IncomeStream, SalaryFrequency};
/// use rust_decimal::Decimal;
///
/// let streams = vec![
///     IncomeStream::Salary { amount: Decimal::from(300_000), frequency: SalaryFrequency::Monthly },
///     IncomeStream::Business { amount: Decimal::from(400_000), blue_filer_deduction: Decimal::from(650_000) },
/// ];
///
/// let summary = aggregate_income(&streams).unwrap();
/// assert_eq!(summary.salary_income, Decimal::from(3_600_000));
/// assert_eq!(summary.blue_filer_deduction, Decimal::from(400_000));
/// assert_eq!(summary.total_annual_income, Decimal::from(4_000_000));
/// ```
pub fn aggregate_income(streams: &[IncomeStream]) -> EngineResult<IncomeSummary> {
    validate_income_streams(streams)?;

    let mut salary_income = Decimal::ZERO;
    let mut bonuses = Vec::new();
    let mut stock_compensation_income = Decimal::ZERO;
    let mut commuting_allowance = Decimal::ZERO;
    let mut business_income = Decimal::ZERO;
    let mut blue_filer_deduction = Decimal::ZERO;
    let mut misc_income = Decimal::ZERO;

    for stream in streams {
        match *stream {
            IncomeStream::Salary { amount, frequency } => {
                salary_income += amount * frequency.payments_per_year();
            }
            IncomeStream::Bonus { amount, month } => {
                bonuses.push(BonusPayment { amount, month });
            }
            IncomeStream::Business {
                amount,
                blue_filer_deduction: declared,
            } => {
                business_income += amount;
                blue_filer_deduction = declared.min(amount);
            }
            IncomeStream::Miscellaneous { amount } => {
                misc_income += amount;
            }
            IncomeStream::CommutingAllowance { amount, frequency } => {
                commuting_allowance += amount * Decimal::from(12) / frequency.months_covered();
            }
            IncomeStream::StockCompensation { amount, .. } => {
                stock_compensation_income += amount;
            }
        }
    }

    let before_deduction = business_income + misc_income;
    let bonus_income: Decimal = bonuses.iter().map(|b| b.amount).sum();

    Ok(IncomeSummary {
        salary_income,
        bonuses,
        stock_compensation_income,
        commuting_allowance,
        net_business_and_misc_income_before_deduction: before_deduction,
        blue_filer_deduction,
        net_business_and_misc_income: before_deduction - blue_filer_deduction,
        total_annual_income: salary_income
            + bonus_income
            + stock_compensation_income
            + before_deduction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllowanceFrequency, SalaryFrequency};
    use chrono::Month;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn monthly_salary(amount: &str) -> IncomeStream {
        IncomeStream::Salary {
            amount: dec(amount),
            frequency: SalaryFrequency::Monthly,
        }
    }

    #[test]
    fn test_monthly_salary_normalises_to_annual() {
        let summary = aggregate_income(&[monthly_salary("400000")]).unwrap();

        assert_eq!(summary.salary_income, dec("4800000"));
        assert_eq!(summary.total_annual_income, dec("4800000"));
    }

    #[test]
    fn test_multiple_salary_streams_are_summed() {
        let streams = vec![
            monthly_salary("200000"),
            IncomeStream::Salary {
                amount: dec("1000000"),
                frequency: SalaryFrequency::Annual,
            },
        ];

        let summary = aggregate_income(&streams).unwrap();
        assert_eq!(summary.salary_income, dec("3400000"));
    }

    #[test]
    fn test_bonuses_kept_individually() {
        let streams = vec![
            monthly_salary("300000"),
            IncomeStream::Bonus {
                amount: dec("500000"),
                month: Month::June,
            },
            IncomeStream::Bonus {
                amount: dec("700000"),
                month: Month::December,
            },
        ];

        let summary = aggregate_income(&streams).unwrap();
        assert_eq!(summary.bonuses.len(), 2);
        assert_eq!(summary.bonus_income(), dec("1200000"));
        assert_eq!(summary.gross_employment_income(), dec("4800000"));
        assert_eq!(summary.total_annual_income, dec("4800000"));
    }

    #[test]
    fn test_commuting_allowance_excluded_from_total() {
        let streams = vec![
            monthly_salary("300000"),
            IncomeStream::CommutingAllowance {
                amount: dec("60000"),
                frequency: AllowanceFrequency::SixMonths,
            },
        ];

        let summary = aggregate_income(&streams).unwrap();
        assert_eq!(summary.commuting_allowance, dec("120000"));
        assert_eq!(summary.total_annual_income, dec("3600000"));
    }

    #[test]
    fn test_blue_filer_deduction_capped_at_income() {
        let streams = vec![IncomeStream::Business {
            amount: dec("300000"),
            blue_filer_deduction: dec("650000"),
        }];

        let summary = aggregate_income(&streams).unwrap();
        assert_eq!(summary.blue_filer_deduction, dec("300000"));
        assert_eq!(summary.net_business_and_misc_income, dec("0"));
        assert_eq!(summary.total_annual_income, dec("300000"));
    }

    #[test]
    fn test_business_and_miscellaneous_combined() {
        let streams = vec![
            IncomeStream::Business {
                amount: dec("3000000"),
                blue_filer_deduction: dec("650000"),
            },
            IncomeStream::Miscellaneous {
                amount: dec("200000"),
            },
        ];

        let summary = aggregate_income(&streams).unwrap();
        assert_eq!(
            summary.net_business_and_misc_income_before_deduction,
            dec("3200000")
        );
        assert_eq!(summary.net_business_and_misc_income, dec("2550000"));
        assert!(!summary.has_employment_income());
    }

    #[test]
    fn test_negative_business_income_rejected() {
        let streams = vec![IncomeStream::Business {
            amount: dec("-100000"),
            blue_filer_deduction: dec("0"),
        }];

        match aggregate_income(&streams) {
            Err(EngineError::NegativeIncome { category, amount }) => {
                assert_eq!(category, "business");
                assert_eq!(amount, dec("-100000"));
            }
            other => panic!("Expected NegativeIncome, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_blue_filer_deduction_rejected() {
        let streams = vec![IncomeStream::Business {
            amount: dec("3000000"),
            blue_filer_deduction: dec("-650000"),
        }];

        match aggregate_income(&streams) {
            Err(EngineError::NegativeIncome { category, amount }) => {
                assert_eq!(category, "blue-filer deduction");
                assert_eq!(amount, dec("-650000"));
            }
            other => panic!("Expected NegativeIncome, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_miscellaneous_income_rejected() {
        let streams = vec![IncomeStream::Miscellaneous {
            amount: dec("-1"),
        }];

        assert!(matches!(
            aggregate_income(&streams),
            Err(EngineError::NegativeIncome { .. })
        ));
    }

    #[test]
    fn test_second_business_stream_rejected() {
        let business = IncomeStream::Business {
            amount: dec("1000000"),
            blue_filer_deduction: dec("100000"),
        };

        match aggregate_income(&[business.clone(), business]) {
            Err(EngineError::MultipleBusinessIncome { count }) => assert_eq!(count, 2),
            other => panic!("Expected MultipleBusinessIncome, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_stock_compensation_is_employment_income() {
        let streams = vec![
            monthly_salary("500000"),
            IncomeStream::StockCompensation {
                amount: dec("1000000"),
                issuer_domicile: IssuerDomicile::Foreign,
            },
        ];

        let summary = aggregate_income(&streams).unwrap();
        assert_eq!(summary.stock_compensation_income, dec("1000000"));
        assert_eq!(summary.gross_employment_income(), dec("7000000"));
        assert_eq!(summary.total_annual_income, dec("7000000"));
    }

    #[test]
    fn test_domestic_stock_compensation_unsupported() {
        let streams = vec![IncomeStream::StockCompensation {
            amount: dec("1000000"),
            issuer_domicile: IssuerDomicile::Domestic,
        }];

        assert!(matches!(
            aggregate_income(&streams),
            Err(EngineError::UnsupportedConfiguration { .. })
        ));
    }

    #[test]
    fn test_empty_streams_yield_zero_summary() {
        let summary = aggregate_income(&[]).unwrap();
        assert_eq!(summary.total_annual_income, Decimal::ZERO);
        assert!(summary.bonuses.is_empty());
    }

    #[test]
    fn test_audit_step_records_total() {
        let streams = vec![monthly_salary("400000")];
        let summary = aggregate_income(&streams).unwrap();
        let step = summary.audit_step(1, streams.len());

        assert_eq!(step.rule_id, "income_aggregation");
        assert_eq!(step.output["total_annual_income"].as_str().unwrap(), "4800000");
        assert!(step.reasoning.contains("4800000"));
    }
}
