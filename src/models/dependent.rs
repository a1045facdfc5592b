//! Dependent models.
//!
//! Dependents are described by relationship, age category, income and
//! disability status. The engine never mutates them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net income at or below which a relative counts as a dependent.
pub const DEPENDENT_INCOME_LIMIT: Decimal = Decimal::from_parts(580_000, 0, 0, false, 0);

/// Upper net income limit for the spouse special deduction.
pub const SPOUSE_SPECIAL_INCOME_LIMIT: Decimal = Decimal::from_parts(1_330_000, 0, 0, false, 0);

/// Age category of a spouse at year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpouseAge {
    /// Under 70.
    #[serde(rename = "under70")]
    Under70,
    /// 70 or older.
    #[serde(rename = "70plus")]
    Age70Plus,
}

/// Age category of a non-spouse dependent at year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependentAge {
    /// Under 16; no dependent deduction applies.
    #[serde(rename = "under16")]
    Under16,
    /// 16 to 18.
    #[serde(rename = "16to18")]
    Age16To18,
    /// 19 to 22; a specific dependent.
    #[serde(rename = "19to22")]
    Age19To22,
    /// 23 to 69.
    #[serde(rename = "23to69")]
    Age23To69,
    /// 70 or older; an elderly dependent.
    #[serde(rename = "70plus")]
    Age70Plus,
}

/// The relationship of a dependent to the taxpayer, carrying its age category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "relationship", rename_all = "snake_case")]
pub enum Relationship {
    /// The taxpayer's spouse.
    Spouse {
        /// Age category.
        age: SpouseAge,
    },
    /// A child.
    Child {
        /// Age category.
        age: DependentAge,
    },
    /// A parent (including a spouse's parent).
    Parent {
        /// Age category.
        age: DependentAge,
    },
    /// Any other relative in the same household budget.
    Other {
        /// Age category.
        age: DependentAge,
    },
}

/// Disability status of a dependent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disability {
    /// No disability.
    #[default]
    None,
    /// Disabled person.
    Regular,
    /// Specially disabled person.
    Special,
}

/// A spouse or relative supported by the taxpayer.
///
/// # Example
///
/// ```
/// use takehome_engine::models::{Dependent, DependentAge, Relationship};
///
/// let json = r#"{"relationship": "child", "age": "19to22", "net_income": "0"}"#;
/// let dependent: Dependent = serde_json::from_str(json).unwrap();
/// assert_eq!(dependent.relationship, Relationship::Child { age: DependentAge::Age19To22 });
/// assert!(!dependent.is_cohabiting);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    /// Relationship and age category.
    #[serde(flatten)]
    pub relationship: Relationship,
    /// The dependent's annual net income.
    #[serde(default)]
    pub net_income: Decimal,
    /// Disability status.
    #[serde(default)]
    pub disability: Disability,
    /// Whether the dependent lives with the taxpayer.
    #[serde(default)]
    pub is_cohabiting: bool,
}

impl Dependent {
    /// Returns true if the dependent's income is within the dependent limit.
    pub fn within_dependent_income_limit(&self) -> bool {
        self.net_income <= DEPENDENT_INCOME_LIMIT
    }
}
