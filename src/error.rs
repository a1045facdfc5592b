//! Error types for the take-home pay engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every error condition that can occur while loading rate tables or
//! evaluating a taxpayer's income.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the take-home pay engine.
///
/// All fallible operations in the engine return this error type. Zero and
/// boundary incomes are never errors; they produce zero or floor-capped
/// results.
///
/// # Example
///
/// ```
/// use takehome_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/tax.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/tax.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The health-insurance provider has no rate table.
    #[error("Health insurance provider not found: {provider}")]
    ProviderNotFound {
        /// The provider id that was requested.
        provider: String,
    },

    /// A region-keyed table has no entry for the region.
    #[error("Region '{region}' not found in {table}")]
    RegionNotFound {
        /// The table that was searched.
        table: String,
        /// The region that was requested.
        region: String,
    },

    /// An income amount was negative. Losses are not supported.
    #[error("Negative {category} income is not supported: {amount}")]
    NegativeIncome {
        /// The income category carrying the negative amount.
        category: String,
        /// The offending amount.
        amount: Decimal,
    },

    /// More than one business income stream was supplied.
    #[error("At most one business income stream is supported, got {count}")]
    MultipleBusinessIncome {
        /// The number of business streams supplied.
        count: usize,
    },

    /// The input describes a situation the engine does not model.
    #[error("Unsupported configuration: {message}")]
    UnsupportedConfiguration {
        /// A description of the unsupported input.
        message: String,
    },

    /// A general calculation error occurred, usually a malformed table.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/tax.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/tax.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_region_not_found_displays_table_and_region() {
        let error = EngineError::RegionNotFound {
            table: "KyokaiKenpo rates".to_string(),
            region: "Atlantis".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Region 'Atlantis' not found in KyokaiKenpo rates"
        );
    }

    #[test]
    fn test_negative_income_displays_category_and_amount() {
        let error = EngineError::NegativeIncome {
            category: "business".to_string(),
            amount: Decimal::from_str("-100000").unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Negative business income is not supported: -100000"
        );
    }

    #[test]
    fn test_multiple_business_income_displays_count() {
        let error = EngineError::MultipleBusinessIncome { count: 2 };
        assert_eq!(
            error.to_string(),
            "At most one business income stream is supported, got 2"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_provider_not_found() -> EngineResult<()> {
            Err(EngineError::ProviderNotFound {
                provider: "Unknown".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_provider_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
