//! Rate table loading and lookups for the take-home pay engine.
//!
//! This module loads one tax year's tables from YAML files: national tax
//! brackets, the residence-tax schedule, Standard Monthly Remuneration
//! tables, provider/region health-insurance rates, and National Health
//! Insurance parameters.
//!
//! # Example
//!
//! ```no_run
//! use takehome_engine::config::ConfigLoader;
//!
//! let tables = ConfigLoader::load("./config/2025").unwrap().into_tables();
//! println!("Tax year: {}", tables.metadata().tax_year);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AdjustmentCreditConfig, DeductionTier, EmployeeHealthRates, HealthInsuranceConfig,
    IncomeTaxConfig, NationalHealthInsuranceConfig, NhiPortion, NhiRegionParams,
    NonTaxableConfig, RateTables, ResidenceTaxConfig, SmrBracket, SocialInsuranceConfig,
    TaxBracket, TaxYearMetadata, find_smr_bracket, tier_amount,
};

/// Loads the bundled 2025 tables for unit tests.
#[cfg(test)]
pub(crate) fn test_tables() -> RateTables {
    ConfigLoader::load("./config/2025")
        .expect("Failed to load config")
        .into_tables()
}
