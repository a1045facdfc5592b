//! Rate table loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a tax year's
//! rate tables from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    HealthInsuranceConfig, IncomeTaxConfig, NationalHealthInsuranceConfig, RateTables,
    ResidenceTaxConfig, SocialInsuranceConfig, TaxYearMetadata,
};

/// Loads and provides access to a tax year's rate tables.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/2025/
/// ├── tax_year.yaml                   # Tax-year metadata
/// ├── income_tax.yaml                 # Brackets, surtax, basic deduction
/// ├── residence_tax.yaml              # Residence tax parameters
/// ├── social_insurance.yaml           # SMR tables, pension and employment rates
/// ├── health_insurance.yaml           # Provider/region employee rates
/// └── national_health_insurance.yaml  # NHI parameters per region
/// ```
///
/// # Example
///
/// ```no_run
/// use takehome_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/2025")?;
/// println!("Loaded tables for {}", loader.metadata().tax_year);
/// # Ok::<(), takehome_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: RateTables,
}

impl ConfigLoader {
    /// Loads the rate tables from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - A bracket table is empty (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TaxYearMetadata>(&path.join("tax_year.yaml"))?;
        let income_tax = Self::load_yaml::<IncomeTaxConfig>(&path.join("income_tax.yaml"))?;
        let residence_tax =
            Self::load_yaml::<ResidenceTaxConfig>(&path.join("residence_tax.yaml"))?;

        let social_insurance_path = path.join("social_insurance.yaml");
        let social_insurance = Self::load_yaml::<SocialInsuranceConfig>(&social_insurance_path)?;
        if social_insurance.health_smr.is_empty() || social_insurance.pension_smr.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: social_insurance_path.display().to_string(),
                message: "standard monthly remuneration tables must not be empty".to_string(),
            });
        }

        let health_insurance =
            Self::load_yaml::<HealthInsuranceConfig>(&path.join("health_insurance.yaml"))?;
        let national_health_insurance = Self::load_yaml::<NationalHealthInsuranceConfig>(
            &path.join("national_health_insurance.yaml"),
        )?;

        let tables = RateTables::new(
            metadata,
            income_tax,
            residence_tax,
            social_insurance,
            health_insurance,
            national_health_insurance,
        );

        Ok(Self { tables })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded rate tables.
    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    /// Consumes the loader, returning the rate tables.
    pub fn into_tables(self) -> RateTables {
        self.tables
    }

    /// Returns the tax-year metadata.
    pub fn metadata(&self) -> &TaxYearMetadata {
        self.tables.metadata()
    }
}
