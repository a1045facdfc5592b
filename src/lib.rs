//! Take-home pay engine for Japanese employment and business income.
//!
//! This crate computes a taxpayer's national income tax, residence tax,
//! health insurance, pension and employment insurance for one year, the
//! resulting take-home pay, and the Furusato Nozei donation limit. Rates and
//! thresholds are loaded per tax year from YAML tables.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
