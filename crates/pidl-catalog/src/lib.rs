// crates/pidl-catalog/src/lib.rs
// ============================================================================
// Module: PIDL Catalog
// Description: Built-in descriptor tables for the PIDL resolution engine.
// Purpose: Assemble dictionaries, validators, phone plans, and family catalogs.
// Dependencies: pidl-core, thiserror, time
// ============================================================================

//! ## Overview
//! This crate ships the built-in [`EngineTables`]: authored dictionaries,
//! regex validators, numbering plans, transformation rules, and one template
//! catalog per descriptor family. Tables are assembled once from an injected
//! date so expiry-year windows stay deterministic under test.
//! Invariants:
//! - Every family's named partner subsets partition [`partners::ALL_PARTNERS`].
//! - Every pattern compiles when the tables are built.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dictionaries;
pub mod families;
pub mod partners;
pub mod phone_plans;
pub mod transformation_rules;
pub mod validation_rules;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

use pidl_core::DictionaryError;
use pidl_core::EngineTables;
use pidl_core::FlightError;
use pidl_core::OrderedMap;
use pidl_core::PhoneNumberValidator;
use pidl_core::RepositoryError;
use pidl_core::TemplateRepository;
use pidl_core::ValidationError;
use pidl_core::ValidationRuleTable;
use pidl_core::YearWindow;
use thiserror::Error;
use time::Date;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use partners::ALL_PARTNERS;
pub use partners::NamedSubset;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while assembling the built-in tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Dictionary declarations are inconsistent.
    #[error("catalog dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
    /// A validator pattern or numbering plan failed to compile.
    #[error("catalog validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Family catalogs are inconsistent.
    #[error("catalog repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// A catalog flight gate is malformed.
    #[error("catalog flight error: {0}")]
    Flight(#[from] FlightError),
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Inputs that vary between table builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Date that anchors the expiry-year window.
    pub today: Date,
    /// Expiry-year window parameters.
    pub year_window: YearWindow,
}

impl CatalogOptions {
    /// Options anchored on `today` with the default year window.
    #[must_use]
    pub fn on(today: Date) -> Self {
        Self {
            today,
            year_window: YearWindow::default(),
        }
    }
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::on(OffsetDateTime::now_utc().date())
    }
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds the built-in tables.
///
/// # Errors
///
/// Returns [`CatalogError`] when a dictionary declaration, validator pattern,
/// numbering plan, flight gate, or family catalog is invalid.
pub fn builtin_tables(options: &CatalogOptions) -> Result<EngineTables, CatalogError> {
    let dictionaries = dictionaries::store(options.today, options.year_window)?;
    let india_states = dictionaries::india_states();
    Ok(EngineTables {
        dictionaries,
        validators: ValidationRuleTable::new(validation_rules::rules())?,
        phone: PhoneNumberValidator::new(phone_plans::plans())?,
        transformations: transformation_rules::table(&india_states),
        templates: TemplateRepository::new(families::catalogs()?)?,
        service_validations: service_validations(),
    })
}

/// Returns the process-wide tables built for the current date.
///
/// The first caller builds the tables; later callers share them.
///
/// # Errors
///
/// Returns the [`CatalogError`] recorded by the first build.
pub fn shared_tables() -> Result<&'static EngineTables, CatalogError> {
    /// Tables built on first use.
    static TABLES: OnceLock<Result<EngineTables, CatalogError>> = OnceLock::new();
    TABLES.get_or_init(|| builtin_tables(&CatalogOptions::default())).as_ref().map_err(Clone::clone)
}

/// Property names validated by the phone service.
fn service_validations() -> OrderedMap<String> {
    ["phone_number", "msisdn", "phoneNumber"]
        .into_iter()
        .map(|property| (property.to_string(), "phonenumber.{country}".to_string()))
        .collect()
}

#[cfg(test)]
mod tests;
