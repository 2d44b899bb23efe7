// crates/pidl-catalog/src/families/mod.rs
// ============================================================================
// Module: Family Catalogs
// Description: Base templates, override fragments, and submit links per family.
// Purpose: Register one catalog for every descriptor family.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Each family module declares its base templates, then fragments from the
//! least to the most specific scope, then submit-link rules. Partner scopes
//! reuse the named subsets in [`crate::partners`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod address;
pub mod billing_group;
pub mod payment_instrument_selection;
pub mod payment_method;
pub mod tax_id;

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::DescriptorFamily;
use pidl_core::DocumentTemplate;
use pidl_core::FamilyCatalog;
use pidl_core::FlightError;
use pidl_core::FlightRequirement;

use crate::partners;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Returns every family catalog.
///
/// # Errors
///
/// Returns [`FlightError`] when a catalog declares a malformed flight gate.
pub fn catalogs() -> Result<Vec<FamilyCatalog>, FlightError> {
    Ok(vec![
        payment_method::catalog()?,
        address::catalog()?,
        tax_id::catalog(),
        billing_group::catalog(),
        payment_instrument_selection::catalog()?,
    ])
}

// ============================================================================
// SECTION: Shared Builders
// ============================================================================

/// Starts a catalog with the family's named partner subsets.
fn catalog_with_partners(family: DescriptorFamily) -> FamilyCatalog {
    partners::partner_sets(family).into_iter().fold(FamilyCatalog::new(family), FamilyCatalog::partner_set)
}

/// Empty document carrying the standard identity.
fn document(description_type: &str) -> DocumentTemplate {
    DocumentTemplate::new([
        ("description_type", description_type),
        ("type", "{type}"),
        ("country", "{country}"),
        ("operation", "{operation}"),
    ])
}

/// Parses a flight gate that must name at least one flight.
fn flights(list: &str) -> Result<FlightRequirement, FlightError> {
    FlightRequirement::parse(list)?.ok_or_else(|| FlightError::InvalidName(list.to_string()))
}
