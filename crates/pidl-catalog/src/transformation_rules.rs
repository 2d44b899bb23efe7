// crates/pidl-catalog/src/transformation_rules.rs
// ============================================================================
// Module: Catalog Transformation Rules
// Description: Submit-time transformations for phone and state properties.
// Purpose: Build the transformation table with its legacy phone identities.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Phone properties are normalized to E.164 before submit and Indian state
//! names are reduced to their initials. One mobile billing identity keeps the
//! lenient phone formatter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::LegacyPhoneTuple;
use pidl_core::OrderedMap;
use pidl_core::TransformationKind;
use pidl_core::TransformationRule;
use pidl_core::TransformationRuleTable;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Transformation target applied before submit.
pub const FOR_SUBMIT: &str = "forSubmit";

/// Returns the built-in transformation rules.
#[must_use]
pub fn rules() -> Vec<TransformationRule> {
    vec![
        TransformationRule::new("phone_number", FOR_SUBMIT, TransformationKind::ToPhoneNumberE164),
        TransformationRule::new("phoneNumber", FOR_SUBMIT, TransformationKind::ToPhoneNumberE164),
        TransformationRule::new("msisdn", FOR_SUBMIT, TransformationKind::ToPhoneNumberE164).for_description_type("data"),
        TransformationRule::new("region", FOR_SUBMIT, TransformationKind::IndiaStateFullNameToInitials).for_country("in"),
    ]
}

/// Identities that stay on the lenient phone formatter.
#[must_use]
pub fn legacy_phone() -> Vec<LegacyPhoneTuple> {
    vec![LegacyPhoneTuple {
        country: "de".to_string(),
        description_type: "data".to_string(),
        operation: "add".to_string(),
        type_name: "mobile_billing_non_sim_details".to_string(),
        property: "msisdn".to_string(),
        target: FOR_SUBMIT.to_string(),
    }]
}

/// Builds the transformation table.
#[must_use]
pub fn table(india_states: &OrderedMap<String>) -> TransformationRuleTable {
    TransformationRuleTable::new(rules(), legacy_phone(), india_states)
}
