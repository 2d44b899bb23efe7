// crates/pidl-catalog/src/validation_rules.rs
// ============================================================================
// Module: Catalog Validation Rules
// Description: Regex validators for tax ids, cards, postal codes, and fields.
// Purpose: Feed the validation rule chain with per-market patterns.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Rules are declared per property. Market rules come first, then
//! descriptor-type rules, then one global default per property so a lookup
//! never falls through for a property the templates validate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::RuleScope;
use pidl_core::ValidationRule;

// ============================================================================
// SECTION: Property Names
// ============================================================================

/// Rule property for commercial tax identifiers.
pub const COMMERCIAL_TAX_ID: &str = "commercialTaxId";
/// Rule property for consumer tax identifiers.
pub const CONSUMER_TAX_ID: &str = "consumerTaxId";
/// Card number property.
pub const ACCOUNT_TOKEN: &str = "accountToken";
/// Card security code property.
pub const CVV: &str = "cvv";
/// Postal code property.
pub const POSTAL_CODE: &str = "postal_code";

/// Error code shared by tax identifier rules.
const INVALID_TAX_ID: &str = "InvalidTaxId";

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Commercial tax identifier pattern per market.
pub const COMMERCIAL_TAX_ID_PATTERNS: [(&str, &str); 25] = [
    ("in", r"^[0-9]{2}[0-9A-Z]{5}[0-9]{4}[0-9A-Z]{4}$"),
    ("bh", r"^2\d{14}$"),
    ("cm", r"^[A-Za-z]{1}\d{12}[A-Za-z]{1}$"),
    ("ge", r"^\d{9}$"),
    ("gh", r"^C\d{10}$"),
    ("is", r"^\d{5}$|^\d{6}$"),
    ("ke", r"^P\d{9}[A-Za-z]$"),
    ("md", r"^\d{7}$"),
    ("ng", r"^\d{8}-0001$"),
    ("om", r"^OM\d{10}$"),
    ("tj", r"^\d{9}$"),
    ("ua", r"^\d{12}$|^\d{10}$|^\d{9}$"),
    ("zw", r"^\d{8}$"),
    ("fj", r"^\d{2}\-\d{5}\-\d{1}\-\d{1}$"),
    ("gt", r"^\d{7}\-[0-9]$"),
    ("kh", r"^L001\-\d{9}$|^B0\d{2}\-\d{9}$|^K0\d{2}\-\d{9}$|^E0\d{2}\-\d{10}$"),
    ("ph", r"^\d{3}\-\d{3}\-\d{3}$|^\d{3}\-\d{3}\-\d{3}\-\d{3}$"),
    ("vn", r"^\d{10}$|^\d{10}\-\d{3}$"),
    ("ae", r"^\d{15}$"),
    ("sa", r"^\d{15}$"),
    ("co", r"^\d{9}\-\d{1}$|^\d{3}\.\d{3}\.\d{3}\-\d{1}$|^\d{6,11}$"),
    ("ci", r"^CI\d{7}[A-Za-z]$"),
    ("sn", r"^\d{13}$"),
    ("zm", r"^100\d{7}$"),
    ("la", r"^\d{12}$"),
];

/// Consumer tax identifier pattern per market.
pub const CONSUMER_TAX_ID_PATTERNS: [(&str, &str); 2] = [
    ("br", r"^\d{3}\.\d{3}\.\d{3}\-\d{2}$|^\d{11}$"),
    ("it", r"^[A-Za-z]{6}\d{2}[A-Za-z]\d{2}[A-Za-z]\d{3}[A-Za-z]$"),
];

/// Card number pattern per card type.
pub const CARD_PATTERNS: [(&str, &str); 4] = [
    ("visa", r"^4\d{12}(\d{3})?$"),
    ("mc", r"^(5[1-5]\d{4}|222[1-9]\d{2}|22[3-9]\d{3}|2[3-6]\d{4}|27[01]\d{3}|2720\d{2})\d{10}$"),
    ("amex", r"^3[47]\d{13}$"),
    ("discover", r"^6(011|5\d{2})\d{12}$"),
];

/// Postal code pattern per market.
pub const POSTAL_CODE_PATTERNS: [(&str, &str); 8] = [
    ("us", r"^\d{5}(-\d{4})?$"),
    ("ca", r"^[A-Za-z]\d[A-Za-z] ?\d[A-Za-z]\d$"),
    ("gb", r"^[A-Za-z]{1,2}\d[A-Za-z\d]? ?\d[A-Za-z]{2}$"),
    ("de", r"^\d{5}$"),
    ("fr", r"^\d{5}$"),
    ("in", r"^[1-9]\d{5}$"),
    ("br", r"^\d{5}-?\d{3}$"),
    ("jp", r"^\d{3}-?\d{4}$"),
];

/// Global defaults for free-form properties.
const FIELD_DEFAULTS: [(&str, &str); 8] = [
    ("accountHolderName", r"^.{1,256}$"),
    ("address_line1", r"^.{1,256}$"),
    ("city", r"^.{1,128}$"),
    ("region", r"^.{0,128}$"),
    ("poNumber", r"^.{0,100}$"),
    ("billingGroupName", r"^.{1,128}$"),
    ("companyName", r"^.{1,256}$"),
    ("email", r"^[^@\s]+@[^@\s]+\.[^@\s]+$"),
];

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Returns every built-in validation rule in declaration order.
#[must_use]
pub fn rules() -> Vec<ValidationRule> {
    let mut rules = Vec::new();
    rules.extend(COMMERCIAL_TAX_ID_PATTERNS.iter().map(|(country, pattern)| {
        region(COMMERCIAL_TAX_ID, country, pattern).with_error(INVALID_TAX_ID, "Enter a valid tax ID.")
    }));
    rules.push(
        ValidationRule::new(COMMERCIAL_TAX_ID, RuleScope::Global, r"^[A-Za-z0-9][A-Za-z0-9 ./\-]{0,39}$")
            .with_error(INVALID_TAX_ID, "Enter a valid tax ID."),
    );
    rules.extend(CONSUMER_TAX_ID_PATTERNS.iter().map(|(country, pattern)| {
        region(CONSUMER_TAX_ID, country, pattern).with_error(INVALID_TAX_ID, "Enter a valid tax ID.")
    }));
    rules.push(
        ValidationRule::new(CONSUMER_TAX_ID, RuleScope::Global, r"^.{1,50}$")
            .with_error(INVALID_TAX_ID, "Enter a valid tax ID."),
    );
    rules.extend(CARD_PATTERNS.iter().map(|(card, pattern)| {
        ValidationRule::new(ACCOUNT_TOKEN, RuleScope::DescriptorType((*card).to_string()), *pattern)
            .with_error("InvalidCardNumber", "Check your card number.")
    }));
    rules.push(
        ValidationRule::new(ACCOUNT_TOKEN, RuleScope::Global, r"^\d{12,19}$")
            .with_error("InvalidCardNumber", "Check your card number."),
    );
    rules.push(ValidationRule::new(CVV, RuleScope::DescriptorType("amex".to_string()), r"^\d{4}$"));
    rules.push(ValidationRule::new(CVV, RuleScope::Global, r"^\d{3}$"));
    rules.extend(POSTAL_CODE_PATTERNS.iter().map(|(country, pattern)| {
        region(POSTAL_CODE, country, pattern).with_error("InvalidPostalCode", "Check your postal code.")
    }));
    rules.push(ValidationRule::new(POSTAL_CODE, RuleScope::Global, r"^.{0,20}$"));
    rules.extend(FIELD_DEFAULTS.iter().map(|(property, pattern)| ValidationRule::new(*property, RuleScope::Global, *pattern)));
    rules
}

/// Builds a market-scoped rule.
fn region(property: &str, country: &str, pattern: &str) -> ValidationRule {
    ValidationRule::new(property, RuleScope::Region(country.to_string()), pattern)
}
