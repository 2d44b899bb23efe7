// crates/pidl-catalog/src/tests.rs
// ============================================================================
// Module: PIDL Catalog Tests
// Description: Table-level checks for the built-in catalog.
// Purpose: Cover partner partitions, patterns, dictionaries, and phone rules.
// Dependencies: pidl-catalog, pidl-core, proptest, time
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap and panic for clarity."
)]

use std::collections::BTreeMap;

use pidl_core::DescriptorFamily;
use pidl_core::EngineTables;
use pidl_core::ExecutionStatus;
use pidl_core::FlightSet;
use pidl_core::OrderedMap;
use pidl_core::runtime::ValidatorQuery;
use proptest::prelude::*;
use time::Date;
use time::Month;

use super::ALL_PARTNERS;
use super::CatalogOptions;
use super::builtin_tables;
use super::dictionaries;
use super::partners;
use super::validation_rules;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn tables() -> EngineTables {
    let today = Date::from_calendar_date(2026, Month::March, 1).unwrap();
    builtin_tables(&CatalogOptions::on(today)).unwrap()
}

fn identity(country: &str, description_type: &str, operation: &str, type_name: &str) -> OrderedMap<String> {
    [("description_type", description_type), ("type", type_name), ("country", country), ("operation", operation)]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn matches(tables: &EngineTables, property: &str, country: &str, type_name: &str, value: &str) -> bool {
    let flights = FlightSet::new();
    let query = ValidatorQuery {
        property,
        region: country,
        operation: "add",
        descriptor_type: type_name,
        flights: &flights,
    };
    tables.validators.resolve(&query).unwrap().is_match(value)
}

// ============================================================================
// SECTION: Partners
// ============================================================================

#[test]
fn every_family_partitions_all_partners() {
    for family in DescriptorFamily::ALL {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for subset in partners::subsets(family) {
            for partner in subset.partners {
                if let Some(previous) = seen.insert(*partner, subset.name) {
                    panic!("{partner} is in both {previous} and {} for {}", subset.name, family.as_str());
                }
            }
        }
        for partner in ALL_PARTNERS {
            assert!(seen.contains_key(partner), "{partner} has no subset for {}", family.as_str());
        }
        assert_eq!(seen.len(), ALL_PARTNERS.len(), "unknown partner in {}", family.as_str());
    }
}

#[test]
fn not_applicable_subsets_are_registered() {
    let tables = tables();
    let amc = pidl_core::PartnerName::new("amc");
    assert!(tables.templates.is_not_applicable(DescriptorFamily::BillingGroup, &amc));
    assert!(!tables.templates.is_not_applicable(DescriptorFamily::TaxId, &amc));
    assert!(tables.templates.partner_set(DescriptorFamily::Address, "V3Address").is_some());
}

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Accepted and rejected samples for one pattern table entry.
type Samples = (&'static str, &'static [&'static str], &'static [&'static str]);

const COMMERCIAL_TAX_ID_SAMPLES: [Samples; 25] = [
    ("in", &["12ABCDE3456F7G8", "22AAAAA0000A1Z5"], &["12abcde3456F7GP"]),
    ("bh", &["212345678901234"], &["312345678901234", "21", "211222222232324242424242", "aBcDeFGHIjklMno"]),
    ("cm", &["A123456789000A", "a123456789000a"], &["a1234567890000", "a1A", "a12345678900000000", "1111"]),
    ("ge", &["123456789"], &["1234567890", "1", "A"]),
    ("gh", &["C1234567890"], &["C12345678901", "9867453", "C123456789"]),
    ("is", &["12345", "123456"], &["12345dd", "6", "AAAAA"]),
    ("ke", &["P052005205K", "P000000000c"], &["P052005205", "A000000000c"]),
    ("md", &["1234567"], &["123456", "AAAAAAA"]),
    ("ng", &["01012345-0001"], &["01012345", "12345678-0002"]),
    ("om", &["OM1234567890"], &["OM123456789", "MO1234567890"]),
    ("tj", &["123456789"], &["12345678", "1234567890"]),
    ("ua", &["123456789012", "1234567890", "123456789"], &["1234567890123"]),
    ("zw", &["12345678"], &["1234567", "AAAAAAAAAAAAA"]),
    ("fj", &["11-57252-0-3", "99-99999-9-9"], &["123-45678-90", "AB-CDEFG-H-I"]),
    ("gt", &["1234567-1"], &["123456-12"]),
    (
        "kh",
        &["L001-123456789", "B012-123456789", "K012-123456789", "E012-1234567890"],
        &["L123456789", "B1234556789", "A001-00000000"],
    ),
    ("ph", &["123-456-789", "123-456-789-012"], &["1234-56789"]),
    ("vn", &["1234567890", "1234567890-123"], &["12345678901-2"]),
    ("ae", &["123456789012345"], &["12345678901234"]),
    ("sa", &["123456789012345"], &["12345678901234"]),
    ("co", &["123456789-1", "123.123.123-1", "1234567"], &["12345-1", "123.13.123-1", "12345"]),
    ("ci", &["CI1234567A"], &["CI12345678", "12345678"]),
    ("sn", &["1234567890123"], &["12309874568977", "ABC1234567890"]),
    ("zm", &["1001234567"], &["1234567890", "1007890", "100A191919"]),
    ("la", &["123456789012"], &["1234567890123", "12345678901", "A23456789012"]),
];

const CONSUMER_TAX_ID_SAMPLES: [Samples; 2] = [
    ("br", &["123.456.789-09", "12345678909"], &["1234567890", "123.456.789-0"]),
    ("it", &["RSSMRA85T10A562S", "rssmra85t10a562s"], &["RSSMRA85T10A562", "RSSMRA8XT10A562S"]),
];

const CARD_SAMPLES: [Samples; 4] = [
    ("visa", &["4111111111111111", "4222222222222"], &["5111111111111111", "41111111111111"]),
    ("mc", &["5555555555554444", "2221000000000009"], &["5055555555554444", "4111111111111111"]),
    ("amex", &["378282246310005", "341111111111111"], &["361111111111111", "4111111111111111"]),
    ("discover", &["6011111111111117", "6500000000000002"], &["6011111111111", "6211111111111111"]),
];

const POSTAL_CODE_SAMPLES: [Samples; 8] = [
    ("us", &["98052", "98052-6399"], &["9805", "980526399"]),
    ("ca", &["K1A 0B1", "k1a0b1"], &["K1A-0B1", "123 456"]),
    ("gb", &["SW1A 1AA", "M1 1AE"], &["SW1A-1AA", "12345"]),
    ("de", &["10115"], &["1011", "D-10115"]),
    ("fr", &["75008"], &["750080"]),
    ("in", &["560001"], &["060001", "56000"]),
    ("br", &["01310-100", "01310100"], &["01310-10"]),
    ("jp", &["100-0001", "1000001"], &["100-001"]),
];

/// Checks every entry of `patterns` against its samples.
///
/// `scope` maps a table key to the (region, descriptor type) it is queried
/// with.
fn assert_samples(
    property: &str,
    patterns: &[(&str, &str)],
    samples: &[Samples],
    scope: fn(&'static str) -> (&'static str, &'static str),
) {
    let tables = tables();
    let keys: Vec<&str> = patterns.iter().map(|(key, _)| *key).collect();
    let sampled: Vec<&str> = samples.iter().map(|(key, _, _)| *key).collect();
    assert_eq!(keys, sampled, "{property} samples must cover every pattern in order");
    for (key, valid, invalid) in samples {
        let (region, descriptor_type) = scope(*key);
        for value in *valid {
            assert!(matches(&tables, property, region, descriptor_type, value), "{property}/{key} rejected {value}");
        }
        for value in *invalid {
            assert!(!matches(&tables, property, region, descriptor_type, value), "{property}/{key} accepted {value}");
        }
    }
}

#[test]
fn commercial_tax_id_patterns_match_their_samples() {
    assert_samples(
        validation_rules::COMMERCIAL_TAX_ID,
        &validation_rules::COMMERCIAL_TAX_ID_PATTERNS,
        &COMMERCIAL_TAX_ID_SAMPLES,
        |country| (country, "commercial_tax_id"),
    );
}

#[test]
fn consumer_tax_id_patterns_match_their_samples() {
    assert_samples(
        validation_rules::CONSUMER_TAX_ID,
        &validation_rules::CONSUMER_TAX_ID_PATTERNS,
        &CONSUMER_TAX_ID_SAMPLES,
        |country| (country, "consumer_tax_id"),
    );
}

#[test]
fn card_patterns_match_their_samples() {
    assert_samples(validation_rules::ACCOUNT_TOKEN, &validation_rules::CARD_PATTERNS, &CARD_SAMPLES, |card| ("us", card));
}

#[test]
fn postal_code_patterns_match_their_samples() {
    assert_samples(
        validation_rules::POSTAL_CODE,
        &validation_rules::POSTAL_CODE_PATTERNS,
        &POSTAL_CODE_SAMPLES,
        |country| (country, "billing"),
    );
}

#[test]
fn commercial_tax_id_falls_back_to_global_pattern() {
    let tables = tables();
    assert!(matches(&tables, validation_rules::COMMERCIAL_TAX_ID, "de", "commercial_tax_id", "DE123456789"));
    assert!(!matches(&tables, validation_rules::COMMERCIAL_TAX_ID, "de", "commercial_tax_id", " leading-space"));
}

#[test]
fn cvv_length_follows_descriptor_type() {
    let tables = tables();
    assert!(matches(&tables, validation_rules::CVV, "us", "amex", "1234"));
    assert!(!matches(&tables, validation_rules::CVV, "us", "visa", "1234"));
    assert!(matches(&tables, validation_rules::CVV, "us", "visa", "123"));
}

#[test]
fn postal_codes_validate_per_market() {
    let tables = tables();
    let flights = FlightSet::new();
    let us = identity("us", "address", "add", "billing");
    assert!(tables.validate_property(validation_rules::POSTAL_CODE, &us, "98052-6399", &flights).is_passed());
    let rejected = tables.validate_property(validation_rules::POSTAL_CODE, &us, "9805", &flights);
    assert_eq!(rejected.status, ExecutionStatus::Failed);
    assert_eq!(rejected.error_code.as_deref(), Some("InvalidPostalCode"));
    let gb = identity("gb", "address", "add", "billing");
    assert!(tables.validate_property(validation_rules::POSTAL_CODE, &gb, "SW1A 1AA", &flights).is_passed());
}

// ============================================================================
// SECTION: Dictionaries
// ============================================================================

#[test]
fn expiry_years_follow_injected_date() {
    let tables = tables();
    let years = tables.dictionaries.get_dictionary("{}YearsExpiry4Digit").unwrap();
    assert_eq!(years.len(), 25);
    assert_eq!(years.keys().next().map(String::as_str), Some("2025"));
    assert_eq!(years.keys().last().map(String::as_str), Some("2049"));
    let short = tables.dictionaries.get_dictionary("{}YearsExpiry").unwrap();
    assert_eq!(short.get("2025").map(String::as_str), Some("25"));
}

#[test]
fn authored_dictionaries_keep_declaration_order() {
    let tables = tables();
    let months = tables.dictionaries.get_dictionary("{}Months").unwrap();
    assert_eq!(months.keys().next().map(String::as_str), Some("01"));
    assert_eq!(months.len(), 12);
    let states = tables.dictionaries.get_dictionary(&format!("{{}}{}", dictionaries::INDIA_STATES)).unwrap();
    assert_eq!(states.get("Karnataka").map(String::as_str), Some("KA"));
}

// ============================================================================
// SECTION: Phone and Transformations
// ============================================================================

#[test]
fn phone_service_validation_uses_market_plans() {
    let tables = tables();
    assert!(tables.validate_phone("phonenumber.us", "(425) 555-0100").is_passed());
    assert!(tables.validate_phone("phonenumber.us", "+1 425 555 0100").is_passed());
    assert!(tables.validate_phone("phonenumber.de", "030 1234567").is_passed());
    let unsupported = tables.validate_phone("phonenumber.zz", "12345678");
    assert_eq!(unsupported.error_code.as_deref(), Some(pidl_core::runtime::phone::COUNTRY_CODE_NOT_SUPPORTED));
    let short = tables.validate_phone("phonenumber.us", "555-0100");
    assert_eq!(short.status, ExecutionStatus::Failed);
}

#[test]
fn phone_properties_route_to_the_phone_service() {
    let tables = tables();
    let flights = FlightSet::new();
    let mobile = identity("in", "data", "add", "mobile_billing_non_sim_details");
    assert!(tables.validate_property("msisdn", &mobile, "098765 43210", &flights).is_passed());
    assert!(!tables.validate_property("msisdn", &mobile, "12345", &flights).is_passed());
}

#[test]
fn phone_numbers_transform_to_e164() {
    let tables = tables();
    let flights = FlightSet::new();
    let address = identity("us", "address", "add", "billing");
    let result = tables.transform("phone_number", "(425) 555-0100", &address, "forSubmit", &flights);
    assert_eq!(result.transformed_value.as_deref(), Some("+14255550100"));
}

#[test]
fn legacy_identity_keeps_lenient_formatting() {
    let tables = tables();
    let flights = FlightSet::new();
    let legacy = identity("de", "data", "add", "mobile_billing_non_sim_details");
    let result = tables.transform("msisdn", "0151 2345 678901", &legacy, "forSubmit", &flights);
    assert_eq!(result.transformed_value.as_deref(), Some("+491512345678901"));
    let strict = identity("de", "data", "update", "mobile_billing_non_sim_details");
    let result = tables.transform("msisdn", "0151 2345 678901", &strict, "forSubmit", &flights);
    assert_eq!(result.status, ExecutionStatus::Failed);
}

#[test]
fn india_state_names_transform_to_initials() {
    let tables = tables();
    let flights = FlightSet::new();
    let address = identity("in", "address", "add", "billing");
    let result = tables.transform("region", "tamil nadu", &address, "forSubmit", &flights);
    assert_eq!(result.transformed_value.as_deref(), Some("TN"));
    let passthrough = tables.transform("region", "ka", &address, "forSubmit", &flights);
    assert_eq!(passthrough.transformed_value.as_deref(), Some("KA"));
    let other_market = identity("us", "address", "add", "billing");
    let result = tables.transform("region", "Karnataka", &other_market, "forSubmit", &flights);
    assert_eq!(result.status, ExecutionStatus::Failed);
}

proptest! {
    #[test]
    fn every_partner_lands_in_exactly_one_subset(index in 0..ALL_PARTNERS.len()) {
        let partner = ALL_PARTNERS[index];
        for family in DescriptorFamily::ALL {
            let hits = partners::subsets(family).iter().filter(|subset| subset.partners.contains(&partner)).count();
            prop_assert_eq!(hits, 1);
        }
    }
}
