// crates/pidl-catalog/tests/resolution_laws.rs
// ============================================================================
// Module: Built-In Resolution Law Tests
// Description: Sweeps the built-in catalog for round trip and flight gating.
// ============================================================================
//! ## Overview
//! Resolves a bounded grid of keys over every family and partner and checks
//! that each result survives an encode and decode byte for byte. Flight-gated
//! fragments are checked by diffing the flighted and plain results.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions use unwrap and panic for clarity."
)]

use pidl_catalog::ALL_PARTNERS;
use pidl_catalog::CatalogOptions;
use pidl_catalog::builtin_tables;
use pidl_catalog::families::address::AVS_SUGGEST_FLIGHT;
use pidl_catalog::families::address::JARVIS_V3_FLIGHT;
use pidl_catalog::families::billing_group::PO_NUMBER_SCENARIO;
use pidl_catalog::families::payment_instrument_selection::INDIA_TOKENIZATION_MESSAGE_FLIGHT;
use pidl_catalog::families::tax_id::WITH_COUNTRY_DROPDOWN;
use pidl_core::DescriptorDocument;
use pidl_core::DescriptorFamily;
use pidl_core::EngineTables;
use pidl_core::FlightSet;
use pidl_core::NoopAuditSink;
use pidl_core::ResolutionEngine;
use pidl_core::ResolutionKey;
use pidl_core::core::display::remove_node;
use pidl_core::round_trips;
use pidl_core::serialize_documents;
use time::Date;
use time::Month;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Flight enabling the India card tokenization consent text.
const CONSENT_FLIGHT: &str = "IndiaTokenizationConsentCapture";

const COUNTRIES: [&str; 5] = ["us", "in", "tw", "tr", "de"];

/// Operations, descriptor types and scenarios swept for one family.
struct Grid {
    operations: &'static [&'static str],
    types: &'static [Option<&'static str>],
    scenarios: &'static [Option<&'static str>],
}

fn grid(family: DescriptorFamily) -> Grid {
    match family {
        DescriptorFamily::PaymentMethod => Grid {
            operations: &["add", "update"],
            types: &[Some("visa"), Some("amex")],
            scenarios: &[None],
        },
        DescriptorFamily::Address => Grid {
            operations: &["add", "update"],
            types: &[Some("billing"), Some("shipping_v3"), Some("px_v3_billing"), Some("hapiServiceUsageAddress")],
            scenarios: &[None],
        },
        DescriptorFamily::TaxId => Grid {
            operations: &["add", "update"],
            types: &[Some("commercial_tax_id"), Some("consumer_tax_id")],
            scenarios: &[None, Some(WITH_COUNTRY_DROPDOWN)],
        },
        DescriptorFamily::BillingGroup => Grid {
            operations: &["add", "update", "selectinstance"],
            types: &[Some("lightweight"), Some("lightweightv7")],
            scenarios: &[None, Some(PO_NUMBER_SCENARIO)],
        },
        DescriptorFamily::PaymentInstrumentSelection => Grid {
            operations: &["select"],
            types: &[None],
            scenarios: &[None],
        },
    }
}

fn tables() -> EngineTables {
    let today = Date::from_calendar_date(2026, Month::March, 1).unwrap();
    builtin_tables(&CatalogOptions::on(today)).unwrap()
}

fn every_flight() -> FlightSet {
    FlightSet::from_names([JARVIS_V3_FLIGHT, AVS_SUGGEST_FLIGHT, INDIA_TOKENIZATION_MESSAGE_FLIGHT, CONSENT_FLIGHT])
        .unwrap()
}

#[allow(clippy::too_many_arguments, reason = "Mirrors the swept key axes.")]
fn key(
    family: DescriptorFamily,
    country: &str,
    operation: &str,
    partner: &str,
    type_name: Option<&str>,
    scenario: Option<&str>,
    flights: &FlightSet,
) -> ResolutionKey {
    let mut builder = ResolutionKey::builder(country, operation, partner).flights(flights.clone());
    if family == DescriptorFamily::PaymentMethod {
        builder = builder.family("credit_card");
    }
    if family == DescriptorFamily::TaxId {
        builder = builder.profile_type("organization");
    }
    if let Some(type_name) = type_name {
        builder = builder.type_name(type_name);
    }
    if let Some(scenario) = scenario {
        builder = builder.scenario(scenario);
    }
    builder.build()
}

/// Removes `hint_id` from every document's display tree.
fn without_node(mut documents: Vec<DescriptorDocument>, hint_id: &str) -> Vec<DescriptorDocument> {
    for document in &mut documents {
        if let Some(display) = document.display_description.as_mut() {
            remove_node(display, hint_id);
        }
    }
    documents
}

// ============================================================================
// SECTION: Round Trip
// ============================================================================

#[test]
fn every_resolvable_key_round_trips() {
    let tables = tables();
    let engine = ResolutionEngine::new(&tables, NoopAuditSink);
    let flight_sets = [FlightSet::new(), every_flight()];
    for family in DescriptorFamily::ALL {
        let grid = grid(family);
        let mut resolved = 0_usize;
        for partner in ALL_PARTNERS {
            for country in COUNTRIES {
                for operation in grid.operations {
                    for type_name in grid.types {
                        for scenario in grid.scenarios {
                            for flights in &flight_sets {
                                let key = key(family, country, operation, partner, *type_name, *scenario, flights);
                                let Ok(documents) = engine.resolve(family, &key, None) else {
                                    continue;
                                };
                                resolved += 1;
                                assert!(
                                    round_trips(&documents).unwrap(),
                                    "{} {country}/{operation}/{partner}/{type_name:?}/{scenario:?} does not round trip",
                                    family.as_str()
                                );
                            }
                        }
                    }
                }
            }
        }
        assert!(resolved > 0, "nothing resolved for {}", family.as_str());
    }
}

// ============================================================================
// SECTION: Flight Gating
// ============================================================================

#[test]
fn consent_flight_only_adds_the_consent_text() {
    let tables = tables();
    let engine = ResolutionEngine::new(&tables, NoopAuditSink);
    let flights = FlightSet::from_names([CONSENT_FLIGHT]).unwrap();
    for partner in ["cart", "webblends"] {
        let plain = key(DescriptorFamily::PaymentMethod, "in", "add", partner, Some("visa"), None, &FlightSet::new());
        let flighted = key(DescriptorFamily::PaymentMethod, "in", "add", partner, Some("visa"), None, &flights);
        let plain = engine.resolve(DescriptorFamily::PaymentMethod, &plain, None).unwrap();
        let flighted = engine.resolve(DescriptorFamily::PaymentMethod, &flighted, None).unwrap();
        assert_ne!(plain, flighted, "{partner} ignored the consent flight");
        let stripped = without_node(flighted, "tokenizationConsentText");
        assert_eq!(stripped, plain, "{partner} differs beyond the consent text");
        assert_eq!(serialize_documents(&stripped).unwrap(), serialize_documents(&plain).unwrap());
    }
}

#[test]
fn selection_message_flight_only_adds_the_message_group() {
    let tables = tables();
    let engine = ResolutionEngine::new(&tables, NoopAuditSink);
    let flights = FlightSet::from_names([INDIA_TOKENIZATION_MESSAGE_FLIGHT]).unwrap();
    let family = DescriptorFamily::PaymentInstrumentSelection;
    let plain = key(family, "in", "select", "webblends", None, None, &FlightSet::new());
    let flighted = key(family, "in", "select", "webblends", None, None, &flights);
    let plain = engine.resolve(family, &plain, None).unwrap();
    let flighted = engine.resolve(family, &flighted, None).unwrap();
    assert_ne!(plain, flighted);
    let stripped = without_node(flighted, "paymentInstrumentSelectMessageGroup");
    assert_eq!(serialize_documents(&stripped).unwrap(), serialize_documents(&plain).unwrap());
}
