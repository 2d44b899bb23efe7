// crates/pidl-core/tests/flights.rs
// ============================================================================
// Module: Flight Gating Tests
// Description: Property tests for flight parsing and conjunction matching.
// ============================================================================
//! ## Overview
//! Flight lists are parsed case-insensitively, blanks are ignored, and a
//! requirement holds only when every named flight is active.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap and panic for clarity."
)]

use pidl_core::FlightError;
use pidl_core::FlightRequirement;
use pidl_core::FlightSet;
use proptest::prelude::*;

fn flight_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,11}"
}

#[test]
fn blank_segments_are_ignored() {
    let set = FlightSet::parse_list(" , PXEnableA ,, ").unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(FlightRequirement::parse(" , ").unwrap(), None);
}

#[test]
fn embedded_whitespace_is_rejected() {
    assert_eq!(FlightSet::parse_list("PX Enable"), Err(FlightError::InvalidName("PX Enable".to_string())));
}

proptest! {
    #[test]
    fn requirement_holds_only_when_every_flight_is_active(
        required in prop::collection::btree_set(flight_name(), 1..4),
        drop_one in any::<bool>(),
    ) {
        let joined = required.iter().cloned().collect::<Vec<_>>().join(",");
        let requirement = FlightRequirement::parse(&joined).unwrap().unwrap();
        let mut active: Vec<String> = required.iter().map(|name| name.to_ascii_uppercase()).collect();
        let lowered: std::collections::BTreeSet<String> =
            required.iter().map(|name| name.to_ascii_lowercase()).collect();
        if drop_one && lowered.len() == required.len() {
            active.pop();
            let set = FlightSet::from_names(&active).unwrap();
            prop_assert!(!requirement.is_satisfied_by(&set));
        } else {
            active.push("unrelatedFlight".to_string());
            let set = FlightSet::from_names(&active).unwrap();
            prop_assert!(requirement.is_satisfied_by(&set));
        }
    }

    #[test]
    fn union_contains_both_sides(left in "[a-z]{1,6}", right in "[a-z]{1,6}") {
        let union = FlightSet::parse_list(&left).unwrap().union(&FlightSet::parse_list(&right).unwrap());
        prop_assert!(union.len() == 1 || union.len() == 2);
        let both = FlightRequirement::parse(&format!("{left},{right}")).unwrap().unwrap();
        prop_assert!(both.is_satisfied_by(&union));
    }
}
