// crates/pidl-core/src/core/ordered_map.rs
// ============================================================================
// Module: PIDL Ordered Map
// Description: Insertion-ordered string-keyed map used across descriptor data.
// Purpose: Keep dictionary and data description ordering stable on round trip.
// Dependencies: indexmap
// ============================================================================

//! ## Overview
//! Descriptor documents are sensitive to declaration order: dictionaries,
//! data descriptions, and data sources must serialize in the order they were
//! authored. [`OrderedMap`] names the [`IndexMap`] shape used for all of them.
//!
//! Removal must go through `shift_remove` so the remaining entries keep their
//! relative order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;

// ============================================================================
// SECTION: Ordered Map
// ============================================================================

/// String-keyed map that iterates and serializes in insertion order.
pub type OrderedMap<V> = IndexMap<String, V>;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::OrderedMap;

    fn map(entries: &[(&str, &str)]) -> OrderedMap<String> {
        entries.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
    }

    #[test]
    fn insert_existing_key_keeps_position() {
        let mut map = map(&[("b", "1"), ("a", "2")]);
        map.insert("b".to_string(), "9".to_string());
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("b").map(String::as_str), Some("9"));
    }

    #[test]
    fn shift_remove_keeps_remaining_order() {
        let mut map = map(&[("a", "1"), ("b", "2"), ("c", "3")]);
        map.shift_remove("a");
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn json_round_trip_preserves_declaration_order() {
        let map = map(&[("zeta", "1"), ("alpha", "2"), ("mid", "3")]);
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"zeta":"1","alpha":"2","mid":"3"}"#);
        let back: OrderedMap<String> = serde_json::from_str(&text).unwrap();
        assert!(back.iter().eq(map.iter()));
    }
}
