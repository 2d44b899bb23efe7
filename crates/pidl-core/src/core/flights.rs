// crates/pidl-core/src/core/flights.rs
// ============================================================================
// Module: PIDL Flights
// Description: Active flight sets and conjunctive flight requirements.
// Purpose: Gate fragments, validation rules, and transformations on flights.
// Dependencies: serde, smallvec, thiserror
// ============================================================================

//! ## Overview
//! A flight is an opaque feature token. Callers present a [`FlightSet`] with
//! each resolution; fragments and rules may carry a [`FlightRequirement`], a
//! conjunction of distinct flight names that must all be active.
//!
//! Flight names compare case-insensitively. Empty or whitespace-only entries
//! are ignored, so an empty list never satisfies a gated requirement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use smallvec::SmallVec;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing flight names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlightError {
    /// Flight name contains whitespace or a separator.
    #[error("invalid flight name: {0}")]
    InvalidName(String),
}

// ============================================================================
// SECTION: Flight Name
// ============================================================================

/// Normalized flight token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightName(String);

impl FlightName {
    /// Parses a single flight name.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError::InvalidName`] when the trimmed name contains
    /// whitespace or a comma.
    pub fn parse(raw: &str) -> Result<Option<Self>, FlightError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().any(|ch| ch.is_whitespace() || ch == ',') {
            return Err(FlightError::InvalidName(trimmed.to_string()));
        }
        Ok(Some(Self(trimmed.to_ascii_lowercase())))
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Flight Set
// ============================================================================

/// Set of flights active for one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightSet {
    /// Distinct normalized flight names.
    names: BTreeSet<FlightName>,
}

impl FlightSet {
    /// Creates an empty flight set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Builds a flight set from individual names.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError`] when a non-empty name is malformed.
    pub fn from_names<I, S>(names: I) -> Result<Self, FlightError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for raw in names {
            if let Some(name) = FlightName::parse(raw.as_ref())? {
                set.names.insert(name);
            }
        }
        Ok(set)
    }

    /// Parses a comma-separated flight list.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError`] when a segment is malformed.
    pub fn parse_list(list: &str) -> Result<Self, FlightError> {
        Self::from_names(list.split(','))
    }

    /// Returns the union of two sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            names: self.names.union(&other.names).cloned().collect(),
        }
    }

    /// Returns true when `name` is active.
    #[must_use]
    pub fn contains(&self, name: &FlightName) -> bool {
        self.names.contains(name)
    }

    /// Returns true when no flights are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the number of active flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterates over active flights in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &FlightName> {
        self.names.iter()
    }
}

// ============================================================================
// SECTION: Flight Requirement
// ============================================================================

/// Conjunction of distinct flights that must all be active.
///
/// # Invariants
/// - Holds at least one name.
/// - Names are distinct and sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRequirement {
    /// Required flight names.
    names: SmallVec<[FlightName; 2]>,
}

impl FlightRequirement {
    /// Parses a comma-joined requirement such as `"a,b"`.
    ///
    /// Returns `Ok(None)` when the list names no flights.
    ///
    /// # Errors
    ///
    /// Returns [`FlightError`] when a segment is malformed.
    pub fn parse(list: &str) -> Result<Option<Self>, FlightError> {
        let set = FlightSet::parse_list(list)?;
        if set.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            names: set.names.into_iter().collect(),
        }))
    }

    /// Returns true when every required flight is present in `active`.
    #[must_use]
    pub fn is_satisfied_by(&self, active: &FlightSet) -> bool {
        self.names.iter().all(|name| active.contains(name))
    }

    /// Iterates over required flight names.
    pub fn names(&self) -> impl Iterator<Item = &FlightName> {
        self.names.iter()
    }
}

impl fmt::Display for FlightRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.names.iter().map(FlightName::as_str).collect();
        f.write_str(&joined.join(","))
    }
}

impl Serialize for FlightRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlightRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("flight requirement names no flights"))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use proptest::prelude::*;

    use super::FlightRequirement;
    use super::FlightSet;

    #[test]
    fn whitespace_only_list_is_empty() {
        let set = FlightSet::from_names(["", "  ", "\t"]).unwrap();
        assert!(set.is_empty());
        assert!(FlightRequirement::parse(" , ,").unwrap().is_none());
    }

    #[test]
    fn conjunction_requires_every_distinct_name() {
        let requirement = FlightRequirement::parse("PXA,pxb,PXA").unwrap().unwrap();
        assert_eq!(requirement.to_string(), "pxa,pxb");
        assert!(!requirement.is_satisfied_by(&FlightSet::parse_list("pxa").unwrap()));
        assert!(requirement.is_satisfied_by(&FlightSet::parse_list("PXB, pxa").unwrap()));
    }

    #[test]
    fn interior_whitespace_is_rejected() {
        assert!(FlightSet::parse_list("good, bad name").is_err());
    }

    proptest! {
        #[test]
        fn parsed_lists_ignore_padding(names in proptest::collection::vec("[A-Za-z][A-Za-z0-9]{0,12}", 0..6)) {
            let padded: Vec<String> = names.iter().map(|name| format!("  {name} ")).collect();
            let set = FlightSet::parse_list(&padded.join(",")).unwrap();
            let plain = FlightSet::from_names(&names).unwrap();
            prop_assert_eq!(set, plain);
        }
    }
}
