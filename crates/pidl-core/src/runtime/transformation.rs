// crates/pidl-core/src/runtime/transformation.rs
// ============================================================================
// Module: PIDL Transformation Rules
// Description: Flight-gated value rewriting for submit and display targets.
// Purpose: Normalize phone numbers and state names before submission.
// Dependencies: crate::core::{flights, ordered_map}, crate::runtime::phone, serde
// ============================================================================

//! ## Overview
//! A transformation rule maps (property, target) plus optional identity
//! filters to a [`TransformationKind`]. The most specific satisfied rule wins;
//! ties go to the last declaration. Results are status values: unknown
//! combinations and unparseable input return `Failed` rather than raising.
//!
//! `ToPhoneNumberE164` runs the strict parser by default. Identity tuples
//! listed as legacy stay on the lenient formatter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::flights::FlightRequirement;
use crate::core::flights::FlightSet;
use crate::core::ordered_map::OrderedMap;
use crate::runtime::phone::ExecutionStatus;
use crate::runtime::phone::PhoneError;
use crate::runtime::phone::PhoneNumberValidator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// No rule matched the request.
pub const TRANSFORMATION_NOT_SUPPORTED: &str = "TransformationNotSupported";

/// State name is not in the state dictionary.
pub const INVALID_STATE_NAME: &str = "InvalidStateName";

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Supported transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformationKind {
    /// E.164 phone formatting; strict unless the identity is legacy.
    ToPhoneNumberE164,
    /// Strict E.164 phone formatting.
    ToPhoneNumberE164VNext,
    /// Indian state full name to two-letter code.
    IndiaStateFullNameToInitials,
}

impl TransformationKind {
    /// Returns the transformation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToPhoneNumberE164 => "ToPhoneNumberE164",
            Self::ToPhoneNumberE164VNext => "ToPhoneNumberE164VNext",
            Self::IndiaStateFullNameToInitials => "IndiaStateFullNameToInitials",
        }
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformationKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        [Self::ToPhoneNumberE164, Self::ToPhoneNumberE164VNext, Self::IndiaStateFullNameToInitials]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown transformation: {raw}"))
    }
}

// ============================================================================
// SECTION: Identity and Results
// ============================================================================

/// Identity of the document that owns the transformed property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationIdentity {
    /// Market code.
    pub country: String,
    /// Description type.
    pub description_type: String,
    /// Operation.
    pub operation: String,
    /// Descriptor type.
    pub type_name: String,
}

impl TransformationIdentity {
    /// Builds an identity from map entries. `country_code` is read as `country`.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut identity = Self::default();
        for (key, value) in pairs {
            let value = value.trim().to_ascii_lowercase();
            match key.trim().to_ascii_lowercase().as_str() {
                "country" | "country_code" => identity.country = value,
                "description_type" => identity.description_type = value,
                "operation" => identity.operation = value,
                "type" => identity.type_name = value,
                _ => {}
            }
        }
        identity
    }

    /// Builds an identity from a document identity map.
    #[must_use]
    pub fn from_map(map: &OrderedMap<String>) -> Self {
        Self::from_pairs(map.iter().map(|(key, value)| (key.as_str(), value.as_str())))
    }
}

/// Result of a transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    /// Outcome.
    pub status: ExecutionStatus,
    /// Rewritten value when passed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed_value: Option<String>,
    /// Error code when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Error message when failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TransformationResult {
    /// Passed result carrying `value`.
    #[must_use]
    pub const fn passed(value: String) -> Self {
        Self {
            status: ExecutionStatus::Passed,
            transformed_value: Some(value),
            error_code: None,
            error_message: None,
        }
    }

    /// Failed result.
    #[must_use]
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            transformed_value: None,
            error_code: Some(code.into()),
            error_message: Some(message.into()),
        }
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Declared transformation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationRule {
    /// Property name.
    pub property: String,
    /// Target such as `forSubmit` or `forDisplay`.
    pub target: String,
    /// Transformation.
    pub kind: TransformationKind,
    /// Country filter.
    pub country: Option<String>,
    /// Description type filter.
    pub description_type: Option<String>,
    /// Descriptor type filter.
    pub type_name: Option<String>,
    /// Flight requirement.
    pub flights: Option<FlightRequirement>,
}

impl TransformationRule {
    /// Creates an unfiltered rule.
    #[must_use]
    pub fn new(property: impl Into<String>, target: impl Into<String>, kind: TransformationKind) -> Self {
        Self {
            property: property.into(),
            target: target.into(),
            kind,
            country: None,
            description_type: None,
            type_name: None,
            flights: None,
        }
    }

    /// Restricts the rule to a country.
    #[must_use]
    pub fn for_country(mut self, country: &str) -> Self {
        self.country = Some(country.to_ascii_lowercase());
        self
    }

    /// Restricts the rule to a description type.
    #[must_use]
    pub fn for_description_type(mut self, description_type: &str) -> Self {
        self.description_type = Some(description_type.to_ascii_lowercase());
        self
    }

    /// Restricts the rule to a descriptor type.
    #[must_use]
    pub fn for_type(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_ascii_lowercase());
        self
    }

    /// Gates the rule on flights.
    #[must_use]
    pub fn with_flights(mut self, requirement: FlightRequirement) -> Self {
        self.flights = Some(requirement);
        self
    }

    /// Returns true when the rule applies.
    fn matches(&self, property: &str, target: &str, identity: &TransformationIdentity, flights: &FlightSet) -> bool {
        self.property == property
            && self.target.eq_ignore_ascii_case(target)
            && self.country.as_ref().is_none_or(|country| *country == identity.country)
            && self.description_type.as_ref().is_none_or(|value| *value == identity.description_type)
            && self.type_name.as_ref().is_none_or(|value| *value == identity.type_name)
            && self.flights.as_ref().is_none_or(|requirement| requirement.is_satisfied_by(flights))
    }

    /// Number of identity filters plus a flight gate.
    fn specificity(&self) -> usize {
        [self.country.is_some(), self.description_type.is_some(), self.type_name.is_some(), self.flights.is_some()]
            .into_iter()
            .filter(|set| *set)
            .count()
    }
}

/// Identity tuple kept on the legacy phone formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPhoneTuple {
    /// Market code.
    pub country: String,
    /// Description type.
    pub description_type: String,
    /// Operation.
    pub operation: String,
    /// Descriptor type.
    pub type_name: String,
    /// Property name.
    pub property: String,
    /// Target.
    pub target: String,
}

impl LegacyPhoneTuple {
    /// Returns true when the request identity equals the tuple.
    fn matches(&self, property: &str, target: &str, identity: &TransformationIdentity) -> bool {
        self.country == identity.country
            && self.description_type == identity.description_type
            && self.operation == identity.operation
            && self.type_name == identity.type_name
            && self.property == property
            && self.target.eq_ignore_ascii_case(target)
    }
}

/// One transformation request.
#[derive(Debug, Clone, Copy)]
pub struct TransformationRequest<'a> {
    /// Property name.
    pub property: &'a str,
    /// Raw value.
    pub value: &'a str,
    /// Owning document identity.
    pub identity: &'a TransformationIdentity,
    /// Target.
    pub target: &'a str,
    /// Active flights.
    pub flights: &'a FlightSet,
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Transformation rules with their supporting data.
#[derive(Debug, Clone, Default)]
pub struct TransformationRuleTable {
    /// Rules in declaration order.
    rules: Vec<TransformationRule>,
    /// Identities kept on the legacy phone formatter.
    legacy_phone: Vec<LegacyPhoneTuple>,
    /// Uppercase state names to initials.
    india_states: OrderedMap<String>,
}

impl TransformationRuleTable {
    /// Creates a table. State names are matched case-insensitively.
    #[must_use]
    pub fn new(
        rules: Vec<TransformationRule>,
        legacy_phone: Vec<LegacyPhoneTuple>,
        india_states: &OrderedMap<String>,
    ) -> Self {
        Self {
            rules,
            legacy_phone,
            india_states: india_states
                .iter()
                .map(|(name, initials)| (name.to_ascii_uppercase(), initials.to_ascii_uppercase()))
                .collect(),
        }
    }

    /// Returns the rule that applies to the request.
    #[must_use]
    pub fn find_rule(&self, request: &TransformationRequest<'_>) -> Option<&TransformationRule> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(request.property, request.target, request.identity, request.flights))
            .max_by_key(|(index, rule)| (rule.specificity(), *index))
            .map(|(_, rule)| rule)
    }

    /// Applies the matching transformation.
    #[must_use]
    pub fn transform(&self, phone: &PhoneNumberValidator, request: &TransformationRequest<'_>) -> TransformationResult {
        let Some(rule) = self.find_rule(request) else {
            return TransformationResult::failed(
                TRANSFORMATION_NOT_SUPPORTED,
                format!("no transformation for property {} and target {}", request.property, request.target),
            );
        };
        let country = &request.identity.country;
        match rule.kind {
            TransformationKind::ToPhoneNumberE164 if self.is_legacy(request) => {
                phone_result(phone.to_e164_lenient(country, request.value))
            }
            TransformationKind::ToPhoneNumberE164 | TransformationKind::ToPhoneNumberE164VNext => {
                phone_result(phone.to_e164(country, request.value))
            }
            TransformationKind::IndiaStateFullNameToInitials => self.state_initials(request.value),
        }
    }

    /// Returns true when the request identity is kept on the legacy formatter.
    fn is_legacy(&self, request: &TransformationRequest<'_>) -> bool {
        self.legacy_phone.iter().any(|tuple| tuple.matches(request.property, request.target, request.identity))
    }

    /// Maps a state name to initials; initials pass through unchanged.
    fn state_initials(&self, value: &str) -> TransformationResult {
        let key = value.trim().to_ascii_uppercase();
        if let Some(initials) = self.india_states.get(&key) {
            return TransformationResult::passed(initials.clone());
        }
        if self.india_states.values().any(|initials| *initials == key) {
            return TransformationResult::passed(key);
        }
        TransformationResult::failed(INVALID_STATE_NAME, format!("state not recognized: {value}"))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a phone formatting outcome into a transformation result.
fn phone_result(outcome: Result<String, PhoneError>) -> TransformationResult {
    match outcome {
        Ok(value) => TransformationResult::passed(value),
        Err(err) => {
            let result = err.to_result();
            TransformationResult {
                status: result.status,
                transformed_value: None,
                error_code: result.error_code,
                error_message: result.error_message,
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use proptest::prelude::*;

    use super::LegacyPhoneTuple;
    use super::TransformationIdentity;
    use super::TransformationKind;
    use super::TransformationRequest;
    use super::TransformationRule;
    use super::TransformationRuleTable;
    use crate::core::flights::FlightSet;
    use crate::core::ordered_map::OrderedMap;
    use crate::runtime::phone::ExecutionStatus;
    use crate::runtime::phone::NumberingPlan;
    use crate::runtime::phone::PhoneNumberValidator;

    fn phone() -> PhoneNumberValidator {
        PhoneNumberValidator::new(vec![NumberingPlan {
            region: "de",
            calling_code: "49",
            national_lengths: 6..=13,
            trunk_prefix: Some("0"),
            national_pattern: "[1-9][0-9]{5,12}",
        }])
        .unwrap()
    }

    fn table() -> TransformationRuleTable {
        let states: OrderedMap<String> =
            [("Karnataka", "KA"), ("Tamil Nadu", "TN")].into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        TransformationRuleTable::new(
            vec![
                TransformationRule::new("msisdn", "forSubmit", TransformationKind::ToPhoneNumberE164),
                TransformationRule::new("region", "forSubmit", TransformationKind::IndiaStateFullNameToInitials)
                    .for_country("in"),
            ],
            vec![LegacyPhoneTuple {
                country: "de".to_string(),
                description_type: "data".to_string(),
                operation: "add".to_string(),
                type_name: "mobile_billing_non_sim_details".to_string(),
                property: "msisdn".to_string(),
                target: "forSubmit".to_string(),
            }],
            &states,
        )
    }

    fn identity(country: &str, operation: &str) -> TransformationIdentity {
        TransformationIdentity::from_pairs([
            ("country_code", country),
            ("description_type", "data"),
            ("operation", operation),
            ("type", "mobile_billing_non_sim_details"),
        ])
    }

    fn run(property: &str, value: &str, identity: &TransformationIdentity) -> super::TransformationResult {
        let flights = FlightSet::new();
        table().transform(&phone(), &TransformationRequest {
            property,
            value,
            identity,
            target: "forSubmit",
            flights: &flights,
        })
    }

    #[test]
    fn legacy_tuple_keeps_lenient_formatter() {
        let legacy = run("msisdn", "123 45", &identity("DE", "add"));
        assert_eq!(legacy.transformed_value.as_deref(), Some("+4912345"));
        let strict = run("msisdn", "123 45", &identity("de", "update"));
        assert_eq!(strict.status, ExecutionStatus::Failed);
    }

    #[test]
    fn state_names_map_to_initials_and_initials_pass_through() {
        let india = TransformationIdentity::from_pairs([("country", "IN")]);
        assert_eq!(run("region", "tamil nadu", &india).transformed_value.as_deref(), Some("TN"));
        assert_eq!(run("region", "ka", &india).transformed_value.as_deref(), Some("KA"));
        assert_eq!(run("region", "Atlantis", &india).status, ExecutionStatus::Failed);
    }

    #[test]
    fn unknown_combinations_fail_without_raising() {
        let result = run("postal_code", "98052", &identity("de", "add"));
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.error_code.as_deref(), Some(super::TRANSFORMATION_NOT_SUPPORTED));
    }

    proptest! {
        #[test]
        fn strict_phone_transform_is_idempotent(national in "[1-9][0-9]{5,12}") {
            let owner = identity("de", "update");
            let first = run("msisdn", &format!("0{national}"), &owner);
            let once = first.transformed_value.unwrap();
            let second = run("msisdn", &once, &owner);
            prop_assert_eq!(second.transformed_value.unwrap(), once);
        }
    }
}
