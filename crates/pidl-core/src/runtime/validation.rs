// crates/pidl-core/src/runtime/validation.rs
// ============================================================================
// Module: PIDL Validation Rules
// Description: Most-specific-wins regex validator resolution.
// Purpose: Map (property, region, operation, descriptor type) to one validator.
// Dependencies: crate::core::flights, regex, thiserror
// ============================================================================

//! ## Overview
//! Validation rules are declared per property at one of four scopes, tried in
//! order:
//! 1. property + region + operation
//! 2. property + region
//! 3. property + descriptor type
//! 4. property global default
//!
//! Within a scope, a rule whose flight requirement is satisfied beats an
//! ungated rule, and the last declaration wins among equals. Patterns are
//! compiled once when the table is built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;

use crate::core::flights::FlightRequirement;
use crate::core::flights::FlightSet;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation rule failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No rule matched at any scope, including the global default.
    #[error("no validator defined for property {property} (region {region}, operation {operation}, type {descriptor_type})")]
    NoValidatorDefined {
        /// Rule property.
        property: String,
        /// Region queried.
        region: String,
        /// Operation queried.
        operation: String,
        /// Descriptor type queried.
        descriptor_type: String,
    },
    /// A rule pattern does not compile.
    #[error("invalid validation pattern for {property}: {message}")]
    InvalidPattern {
        /// Rule property.
        property: String,
        /// Compiler message.
        message: String,
    },
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Scope of a validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    /// Region and operation.
    RegionOperation {
        /// Region code.
        region: String,
        /// Operation name.
        operation: String,
    },
    /// Region only.
    Region(String),
    /// Descriptor type only.
    DescriptorType(String),
    /// Global default.
    Global,
}

impl RuleScope {
    /// Lowercases scope values.
    fn normalized(self) -> Self {
        match self {
            Self::RegionOperation {
                region,
                operation,
            } => Self::RegionOperation {
                region: region.to_ascii_lowercase(),
                operation: operation.to_ascii_lowercase(),
            },
            Self::Region(region) => Self::Region(region.to_ascii_lowercase()),
            Self::DescriptorType(descriptor) => Self::DescriptorType(descriptor.to_ascii_lowercase()),
            Self::Global => Self::Global,
        }
    }
}

/// Declared validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    /// Rule property.
    pub property: String,
    /// Scope.
    pub scope: RuleScope,
    /// Regex pattern.
    pub pattern: String,
    /// Error code.
    pub error_code: Option<String>,
    /// Error message.
    pub error_message: Option<String>,
    /// Flight requirement.
    pub flights: Option<FlightRequirement>,
}

impl ValidationRule {
    /// Creates an ungated rule without error metadata.
    #[must_use]
    pub fn new(property: impl Into<String>, scope: RuleScope, pattern: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            scope,
            pattern: pattern.into(),
            error_code: None,
            error_message: None,
            flights: None,
        }
    }

    /// Sets the error code and message.
    #[must_use]
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self.error_message = Some(message.into());
        self
    }

    /// Gates the rule on flights.
    #[must_use]
    pub fn with_flights(mut self, requirement: FlightRequirement) -> Self {
        self.flights = Some(requirement);
        self
    }
}

/// Rule with its compiled pattern.
#[derive(Debug, Clone)]
pub struct CompiledValidator {
    /// Source rule.
    rule: ValidationRule,
    /// Compiled pattern.
    regex: Regex,
}

impl CompiledValidator {
    /// Returns the pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.rule.pattern
    }

    /// Returns the error code.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.rule.error_code.as_deref()
    }

    /// Returns the error message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.rule.error_message.as_deref()
    }

    /// Returns the rule scope.
    #[must_use]
    pub const fn scope(&self) -> &RuleScope {
        &self.rule.scope
    }

    /// Returns true when `value` matches the pattern.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Query for one validator.
#[derive(Debug, Clone, Copy)]
pub struct ValidatorQuery<'a> {
    /// Rule property.
    pub property: &'a str,
    /// Region code.
    pub region: &'a str,
    /// Operation name.
    pub operation: &'a str,
    /// Descriptor type.
    pub descriptor_type: &'a str,
    /// Active flights.
    pub flights: &'a FlightSet,
}

/// Compiled validation rules.
#[derive(Debug, Clone, Default)]
pub struct ValidationRuleTable {
    /// Rules in declaration order.
    rules: Vec<CompiledValidator>,
}

impl ValidationRuleTable {
    /// Compiles every rule.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPattern`] for the first pattern that
    /// does not compile.
    pub fn new(rules: Vec<ValidationRule>) -> Result<Self, ValidationError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for mut rule in rules {
            let regex = Regex::new(&rule.pattern).map_err(|err| ValidationError::InvalidPattern {
                property: rule.property.clone(),
                message: err.to_string(),
            })?;
            rule.scope = rule.scope.normalized();
            compiled.push(CompiledValidator {
                rule,
                regex,
            });
        }
        Ok(Self {
            rules: compiled,
        })
    }

    /// Returns the number of rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rules are declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over compiled rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledValidator> {
        self.rules.iter()
    }

    /// Resolves the most specific validator for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoValidatorDefined`] when no scope matches.
    pub fn resolve(&self, query: &ValidatorQuery<'_>) -> Result<&CompiledValidator, ValidationError> {
        let region = query.region.to_ascii_lowercase();
        let operation = query.operation.to_ascii_lowercase();
        let descriptor_type = query.descriptor_type.to_ascii_lowercase();
        let levels: [&dyn Fn(&RuleScope) -> bool; 4] = [
            &|scope| {
                matches!(scope, RuleScope::RegionOperation { region: r, operation: o } if *r == region && *o == operation)
            },
            &|scope| matches!(scope, RuleScope::Region(r) if *r == region),
            &|scope| matches!(scope, RuleScope::DescriptorType(d) if *d == descriptor_type),
            &|scope| matches!(scope, RuleScope::Global),
        ];
        for level in levels {
            let best = self
                .rules
                .iter()
                .enumerate()
                .filter(|(_, validator)| validator.rule.property == query.property && level(&validator.rule.scope))
                .filter(|(_, validator)| {
                    validator.rule.flights.as_ref().is_none_or(|requirement| requirement.is_satisfied_by(query.flights))
                })
                .max_by_key(|(index, validator)| (validator.rule.flights.is_some(), *index));
            if let Some((_, validator)) = best {
                return Ok(validator);
            }
        }
        Err(ValidationError::NoValidatorDefined {
            property: query.property.to_string(),
            region,
            operation,
            descriptor_type,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::RuleScope;
    use super::ValidationError;
    use super::ValidationRule;
    use super::ValidationRuleTable;
    use super::ValidatorQuery;
    use crate::core::flights::FlightRequirement;
    use crate::core::flights::FlightSet;

    fn table() -> ValidationRuleTable {
        ValidationRuleTable::new(vec![
            ValidationRule::new("postal_code", RuleScope::Global, "^.{0,20}$"),
            ValidationRule::new("postal_code", RuleScope::Region("US".to_string()), "^[0-9]{5}$"),
            ValidationRule::new("postal_code", RuleScope::Region("us".to_string()), "^[0-9]{5}(-[0-9]{4})?$"),
            ValidationRule::new("postal_code", RuleScope::Region("us".to_string()), "^[0-9]{9}$")
                .with_flights(FlightRequirement::parse("ZipNine").unwrap().unwrap()),
            ValidationRule::new(
                "postal_code",
                RuleScope::RegionOperation {
                    region: "us".to_string(),
                    operation: "update".to_string(),
                },
                "^[0-9]{5}-[0-9]{4}$",
            ),
        ])
        .unwrap()
    }

    fn query<'a>(region: &'a str, operation: &'a str, flights: &'a FlightSet) -> ValidatorQuery<'a> {
        ValidatorQuery {
            property: "postal_code",
            region,
            operation,
            descriptor_type: "billing",
            flights,
        }
    }

    #[test]
    fn last_declaration_wins_within_a_level() {
        let flights = FlightSet::new();
        let validator = table().resolve(&query("us", "add", &flights)).unwrap().pattern().to_string();
        assert_eq!(validator, "^[0-9]{5}(-[0-9]{4})?$");
    }

    #[test]
    fn satisfied_flight_gate_beats_ungated_rule() {
        let flights = FlightSet::parse_list("zipnine").unwrap();
        assert_eq!(table().resolve(&query("US", "add", &flights)).unwrap().pattern(), "^[0-9]{9}$");
    }

    #[test]
    fn region_operation_is_most_specific() {
        let flights = FlightSet::parse_list("zipnine").unwrap();
        assert_eq!(table().resolve(&query("us", "UPDATE", &flights)).unwrap().pattern(), "^[0-9]{5}-[0-9]{4}$");
    }

    #[test]
    fn unknown_region_falls_back_to_global() {
        let flights = FlightSet::new();
        assert_eq!(table().resolve(&query("zz", "add", &flights)).unwrap().pattern(), "^.{0,20}$");
    }

    #[test]
    fn missing_global_default_is_an_error() {
        let flights = FlightSet::new();
        let mut unknown = query("us", "add", &flights);
        unknown.property = "city";
        assert!(matches!(table().resolve(&unknown), Err(ValidationError::NoValidatorDefined { .. })));
    }

    #[test]
    fn invalid_patterns_fail_table_construction() {
        let result = ValidationRuleTable::new(vec![ValidationRule::new("x", RuleScope::Global, "([a-z")]);
        assert!(matches!(result, Err(ValidationError::InvalidPattern { .. })));
    }
}
