// crates/pidl-core/src/runtime/phone.rs
// ============================================================================
// Module: PIDL Phone Numbers
// Description: Numbering-plan phone validation and E.164 normalization.
// Purpose: Back `phonenumber.<country>` service validation and phone transforms.
// Dependencies: regex, serde, thiserror
// ============================================================================

//! ## Overview
//! Each supported market declares a [`NumberingPlan`]: its calling code, the
//! allowed length of the national significant number, an optional trunk
//! prefix, and a pattern the national number must match. Input may carry
//! common formatting (spaces, dashes, dots, parentheses, slashes) and an
//! optional `+<calling code>` or `00<calling code>` prefix.
//!
//! Validation outcomes are status values; only table construction can fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::runtime::validation::ValidationError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Service validation type prefix for phone numbers.
pub const PHONE_VALIDATION_TYPE: &str = "phonenumber";

/// Unknown or unsupported market.
pub const COUNTRY_CODE_NOT_SUPPORTED: &str = "CountryCodeNotSupported";

/// Number does not fit the market's plan.
pub const INVALID_PHONE_NUMBER_FOR_COUNTRY: &str = "InvalidPhoneNumberForCountry";

/// Dotted validation type carried no market.
pub const MISSING_COUNTRY_CODE: &str = "MissingCountryCodeInPhoneNumberValidation";

/// Validation type other than `phonenumber`.
pub const VALIDATION_TYPE_NOT_SUPPORTED: &str = "ValidationTypeNotSupported";

// ============================================================================
// SECTION: Results
// ============================================================================

/// Outcome status of a validation or transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// The value is acceptable.
    Passed,
    /// The value was rejected.
    Failed,
}

/// Result of a service validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Outcome.
    pub status: ExecutionStatus,
    /// Error code when failed.
    #[serde(rename = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Error message when failed.
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ExecutionResult {
    /// Passed result.
    #[must_use]
    pub const fn passed() -> Self {
        Self {
            status: ExecutionStatus::Passed,
            error_code: None,
            error_message: None,
        }
    }

    /// Failed result.
    #[must_use]
    pub fn failed(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            error_code: Some(code.to_string()),
            error_message: Some(message.into()),
        }
    }

    /// Returns true when passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.status == ExecutionStatus::Passed
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a phone number does not parse for a market.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    /// Market has no numbering plan.
    #[error("Country : {0} not supported")]
    UnsupportedCountry(String),
    /// National number shorter than the plan allows.
    #[error("Phone number is too short.")]
    TooShort,
    /// National number longer than the plan allows.
    #[error("Phone number is too long.")]
    TooLong,
    /// Characters, calling code, or leading digits do not fit the plan.
    #[error("Invalid phone number.")]
    Invalid,
}

impl PhoneError {
    /// Converts the error into a failed validation result.
    #[must_use]
    pub fn to_result(&self) -> ExecutionResult {
        let code = match self {
            Self::UnsupportedCountry(_) => COUNTRY_CODE_NOT_SUPPORTED,
            Self::TooShort | Self::TooLong | Self::Invalid => INVALID_PHONE_NUMBER_FOR_COUNTRY,
        };
        ExecutionResult::failed(code, self.to_string())
    }
}

// ============================================================================
// SECTION: Numbering Plans
// ============================================================================

/// Numbering plan of one market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingPlan {
    /// Market code.
    pub region: &'static str,
    /// International calling code without `+`.
    pub calling_code: &'static str,
    /// Allowed national significant number lengths.
    pub national_lengths: RangeInclusive<usize>,
    /// Domestic trunk prefix stripped from national input.
    pub trunk_prefix: Option<&'static str>,
    /// Pattern for the national significant number.
    pub national_pattern: &'static str,
}

/// Plan with its compiled pattern.
#[derive(Debug, Clone)]
struct CompiledPlan {
    /// Declared plan.
    plan: NumberingPlan,
    /// Anchored national pattern.
    pattern: Regex,
}

/// Parsed phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    /// Calling code without `+`.
    pub calling_code: String,
    /// National significant number.
    pub national_number: String,
}

impl PhoneNumber {
    /// Formats the number as E.164.
    #[must_use]
    pub fn to_e164(&self) -> String {
        format!("+{}{}", self.calling_code, self.national_number)
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Phone validator over compiled numbering plans.
#[derive(Debug, Clone, Default)]
pub struct PhoneNumberValidator {
    /// Plans by lowercase market code.
    plans: BTreeMap<String, CompiledPlan>,
}

impl PhoneNumberValidator {
    /// Compiles the plans.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPattern`] when a plan pattern does not
    /// compile.
    pub fn new(plans: Vec<NumberingPlan>) -> Result<Self, ValidationError> {
        let mut compiled = BTreeMap::new();
        for plan in plans {
            let pattern = Regex::new(&format!("^(?:{})$", plan.national_pattern)).map_err(|err| {
                ValidationError::InvalidPattern {
                    property: format!("{PHONE_VALIDATION_TYPE}.{}", plan.region),
                    message: err.to_string(),
                }
            })?;
            compiled.insert(plan.region.to_ascii_lowercase(), CompiledPlan {
                plan,
                pattern,
            });
        }
        Ok(Self {
            plans: compiled,
        })
    }

    /// Returns true when `country` has a plan.
    #[must_use]
    pub fn supports(&self, country: &str) -> bool {
        self.plans.contains_key(&country.trim().to_ascii_lowercase())
    }

    /// Validates against a dotted service type such as `phonenumber.us`.
    #[must_use]
    pub fn validate_phone(&self, url_validation_type: &str, value: &str) -> ExecutionResult {
        let mut parts = url_validation_type.trim().splitn(2, '.');
        let kind = parts.next().unwrap_or_default();
        if !kind.eq_ignore_ascii_case(PHONE_VALIDATION_TYPE) {
            return ExecutionResult::failed(
                VALIDATION_TYPE_NOT_SUPPORTED,
                format!("Validation type : {url_validation_type} not supported"),
            );
        }
        match parts.next().map(str::trim).filter(|country| !country.is_empty()) {
            Some(country) => self.validate_for_country(country, value),
            None => ExecutionResult::failed(MISSING_COUNTRY_CODE, "Country code is missing in phone number validation."),
        }
    }

    /// Validates `value` for `country`.
    #[must_use]
    pub fn validate_for_country(&self, country: &str, value: &str) -> ExecutionResult {
        match self.parse(country, value) {
            Ok(_) => ExecutionResult::passed(),
            Err(err) => err.to_result(),
        }
    }

    /// Strictly parses `value` under the plan of `country`.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError`] when the market is unknown or the number does
    /// not fit its plan.
    pub fn parse(&self, country: &str, value: &str) -> Result<PhoneNumber, PhoneError> {
        let compiled = self.plan(country)?;
        let plan = &compiled.plan;
        let national = national_digits(plan, value)?;
        if national.len() < *plan.national_lengths.start() {
            return Err(PhoneError::TooShort);
        }
        if national.len() > *plan.national_lengths.end() {
            return Err(PhoneError::TooLong);
        }
        if !compiled.pattern.is_match(&national) {
            return Err(PhoneError::Invalid);
        }
        Ok(PhoneNumber {
            calling_code: plan.calling_code.to_string(),
            national_number: national,
        })
    }

    /// Formats a strictly parsed number as E.164.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError`] when parsing fails.
    pub fn to_e164(&self, country: &str, value: &str) -> Result<String, PhoneError> {
        self.parse(country, value).map(|number| number.to_e164())
    }

    /// Formats a number as E.164 without plan length or pattern checks.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError`] when the market is unknown or the input holds
    /// no digits or stray characters.
    pub fn to_e164_lenient(&self, country: &str, value: &str) -> Result<String, PhoneError> {
        let plan = &self.plan(country)?.plan;
        let national = national_digits(plan, value)?;
        if national.is_empty() {
            return Err(PhoneError::TooShort);
        }
        Ok(format!("+{}{national}", plan.calling_code))
    }

    /// Looks up a plan.
    fn plan(&self, country: &str) -> Result<&CompiledPlan, PhoneError> {
        let key = country.trim().to_ascii_lowercase();
        self.plans.get(&key).ok_or(PhoneError::UnsupportedCountry(key))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Strips formatting and international or trunk prefixes.
fn national_digits(plan: &NumberingPlan, value: &str) -> Result<String, PhoneError> {
    let trimmed = value.trim();
    let (international, body) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let mut digits = String::with_capacity(body.len());
    for ch in body.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            ' ' | '-' | '.' | '(' | ')' | '/' => {}
            _ => return Err(PhoneError::Invalid),
        }
    }
    if international {
        return digits.strip_prefix(plan.calling_code).map(str::to_string).ok_or(PhoneError::Invalid);
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return rest.strip_prefix(plan.calling_code).map(str::to_string).ok_or(PhoneError::Invalid);
    }
    if let Some(trunk) = plan.trunk_prefix
        && let Some(rest) = digits.strip_prefix(trunk)
        && rest.len() >= *plan.national_lengths.start()
    {
        return Ok(rest.to_string());
    }
    Ok(digits)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::COUNTRY_CODE_NOT_SUPPORTED;
    use super::INVALID_PHONE_NUMBER_FOR_COUNTRY;
    use super::MISSING_COUNTRY_CODE;
    use super::NumberingPlan;
    use super::PhoneNumberValidator;
    use super::VALIDATION_TYPE_NOT_SUPPORTED;

    fn validator() -> PhoneNumberValidator {
        PhoneNumberValidator::new(vec![
            NumberingPlan {
                region: "us",
                calling_code: "1",
                national_lengths: 10..=10,
                trunk_prefix: Some("1"),
                national_pattern: "[2-9][0-9]{2}[2-9][0-9]{6}",
            },
            NumberingPlan {
                region: "de",
                calling_code: "49",
                national_lengths: 6..=13,
                trunk_prefix: Some("0"),
                national_pattern: "[1-9][0-9]{5,12}",
            },
        ])
        .unwrap()
    }

    #[test]
    fn formatted_us_number_passes() {
        assert!(validator().validate_phone("phonenumber.us", "1(206)555.1212").is_passed());
        assert_eq!(validator().to_e164("us", "(206) 555-1212").unwrap(), "+12065551212");
    }

    #[test]
    fn letters_fail_with_invalid_number() {
        let result = validator().validate_phone("phonenumber.us", "qqqqqzzzzz");
        assert_eq!(result.error_code.as_deref(), Some(INVALID_PHONE_NUMBER_FOR_COUNTRY));
        assert_eq!(result.error_message.as_deref(), Some("Invalid phone number."));
    }

    #[test]
    fn length_errors_name_the_direction() {
        let short = validator().validate_for_country("us", "206555");
        assert_eq!(short.error_message.as_deref(), Some("Phone number is too short."));
        let long = validator().validate_for_country("us", "20655512120000");
        assert_eq!(long.error_message.as_deref(), Some("Phone number is too long."));
    }

    #[test]
    fn unknown_country_never_passes() {
        let result = validator().validate_phone("phonenumber.zz", "2065551212");
        assert_eq!(result.error_code.as_deref(), Some(COUNTRY_CODE_NOT_SUPPORTED));
        assert_eq!(result.error_message.as_deref(), Some("Country : zz not supported"));
    }

    #[test]
    fn malformed_validation_types_are_reported() {
        assert_eq!(
            validator().validate_phone("phonenumber", "2065551212").error_code.as_deref(),
            Some(MISSING_COUNTRY_CODE)
        );
        assert_eq!(
            validator().validate_phone("email.us", "2065551212").error_code.as_deref(),
            Some(VALIDATION_TYPE_NOT_SUPPORTED)
        );
    }

    #[test]
    fn international_prefix_must_match_calling_code() {
        assert_eq!(validator().to_e164("de", "+49 30 1234567").unwrap(), "+49301234567");
        assert!(validator().to_e164("de", "0049 (0)30 1234567").is_err());
        assert!(validator().to_e164("de", "+1 206 555 1212").is_err());
    }
}
