// crates/pidl-core/src/core/key.rs
// ============================================================================
// Module: PIDL Resolution Key
// Description: Descriptor families and the multi-axis resolution key.
// Purpose: Select base templates and override layers for one resolution.
// Dependencies: crate::core::{flights, identifiers}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ResolutionKey`] is the immutable tuple that drives every lookup in the
//! engine. String axes are normalized to lowercase at construction, except
//! `language`, which keeps its casing for query strings and compares
//! case-insensitively.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::flights::FlightSet;
use crate::core::identifiers::CountryCode;
use crate::core::identifiers::OperationName;
use crate::core::identifiers::PartnerName;
use crate::core::identifiers::ScenarioName;

// ============================================================================
// SECTION: Descriptor Family
// ============================================================================

/// Unknown descriptor family name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown descriptor family: {0}")]
pub struct UnknownDescriptorFamilyError(pub String);

/// Top-level descriptor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptorFamily {
    /// Payment method entry forms.
    PaymentMethod,
    /// Billing, shipping, and service usage addresses.
    Address,
    /// Consumer and commercial tax identifiers.
    TaxId,
    /// Commercial billing groups.
    BillingGroup,
    /// Selection among existing payment instruments.
    PaymentInstrumentSelection,
}

impl DescriptorFamily {
    /// Every family, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::PaymentMethod,
        Self::Address,
        Self::TaxId,
        Self::BillingGroup,
        Self::PaymentInstrumentSelection,
    ];

    /// Returns the canonical family name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentMethod => "payment-method",
            Self::Address => "address",
            Self::TaxId => "tax-id",
            Self::BillingGroup => "billing-group",
            Self::PaymentInstrumentSelection => "payment-instrument-selection",
        }
    }

    /// Returns the description type recorded in document identities.
    #[must_use]
    pub const fn description_type(self) -> &'static str {
        match self {
            Self::PaymentMethod => "paymentMethod",
            Self::Address => "address",
            Self::TaxId => "taxId",
            Self::BillingGroup => "billingGroup",
            Self::PaymentInstrumentSelection => "paymentInstrument",
        }
    }
}

impl fmt::Display for DescriptorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptorFamily {
    type Err = UnknownDescriptorFamilyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|family| {
                family.as_str() == normalized
                    || family.description_type().eq_ignore_ascii_case(raw.trim())
            })
            .ok_or_else(|| UnknownDescriptorFamilyError(raw.to_string()))
    }
}

// ============================================================================
// SECTION: Resolution Key
// ============================================================================

/// Immutable multi-axis key for one resolution.
#[derive(Debug, Clone)]
pub struct ResolutionKey {
    /// Market code.
    country: CountryCode,
    /// Payment method family (`credit_card`, `mobile_billing_non_sim`, ...).
    family: String,
    /// Descriptor type (`visa`, `commercial_tax_id`, `billing`, ...).
    type_name: String,
    /// Operation name.
    operation: OperationName,
    /// Display language as supplied.
    language: String,
    /// Calling partner.
    partner: PartnerName,
    /// Optional scenario.
    scenario: Option<ScenarioName>,
    /// Optional profile type (`consumer`, `organization`, `legalentity`).
    profile_type: Option<String>,
    /// Optional classic product forwarded to list queries.
    classic_product: Option<String>,
    /// Optional billable account forwarded to list queries.
    billable_account_id: Option<String>,
    /// Standalone tax-id flow.
    standalone: bool,
    /// Active flights.
    flights: FlightSet,
}

impl ResolutionKey {
    /// Starts a key with the mandatory axes.
    #[must_use]
    pub fn builder(
        country: impl AsRef<str>,
        operation: impl AsRef<str>,
        partner: impl AsRef<str>,
    ) -> ResolutionKeyBuilder {
        ResolutionKeyBuilder {
            key: Self {
                country: CountryCode::new(country),
                family: String::new(),
                type_name: String::new(),
                operation: OperationName::new(operation),
                language: "en-us".to_string(),
                partner: PartnerName::new(partner),
                scenario: None,
                profile_type: None,
                classic_product: None,
                billable_account_id: None,
                standalone: false,
                flights: FlightSet::new(),
            },
        }
    }

    /// Returns the market code.
    #[must_use]
    pub const fn country(&self) -> &CountryCode {
        &self.country
    }

    /// Returns the payment method family.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns the descriptor type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the operation.
    #[must_use]
    pub const fn operation(&self) -> &OperationName {
        &self.operation
    }

    /// Returns the language with its original casing.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the calling partner.
    #[must_use]
    pub const fn partner(&self) -> &PartnerName {
        &self.partner
    }

    /// Returns the scenario, if any.
    #[must_use]
    pub const fn scenario(&self) -> Option<&ScenarioName> {
        self.scenario.as_ref()
    }

    /// Returns the profile type, if any.
    #[must_use]
    pub fn profile_type(&self) -> Option<&str> {
        self.profile_type.as_deref()
    }

    /// Returns the classic product, if any.
    #[must_use]
    pub fn classic_product(&self) -> Option<&str> {
        self.classic_product.as_deref()
    }

    /// Returns the billable account id, if any.
    #[must_use]
    pub fn billable_account_id(&self) -> Option<&str> {
        self.billable_account_id.as_deref()
    }

    /// Returns true for standalone flows.
    #[must_use]
    pub const fn standalone(&self) -> bool {
        self.standalone
    }

    /// Returns the active flights.
    #[must_use]
    pub const fn flights(&self) -> &FlightSet {
        &self.flights
    }
}

impl PartialEq for ResolutionKey {
    fn eq(&self, other: &Self) -> bool {
        self.country == other.country
            && self.family == other.family
            && self.type_name == other.type_name
            && self.operation == other.operation
            && self.language.eq_ignore_ascii_case(&other.language)
            && self.partner == other.partner
            && self.scenario == other.scenario
            && self.profile_type == other.profile_type
            && self.classic_product == other.classic_product
            && self.billable_account_id == other.billable_account_id
            && self.standalone == other.standalone
            && self.flights == other.flights
    }
}

impl Eq for ResolutionKey {}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`ResolutionKey`].
#[derive(Debug, Clone)]
pub struct ResolutionKeyBuilder {
    /// Key under construction.
    key: ResolutionKey,
}

impl ResolutionKeyBuilder {
    /// Sets the payment method family.
    #[must_use]
    pub fn family(mut self, family: impl AsRef<str>) -> Self {
        self.key.family = lower(family.as_ref());
        self
    }

    /// Sets the descriptor type.
    #[must_use]
    pub fn type_name(mut self, type_name: impl AsRef<str>) -> Self {
        self.key.type_name = lower(type_name.as_ref());
        self
    }

    /// Sets the language, preserving its casing.
    #[must_use]
    pub fn language(mut self, language: impl AsRef<str>) -> Self {
        self.key.language = language.as_ref().trim().to_string();
        self
    }

    /// Sets the scenario. Blank scenarios are treated as absent.
    #[must_use]
    pub fn scenario(mut self, scenario: impl AsRef<str>) -> Self {
        self.key.scenario = non_blank(scenario.as_ref()).map(ScenarioName::new);
        self
    }

    /// Sets the profile type.
    #[must_use]
    pub fn profile_type(mut self, profile_type: impl AsRef<str>) -> Self {
        self.key.profile_type = non_blank(profile_type.as_ref()).map(lower);
        self
    }

    /// Sets the classic product, preserving its casing.
    #[must_use]
    pub fn classic_product(mut self, product: impl AsRef<str>) -> Self {
        self.key.classic_product = non_blank(product.as_ref()).map(str::to_string);
        self
    }

    /// Sets the billable account id, preserving its casing.
    #[must_use]
    pub fn billable_account_id(mut self, account: impl AsRef<str>) -> Self {
        self.key.billable_account_id = non_blank(account.as_ref()).map(str::to_string);
        self
    }

    /// Marks the flow as standalone.
    #[must_use]
    pub const fn standalone(mut self, standalone: bool) -> Self {
        self.key.standalone = standalone;
        self
    }

    /// Sets the active flights.
    #[must_use]
    pub fn flights(mut self, flights: FlightSet) -> Self {
        self.key.flights = flights;
        self
    }

    /// Finishes the key.
    #[must_use]
    pub fn build(self) -> ResolutionKey {
        self.key
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Lowercases a trimmed axis value.
fn lower(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Returns the trimmed value unless it is blank.
fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::DescriptorFamily;
    use super::ResolutionKey;

    #[test]
    fn family_names_accept_underscores_and_description_types() {
        assert_eq!("tax_id".parse::<DescriptorFamily>().unwrap(), DescriptorFamily::TaxId);
        assert_eq!("Billing-Group".parse::<DescriptorFamily>().unwrap(), DescriptorFamily::BillingGroup);
        assert_eq!("paymentInstrument".parse::<DescriptorFamily>().unwrap(), DescriptorFamily::PaymentInstrumentSelection);
        assert!("wallet".parse::<DescriptorFamily>().is_err());
    }

    #[test]
    fn keys_compare_case_insensitively_but_keep_language_casing() {
        let upper = ResolutionKey::builder("US", "Add", "Webblends").type_name("Billing").language("en-US").build();
        let lower = ResolutionKey::builder("us", "add", "webblends").type_name("billing").language("en-us").build();
        assert_eq!(upper, lower);
        assert_eq!(upper.language(), "en-US");
        assert_eq!(upper.country().as_str(), "us");
    }

    #[test]
    fn blank_scenario_is_absent() {
        let key = ResolutionKey::builder("de", "add", "cart").scenario("  ").build();
        assert!(key.scenario().is_none());
    }
}
