// crates/pidl-core/src/core/overrides.rs
// ============================================================================
// Module: PIDL Override Fragments
// Description: Scoped override fragments, axis matching, and patch kinds.
// Purpose: Describe how partners, scenarios, and markets refine base templates.
// Dependencies: crate::core::{display, flights, identifiers, key, template}
// ============================================================================

//! ## Overview
//! An [`OverrideFragment`] is a scoped, optionally gated list of [`Patch`]es.
//! Scope is matched axis by axis over (operation, scenario, partner,
//! country); each axis is a wildcard, one value, or a set. Fragments apply in
//! ascending [`Specificity`], so an exact match on an earlier axis overrides
//! any wildcard there regardless of declaration order.
//!
//! Qualifiers narrow a fragment by key attributes that are not axes, such as
//! the descriptor type, profile type, standalone flag, or language.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Borrow;

use crate::core::display::Action;
use crate::core::display::DisplayNode;
use crate::core::display::RestLink;
use crate::core::flights::FlightRequirement;
use crate::core::identifiers::CountryCode;
use crate::core::identifiers::HintId;
use crate::core::identifiers::OperationName;
use crate::core::identifiers::PartnerName;
use crate::core::identifiers::ScenarioName;
use crate::core::key::ResolutionKey;
use crate::core::template::PrefillMode;
use crate::core::template::PropertyTemplate;

// ============================================================================
// SECTION: Axis Matching
// ============================================================================

/// Match rule for one key axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisMatch<T> {
    /// Wildcard.
    Any,
    /// Exactly one value.
    Exact(T),
    /// Any value of the set.
    OneOf(Vec<T>),
}

impl<T> AxisMatch<T> {
    /// Returns true unless the axis is a wildcard.
    #[must_use]
    pub const fn is_specific(&self) -> bool {
        !matches!(self, Self::Any)
    }

    /// Returns true when `value` satisfies the axis.
    #[must_use]
    pub fn matches<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected.borrow() == value,
            Self::OneOf(values) => values.iter().any(|expected| expected.borrow() == value),
        }
    }

    /// Returns true when an optional value satisfies the axis.
    ///
    /// Absent values only satisfy wildcards.
    #[must_use]
    pub fn matches_optional<Q>(&self, value: Option<&Q>) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match value {
            Some(value) => self.matches(value),
            None => !self.is_specific(),
        }
    }
}

impl<T> Default for AxisMatch<T> {
    fn default() -> Self {
        Self::Any
    }
}

// ============================================================================
// SECTION: Qualifiers
// ============================================================================

/// Non-axis key predicate that pre-filters templates, fragments, and rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    /// Descriptor type is one of the listed values.
    TypeIn(Vec<String>),
    /// Profile type is one of the listed values.
    ProfileTypeIn(Vec<String>),
    /// Standalone flag equals the value.
    Standalone(bool),
    /// Language is one of the listed values, case-insensitively.
    LanguageIn(Vec<String>),
    /// Payment method family is one of the listed values.
    PaymentMethodFamilyIn(Vec<String>),
}

impl Qualifier {
    /// Builds a descriptor type qualifier.
    #[must_use]
    pub fn types(values: &[&str]) -> Self {
        Self::TypeIn(lowered(values))
    }

    /// Builds a profile type qualifier.
    #[must_use]
    pub fn profile_types(values: &[&str]) -> Self {
        Self::ProfileTypeIn(lowered(values))
    }

    /// Builds a payment method family qualifier.
    #[must_use]
    pub fn families(values: &[&str]) -> Self {
        Self::PaymentMethodFamilyIn(lowered(values))
    }

    /// Returns true when `key` satisfies the qualifier.
    #[must_use]
    pub fn matches(&self, key: &ResolutionKey) -> bool {
        match self {
            Self::TypeIn(values) => values.iter().any(|value| value == key.type_name()),
            Self::ProfileTypeIn(values) => {
                key.profile_type().is_some_and(|profile| values.iter().any(|value| value == profile))
            }
            Self::Standalone(expected) => key.standalone() == *expected,
            Self::LanguageIn(values) => values.iter().any(|value| value.eq_ignore_ascii_case(key.language())),
            Self::PaymentMethodFamilyIn(values) => values.iter().any(|value| value == key.family()),
        }
    }
}

/// Returns true when every qualifier matches.
#[must_use]
pub fn qualifiers_match(qualifiers: &[Qualifier], key: &ResolutionKey) -> bool {
    qualifiers.iter().all(|qualifier| qualifier.matches(key))
}

// ============================================================================
// SECTION: Scope and Specificity
// ============================================================================

/// Specificity rank of a scope.
///
/// # Invariants
/// - Compares lexicographically over (operation, scenario, partner, country).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(u8);

impl Specificity {
    /// Bit for an explicit operation.
    const OPERATION: u8 = 0b1000;
    /// Bit for an explicit scenario.
    const SCENARIO: u8 = 0b0100;
    /// Bit for an explicit partner.
    const PARTNER: u8 = 0b0010;
    /// Bit for an explicit country.
    const COUNTRY: u8 = 0b0001;

    /// Returns the raw rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0
    }
}

/// Axis scope of a fragment or submit-link rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideScope {
    /// Operation axis.
    pub operation: AxisMatch<OperationName>,
    /// Scenario axis.
    pub scenario: AxisMatch<ScenarioName>,
    /// Partner axis, matched against the effective partner.
    pub partner: AxisMatch<PartnerName>,
    /// Country axis.
    pub country: AxisMatch<CountryCode>,
}

impl OverrideScope {
    /// Wildcard scope.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts the operation axis to one value.
    #[must_use]
    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = AxisMatch::Exact(OperationName::new(operation));
        self
    }

    /// Restricts the operation axis to a set.
    #[must_use]
    pub fn with_operations(mut self, operations: &[&str]) -> Self {
        self.operation = AxisMatch::OneOf(operations.iter().map(OperationName::new).collect());
        self
    }

    /// Restricts the scenario axis to one value.
    #[must_use]
    pub fn with_scenario(mut self, scenario: &str) -> Self {
        self.scenario = AxisMatch::Exact(ScenarioName::new(scenario));
        self
    }

    /// Restricts the partner axis to one value.
    #[must_use]
    pub fn with_partner(mut self, partner: &str) -> Self {
        self.partner = AxisMatch::Exact(PartnerName::new(partner));
        self
    }

    /// Restricts the partner axis to a set.
    #[must_use]
    pub fn with_partners<S: AsRef<str>>(mut self, partners: &[S]) -> Self {
        self.partner = AxisMatch::OneOf(partners.iter().map(PartnerName::new).collect());
        self
    }

    /// Restricts the country axis to one value.
    #[must_use]
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = AxisMatch::Exact(CountryCode::new(country));
        self
    }

    /// Restricts the country axis to a set.
    #[must_use]
    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.country = AxisMatch::OneOf(countries.iter().map(CountryCode::new).collect());
        self
    }

    /// Returns true when the key and effective partner fall inside the scope.
    #[must_use]
    pub fn matches(&self, key: &ResolutionKey, partner: &PartnerName) -> bool {
        self.operation.matches(key.operation())
            && self.scenario.matches_optional(key.scenario())
            && self.partner.matches(partner)
            && self.country.matches(key.country())
    }

    /// Returns the specificity rank.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        let mut rank = 0;
        if self.operation.is_specific() {
            rank |= Specificity::OPERATION;
        }
        if self.scenario.is_specific() {
            rank |= Specificity::SCENARIO;
        }
        if self.partner.is_specific() {
            rank |= Specificity::PARTNER;
        }
        if self.country.is_specific() {
            rank |= Specificity::COUNTRY;
        }
        Specificity(rank)
    }
}

// ============================================================================
// SECTION: Patches
// ============================================================================

/// Independent partial overrides for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOverride {
    /// Optionality override.
    pub is_optional: Option<bool>,
    /// Default value override.
    pub default_value: Option<String>,
    /// Regex override; replaces resolver lookup.
    pub regex: Option<String>,
    /// Error message override.
    pub error_message: Option<String>,
    /// Dictionary token override for possible values.
    pub possible_values: Option<String>,
}

impl PropertyOverride {
    /// Sets optionality.
    #[must_use]
    pub const fn optional(mut self, optional: bool) -> Self {
        self.is_optional = Some(optional);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the regex.
    #[must_use]
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Sets the error message.
    #[must_use]
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Sets the possible values dictionary token.
    #[must_use]
    pub fn possible_values(mut self, token: impl Into<String>) -> Self {
        self.possible_values = Some(token.into());
        self
    }
}

/// Insert position within a member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before every member.
    First,
    /// After every member.
    Last,
    /// Immediately before a sibling.
    Before(HintId),
    /// Immediately after a sibling.
    After(HintId),
}

/// One edit applied to a working document.
///
/// Property paths are dotted: `additionalData.dataType` addresses `dataType`
/// in every document nested under `additionalData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Partial property override.
    Property {
        /// Property path.
        path: String,
        /// Overridden attributes.
        overrides: PropertyOverride,
    },
    /// Adds or replaces a property.
    AddProperty {
        /// Property path.
        path: String,
        /// Property template.
        property: PropertyTemplate,
    },
    /// Removes a property.
    RemoveProperty {
        /// Property path.
        path: String,
    },
    /// Inserts a display node under `parent`, or at the root when absent.
    InsertNode {
        /// Parent container.
        parent: Option<HintId>,
        /// Position within the parent.
        position: InsertPosition,
        /// Node to insert.
        node: DisplayNode,
    },
    /// Removes a display node.
    RemoveNode {
        /// Target hint.
        hint_id: HintId,
    },
    /// Reorders members of `parent`, or the root when absent.
    ReorderMembers {
        /// Parent container.
        parent: Option<HintId>,
        /// Leading order; unlisted members keep their relative order after it.
        order: Vec<HintId>,
    },
    /// Replaces or clears an action.
    ReplaceAction {
        /// Target hint.
        hint_id: HintId,
        /// New action; `None` clears.
        action: Option<Action>,
    },
    /// Hides a node.
    HideNode {
        /// Target hint.
        hint_id: HintId,
    },
    /// Sets text, button, or hyperlink content.
    SetDisplayContent {
        /// Target hint.
        hint_id: HintId,
        /// New content.
        content: String,
    },
    /// Adds a display tag.
    AddDisplayTag {
        /// Target hint.
        hint_id: HintId,
        /// Tag key.
        key: String,
        /// Tag value.
        value: String,
    },
    /// Sets the prefill mode.
    SetPrefill(PrefillMode),
    /// Replaces the prefill data source link.
    SetDataSource {
        /// Data source name.
        name: String,
        /// Link template.
        link: RestLink,
    },
}

impl Patch {
    /// Partial property override.
    #[must_use]
    pub fn property(path: impl Into<String>, overrides: PropertyOverride) -> Self {
        Self::Property {
            path: path.into(),
            overrides,
        }
    }

    /// Adds or replaces a property.
    #[must_use]
    pub fn add_property(path: impl Into<String>, property: PropertyTemplate) -> Self {
        Self::AddProperty {
            path: path.into(),
            property,
        }
    }

    /// Removes a property.
    #[must_use]
    pub fn remove_property(path: impl Into<String>) -> Self {
        Self::RemoveProperty {
            path: path.into(),
        }
    }

    /// Inserts a node.
    #[must_use]
    pub fn insert_node(parent: Option<&str>, position: InsertPosition, node: DisplayNode) -> Self {
        Self::InsertNode {
            parent: parent.map(HintId::from),
            position,
            node,
        }
    }

    /// Removes a node.
    #[must_use]
    pub fn remove_node(hint_id: &str) -> Self {
        Self::RemoveNode {
            hint_id: HintId::from(hint_id),
        }
    }

    /// Reorders members.
    #[must_use]
    pub fn reorder(parent: Option<&str>, order: &[&str]) -> Self {
        Self::ReorderMembers {
            parent: parent.map(HintId::from),
            order: order.iter().copied().map(HintId::from).collect(),
        }
    }

    /// Replaces or clears an action.
    #[must_use]
    pub fn replace_action(hint_id: &str, action: Option<Action>) -> Self {
        Self::ReplaceAction {
            hint_id: HintId::from(hint_id),
            action,
        }
    }

    /// Hides a node.
    #[must_use]
    pub fn hide(hint_id: &str) -> Self {
        Self::HideNode {
            hint_id: HintId::from(hint_id),
        }
    }

    /// Sets display content.
    #[must_use]
    pub fn display_content(hint_id: &str, content: impl Into<String>) -> Self {
        Self::SetDisplayContent {
            hint_id: HintId::from(hint_id),
            content: content.into(),
        }
    }

    /// Adds a display tag.
    #[must_use]
    pub fn display_tag(hint_id: &str, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AddDisplayTag {
            hint_id: HintId::from(hint_id),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Replaces the data source.
    #[must_use]
    pub fn data_source(name: impl Into<String>, link: RestLink) -> Self {
        Self::SetDataSource {
            name: name.into(),
            link,
        }
    }
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Scoped, optionally gated list of patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideFragment {
    /// Stable fragment id recorded as the source layer of touched properties.
    pub id: String,
    /// Axis scope.
    pub scope: OverrideScope,
    /// Key qualifiers.
    pub qualifiers: Vec<Qualifier>,
    /// Flight requirement.
    pub flights: Option<FlightRequirement>,
    /// Experience feature requirement.
    pub feature: Option<String>,
    /// Patches in application order.
    pub patches: Vec<Patch>,
}

impl OverrideFragment {
    /// Creates an ungated fragment without patches.
    #[must_use]
    pub fn new(id: impl Into<String>, scope: OverrideScope) -> Self {
        Self {
            id: id.into(),
            scope,
            qualifiers: Vec::new(),
            flights: None,
            feature: None,
            patches: Vec::new(),
        }
    }

    /// Adds a qualifier.
    #[must_use]
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Gates the fragment on flights.
    #[must_use]
    pub fn with_flights(mut self, requirement: FlightRequirement) -> Self {
        self.flights = Some(requirement);
        self
    }

    /// Gates the fragment on an experience feature.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Appends a patch.
    #[must_use]
    pub fn patch(mut self, patch: Patch) -> Self {
        self.patches.push(patch);
        self
    }

    /// Returns the scope specificity.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.scope.specificity()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Lowercases qualifier values.
fn lowered(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.trim().to_ascii_lowercase()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::AxisMatch;
    use super::OverrideScope;
    use crate::core::identifiers::PartnerName;
    use crate::core::key::ResolutionKey;

    #[test]
    fn operation_outranks_every_later_axis() {
        let operation_only = OverrideScope::any().with_operation("add");
        let everything_else =
            OverrideScope::any().with_scenario("withcountrydropdown").with_partner("cart").with_country("de");
        assert!(operation_only.specificity() > everything_else.specificity());
    }

    #[test]
    fn scenario_axis_requires_presence_when_specific() {
        let key = ResolutionKey::builder("de", "add", "cart").build();
        let partner = PartnerName::new("cart");
        assert!(OverrideScope::any().matches(&key, &partner));
        assert!(!OverrideScope::any().with_scenario("withcountrydropdown").matches(&key, &partner));
    }

    #[test]
    fn axis_sets_match_any_member() {
        let axis: AxisMatch<String> = AxisMatch::OneOf(vec!["lightweight".to_string(), "lightweightv7".to_string()]);
        assert!(axis.matches("lightweightv7"));
        assert!(!axis.matches("standard"));
    }
}
