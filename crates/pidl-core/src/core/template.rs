// crates/pidl-core/src/core/template.rs
// ============================================================================
// Module: PIDL Templates
// Description: Base templates, document templates, and property templates.
// Purpose: Describe unresolved documents before overrides and finalization.
// Dependencies: crate::core::{display, identifiers, key, ordered_map, overrides}
// ============================================================================

//! ## Overview
//! Templates are the authoring model of the catalog. A [`BaseTemplate`] is
//! selected per family by operation, type, country, and qualifiers; it owns
//! one or more [`DocumentTemplate`]s. Property templates may leave
//! optionality unset and defer validation to the rule resolver, so they stay
//! distinct from the resolved [`crate::core::document::PropertyDescriptor`].
//!
//! Identity values, data source hrefs, default values, and service validation
//! types may carry key placeholders such as `{country}` that the engine
//! expands during finalization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::display::DisplayNode;
use crate::core::display::RestLink;
use crate::core::document::DataType;
use crate::core::document::PropertyType;
use crate::core::identifiers::CountryCode;
use crate::core::identifiers::OperationName;
use crate::core::key::ResolutionKey;
use crate::core::ordered_map::OrderedMap;
use crate::core::overrides::AxisMatch;
use crate::core::overrides::Qualifier;
use crate::core::overrides::qualifiers_match;

// ============================================================================
// SECTION: Property Templates
// ============================================================================

/// Where a property's validation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationSource {
    /// No validation.
    None,
    /// Resolved through the validation rule chain.
    Resolver {
        /// Rule property name when it differs from the data field name.
        rule_property: Option<String>,
    },
    /// Literal regex.
    Regex {
        /// Pattern.
        regex: String,
        /// Error code.
        error_code: Option<String>,
        /// Error message.
        error_message: Option<String>,
    },
    /// Service validation such as `phonenumber.{country}`.
    Service {
        /// Validation type template.
        url_validation_type: String,
        /// Error code.
        error_code: Option<String>,
    },
}

/// Unresolved property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTemplate {
    /// Value origin.
    pub property_type: PropertyType,
    /// Scalar type.
    pub data_type: DataType,
    /// Key property flag.
    pub is_key: bool,
    /// Optionality; must be resolved before finalization.
    pub is_optional: Option<bool>,
    /// Updatable flag.
    pub is_updatable: bool,
    /// Default value template.
    pub default_value: Option<String>,
    /// Dictionary token for possible values.
    pub possible_values: Option<String>,
    /// Validation source.
    pub validation: ValidationSource,
    /// Error message override applied after validation resolution.
    pub error_message: Option<String>,
    /// Transformations keyed by target.
    pub transformations: OrderedMap<String>,
    /// Fragment that last touched the property; `None` means the base template.
    pub source_layer: Option<String>,
}

impl PropertyTemplate {
    /// User-entered property of `data_type` with unset optionality.
    #[must_use]
    pub fn user(data_type: DataType) -> Self {
        Self::with_origin(PropertyType::UserData, data_type)
    }

    /// Client-supplied property of `data_type` with unset optionality.
    #[must_use]
    pub fn client(data_type: DataType) -> Self {
        Self::with_origin(PropertyType::ClientData, data_type)
    }

    /// Required user-entered string.
    #[must_use]
    pub fn required_text() -> Self {
        Self::user(DataType::String).required()
    }

    /// Optional user-entered string.
    #[must_use]
    pub fn optional_text() -> Self {
        Self::user(DataType::String).optional()
    }

    /// Hidden client-supplied string carrying `default_value`.
    #[must_use]
    pub fn hidden_value(default_value: impl Into<String>) -> Self {
        Self::client(DataType::String).required().default_value(default_value)
    }

    /// Marks the property required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.is_optional = Some(false);
        self
    }

    /// Marks the property optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_optional = Some(true);
        self
    }

    /// Marks the property as a key.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Marks the property updatable.
    #[must_use]
    pub const fn updatable(mut self) -> Self {
        self.is_updatable = true;
        self
    }

    /// Sets the default value template.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the possible values dictionary token.
    #[must_use]
    pub fn possible_values(mut self, token: impl Into<String>) -> Self {
        self.possible_values = Some(token.into());
        self
    }

    /// Resolves validation through the rule chain under the field name.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.validation = ValidationSource::Resolver {
            rule_property: None,
        };
        self
    }

    /// Resolves validation through the rule chain under `rule_property`.
    #[must_use]
    pub fn validated_as(mut self, rule_property: impl Into<String>) -> Self {
        self.validation = ValidationSource::Resolver {
            rule_property: Some(rule_property.into()),
        };
        self
    }

    /// Uses a literal regex.
    #[must_use]
    pub fn regex(mut self, pattern: impl Into<String>, error_code: Option<&str>) -> Self {
        self.validation = ValidationSource::Regex {
            regex: pattern.into(),
            error_code: error_code.map(str::to_string),
            error_message: None,
        };
        self
    }

    /// Uses service validation.
    #[must_use]
    pub fn service(mut self, url_validation_type: impl Into<String>, error_code: Option<&str>) -> Self {
        self.validation = ValidationSource::Service {
            url_validation_type: url_validation_type.into(),
            error_code: error_code.map(str::to_string),
        };
        self
    }

    /// Attaches a transformation for `target`.
    #[must_use]
    pub fn transform(mut self, target: impl Into<String>, transformation: impl Into<String>) -> Self {
        self.transformations.insert(target.into(), transformation.into());
        self
    }

    /// Shared constructor.
    fn with_origin(property_type: PropertyType, data_type: DataType) -> Self {
        Self {
            property_type,
            data_type,
            is_key: false,
            is_optional: None,
            is_updatable: false,
            default_value: None,
            possible_values: None,
            validation: ValidationSource::None,
            error_message: None,
            transformations: OrderedMap::new(),
            source_layer: None,
        }
    }
}

// ============================================================================
// SECTION: Document Templates
// ============================================================================

/// Entry of a templated data description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataTemplateEntry {
    /// Scalar property.
    Property(PropertyTemplate),
    /// Nested document templates.
    Nested(Vec<DocumentTemplate>),
}

/// Whether the client prefills the document from a data source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefillMode {
    /// Values come from the server; no data sources are published.
    #[default]
    Server,
    /// The client loads the primary list link before rendering.
    Client,
}

/// Named data source link template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceTemplate {
    /// Data source name.
    pub name: String,
    /// Link template.
    pub link: RestLink,
}

/// Unresolved document; also the working state while fragments apply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentTemplate {
    /// Identity template.
    pub identity: OrderedMap<String>,
    /// Data description template.
    pub data: OrderedMap<DataTemplateEntry>,
    /// Display tree.
    pub display: Vec<DisplayNode>,
    /// Prefill mode.
    pub prefill: PrefillMode,
    /// Primary data source for client prefill.
    pub data_source: Option<DataSourceTemplate>,
}

impl DocumentTemplate {
    /// Creates an empty document with the given identity.
    #[must_use]
    pub fn new<K: Into<String>, V: Into<String>>(identity: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            identity: identity.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
            ..Self::default()
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, property: PropertyTemplate) -> Self {
        self.data.insert(name.into(), DataTemplateEntry::Property(property));
        self
    }

    /// Adds nested documents.
    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, documents: Vec<Self>) -> Self {
        self.data.insert(name.into(), DataTemplateEntry::Nested(documents));
        self
    }

    /// Sets the display tree.
    #[must_use]
    pub fn display(mut self, nodes: Vec<DisplayNode>) -> Self {
        self.display = nodes;
        self
    }

    /// Sets the data source.
    #[must_use]
    pub fn data_source(mut self, name: impl Into<String>, link: RestLink) -> Self {
        self.data_source = Some(DataSourceTemplate {
            name: name.into(),
            link,
        });
        self
    }

    /// Sets the prefill mode.
    #[must_use]
    pub const fn prefill(mut self, mode: PrefillMode) -> Self {
        self.prefill = mode;
        self
    }
}

// ============================================================================
// SECTION: Base Templates
// ============================================================================

/// Selector for choosing a base template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSelector {
    /// Operation axis.
    pub operation: AxisMatch<OperationName>,
    /// Descriptor type axis.
    pub type_name: AxisMatch<String>,
    /// Country axis.
    pub country: AxisMatch<CountryCode>,
    /// Additional qualifiers.
    pub qualifiers: Vec<Qualifier>,
}

impl TemplateSelector {
    /// Wildcard selector; marks the family default.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts the operation to a set.
    #[must_use]
    pub fn operations(mut self, operations: &[&str]) -> Self {
        self.operation = AxisMatch::OneOf(operations.iter().map(OperationName::new).collect());
        self
    }

    /// Restricts the type to a set.
    #[must_use]
    pub fn types(mut self, types: &[&str]) -> Self {
        self.type_name = AxisMatch::OneOf(types.iter().map(|value| value.to_ascii_lowercase()).collect());
        self
    }

    /// Restricts the country to a set.
    #[must_use]
    pub fn countries(mut self, countries: &[&str]) -> Self {
        self.country = AxisMatch::OneOf(countries.iter().map(CountryCode::new).collect());
        self
    }

    /// Adds a qualifier.
    #[must_use]
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Returns true for the family default selector.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        !self.operation.is_specific()
            && !self.type_name.is_specific()
            && !self.country.is_specific()
            && self.qualifiers.is_empty()
    }

    /// Returns true when the key satisfies the selector.
    #[must_use]
    pub fn matches(&self, key: &ResolutionKey) -> bool {
        self.operation.matches(key.operation())
            && self.type_name.matches(key.type_name())
            && self.country.matches(key.country())
            && qualifiers_match(&self.qualifiers, key)
    }

    /// Returns the selection score; higher is more specific.
    #[must_use]
    pub fn score(&self) -> (u8, usize) {
        let mut rank = 0;
        if self.operation.is_specific() {
            rank |= 0b100;
        }
        if self.type_name.is_specific() {
            rank |= 0b010;
        }
        if self.country.is_specific() {
            rank |= 0b001;
        }
        (rank, self.qualifiers.len())
    }
}

/// Base template for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTemplate {
    /// Stable template id recorded as the default source layer.
    pub id: String,
    /// Selector.
    pub selector: TemplateSelector,
    /// Documents in output order.
    pub documents: Vec<DocumentTemplate>,
}

impl BaseTemplate {
    /// Creates a base template.
    #[must_use]
    pub fn new(id: impl Into<String>, selector: TemplateSelector, documents: Vec<DocumentTemplate>) -> Self {
        Self {
            id: id.into(),
            selector,
            documents,
        }
    }
}
