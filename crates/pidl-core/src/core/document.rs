// crates/pidl-core/src/core/document.rs
// ============================================================================
// Module: PIDL Descriptor Documents
// Description: Resolved descriptor documents and property descriptors.
// Purpose: Provide the immutable output shape of a resolution.
// Dependencies: crate::core::{display, ordered_map}, regex, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`DescriptorDocument`] pairs an ordered data description with an
//! optional display tree. Data entries are either property descriptors or
//! lists of nested documents owned by their parent entry. Documents are
//! immutable once returned by the engine; the lookup helpers search nested
//! documents at any depth.
//!
//! Security posture: documents may be re-hydrated from untrusted files, so
//! [`DescriptorDocument::validate`] re-checks regex compilation and hint-id
//! uniqueness.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::display::DisplayNode;
use crate::core::display::ResourceLink;
use crate::core::display::find_node;
use crate::core::display::visit_nodes;
use crate::core::ordered_map::OrderedMap;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural problems found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A property regex does not compile.
    #[error("invalid regex for property {property}: {message}")]
    InvalidRegex {
        /// Property name.
        property: String,
        /// Compiler message.
        message: String,
    },
    /// A hint id appears more than once in one display tree.
    #[error("duplicate hint id: {0}")]
    DuplicateHintId(String),
}

// ============================================================================
// SECTION: Property Descriptor
// ============================================================================

/// Origin of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    /// Entered by the user.
    UserData,
    /// Supplied by the client without user input.
    ClientData,
}

/// Scalar data type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Text.
    String,
    /// Boolean.
    Bool,
    /// Integer.
    Int,
}

/// How a property value is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    /// Client-side regular expression.
    Regex,
    /// Server-side service validation.
    Service,
}

/// Resolved validation attached to a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValidation {
    /// Validation kind.
    #[serde(rename = "validationType")]
    pub validation_type: ValidationType,
    /// Regular expression for regex validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Service validation type such as `phonenumber.us`.
    #[serde(rename = "urlValidationType", default, skip_serializing_if = "Option::is_none")]
    pub url_validation_type: Option<String>,
    /// Error code surfaced on failure.
    #[serde(rename = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Error message surfaced on failure.
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Transformation attached to a property for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTransformation {
    /// Transformation name, such as `ToPhoneNumberE164`.
    #[serde(rename = "transformationType")]
    pub transformation_type: String,
}

/// Fully resolved property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Value origin.
    #[serde(rename = "propertyType")]
    pub property_type: PropertyType,
    /// Scalar type.
    #[serde(rename = "dataType")]
    pub data_type: DataType,
    /// Key property flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_key: bool,
    /// Optionality, always resolved.
    pub is_optional: bool,
    /// Updatable flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_updatable: bool,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Allowed values in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<OrderedMap<String>>,
    /// Validation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<PropertyValidation>,
    /// Transformations keyed by target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<OrderedMap<PropertyTransformation>>,
    /// Base template or last fragment that shaped this property.
    #[serde(rename = "sourceOverrideLayer")]
    pub source_override_layer: String,
}

/// Entry of a data description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataEntry {
    /// Nested documents owned by this entry.
    Nested(Vec<DescriptorDocument>),
    /// Scalar property.
    Property(PropertyDescriptor),
}

// ============================================================================
// SECTION: Descriptor Document
// ============================================================================

/// Resolved descriptor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDocument {
    /// Identity entries (description type, type, country, operation, ...).
    pub identity: OrderedMap<String>,
    /// Ordered data description.
    pub data_description: OrderedMap<DataEntry>,
    /// Display tree, or null for not-applicable partners.
    #[serde(rename = "displayDescription", default)]
    pub display_description: Option<Vec<DisplayNode>>,
    /// Client prefill sources.
    #[serde(rename = "dataSources", default, skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<OrderedMap<ResourceLink>>,
}

impl DescriptorDocument {
    /// Returns the property named `name`, searching nested documents.
    #[must_use]
    pub fn get_property_by_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        if let Some(DataEntry::Property(property)) = self.data_description.get(name) {
            return Some(property);
        }
        self.nested().find_map(|nested| nested.get_property_by_name(name))
    }

    /// Returns the display node with `hint_id`, searching nested documents.
    #[must_use]
    pub fn get_node_by_id(&self, hint_id: &str) -> Option<&DisplayNode> {
        if let Some(found) = self.display_description.as_deref().and_then(|nodes| find_node(nodes, hint_id)) {
            return Some(found);
        }
        self.nested().find_map(|nested| nested.get_node_by_id(hint_id))
    }

    /// Returns the nested documents stored under `name`.
    #[must_use]
    pub fn nested_documents(&self, name: &str) -> Option<&[Self]> {
        match self.data_description.get(name) {
            Some(DataEntry::Nested(documents)) => Some(documents),
            _ => None,
        }
    }

    /// Returns the identity value for `key`.
    #[must_use]
    pub fn identity_value(&self, key: &str) -> Option<&str> {
        self.identity.get(key).map(String::as_str)
    }

    /// Checks regex compilation and hint-id uniqueness at every depth.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] for the first violation found.
    pub fn validate(&self) -> Result<(), DocumentError> {
        for (name, entry) in self.data_description.iter() {
            match entry {
                DataEntry::Property(property) => {
                    if let Some(pattern) = property.validation.as_ref().and_then(|v| v.regex.as_deref()) {
                        Regex::new(pattern).map_err(|err| DocumentError::InvalidRegex {
                            property: name.to_string(),
                            message: err.to_string(),
                        })?;
                    }
                }
                DataEntry::Nested(documents) => {
                    for document in documents {
                        document.validate()?;
                    }
                }
            }
        }
        if let Some(nodes) = &self.display_description {
            let mut seen = BTreeSet::new();
            let mut duplicate = None;
            visit_nodes(nodes, &mut |node| {
                if !seen.insert(node.hint_id().to_string()) && duplicate.is_none() {
                    duplicate = Some(node.hint_id().to_string());
                }
            });
            if let Some(id) = duplicate {
                return Err(DocumentError::DuplicateHintId(id));
            }
        }
        Ok(())
    }

    /// Iterates over nested documents in declaration order.
    fn nested(&self) -> impl Iterator<Item = &Self> {
        self.data_description
            .values()
            .filter_map(|entry| match entry {
                DataEntry::Nested(documents) => Some(documents.iter()),
                DataEntry::Property(_) => None,
            })
            .flatten()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde helper for skipping false flags.
#[allow(clippy::trivially_copy_pass_by_ref, reason = "Serde skip predicates take references.")]
const fn is_false(value: &bool) -> bool {
    !*value
}
