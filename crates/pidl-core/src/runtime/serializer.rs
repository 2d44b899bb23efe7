// crates/pidl-core/src/runtime/serializer.rs
// ============================================================================
// Module: PIDL Descriptor Serializer
// Description: JSON encoding and validated decoding of descriptor documents.
// Purpose: Round-trip resolved documents without loss of order or shape.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Documents encode as a JSON array. Decoding runs in two passes: a
//! structural pre-scan over a [`serde_json::Value`] rejects unknown or
//! missing display and action discriminants with a JSON path, then the
//! original bytes are decoded so ordered maps keep their order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::display::Action;
use crate::core::display::DisplayNode;
use crate::core::document::DescriptorDocument;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Serialization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// A display node or action carries an unknown or missing discriminant.
    #[error("unknown node type '{discriminant}' at {path}")]
    UnknownNodeType {
        /// Discriminant found, or `<missing>`.
        discriminant: String,
        /// JSON path of the offending object.
        path: String,
    },
    /// Input is not a valid document array.
    #[error("malformed descriptor json: {0}")]
    Malformed(String),
    /// Encoding failed.
    #[error("descriptor encode failed: {0}")]
    Encode(String),
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes documents as compact JSON.
///
/// # Errors
///
/// Returns [`SerializationError::Encode`] when serialization fails.
pub fn serialize_documents(documents: &[DescriptorDocument]) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(documents).map_err(|err| SerializationError::Encode(err.to_string()))
}

/// Encodes documents as indented JSON.
///
/// # Errors
///
/// Returns [`SerializationError::Encode`] when serialization fails.
pub fn serialize_documents_pretty(documents: &[DescriptorDocument]) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec_pretty(documents).map_err(|err| SerializationError::Encode(err.to_string()))
}

/// Decodes a document array.
///
/// # Errors
///
/// Returns [`SerializationError::UnknownNodeType`] for bad discriminants and
/// [`SerializationError::Malformed`] for any other decoding failure.
pub fn deserialize_documents(bytes: &[u8]) -> Result<Vec<DescriptorDocument>, SerializationError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| SerializationError::Malformed(err.to_string()))?;
    let Value::Array(documents) = &value else {
        return Err(SerializationError::Malformed("expected a document array".to_string()));
    };
    for (index, document) in documents.iter().enumerate() {
        scan_document(document, &format!("$[{index}]"))?;
    }
    serde_json::from_slice(bytes).map_err(|err| SerializationError::Malformed(err.to_string()))
}

/// Returns true when the documents survive an encode and decode unchanged.
///
/// Map equality ignores entry order, so the decoded documents are encoded a
/// second time and must reproduce the original bytes.
///
/// # Errors
///
/// Returns [`SerializationError`] when either direction fails.
pub fn round_trips(documents: &[DescriptorDocument]) -> Result<bool, SerializationError> {
    let bytes = serialize_documents(documents)?;
    let decoded = deserialize_documents(&bytes)?;
    Ok(decoded == documents && serialize_documents(&decoded)? == bytes)
}

// ============================================================================
// SECTION: Pre-scan
// ============================================================================

/// Checks discriminants in one document and its nested documents.
fn scan_document(document: &Value, path: &str) -> Result<(), SerializationError> {
    if let Some(Value::Array(nodes)) = document.get("displayDescription") {
        scan_nodes(nodes, &format!("{path}.displayDescription"))?;
    }
    if let Some(Value::Object(entries)) = document.get("data_description") {
        for (name, entry) in entries {
            if let Value::Array(nested) = entry {
                for (index, child) in nested.iter().enumerate() {
                    scan_document(child, &format!("{path}.data_description.{name}[{index}]"))?;
                }
            }
        }
    }
    Ok(())
}

/// Checks display node and action discriminants recursively.
fn scan_nodes(nodes: &[Value], path: &str) -> Result<(), SerializationError> {
    for (index, node) in nodes.iter().enumerate() {
        let node_path = format!("{path}[{index}]");
        check_discriminant(node.get("displayType"), &DisplayNode::DISCRIMINANTS, &node_path)?;
        if let Some(action) = node.get("pidlAction").filter(|action| !action.is_null()) {
            check_discriminant(action.get("type"), &Action::DISCRIMINANTS, &format!("{node_path}.pidlAction"))?;
        }
        if let Some(Value::Array(members)) = node.get("members") {
            scan_nodes(members, &format!("{node_path}.members"))?;
        }
    }
    Ok(())
}

/// Accepts only string discriminants from `known`.
fn check_discriminant(found: Option<&Value>, known: &[&str], path: &str) -> Result<(), SerializationError> {
    match found {
        Some(Value::String(tag)) if known.contains(&tag.as_str()) => Ok(()),
        Some(Value::String(tag)) => Err(SerializationError::UnknownNodeType {
            discriminant: tag.clone(),
            path: path.to_string(),
        }),
        Some(other) => Err(SerializationError::UnknownNodeType {
            discriminant: other.to_string(),
            path: path.to_string(),
        }),
        None => Err(SerializationError::UnknownNodeType {
            discriminant: "<missing>".to_string(),
            path: path.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::SerializationError;
    use super::deserialize_documents;
    use super::round_trips;
    use super::serialize_documents;
    use crate::core::display::Action;
    use crate::core::display::DisplayNode;
    use crate::core::display::HttpMethod;
    use crate::core::display::RestLink;
    use crate::core::document::DataEntry;
    use crate::core::document::DataType;
    use crate::core::document::DescriptorDocument;
    use crate::core::document::PropertyDescriptor;
    use crate::core::document::PropertyType;
    use crate::core::ordered_map::OrderedMap;

    fn property() -> PropertyDescriptor {
        PropertyDescriptor {
            property_type: PropertyType::UserData,
            data_type: DataType::String,
            is_key: false,
            is_optional: false,
            is_updatable: true,
            default_value: None,
            possible_values: Some(
                [("zeta", "Z"), ("alpha", "A")].into_iter().map(|(key, value)| (key.to_string(), value.to_string())).collect(),
            ),
            validation: None,
            transformation: None,
            source_override_layer: "base".to_string(),
        }
    }

    fn document() -> DescriptorDocument {
        let mut data = OrderedMap::new();
        data.insert("zip".to_string(), DataEntry::Property(property()));
        data.insert("city".to_string(), DataEntry::Property(property()));
        DescriptorDocument {
            identity: [("type", "billing"), ("country", "us")]
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            data_description: data,
            display_description: Some(vec![DisplayNode::page("addressPage", vec![
                DisplayNode::property("zip", "zip"),
                DisplayNode::button("saveButton", "Save")
                    .with_action(Action::Submit(RestLink::new(HttpMethod::Post, "https://{endpoint}/addresses"))),
            ])]),
            data_sources: None,
        }
    }

    #[test]
    fn documents_round_trip_with_key_order_intact() {
        let documents = vec![document()];
        assert!(round_trips(&documents).unwrap());
        let text = String::from_utf8(serialize_documents(&documents).unwrap()).unwrap();
        assert!(text.find("\"zip\"").unwrap() < text.find("\"city\"").unwrap());
        assert!(text.find("\"zeta\"").unwrap() < text.find("\"alpha\"").unwrap());
    }

    #[test]
    fn unknown_display_type_reports_its_path() {
        let mut value: serde_json::Value = serde_json::from_slice(&serialize_documents(&[document()]).unwrap()).unwrap();
        value[0]["displayDescription"][0]["members"][1]["displayType"] = "carousel".into();
        let result = deserialize_documents(value.to_string().as_bytes());
        assert_eq!(result, Err(SerializationError::UnknownNodeType {
            discriminant: "carousel".to_string(),
            path: "$[0].displayDescription[0].members[1]".to_string(),
        }));
    }

    #[test]
    fn missing_action_type_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_slice(&serialize_documents(&[document()]).unwrap()).unwrap();
        value[0]["displayDescription"][0]["members"][1]["pidlAction"]
            .as_object_mut()
            .unwrap()
            .remove("type");
        let result = deserialize_documents(value.to_string().as_bytes());
        assert!(matches!(result, Err(SerializationError::UnknownNodeType { discriminant, .. }) if discriminant == "<missing>"));
    }

    #[test]
    fn non_array_input_is_malformed() {
        assert!(matches!(deserialize_documents(b"{}"), Err(SerializationError::Malformed(_))));
    }
}
