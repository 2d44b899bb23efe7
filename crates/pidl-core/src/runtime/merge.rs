// crates/pidl-core/src/runtime/merge.rs
// ============================================================================
// Module: PIDL Fragment Merge
// Description: Applies override patches to working document templates.
// Purpose: Turn a base template plus ordered fragments into one template set.
// Dependencies: crate::core::{display, overrides, template}
// ============================================================================

//! ## Overview
//! Patches mutate working [`DocumentTemplate`] values in place. A patch whose
//! target does not exist in a document is skipped for that document. Every
//! property a fragment touches records the fragment id as its source layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::display::DisplayNode;
use crate::core::display::find_node_mut;
use crate::core::display::parent_members_mut;
use crate::core::display::remove_node;
use crate::core::identifiers::HintId;
use crate::core::overrides::InsertPosition;
use crate::core::overrides::OverrideFragment;
use crate::core::overrides::Patch;
use crate::core::overrides::PropertyOverride;
use crate::core::template::DataSourceTemplate;
use crate::core::template::DataTemplateEntry;
use crate::core::template::DocumentTemplate;
use crate::core::template::PropertyTemplate;
use crate::core::template::ValidationSource;

// ============================================================================
// SECTION: Fragment Application
// ============================================================================

/// Applies every patch of `fragment` to every document.
pub fn apply_fragment(documents: &mut [DocumentTemplate], fragment: &OverrideFragment) {
    for document in documents.iter_mut() {
        for patch in &fragment.patches {
            apply_patch(document, patch, &fragment.id);
        }
    }
}

/// Applies one patch to one document.
pub fn apply_patch(document: &mut DocumentTemplate, patch: &Patch, layer: &str) {
    match patch {
        Patch::Property {
            path,
            overrides,
        } => with_property(document, path, &mut |property| {
            override_property(property, overrides);
            property.source_layer = Some(layer.to_string());
        }),
        Patch::AddProperty {
            path,
            property,
        } => add_property(document, path, property, layer),
        Patch::RemoveProperty {
            path,
        } => remove_property(document, path),
        Patch::InsertNode {
            parent,
            position,
            node,
        } => insert_node(&mut document.display, parent.as_ref(), position, node),
        Patch::RemoveNode {
            hint_id,
        } => {
            remove_node(&mut document.display, hint_id.as_str());
        }
        Patch::ReorderMembers {
            parent,
            order,
        } => {
            let members = match parent {
                Some(parent) => find_node_mut(&mut document.display, parent.as_str()).and_then(DisplayNode::members_mut),
                None => Some(&mut document.display),
            };
            if let Some(members) = members {
                reorder(members, order);
            }
        }
        Patch::ReplaceAction {
            hint_id,
            action,
        } => {
            if let Some(node) = find_node_mut(&mut document.display, hint_id.as_str()) {
                node.set_action(action.clone());
            }
        }
        Patch::HideNode {
            hint_id,
        } => {
            if let Some(node) = find_node_mut(&mut document.display, hint_id.as_str()) {
                node.set_hidden(true);
            }
        }
        Patch::SetDisplayContent {
            hint_id,
            content,
        } => {
            if let Some(node) = find_node_mut(&mut document.display, hint_id.as_str()) {
                node.set_display_content(content.clone());
            }
        }
        Patch::AddDisplayTag {
            hint_id,
            key,
            value,
        } => {
            if let Some(node) = find_node_mut(&mut document.display, hint_id.as_str()) {
                node.display_tags_mut().insert(key.clone(), value.clone());
            }
        }
        Patch::SetPrefill(mode) => document.prefill = *mode,
        Patch::SetDataSource {
            name,
            link,
        } => {
            document.data_source = Some(DataSourceTemplate {
                name: name.clone(),
                link: link.clone(),
            });
        }
    }
}

// ============================================================================
// SECTION: Property Patches
// ============================================================================

/// Applies partial overrides; each attribute is independent.
fn override_property(property: &mut PropertyTemplate, overrides: &PropertyOverride) {
    if let Some(optional) = overrides.is_optional {
        property.is_optional = Some(optional);
    }
    if let Some(value) = &overrides.default_value {
        property.default_value = Some(value.clone());
    }
    if let Some(token) = &overrides.possible_values {
        property.possible_values = Some(token.clone());
    }
    if let Some(pattern) = &overrides.regex {
        let (error_code, error_message) = match &property.validation {
            ValidationSource::Regex {
                error_code,
                error_message,
                ..
            } => (error_code.clone(), error_message.clone()),
            _ => (None, None),
        };
        property.validation = ValidationSource::Regex {
            regex: pattern.clone(),
            error_code,
            error_message,
        };
    }
    if let Some(message) = &overrides.error_message {
        property.error_message = Some(message.clone());
    }
}

/// Runs `apply` on every property addressed by the dotted `path`.
fn with_property(document: &mut DocumentTemplate, path: &str, apply: &mut dyn FnMut(&mut PropertyTemplate)) {
    let (head, rest) = split_path(path);
    match (document.data.get_mut(head), rest) {
        (Some(DataTemplateEntry::Property(property)), None) => apply(property),
        (Some(DataTemplateEntry::Nested(nested)), Some(rest)) => {
            for child in nested.iter_mut() {
                with_property(child, rest, apply);
            }
        }
        _ => {}
    }
}

/// Adds or replaces a property; nested parents must already exist.
fn add_property(document: &mut DocumentTemplate, path: &str, property: &PropertyTemplate, layer: &str) {
    match split_path(path) {
        (name, None) => {
            let mut property = property.clone();
            property.source_layer = Some(layer.to_string());
            document.data.insert(name.to_string(), DataTemplateEntry::Property(property));
        }
        (head, Some(rest)) => {
            if let Some(DataTemplateEntry::Nested(nested)) = document.data.get_mut(head) {
                for child in nested.iter_mut() {
                    add_property(child, rest, property, layer);
                }
            }
        }
    }
}

/// Removes a property at the dotted `path`.
fn remove_property(document: &mut DocumentTemplate, path: &str) {
    match split_path(path) {
        (name, None) => {
            document.data.shift_remove(name);
        }
        (head, Some(rest)) => {
            if let Some(DataTemplateEntry::Nested(nested)) = document.data.get_mut(head) {
                for child in nested.iter_mut() {
                    remove_property(child, rest);
                }
            }
        }
    }
}

/// Splits `a.b.c` into `a` and `b.c`.
fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

// ============================================================================
// SECTION: Display Patches
// ============================================================================

/// Inserts `node`, or replaces the node already holding its hint id.
///
/// A replacement keeps the existing position; the later fragment wins.
fn insert_node(
    display: &mut Vec<DisplayNode>,
    parent: Option<&HintId>,
    position: &InsertPosition,
    node: &DisplayNode,
) {
    if let Some(existing) = find_node_mut(display, node.hint_id().as_str()) {
        *existing = node.clone();
        return;
    }
    let members = match (parent, position) {
        (Some(parent), _) => find_node_mut(display, parent.as_str()).and_then(DisplayNode::members_mut),
        (None, InsertPosition::Before(sibling) | InsertPosition::After(sibling)) => {
            parent_members_mut(display, sibling.as_str())
        }
        (None, _) => Some(display),
    };
    let Some(members) = members else {
        return;
    };
    let index = match position {
        InsertPosition::First => Some(0),
        InsertPosition::Last => Some(members.len()),
        InsertPosition::Before(sibling) => members.iter().position(|member| member.hint_id() == sibling),
        InsertPosition::After(sibling) => {
            members.iter().position(|member| member.hint_id() == sibling).map(|index| index + 1)
        }
    };
    if let Some(index) = index {
        members.insert(index, node.clone());
    }
}

/// Moves listed members to the front in the given order.
fn reorder(members: &mut Vec<DisplayNode>, order: &[HintId]) {
    let mut remaining = std::mem::take(members);
    for id in order {
        if let Some(index) = remaining.iter().position(|member| member.hint_id() == id) {
            members.push(remaining.remove(index));
        }
    }
    members.append(&mut remaining);
}

// ============================================================================
// SECTION: Tests
// ============================================================================
