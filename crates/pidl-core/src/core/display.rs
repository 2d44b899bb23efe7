// crates/pidl-core/src/core/display.rs
// ============================================================================
// Module: PIDL Display Tree
// Description: Display nodes, actions, and hint-id tree operations.
// Purpose: Model the render and action tree of a descriptor document.
// Dependencies: crate::core::{identifiers, ordered_map}, serde
// ============================================================================

//! ## Overview
//! Display nodes are a tagged sum type discriminated by `displayType`.
//! Containers (pages and groups) own ordered members; every node carries a
//! hint id that is unique within one document and an optional [`Action`].
//! Actions are discriminated by `type` with a context shaped for that type,
//! so an ill-typed context cannot be constructed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::HintId;
use crate::core::ordered_map::OrderedMap;

// ============================================================================
// SECTION: Links
// ============================================================================

/// HTTP method used by rest links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PATCH.
    Patch,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Endpoint reference carried by submit and rest actions and by data sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestLink {
    /// Target URL; client placeholders such as `{userId}` are kept verbatim.
    pub href: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Optional request headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<OrderedMap<String>>,
}

impl RestLink {
    /// Creates a link without headers.
    #[must_use]
    pub fn new(method: HttpMethod, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method,
            headers: None,
        }
    }
}

/// Data source link published for client prefill.
pub type ResourceLink = RestLink;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Partner-side action requested by a `partnerAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartnerActionKind {
    /// Partner adds a new resource.
    AddResource,
    /// Partner updates the current resource.
    UpdateResource,
    /// Partner asks the user to pick a resource type.
    SelectResourceType,
    /// Partner asks the user to pick a resource.
    SelectResource,
}

/// Descriptor document the partner should load for the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidlDocInfo {
    /// Resource type to resolve next.
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    /// Extra key parameters.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub parameters: OrderedMap<String>,
}

/// Resource context for partner actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceActionContext {
    /// Requested action.
    pub action: PartnerActionKind,
    /// Document to load.
    #[serde(rename = "pidlDocInfo")]
    pub pidl_doc_info: PidlDocInfo,
}

/// Context of a `partnerAction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    /// Requested action.
    pub action: PartnerActionKind,
    /// Optional resource context.
    #[serde(rename = "resourceActionContext", default, skip_serializing_if = "Option::is_none")]
    pub resource_action_context: Option<ResourceActionContext>,
}

impl ActionContext {
    /// Builds a partner action that loads `resource_type`.
    #[must_use]
    pub fn for_resource(action: PartnerActionKind, resource_type: impl Into<String>) -> Self {
        Self {
            action,
            resource_action_context: Some(ResourceActionContext {
                action,
                pidl_doc_info: PidlDocInfo {
                    resource_type: resource_type.into(),
                    parameters: OrderedMap::new(),
                },
            }),
        }
    }
}

/// Action attached to a display node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "context", rename_all = "camelCase")]
pub enum Action {
    /// Submit collected data.
    Submit(RestLink),
    /// Call a rest endpoint without submitting.
    RestAction(RestLink),
    /// Hand control to the partner.
    PartnerAction(ActionContext),
    /// Move to the next page.
    MoveNext,
    /// Move to the previous page.
    MovePrevious,
    /// Close the hosting modal window.
    CloseModalWindow,
}

impl Action {
    /// Every action discriminant.
    pub const DISCRIMINANTS: [&'static str; 6] =
        ["submit", "restAction", "partnerAction", "moveNext", "movePrevious", "closeModalWindow"];

    /// Returns the action discriminant.
    #[must_use]
    pub const fn action_type(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::RestAction(_) => "restAction",
            Self::PartnerAction(_) => "partnerAction",
            Self::MoveNext => "moveNext",
            Self::MovePrevious => "movePrevious",
            Self::CloseModalWindow => "closeModalWindow",
        }
    }

    /// Returns the rest link for submit and rest actions.
    #[must_use]
    pub const fn rest_link(&self) -> Option<&RestLink> {
        match self {
            Self::Submit(link) | Self::RestAction(link) => Some(link),
            _ => None,
        }
    }

    /// Returns the partner context for partner actions.
    #[must_use]
    pub const fn action_context(&self) -> Option<&ActionContext> {
        match self {
            Self::PartnerAction(context) => Some(context),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Hints
// ============================================================================

/// Page or group container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHint {
    /// Hint id.
    #[serde(rename = "displayId")]
    pub display_id: HintId,
    /// Optional caption.
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Ordered members.
    #[serde(default)]
    pub members: Vec<DisplayNode>,
    /// Hidden flag.
    #[serde(rename = "isHidden", default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    /// Display tags.
    #[serde(rename = "displayTags", default, skip_serializing_if = "OrderedMap::is_empty")]
    pub display_tags: OrderedMap<String>,
    /// Optional action.
    #[serde(rename = "pidlAction", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// Hint that renders one data property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyHint {
    /// Hint id.
    #[serde(rename = "displayId")]
    pub display_id: HintId,
    /// Bound property name.
    #[serde(rename = "propertyName")]
    pub property_name: String,
    /// Optional label.
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Hidden flag.
    #[serde(rename = "isHidden", default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    /// Display tags.
    #[serde(rename = "displayTags", default, skip_serializing_if = "OrderedMap::is_empty")]
    pub display_tags: OrderedMap<String>,
    /// Optional action.
    #[serde(rename = "pidlAction", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// Text, button, or hyperlink hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHint {
    /// Hint id.
    #[serde(rename = "displayId")]
    pub display_id: HintId,
    /// Rendered content.
    #[serde(rename = "displayContent", default, skip_serializing_if = "Option::is_none")]
    pub display_content: Option<String>,
    /// Hidden flag.
    #[serde(rename = "isHidden", default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    /// Display tags.
    #[serde(rename = "displayTags", default, skip_serializing_if = "OrderedMap::is_empty")]
    pub display_tags: OrderedMap<String>,
    /// Optional action.
    #[serde(rename = "pidlAction", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// Node of the display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "displayType", rename_all = "lowercase")]
pub enum DisplayNode {
    /// Top-level page.
    Page(ContainerHint),
    /// Nested group.
    Group(ContainerHint),
    /// Property input.
    Property(PropertyHint),
    /// Static text.
    Text(ContentHint),
    /// Button.
    Button(ContentHint),
    /// Hyperlink.
    Hyperlink(ContentHint),
}

impl DisplayNode {
    /// Every display discriminant.
    pub const DISCRIMINANTS: [&'static str; 6] = ["page", "group", "property", "text", "button", "hyperlink"];

    /// Builds a page.
    #[must_use]
    pub fn page(id: impl Into<HintId>, members: Vec<Self>) -> Self {
        Self::Page(container(id.into(), members))
    }

    /// Builds a group.
    #[must_use]
    pub fn group(id: impl Into<HintId>, members: Vec<Self>) -> Self {
        Self::Group(container(id.into(), members))
    }

    /// Builds a property hint bound to `property_name`.
    #[must_use]
    pub fn property(id: impl Into<HintId>, property_name: impl Into<String>) -> Self {
        Self::Property(PropertyHint {
            display_id: id.into(),
            property_name: property_name.into(),
            display_name: None,
            is_hidden: false,
            display_tags: OrderedMap::new(),
            action: None,
        })
    }

    /// Builds a text hint.
    #[must_use]
    pub fn text(id: impl Into<HintId>, content: impl Into<String>) -> Self {
        Self::Text(content_hint(id.into(), content.into()))
    }

    /// Builds a button.
    #[must_use]
    pub fn button(id: impl Into<HintId>, content: impl Into<String>) -> Self {
        Self::Button(content_hint(id.into(), content.into()))
    }

    /// Builds a hyperlink.
    #[must_use]
    pub fn hyperlink(id: impl Into<HintId>, content: impl Into<String>) -> Self {
        Self::Hyperlink(content_hint(id.into(), content.into()))
    }

    /// Returns the node with `action` attached.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.set_action(Some(action));
        self
    }

    /// Returns the node marked hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.set_hidden(true);
        self
    }

    /// Returns the node with a caption or label.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            Self::Page(hint) | Self::Group(hint) => hint.display_name = Some(name.into()),
            Self::Property(hint) => hint.display_name = Some(name.into()),
            Self::Text(_) | Self::Button(_) | Self::Hyperlink(_) => {}
        }
        self
    }

    /// Returns the hint id.
    #[must_use]
    pub const fn hint_id(&self) -> &HintId {
        match self {
            Self::Page(hint) | Self::Group(hint) => &hint.display_id,
            Self::Property(hint) => &hint.display_id,
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => &hint.display_id,
        }
    }

    /// Returns the `displayType` discriminant.
    #[must_use]
    pub const fn display_type(&self) -> &'static str {
        match self {
            Self::Page(_) => "page",
            Self::Group(_) => "group",
            Self::Property(_) => "property",
            Self::Text(_) => "text",
            Self::Button(_) => "button",
            Self::Hyperlink(_) => "hyperlink",
        }
    }

    /// Returns container members.
    #[must_use]
    pub fn members(&self) -> Option<&[Self]> {
        match self {
            Self::Page(hint) | Self::Group(hint) => Some(&hint.members),
            _ => None,
        }
    }

    /// Returns container members mutably.
    pub const fn members_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Page(hint) | Self::Group(hint) => Some(&mut hint.members),
            _ => None,
        }
    }

    /// Returns the bound property name for property hints.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        match self {
            Self::Property(hint) => Some(&hint.property_name),
            _ => None,
        }
    }

    /// Returns the attached action.
    #[must_use]
    pub const fn action(&self) -> Option<&Action> {
        match self {
            Self::Page(hint) | Self::Group(hint) => hint.action.as_ref(),
            Self::Property(hint) => hint.action.as_ref(),
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => hint.action.as_ref(),
        }
    }

    /// Replaces or clears the action.
    pub fn set_action(&mut self, action: Option<Action>) {
        match self {
            Self::Page(hint) | Self::Group(hint) => hint.action = action,
            Self::Property(hint) => hint.action = action,
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => hint.action = action,
        }
    }

    /// Returns the hidden flag.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        match self {
            Self::Page(hint) | Self::Group(hint) => hint.is_hidden,
            Self::Property(hint) => hint.is_hidden,
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => hint.is_hidden,
        }
    }

    /// Sets the hidden flag.
    pub const fn set_hidden(&mut self, hidden: bool) {
        match self {
            Self::Page(hint) | Self::Group(hint) => hint.is_hidden = hidden,
            Self::Property(hint) => hint.is_hidden = hidden,
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => hint.is_hidden = hidden,
        }
    }

    /// Returns the display tags.
    #[must_use]
    pub const fn display_tags(&self) -> &OrderedMap<String> {
        match self {
            Self::Page(hint) | Self::Group(hint) => &hint.display_tags,
            Self::Property(hint) => &hint.display_tags,
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => &hint.display_tags,
        }
    }

    /// Returns the display tags mutably.
    pub const fn display_tags_mut(&mut self) -> &mut OrderedMap<String> {
        match self {
            Self::Page(hint) | Self::Group(hint) => &mut hint.display_tags,
            Self::Property(hint) => &mut hint.display_tags,
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => &mut hint.display_tags,
        }
    }

    /// Returns the content of text, button, and hyperlink hints.
    #[must_use]
    pub fn display_content(&self) -> Option<&str> {
        match self {
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => hint.display_content.as_deref(),
            _ => None,
        }
    }

    /// Sets content on content hints. Returns false for other node kinds.
    pub fn set_display_content(&mut self, content: impl Into<String>) -> bool {
        match self {
            Self::Text(hint) | Self::Button(hint) | Self::Hyperlink(hint) => {
                hint.display_content = Some(content.into());
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// SECTION: Tree Operations
// ============================================================================

/// Finds a node by hint id at any depth.
#[must_use]
pub fn find_node<'a>(nodes: &'a [DisplayNode], id: &str) -> Option<&'a DisplayNode> {
    for node in nodes {
        if node.hint_id().as_str() == id {
            return Some(node);
        }
        if let Some(found) = node.members().and_then(|members| find_node(members, id)) {
            return Some(found);
        }
    }
    None
}

/// Finds a node mutably by hint id at any depth.
pub fn find_node_mut<'a>(nodes: &'a mut [DisplayNode], id: &str) -> Option<&'a mut DisplayNode> {
    for node in nodes.iter_mut() {
        if node.hint_id().as_str() == id {
            return Some(node);
        }
        if let Some(members) = node.members_mut()
            && let Some(found) = find_node_mut(members, id)
        {
            return Some(found);
        }
    }
    None
}

/// Removes the node with `id` at any depth and returns it.
pub fn remove_node(nodes: &mut Vec<DisplayNode>, id: &str) -> Option<DisplayNode> {
    if let Some(index) = nodes.iter().position(|node| node.hint_id().as_str() == id) {
        return Some(nodes.remove(index));
    }
    for node in nodes.iter_mut() {
        if let Some(members) = node.members_mut()
            && let Some(removed) = remove_node(members, id)
        {
            return Some(removed);
        }
    }
    None
}

/// Returns the member list that directly contains `id`.
pub fn parent_members_mut<'a>(nodes: &'a mut Vec<DisplayNode>, id: &str) -> Option<&'a mut Vec<DisplayNode>> {
    if nodes.iter().any(|node| node.hint_id().as_str() == id) {
        return Some(nodes);
    }
    for node in nodes.iter_mut() {
        if let Some(members) = node.members_mut()
            && let Some(parent) = parent_members_mut(members, id)
        {
            return Some(parent);
        }
    }
    None
}

/// Visits every node depth-first in document order.
pub fn visit_nodes<'a>(nodes: &'a [DisplayNode], visit: &mut impl FnMut(&'a DisplayNode)) {
    for node in nodes {
        visit(node);
        if let Some(members) = node.members() {
            visit_nodes(members, visit);
        }
    }
}

/// Visits every node mutably, depth-first in document order.
pub fn visit_nodes_mut(nodes: &mut [DisplayNode], visit: &mut impl FnMut(&mut DisplayNode)) {
    for node in nodes.iter_mut() {
        visit(node);
        if let Some(members) = node.members_mut() {
            visit_nodes_mut(members, visit);
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an empty container.
fn container(display_id: HintId, members: Vec<DisplayNode>) -> ContainerHint {
    ContainerHint {
        display_id,
        display_name: None,
        members,
        is_hidden: false,
        display_tags: OrderedMap::new(),
        action: None,
    }
}

/// Builds a content hint.
fn content_hint(display_id: HintId, content: String) -> ContentHint {
    ContentHint {
        display_id,
        display_content: Some(content),
        is_hidden: false,
        display_tags: OrderedMap::new(),
        action: None,
    }
}

/// Serde helper for skipping false flags.
#[allow(clippy::trivially_copy_pass_by_ref, reason = "Serde skip predicates take references.")]
const fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::Action;
    use super::DisplayNode;
    use super::HttpMethod;
    use super::RestLink;
    use super::find_node;
    use super::remove_node;

    fn tree() -> Vec<DisplayNode> {
        vec![DisplayNode::page(
            "page",
            vec![
                DisplayNode::group("fields", vec![DisplayNode::property("nameHint", "name")]),
                DisplayNode::button("saveButton", "Save"),
            ],
        )]
    }

    #[test]
    fn lookup_resolves_at_any_depth() {
        let nodes = tree();
        assert_eq!(find_node(&nodes, "nameHint").unwrap().property_name(), Some("name"));
        assert!(find_node(&nodes, "missing").is_none());
    }

    #[test]
    fn remove_detaches_nested_node() {
        let mut nodes = tree();
        let removed = remove_node(&mut nodes, "nameHint").unwrap();
        assert_eq!(removed.display_type(), "property");
        assert!(find_node(&nodes, "nameHint").is_none());
    }

    #[test]
    fn actions_serialize_with_type_and_context() {
        let node = DisplayNode::button("saveButton", "Save")
            .with_action(Action::Submit(RestLink::new(HttpMethod::Post, "https://{hapi-endpoint}/x")));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["displayType"], "button");
        assert_eq!(value["pidlAction"]["type"], "submit");
        assert_eq!(value["pidlAction"]["context"]["method"], "POST");
        let unit = serde_json::to_value(Action::MoveNext).unwrap();
        assert_eq!(unit, serde_json::json!({"type": "moveNext"}));
    }
}
