// crates/pidl-catalog/src/families/billing_group.rs
// ============================================================================
// Module: Billing Group Catalog
// Description: Billing group creation, selection, and purchase order forms.
// Purpose: Declare billing-group templates, fragments, and submit links.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Billing groups are created through a lightweight form, picked from a list
//! in the select-instance flow, and patched in place when only the purchase
//! order number changes. Commerce partners that host their own flows receive
//! partner actions on the list hyperlinks when their experience setting
//! enables them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::Action;
use pidl_core::ActionContext;
use pidl_core::BaseTemplate;
use pidl_core::DataType;
use pidl_core::DescriptorFamily;
use pidl_core::DisplayNode;
use pidl_core::FamilyCatalog;
use pidl_core::HttpMethod;
use pidl_core::OverrideFragment;
use pidl_core::OverrideScope;
use pidl_core::PartnerActionKind;
use pidl_core::Patch;
use pidl_core::PrefillMode;
use pidl_core::PropertyTemplate;
use pidl_core::Qualifier;
use pidl_core::RestLink;
use pidl_core::SubmitLinkRule;
use pidl_core::TemplateSelector;

use super::catalog_with_partners;
use super::document;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lightweight creation endpoint.
pub const BILLING_GROUP_HREF: &str = "https://{hapi-endpoint}/{userId}/billinggroup";
/// Organization-scoped creation endpoint.
pub const BILLING_GROUP_V7_HREF: &str = "https://{hapi-endpoint}/my-org/billinggroupv7";
/// Listing endpoint used by the select-instance flow.
pub const BILLING_GROUPS_HREF: &str = "https://{hapi-endpoint}/{userId}/billinggroups";

/// Scenario that edits only the purchase order number.
pub const PO_NUMBER_SCENARIO: &str = "billingGroupPONumber";
/// Feature enabling partner actions on the select-instance list.
pub const ADD_AND_UPDATE_ACTION_FEATURE: &str = "addPartnerActionToBillingGroupAddAndUpdate";
/// Feature enabling the partner action that picks a payment instrument.
pub const SELECT_PI_ACTION_FEATURE: &str = "addSelectResourcePartnerActionToBillingGroupAddPi";

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Create or rename form; also the family default.
fn default_template() -> BaseTemplate {
    let group = document("billingGroup")
        .property("billingGroupName", PropertyTemplate::required_text().updatable().validated())
        .property("poNumber", PropertyTemplate::optional_text().updatable().validated())
        .display(vec![DisplayNode::page("billingGroupPage", vec![
            DisplayNode::property("billingGroupName", "billingGroupName"),
            DisplayNode::property("poNumber", "poNumber"),
            DisplayNode::button("cancelButton", "Cancel"),
            DisplayNode::button("saveButton", "Save"),
        ])]);
    BaseTemplate::new("billingGroup.form", TemplateSelector::any(), vec![group])
}

/// List of existing billing groups.
fn select_instance_template() -> BaseTemplate {
    let list = document("billingGroup")
        .property("id", PropertyTemplate::client(DataType::String).required())
        .display(vec![DisplayNode::page("billingGroupListPage", vec![
            DisplayNode::property("billingGroupListShowBG", "id"),
            DisplayNode::hyperlink("addNewBG", "Add a new billing group"),
            DisplayNode::hyperlink("editBillingDetails", "Edit billing details"),
        ])])
        .data_source("billingGroups", RestLink::new(HttpMethod::Get, BILLING_GROUPS_HREF));
    BaseTemplate::new(
        "billingGroup.selectInstance",
        TemplateSelector::any().operations(&["selectinstance"]),
        vec![list],
    )
}

/// Lightweight creation form that also picks a payment instrument.
fn lightweight_template() -> BaseTemplate {
    let group = document("billingGroup")
        .property("billingGroupName", PropertyTemplate::required_text().validated())
        .property("poNumber", PropertyTemplate::optional_text().validated())
        .property("paymentInstrumentId", PropertyTemplate::client(DataType::String).required())
        .display(vec![DisplayNode::page("billingGroupLightWeightPage", vec![
            DisplayNode::property("billingGroupName", "billingGroupName"),
            DisplayNode::property("poNumber", "poNumber"),
            DisplayNode::hyperlink("billingGroupLightWeightAddNewPaymentInstrument", "Add a payment method"),
            DisplayNode::button("cancelButton", "Cancel"),
            DisplayNode::button("saveButton", "Save"),
        ])])
        .data_source(
            "paymentInstruments",
            RestLink::new(HttpMethod::Get, "https://{pifd-endpoint}/users/{userId}/paymentInstrumentsEx?status=active"),
        );
    BaseTemplate::new(
        "billingGroup.lightweight",
        TemplateSelector::any().operations(&["add"]).types(&["lightweight", "lightweightv7"]),
        vec![group],
    )
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Partner action targeting a billing-group resource.
fn resource_action(kind: PartnerActionKind, resource_type: &str) -> Option<Action> {
    Some(Action::PartnerAction(ActionContext::for_resource(kind, resource_type)))
}

/// Override fragments, least specific first.
fn fragments() -> Vec<OverrideFragment> {
    vec![
        OverrideFragment::new("billingGroup.selectInstance.prefill", OverrideScope::any().with_operation("selectinstance"))
            .patch(Patch::SetPrefill(PrefillMode::Client)),
        OverrideFragment::new("billingGroup.lightweight.prefill", OverrideScope::any().with_operation("add"))
            .qualified(Qualifier::types(&["lightweight", "lightweightv7"]))
            .patch(Patch::SetPrefill(PrefillMode::Client)),
        OverrideFragment::new(
            "billingGroup.poNumber",
            OverrideScope::any().with_operation("update").with_scenario(PO_NUMBER_SCENARIO),
        )
        .patch(Patch::remove_property("billingGroupName"))
        .patch(Patch::remove_node("billingGroupName")),
        OverrideFragment::new(
            "billingGroup.selectInstance.partnerActions",
            OverrideScope::any().with_operation("selectinstance").with_partner("commercialstores"),
        )
        .with_feature(ADD_AND_UPDATE_ACTION_FEATURE)
        .patch(Patch::replace_action("addNewBG", resource_action(PartnerActionKind::AddResource, "billingGroup")))
        .patch(Patch::replace_action(
            "editBillingDetails",
            resource_action(PartnerActionKind::UpdateResource, "billingGroup"),
        )),
        OverrideFragment::new(
            "billingGroup.lightweight.selectPi",
            OverrideScope::any().with_operation("add").with_partner("commercialstores"),
        )
        .with_feature(SELECT_PI_ACTION_FEATURE)
        .patch(Patch::replace_action(
            "billingGroupLightWeightAddNewPaymentInstrument",
            resource_action(PartnerActionKind::SelectResourceType, "paymentInstrument"),
        )),
    ]
}

// ============================================================================
// SECTION: Submit Links
// ============================================================================

/// Submit-link rules for creation and purchase order edits.
fn submit_links() -> Vec<SubmitLinkRule> {
    let po_update = || OverrideScope::any().with_operation("update").with_scenario(PO_NUMBER_SCENARIO);
    vec![
        SubmitLinkRule::new(
            "billingGroup.lightweight",
            OverrideScope::any().with_operation("add"),
            HttpMethod::Post,
            BILLING_GROUP_HREF,
        )
        .qualified(Qualifier::types(&["lightweight"])),
        SubmitLinkRule::new(
            "billingGroup.lightweightV7",
            OverrideScope::any().with_operation("add"),
            HttpMethod::Post,
            BILLING_GROUP_V7_HREF,
        )
        .qualified(Qualifier::types(&["lightweightv7"])),
        SubmitLinkRule::new("billingGroup.poNumber", po_update(), HttpMethod::Patch, "https://{hapi-endpoint}/{userId}/billinggroup/{id}")
            .qualified(Qualifier::types(&["lightweight"])),
        SubmitLinkRule::new(
            "billingGroup.poNumberV7",
            po_update(),
            HttpMethod::Patch,
            "https://{hapi-endpoint}/my-org/billinggroupv7/{id}",
        )
        .qualified(Qualifier::types(&["lightweightv7"])),
    ]
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Billing-group family catalog.
#[must_use]
pub fn catalog() -> FamilyCatalog {
    catalog_with_partners(DescriptorFamily::BillingGroup)
        .template(default_template())
        .template(select_instance_template())
        .template(lightweight_template())
        .fragments(fragments())
        .submit_links(submit_links())
        .not_applicable("NotApplicableForBillingGroup")
}
