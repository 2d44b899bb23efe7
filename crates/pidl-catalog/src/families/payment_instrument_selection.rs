// crates/pidl-catalog/src/families/payment_instrument_selection.rs
// ============================================================================
// Module: Payment Instrument Selection Catalog
// Description: Picker over the user's active payment instruments.
// Purpose: Declare the selection template and its partner fragments.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! The picker lists active instruments from the profile service and offers a
//! link that hands control back to the partner to add a new one. Selection
//! only happens on the client, so this family declares no submit links.

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
use pidl_core::FlightError;
use pidl_core::HttpMethod;
use pidl_core::InsertPosition;
use pidl_core::OverrideFragment;
use pidl_core::OverrideScope;
use pidl_core::PartnerActionKind;
use pidl_core::Patch;
use pidl_core::PrefillMode;
use pidl_core::PropertyTemplate;
use pidl_core::RestLink;
use pidl_core::TemplateSelector;

use super::catalog_with_partners;
use super::document;
use super::flights;
use crate::partners::LIST_PAYMENT_INSTRUMENT;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Active instrument listing.
pub const ACTIVE_INSTRUMENTS_HREF: &str =
    "https://{pifd-endpoint}/users/{userId}/paymentInstrumentsEx?status=active&language={language}";

/// Flight showing the India tokenization notice above the list.
pub const INDIA_TOKENIZATION_MESSAGE_FLIGHT: &str = "IndiaTokenizationMessage";

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Instrument picker.
fn selection_template() -> BaseTemplate {
    let picker = document("paymentInstrument")
        .property("id", PropertyTemplate::client(DataType::String).required())
        .display(vec![DisplayNode::page("paymentInstrumentSelectPage", vec![
            DisplayNode::property("paymentInstrumentShowPi", "id"),
            DisplayNode::hyperlink("newPaymentMethodLink", "Add a new payment method").with_action(Action::PartnerAction(
                ActionContext::for_resource(PartnerActionKind::SelectResourceType, "paymentInstrument"),
            )),
            DisplayNode::button("cancelButton", "Cancel"),
        ])])
        .data_source("paymentInstruments", RestLink::new(HttpMethod::Get, ACTIVE_INSTRUMENTS_HREF));
    BaseTemplate::new("paymentInstrument.select", TemplateSelector::any(), vec![picker])
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Override fragments, least specific first.
fn fragments() -> Result<Vec<OverrideFragment>, FlightError> {
    Ok(vec![
        OverrideFragment::new("paymentInstrument.prefill", OverrideScope::any()).patch(Patch::SetPrefill(PrefillMode::Client)),
        OverrideFragment::new("paymentInstrument.tokenizationMessage", OverrideScope::any().with_country("in"))
            .with_flights(flights(INDIA_TOKENIZATION_MESSAGE_FLIGHT)?)
            .patch(Patch::insert_node(
                Some("paymentInstrumentSelectPage"),
                InsertPosition::First,
                DisplayNode::group("paymentInstrumentSelectMessageGroup", vec![DisplayNode::text(
                    "paymentInstrumentSelectMessage",
                    "Saved cards are tokenized as required by the Reserve Bank of India.",
                )]),
            )),
        OverrideFragment::new("paymentInstrument.list", OverrideScope::any().with_partners(LIST_PAYMENT_INSTRUMENT))
            .patch(Patch::display_tag("paymentInstrumentShowPi", "accessibilityName", "Payment methods")),
        OverrideFragment::new("paymentInstrument.ggpdeds", OverrideScope::any().with_partner("ggpdeds")).patch(
            Patch::replace_action(
                "newPaymentMethodLink",
                Some(Action::PartnerAction(ActionContext::for_resource(
                    PartnerActionKind::AddResource,
                    "paymentInstrument",
                ))),
            ),
        ),
        OverrideFragment::new("paymentInstrument.dropdown", OverrideScope::any().with_partner("listpidropdown"))
            .patch(Patch::remove_node("newPaymentMethodLink")),
    ])
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Payment-instrument-selection family catalog.
///
/// # Errors
///
/// Returns [`FlightError`] when a flight gate is malformed.
pub fn catalog() -> Result<FamilyCatalog, FlightError> {
    Ok(catalog_with_partners(DescriptorFamily::PaymentInstrumentSelection)
        .template(selection_template())
        .fragments(fragments()?))
}
