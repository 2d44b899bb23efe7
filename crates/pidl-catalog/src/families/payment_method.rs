// crates/pidl-catalog/src/families/payment_method.rs
// ============================================================================
// Module: Payment Method Catalog
// Description: Card and mobile billing entry forms.
// Purpose: Declare payment-method templates, fragments, and submit links.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Cards share one form whose number and security code patterns are chosen by
//! descriptor type. Mobile billing collects a phone number validated by the
//! phone service and normalized to E.164 on submit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::BaseTemplate;
use pidl_core::DescriptorFamily;
use pidl_core::DisplayNode;
use pidl_core::FamilyCatalog;
use pidl_core::FlightError;
use pidl_core::HttpMethod;
use pidl_core::InsertPosition;
use pidl_core::OverrideFragment;
use pidl_core::OverrideScope;
use pidl_core::Patch;
use pidl_core::PropertyTemplate;
use pidl_core::Qualifier;
use pidl_core::SubmitLinkRule;
use pidl_core::TemplateSelector;

use super::catalog_with_partners;
use super::document;
use super::flights;
use crate::transformation_rules::FOR_SUBMIT;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Submit href for new payment instruments.
pub const ADD_PAYMENT_INSTRUMENT_HREF: &str =
    "https://{pifd-endpoint}/users/{userId}/paymentInstrumentsEx?country={country}&language={language}&partner={partner}";

/// Console partners that page through forms with a controller.
const CONSOLE_PARTNERS: &[&str] = &["xbox", "xboxweb", "amcxbox", "xboxnative", "xboxsubs", "xboxsettings", "saturn", "storify"];

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Card entry form.
fn card_template() -> BaseTemplate {
    let card = document("paymentMethod")
        .property("paymentMethodFamily", PropertyTemplate::hidden_value("{family}"))
        .property("paymentMethodType", PropertyTemplate::hidden_value("{type}"))
        .property("accountHolderName", PropertyTemplate::required_text().updatable().validated())
        .property("accountToken", PropertyTemplate::required_text().validated())
        .property("expiryMonth", PropertyTemplate::required_text().updatable().possible_values("{}Months"))
        .property("expiryYear", PropertyTemplate::required_text().updatable().possible_values("{}YearsExpiry4Digit"))
        .property("cvv", PropertyTemplate::required_text().validated())
        .display(vec![DisplayNode::page("cardPage", vec![
            DisplayNode::property("accountHolderName", "accountHolderName"),
            DisplayNode::property("accountToken", "accountToken"),
            DisplayNode::group("expiryGroup", vec![
                DisplayNode::property("expiryMonth", "expiryMonth"),
                DisplayNode::property("expiryYear", "expiryYear"),
            ]),
            DisplayNode::property("cvv", "cvv"),
            DisplayNode::button("cancelButton", "Cancel"),
            DisplayNode::button("saveButton", "Save"),
        ])]);
    BaseTemplate::new("paymentMethod.card", TemplateSelector::any(), vec![card])
}

/// Mobile billing entry form.
fn mobile_billing_template() -> BaseTemplate {
    let mobile = document("paymentMethod")
        .property("paymentMethodFamily", PropertyTemplate::hidden_value("{family}"))
        .property("paymentMethodType", PropertyTemplate::hidden_value("{type}"))
        .property(
            "msisdn",
            PropertyTemplate::required_text()
                .service("phonenumber.{country}", Some("InvalidPhoneNumber"))
                .transform(FOR_SUBMIT, "ToPhoneNumberE164"),
        )
        .display(vec![DisplayNode::page("mobilePage", vec![
            DisplayNode::property("msisdn", "msisdn"),
            DisplayNode::button("cancelButton", "Cancel"),
            DisplayNode::button("saveNextButton", "Next"),
        ])]);
    BaseTemplate::new(
        "paymentMethod.mobileBilling",
        TemplateSelector::any().qualified(Qualifier::families(&["mobile_billing_non_sim"])),
        vec![mobile],
    )
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Override fragments, least specific first.
fn fragments() -> Result<Vec<OverrideFragment>, FlightError> {
    Ok(vec![
        OverrideFragment::new("paymentMethod.tokenizationConsent", OverrideScope::any().with_country("in"))
            .with_flights(flights("IndiaTokenizationConsentCapture")?)
            .patch(Patch::insert_node(
                Some("cardPage"),
                InsertPosition::Before("cancelButton".into()),
                DisplayNode::text("tokenizationConsentText", "Save this card securely for faster checkout."),
            )),
        OverrideFragment::new("paymentMethod.console", OverrideScope::any().with_partners(CONSOLE_PARTNERS))
            .patch(Patch::hide("cancelButton"))
            .patch(Patch::display_content("saveButton", "Next")),
        OverrideFragment::new("paymentMethod.update", OverrideScope::any().with_operation("update"))
            .patch(Patch::remove_property("accountToken"))
            .patch(Patch::remove_property("cvv"))
            .patch(Patch::remove_node("accountToken"))
            .patch(Patch::remove_node("cvv")),
    ])
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Payment-method family catalog.
///
/// # Errors
///
/// Returns [`FlightError`] when a flight gate is malformed.
pub fn catalog() -> Result<FamilyCatalog, FlightError> {
    Ok(catalog_with_partners(DescriptorFamily::PaymentMethod)
        .template(card_template())
        .template(mobile_billing_template())
        .fragments(fragments()?)
        .submit_links([SubmitLinkRule::new(
            "paymentMethod.add",
            OverrideScope::any().with_operation("add"),
            HttpMethod::Post,
            ADD_PAYMENT_INSTRUMENT_HREF,
        )]))
}
