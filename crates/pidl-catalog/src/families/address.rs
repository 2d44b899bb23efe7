// crates/pidl-catalog/src/families/address.rs
// ============================================================================
// Module: Address Catalog
// Description: Billing, shipping, and service usage address forms.
// Purpose: Declare address templates, fragments, and submit links.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! One address form serves every address type. The submit endpoint depends on
//! the address type and the partner subset: v2 partners post to the profile
//! service, v3 partners post to the account service with tracking headers,
//! and console partners post to the extended endpoint that returns address
//! suggestions.

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
use pidl_core::PrefillMode;
use pidl_core::PropertyOverride;
use pidl_core::PropertyTemplate;
use pidl_core::Qualifier;
use pidl_core::RestLink;
use pidl_core::SubmitLinkRule;
use pidl_core::TemplateSelector;

use super::catalog_with_partners;
use super::document;
use super::flights;
use crate::partners::V2_ADDRESS;
use crate::partners::V3_ADDRESS;
use crate::partners::XBOX_NATIVE_ADDRESS;
use crate::transformation_rules::FOR_SUBMIT;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Profile service address endpoint.
pub const PIFD_ADDRESS_HREF: &str = "https://{pifd-endpoint}/users/{userId}/addresses";
/// Account service address endpoint.
pub const JARVIS_ADDRESS_HREF: &str = "https://{jarvis-endpoint}/JarvisCM/{userId}/addresses";
/// Order service usage address endpoint.
pub const HAPI_SERVICE_USAGE_HREF: &str =
    "https://{hapi-endpoint}/my-org/orders/{partnerData.prefillData.orderId}/orderservice.updateServiceUsageAddress";
/// Extended endpoint that returns address suggestions.
pub const ADDRESSES_EX_HREF: &str =
    "https://{pifd-endpoint}/users/{userId}/addressesEx?partner={partner}&language={language}&avsSuggest=true";

/// Flight that moves v2 billing partners to the account service.
pub const JARVIS_V3_FLIGHT: &str = "PXAddressUseJarvisV3";
/// Flight that enables address suggestions on submit.
pub const AVS_SUGGEST_FLIGHT: &str = "PXEnableAVSSuggestions";

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Shared address form.
fn address_template() -> BaseTemplate {
    let address = document("address")
        .property("country", PropertyTemplate::hidden_value("{country}"))
        .property("address_line1", PropertyTemplate::required_text().updatable().validated())
        .property("address_line2", PropertyTemplate::optional_text().updatable())
        .property("city", PropertyTemplate::required_text().updatable().validated())
        .property("region", PropertyTemplate::optional_text().updatable().validated())
        .property("postal_code", PropertyTemplate::required_text().updatable().validated())
        .property(
            "phone_number",
            PropertyTemplate::optional_text()
                .updatable()
                .service("phonenumber.{country}", Some("InvalidPhoneNumber"))
                .transform(FOR_SUBMIT, "ToPhoneNumberE164"),
        )
        .display(vec![DisplayNode::page("addressPage", vec![
            DisplayNode::property("addressLine1", "address_line1"),
            DisplayNode::property("addressLine2", "address_line2"),
            DisplayNode::property("addressCity", "city"),
            DisplayNode::property("addressRegion", "region"),
            DisplayNode::property("addressPostalCode", "postal_code"),
            DisplayNode::property("addressPhoneNumber", "phone_number"),
            DisplayNode::button("cancelButton", "Cancel"),
            DisplayNode::button("saveButton", "Save"),
        ])])
        .data_source("addresses", RestLink::new(HttpMethod::Get, "https://{pifd-endpoint}/users/{userId}/addresses?type={type}"));
    BaseTemplate::new("address.form", TemplateSelector::any(), vec![address])
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Override fragments, least specific first.
fn fragments() -> Result<Vec<OverrideFragment>, FlightError> {
    Ok(vec![
        OverrideFragment::new("address.avsSuggest", OverrideScope::any())
            .with_flights(flights(AVS_SUGGEST_FLIGHT)?)
            .patch(Patch::insert_node(
                Some("addressPage"),
                InsertPosition::After("addressPostalCode".into()),
                DisplayNode::text("addressSuggestionMessage", "We may suggest a verified version of this address."),
            )),
        OverrideFragment::new("address.console", OverrideScope::any().with_partners(XBOX_NATIVE_ADDRESS))
            .patch(Patch::remove_node("addressPhoneNumber"))
            .patch(Patch::display_content("saveButton", "Next")),
        OverrideFragment::new("address.serviceUsage", OverrideScope::any().with_partner("commercialstores"))
            .qualified(Qualifier::types(&["hapiServiceUsageAddress"]))
            .patch(Patch::SetPrefill(PrefillMode::Client))
            .patch(Patch::property("phone_number", PropertyOverride::default().optional(false))),
        OverrideFragment::new("address.us", OverrideScope::any().with_country("us"))
            .patch(Patch::property("region", PropertyOverride::default().optional(false).possible_values("{}UsStates"))),
        OverrideFragment::new("address.in", OverrideScope::any().with_country("in")).patch(Patch::add_property(
            "region",
            PropertyTemplate::required_text()
                .updatable()
                .validated()
                .possible_values("{}IndiaStates")
                .transform(FOR_SUBMIT, "IndiaStateFullNameToInitials"),
        )),
    ])
}

// ============================================================================
// SECTION: Submit Links
// ============================================================================

/// Adds the account service tracking headers.
fn with_jarvis_headers(rule: SubmitLinkRule) -> SubmitLinkRule {
    rule.with_header("api-version", "2015-03-31")
        .with_header("x-ms-correlation-id", "{correlationId}")
        .with_header("x-ms-tracking-id", "{trackingId}")
}

/// Submit-link rules keyed by address type and partner subset.
fn submit_links() -> Result<Vec<SubmitLinkRule>, FlightError> {
    let add = || OverrideScope::any().with_operation("add");
    Ok(vec![
        SubmitLinkRule::new("address.billing.v2", add().with_partners(V2_ADDRESS), HttpMethod::Post, PIFD_ADDRESS_HREF)
            .qualified(Qualifier::types(&["billing"])),
        with_jarvis_headers(
            SubmitLinkRule::new(
                "address.billing.v2.jarvis",
                add().with_partners(V2_ADDRESS),
                HttpMethod::Post,
                JARVIS_ADDRESS_HREF,
            )
            .qualified(Qualifier::types(&["billing"]))
            .with_flights(flights(JARVIS_V3_FLIGHT)?),
        ),
        with_jarvis_headers(
            SubmitLinkRule::new("address.billing.v3", add().with_partners(V3_ADDRESS), HttpMethod::Post, JARVIS_ADDRESS_HREF)
                .qualified(Qualifier::types(&["billing"])),
        ),
        with_jarvis_headers(
            SubmitLinkRule::new(
                "address.shipping.support",
                add().with_partner("consumersupport"),
                HttpMethod::Post,
                JARVIS_ADDRESS_HREF,
            )
            .qualified(Qualifier::types(&["shipping"])),
        ),
        SubmitLinkRule::new(
            "address.shippingV3.pifd",
            add().with_partners(&["marketplace", "test"]),
            HttpMethod::Post,
            PIFD_ADDRESS_HREF,
        )
        .qualified(Qualifier::types(&["shipping_v3"])),
        with_jarvis_headers(
            SubmitLinkRule::new(
                "address.shippingV3.jarvis",
                add().with_partners(&["cart", "commercialstores", "webpay"]),
                HttpMethod::Post,
                JARVIS_ADDRESS_HREF,
            )
            .qualified(Qualifier::types(&["shipping_v3"])),
        ),
        SubmitLinkRule::new(
            "address.serviceUsage",
            OverrideScope::any().with_partner("commercialstores"),
            HttpMethod::Post,
            HAPI_SERVICE_USAGE_HREF,
        )
        .qualified(Qualifier::types(&["hapiServiceUsageAddress"])),
        SubmitLinkRule::new(
            "address.pxV3",
            add().with_partners(XBOX_NATIVE_ADDRESS),
            HttpMethod::Post,
            ADDRESSES_EX_HREF,
        )
        .qualified(Qualifier::types(&["px_v3_shipping", "px_v3_billing"])),
        SubmitLinkRule::new("address.avsSuggest", add().with_partners(V2_ADDRESS), HttpMethod::Post, ADDRESSES_EX_HREF)
            .qualified(Qualifier::types(&["billing", "shipping"]))
            .with_flights(flights(AVS_SUGGEST_FLIGHT)?),
    ])
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Address family catalog.
///
/// # Errors
///
/// Returns [`FlightError`] when a flight gate is malformed.
pub fn catalog() -> Result<FamilyCatalog, FlightError> {
    Ok(catalog_with_partners(DescriptorFamily::Address)
        .template(address_template())
        .fragments(fragments()?)
        .submit_links(submit_links()?)
        .not_applicable("NotApplicableForAddress"))
}
