// crates/pidl-catalog/src/families/tax_id.rs
// ============================================================================
// Module: Tax Id Catalog
// Description: Consumer and commercial tax identifier forms.
// Purpose: Declare tax-id templates, fragments, and submit links.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Consumer partners post tax ids to the profile service; commercial partners
//! post to the commerce endpoint. A few markets collect two identifiers for
//! standalone organization profiles, and Taiwan collects additional data in a
//! nested document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::BaseTemplate;
use pidl_core::DescriptorFamily;
use pidl_core::DisplayNode;
use pidl_core::DocumentTemplate;
use pidl_core::FamilyCatalog;
use pidl_core::HttpMethod;
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
use crate::partners::COMMERCIAL_TAX_ID;
use crate::partners::CONSUMER_TAX_ID;
use crate::validation_rules;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Consumer submit endpoint.
pub const CONSUMER_TAX_ID_HREF: &str = "https://{pifd-endpoint}/users/{userId}/tax-ids?country={country}&language={language}&profileType={profileType}";
/// Commercial submit endpoint.
pub const COMMERCIAL_TAX_ID_HREF: &str = "https://{hapi-endpoint}/{userId}/taxids";
/// Commercial submit endpoint when the country is picked in the form.
pub const COUNTRY_DROPDOWN_TAX_ID_HREF: &str = "https://{hapi-endpoint}/{userId}/taxids?accountId={partnerData.prefillData.accountId}&organizationId={partnerData.prefillData.organizationId}";

/// Scenario where the form carries its own country picker.
pub const WITH_COUNTRY_DROPDOWN: &str = "withCountryDropdown";

/// Markets that collect a second identifier for standalone organizations.
const SECONDARY_ID_MARKETS: &[&str] = &["tr", "by", "am", "no"];

/// Commercial operations that submit.
const COMMERCIAL_SUBMIT_OPERATIONS: &[&str] = &["add", "update", "update_patch"];

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Tax id document validated through `rule_property`.
fn tax_document(rule_property: &str, page: &str, submit: DisplayNode) -> DocumentTemplate {
    document("taxId")
        .property("taxId", PropertyTemplate::required_text().updatable().validated_as(rule_property))
        .property("profileType", PropertyTemplate::hidden_value("{profileType}"))
        .display(vec![DisplayNode::page(page, vec![
            DisplayNode::property("taxIdValue", "taxId"),
            DisplayNode::button("cancelButton", "Cancel"),
            submit,
        ])])
}

/// Consumer form; also the family default.
fn consumer_template() -> BaseTemplate {
    let consumer = tax_document(
        validation_rules::CONSUMER_TAX_ID,
        "taxIdPage",
        DisplayNode::button("saveButton", "Save"),
    );
    BaseTemplate::new("taxId.consumer", TemplateSelector::any(), vec![consumer])
}

/// Commercial form.
fn commercial_template() -> BaseTemplate {
    let commercial = tax_document(
        validation_rules::COMMERCIAL_TAX_ID,
        "taxIdPage",
        DisplayNode::button("submitButton", "Submit"),
    );
    BaseTemplate::new("taxId.commercial", TemplateSelector::any().types(&["commercial_tax_id"]), vec![commercial])
}

/// Two identifiers for standalone organization profiles.
fn secondary_id_template() -> BaseTemplate {
    let primary = tax_document(
        validation_rules::COMMERCIAL_TAX_ID,
        "taxIdPage",
        DisplayNode::button("saveNextButton", "Next"),
    );
    let secondary = DocumentTemplate::new([
        ("description_type", "taxId"),
        ("type", "national_identification_number"),
        ("country", "{country}"),
        ("operation", "{operation}"),
    ])
    .property("taxId", PropertyTemplate::required_text().updatable().validated_as(validation_rules::COMMERCIAL_TAX_ID))
    .display(vec![DisplayNode::page("nationalIdentificationNumberPage", vec![
        DisplayNode::property("nationalIdentificationNumber", "taxId"),
        DisplayNode::button("submitButton", "Submit"),
    ])]);
    BaseTemplate::new(
        "taxId.commercial.secondaryId",
        TemplateSelector::any()
            .types(&["commercial_tax_id"])
            .countries(SECONDARY_ID_MARKETS)
            .qualified(Qualifier::profile_types(&["organization"]))
            .qualified(Qualifier::Standalone(true)),
        vec![primary, secondary],
    )
}

/// Taiwan commercial form with its additional data document.
fn taiwan_template() -> BaseTemplate {
    let additional = DocumentTemplate::new([
        ("description_type", "taxId"),
        ("type", "commercial_tax_id_additional_data"),
        ("country", "{country}"),
        ("operation", "{operation}"),
    ])
    .property("dataType", PropertyTemplate::hidden_value("additional_data"))
    .property("dataCountry", PropertyTemplate::hidden_value("{country}"))
    .property("dataOperation", PropertyTemplate::hidden_value("{operation}"))
    .property("companyName", PropertyTemplate::required_text().updatable().validated());
    let commercial = tax_document(
        validation_rules::COMMERCIAL_TAX_ID,
        "taxIdPage",
        DisplayNode::button("submitButton", "Submit"),
    )
    .nested("additionalData", vec![additional])
    .data_source("taxIds", RestLink::new(HttpMethod::Get, COMMERCIAL_TAX_ID_HREF));
    BaseTemplate::new(
        "taxId.commercial.tw",
        TemplateSelector::any().types(&["commercial_tax_id"]).countries(&["tw"]),
        vec![commercial],
    )
}

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// Override fragments, least specific first.
fn fragments() -> Vec<OverrideFragment> {
    vec![
        OverrideFragment::new("taxId.tw.additionalData", OverrideScope::any().with_country("tw"))
            .patch(Patch::remove_property("additionalData.dataType"))
            .patch(Patch::remove_property("additionalData.dataCountry"))
            .patch(Patch::remove_property("additionalData.dataOperation")),
        OverrideFragment::new("taxId.consumer.portuguese", OverrideScope::any().with_partners(CONSUMER_TAX_ID))
            .qualified(Qualifier::LanguageIn(vec!["pt-br".to_string()]))
            .patch(Patch::display_tag("taxIdValue", "accessibilityName", "CPF")),
        OverrideFragment::new("taxId.tw.updatePatch", OverrideScope::any().with_operation("update_patch").with_country("tw"))
            .patch(Patch::SetPrefill(PrefillMode::Client)),
        OverrideFragment::new(
            "taxId.countryDropdown",
            OverrideScope::any().with_operation("update").with_scenario(WITH_COUNTRY_DROPDOWN),
        )
        .patch(Patch::SetPrefill(PrefillMode::Client))
        .patch(Patch::property("taxId", PropertyOverride::default().optional(true))),
    ]
}

// ============================================================================
// SECTION: Submit Links
// ============================================================================

/// Submit-link rules for consumer and commercial partners.
fn submit_links() -> Vec<SubmitLinkRule> {
    vec![
        SubmitLinkRule::new(
            "taxId.consumer",
            OverrideScope::any().with_operations(&["add", "update"]).with_partners(CONSUMER_TAX_ID),
            HttpMethod::Post,
            CONSUMER_TAX_ID_HREF,
        ),
        SubmitLinkRule::new(
            "taxId.commercial",
            OverrideScope::any().with_operations(COMMERCIAL_SUBMIT_OPERATIONS).with_partners(COMMERCIAL_TAX_ID),
            HttpMethod::Post,
            COMMERCIAL_TAX_ID_HREF,
        ),
        SubmitLinkRule::new(
            "taxId.commercial.countryDropdown",
            OverrideScope::any()
                .with_operations(COMMERCIAL_SUBMIT_OPERATIONS)
                .with_scenario(WITH_COUNTRY_DROPDOWN)
                .with_partners(COMMERCIAL_TAX_ID),
            HttpMethod::Post,
            COUNTRY_DROPDOWN_TAX_ID_HREF,
        ),
    ]
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Tax-id family catalog.
#[must_use]
pub fn catalog() -> FamilyCatalog {
    catalog_with_partners(DescriptorFamily::TaxId)
        .template(consumer_template())
        .template(commercial_template())
        .template(secondary_id_template())
        .template(taiwan_template())
        .fragments(fragments())
        .submit_links(submit_links())
        .not_applicable("NotApplicableForTaxId")
}
