// crates/pidl-catalog/src/partners.rs
// ============================================================================
// Module: Partner Subsets
// Description: Global partner list and per-family named partner subsets.
// Purpose: Drive partner scopes and not-applicable sets in family catalogs.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Every family splits the global partner list into named subsets. Each
//! partner appears in exactly one subset per family; `Skip` collects partners
//! the family has no dedicated behavior for.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::DescriptorFamily;
use pidl_core::PartnerSet;

// ============================================================================
// SECTION: Global Partner List
// ============================================================================

/// Every partner and partner template name known to the catalog.
pub const ALL_PARTNERS: [&str; 59] = [
    "amc",
    "amcweb",
    "amcxbox",
    "appsource",
    "azure",
    "azuresignup",
    "azureibiza",
    "bingtravel",
    "bing",
    "cart",
    "commercialstores",
    "commercialsupport",
    "commercialwebblends",
    "consumersupport",
    "consoletemplate",
    "default",
    "ggpdeds",
    "marketplace",
    "mseg",
    "msteams",
    "northstarweb",
    "office",
    "officeoobe",
    "officeoobeinapp",
    "oxooobe",
    "onedrive",
    "oxodime",
    "oxowebdirect",
    "payin",
    "setupoffice",
    "setupofficesdx",
    "smboobe",
    "storeoffice",
    "storify",
    "secondscreentemplate",
    "test",
    "wallet",
    "webblends",
    "webblends_inline",
    "webpay",
    "windowssettings",
    "windowssubs",
    "xbox",
    "xboxweb",
    "windowsnative",
    "windowsstore",
    "xboxnative",
    "xboxsubs",
    "xboxsettings",
    "saturn",
    "onepage",
    "twopage",
    "selectpmbuttonlist",
    "selectpmdropdown",
    "selectpmradiobuttonlist",
    "listpidropdown",
    "defaulttemplate",
    "listpiradiobutton",
    "listpibuttonlist",
];

// ============================================================================
// SECTION: Named Subsets
// ============================================================================

/// Named subset of [`ALL_PARTNERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedSubset {
    /// Subset name.
    pub name: &'static str,
    /// Member partners.
    pub partners: &'static [&'static str],
}

impl NamedSubset {
    /// Converts the subset into a catalog partner set.
    #[must_use]
    pub fn to_partner_set(&self) -> PartnerSet {
        PartnerSet::new(self.name, self.partners)
    }
}

/// Name shared by every family's catch-all subset.
pub const SKIP: &str = "Skip";

/// Consumer tax-id partners.
pub const CONSUMER_TAX_ID: &[&str] = &[
    "amc",
    "amcweb",
    "amcxbox",
    "appsource",
    "cart",
    "consumersupport",
    "default",
    "northstarweb",
    "officeoobe",
    "oxooobe",
    "officeoobeinapp",
    "onedrive",
    "oxodime",
    "oxowebdirect",
    "smboobe",
    "test",
    "webblends",
    "webblends_inline",
    "webpay",
    "xbox",
    "xboxweb",
    "ggpdeds",
];

/// Commercial tax-id partners.
pub const COMMERCIAL_TAX_ID: &[&str] = &["commercialstores"];

/// Partners that receive tax-id data without a display tree.
pub const NOT_APPLICABLE_FOR_TAX_ID: &[&str] = &[
    "bing",
    "bingtravel",
    "commercialwebblends",
    "marketplace",
    "mseg",
    "office",
    "payin",
    "setupoffice",
    "setupofficesdx",
    "storeoffice",
    "storify",
    "xboxnative",
    "xboxsubs",
    "xboxsettings",
    "saturn",
    "msteams",
    "onepage",
    "twopage",
    "selectpmbuttonlist",
    "selectpmradiobuttonlist",
    "selectpmdropdown",
    "listpidropdown",
    "defaulttemplate",
    "listpiradiobutton",
    "listpibuttonlist",
    "consoletemplate",
    "secondscreentemplate",
];

/// Tax-id partners without dedicated behavior.
pub const SKIP_TAX_ID: &[&str] = &[
    "azure",
    "azuresignup",
    "azureibiza",
    "commercialsupport",
    "wallet",
    "windowssettings",
    "windowsnative",
    "windowsstore",
    "windowssubs",
];

/// Billing-group partners.
pub const BILLING_GROUP: &[&str] = &["commercialstores", "defaulttemplate"];

/// Partners that receive billing-group data without a display tree.
pub const NOT_APPLICABLE_FOR_BILLING_GROUP: &[&str] = &[
    "amc",
    "amcweb",
    "amcxbox",
    "appsource",
    "azure",
    "azuresignup",
    "azureibiza",
    "bing",
    "bingtravel",
    "cart",
    "commercialsupport",
    "commercialwebblends",
    "consumersupport",
    "default",
    "ggpdeds",
    "marketplace",
    "mseg",
    "northstarweb",
    "office",
    "officeoobe",
    "oxooobe",
    "onedrive",
    "officeoobeinapp",
    "oxodime",
    "oxowebdirect",
    "payin",
    "setupoffice",
    "setupofficesdx",
    "smboobe",
    "storeoffice",
    "storify",
    "xboxsubs",
    "xboxsettings",
    "saturn",
    "test",
    "wallet",
    "webblends",
    "webblends_inline",
    "webpay",
    "xbox",
    "xboxweb",
    "windowssubs",
    "windowssettings",
    "windowsstore",
    "msteams",
    "onepage",
    "twopage",
    "selectpmbuttonlist",
    "selectpmradiobuttonlist",
    "selectpmdropdown",
    "listpidropdown",
    "listpiradiobutton",
    "listpibuttonlist",
];

/// Billing-group partners without dedicated behavior.
pub const SKIP_BILLING_GROUP: &[&str] = &["xboxnative", "windowsnative", "consoletemplate", "secondscreentemplate"];

/// Partners on the v2 address endpoints.
pub const V2_ADDRESS: &[&str] = &[
    "amc",
    "amcweb",
    "amcxbox",
    "appsource",
    "bingtravel",
    "commercialwebblends",
    "consumersupport",
    "default",
    "ggpdeds",
    "marketplace",
    "mseg",
    "northstarweb",
    "office",
    "officeoobe",
    "oxooobe",
    "officeoobeinapp",
    "onedrive",
    "oxodime",
    "oxowebdirect",
    "setupoffice",
    "setupofficesdx",
    "storeoffice",
    "test",
    "wallet",
    "webblends",
    "webblends_inline",
    "xbox",
    "xboxweb",
    "windowssettings",
    "windowssubs",
    "windowsstore",
];

/// Partners on the v3 address endpoints.
pub const V3_ADDRESS: &[&str] = &["cart", "azure", "azuresignup", "azureibiza", "commercialstores", "smboobe", "webpay"];

/// Partners that receive address data without a display tree.
pub const NOT_APPLICABLE_FOR_ADDRESS: &[&str] = &["bing", "commercialsupport", "payin"];

/// Console partners that post addresses through the extended endpoint.
pub const XBOX_NATIVE_ADDRESS: &[&str] = &["storify", "xboxsubs", "xboxsettings", "saturn"];

/// Address partners without dedicated behavior.
pub const SKIP_ADDRESS: &[&str] = &[
    "xboxnative",
    "windowsnative",
    "msteams",
    "selectpmbuttonlist",
    "selectpmradiobuttonlist",
    "selectpmdropdown",
    "onepage",
    "twopage",
    "listpidropdown",
    "defaulttemplate",
    "listpiradiobutton",
    "listpibuttonlist",
    "consoletemplate",
    "secondscreentemplate",
];

/// Partners with a dedicated instrument list experience.
pub const LIST_PAYMENT_INSTRUMENT: &[&str] = &[
    "azure",
    "appsource",
    "commercialstores",
    "ggpdeds",
    "marketplace",
    "onedrive",
    "payin",
    "setupoffice",
    "storeoffice",
    "listpidropdown",
];

/// Instrument selection partners without dedicated behavior.
pub const SKIP_PAYMENT_INSTRUMENT: &[&str] = &[
    "amc",
    "amcweb",
    "amcxbox",
    "azuresignup",
    "azureibiza",
    "bing",
    "bingtravel",
    "cart",
    "commercialsupport",
    "commercialwebblends",
    "consumersupport",
    "consoletemplate",
    "default",
    "mseg",
    "msteams",
    "northstarweb",
    "office",
    "officeoobe",
    "officeoobeinapp",
    "oxooobe",
    "oxodime",
    "oxowebdirect",
    "setupofficesdx",
    "smboobe",
    "storify",
    "secondscreentemplate",
    "test",
    "wallet",
    "webblends",
    "webblends_inline",
    "webpay",
    "windowssettings",
    "windowssubs",
    "xbox",
    "xboxweb",
    "windowsnative",
    "windowsstore",
    "xboxnative",
    "xboxsubs",
    "xboxsettings",
    "saturn",
    "onepage",
    "twopage",
    "selectpmbuttonlist",
    "selectpmdropdown",
    "selectpmradiobuttonlist",
    "defaulttemplate",
    "listpiradiobutton",
    "listpibuttonlist",
];

/// Tax-id subsets.
pub const TAX_ID_SUBSETS: [NamedSubset; 4] = [
    NamedSubset {
        name: "ConsumerTaxId",
        partners: CONSUMER_TAX_ID,
    },
    NamedSubset {
        name: "CommercialTaxId",
        partners: COMMERCIAL_TAX_ID,
    },
    NamedSubset {
        name: "NotApplicableForTaxId",
        partners: NOT_APPLICABLE_FOR_TAX_ID,
    },
    NamedSubset {
        name: SKIP,
        partners: SKIP_TAX_ID,
    },
];

/// Billing-group subsets.
pub const BILLING_GROUP_SUBSETS: [NamedSubset; 3] = [
    NamedSubset {
        name: "BillingGroup",
        partners: BILLING_GROUP,
    },
    NamedSubset {
        name: "NotApplicableForBillingGroup",
        partners: NOT_APPLICABLE_FOR_BILLING_GROUP,
    },
    NamedSubset {
        name: SKIP,
        partners: SKIP_BILLING_GROUP,
    },
];

/// Address subsets.
pub const ADDRESS_SUBSETS: [NamedSubset; 5] = [
    NamedSubset {
        name: "V2Address",
        partners: V2_ADDRESS,
    },
    NamedSubset {
        name: "V3Address",
        partners: V3_ADDRESS,
    },
    NamedSubset {
        name: "NotApplicableForAddress",
        partners: NOT_APPLICABLE_FOR_ADDRESS,
    },
    NamedSubset {
        name: "XboxNativeAddress",
        partners: XBOX_NATIVE_ADDRESS,
    },
    NamedSubset {
        name: SKIP,
        partners: SKIP_ADDRESS,
    },
];

/// Payment-method subsets; every partner shares the same forms.
pub const PAYMENT_METHOD_SUBSETS: [NamedSubset; 1] = [NamedSubset {
    name: "PaymentMethod",
    partners: &ALL_PARTNERS,
}];

/// Payment-instrument-selection subsets.
pub const PAYMENT_INSTRUMENT_SUBSETS: [NamedSubset; 2] = [
    NamedSubset {
        name: "ListPaymentInstrument",
        partners: LIST_PAYMENT_INSTRUMENT,
    },
    NamedSubset {
        name: SKIP,
        partners: SKIP_PAYMENT_INSTRUMENT,
    },
];

/// Returns the named subsets of `family`.
#[must_use]
pub const fn subsets(family: DescriptorFamily) -> &'static [NamedSubset] {
    match family {
        DescriptorFamily::PaymentMethod => &PAYMENT_METHOD_SUBSETS,
        DescriptorFamily::Address => &ADDRESS_SUBSETS,
        DescriptorFamily::TaxId => &TAX_ID_SUBSETS,
        DescriptorFamily::BillingGroup => &BILLING_GROUP_SUBSETS,
        DescriptorFamily::PaymentInstrumentSelection => &PAYMENT_INSTRUMENT_SUBSETS,
    }
}

/// Returns the catalog partner sets of `family`.
#[must_use]
pub fn partner_sets(family: DescriptorFamily) -> Vec<PartnerSet> {
    subsets(family).iter().map(NamedSubset::to_partner_set).collect()
}
