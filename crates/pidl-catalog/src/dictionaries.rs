// crates/pidl-catalog/src/dictionaries.rs
// ============================================================================
// Module: Catalog Dictionaries
// Description: Authored and generated dictionaries referenced by templates.
// Purpose: Supply possible-value lists such as months, states, and years.
// Dependencies: pidl-core, time
// ============================================================================

//! ## Overview
//! Authored dictionaries are static tables. Expiry years are generated from
//! the injected date through [`YearWindow`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_core::DictionaryError;
use pidl_core::DictionaryStore;
use pidl_core::OrderedMap;
use pidl_core::YearWindow;
use time::Date;

// ============================================================================
// SECTION: Names
// ============================================================================

/// Two-digit month dictionary.
pub const MONTHS: &str = "Months";
/// Indian state full names to initials.
pub const INDIA_STATES: &str = "IndiaStates";
/// United States state codes to names.
pub const US_STATES: &str = "UsStates";
/// Supported market codes to names.
pub const COUNTRIES: &str = "Countries";

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Indian states and union territories.
const INDIA_STATE_ENTRIES: [(&str, &str); 36] = [
    ("Andaman and Nicobar Islands", "AN"),
    ("Andhra Pradesh", "AP"),
    ("Arunachal Pradesh", "AR"),
    ("Assam", "AS"),
    ("Bihar", "BR"),
    ("Chandigarh", "CH"),
    ("Chhattisgarh", "CT"),
    ("Dadra and Nagar Haveli and Daman and Diu", "DH"),
    ("Delhi", "DL"),
    ("Goa", "GA"),
    ("Gujarat", "GJ"),
    ("Haryana", "HR"),
    ("Himachal Pradesh", "HP"),
    ("Jammu and Kashmir", "JK"),
    ("Jharkhand", "JH"),
    ("Karnataka", "KA"),
    ("Kerala", "KL"),
    ("Ladakh", "LA"),
    ("Lakshadweep", "LD"),
    ("Madhya Pradesh", "MP"),
    ("Maharashtra", "MH"),
    ("Manipur", "MN"),
    ("Meghalaya", "ML"),
    ("Mizoram", "MZ"),
    ("Nagaland", "NL"),
    ("Odisha", "OR"),
    ("Puducherry", "PY"),
    ("Punjab", "PB"),
    ("Rajasthan", "RJ"),
    ("Sikkim", "SK"),
    ("Tamil Nadu", "TN"),
    ("Telangana", "TG"),
    ("Tripura", "TR"),
    ("Uttar Pradesh", "UP"),
    ("Uttarakhand", "UT"),
    ("West Bengal", "WB"),
];

/// United States states and the District of Columbia.
const US_STATE_ENTRIES: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Markets with authored descriptors.
const COUNTRY_ENTRIES: [(&str, &str); 44] = [
    ("ae", "United Arab Emirates"),
    ("am", "Armenia"),
    ("au", "Australia"),
    ("bh", "Bahrain"),
    ("br", "Brazil"),
    ("by", "Belarus"),
    ("ca", "Canada"),
    ("ci", "Côte d'Ivoire"),
    ("cm", "Cameroon"),
    ("cn", "China"),
    ("co", "Colombia"),
    ("de", "Germany"),
    ("eg", "Egypt"),
    ("es", "Spain"),
    ("fj", "Fiji"),
    ("fr", "France"),
    ("gb", "United Kingdom"),
    ("ge", "Georgia"),
    ("gh", "Ghana"),
    ("gt", "Guatemala"),
    ("in", "India"),
    ("is", "Iceland"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("ke", "Kenya"),
    ("kh", "Cambodia"),
    ("kr", "Korea"),
    ("la", "Laos"),
    ("md", "Moldova"),
    ("mx", "Mexico"),
    ("ng", "Nigeria"),
    ("nl", "Netherlands"),
    ("no", "Norway"),
    ("om", "Oman"),
    ("ph", "Philippines"),
    ("sa", "Saudi Arabia"),
    ("se", "Sweden"),
    ("sn", "Senegal"),
    ("tj", "Tajikistan"),
    ("tr", "Türkiye"),
    ("tw", "Taiwan"),
    ("ua", "Ukraine"),
    ("us", "United States"),
    ("vn", "Vietnam"),
];

// ============================================================================
// SECTION: Store
// ============================================================================

/// Returns the Indian state dictionary used by the state transformation.
#[must_use]
pub fn india_states() -> OrderedMap<String> {
    INDIA_STATE_ENTRIES.into_iter().map(|(name, initials)| (name.to_string(), initials.to_string())).collect()
}

/// Builds the dictionary store for `today`.
///
/// # Errors
///
/// Returns [`DictionaryError::InvalidConfig`] when the year window is invalid.
pub fn store(today: Date, window: YearWindow) -> Result<DictionaryStore, DictionaryError> {
    DictionaryStore::builder(today, window)
        .expiry_years()
        .authored(MONTHS, (1..=12).map(|month| (format!("{month:02}"), format!("{month:02}"))))
        .authored(INDIA_STATES, INDIA_STATE_ENTRIES)
        .authored(US_STATES, US_STATE_ENTRIES)
        .authored(COUNTRIES, COUNTRY_ENTRIES)
        .build()
}
