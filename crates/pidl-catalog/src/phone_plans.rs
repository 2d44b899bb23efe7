// crates/pidl-catalog/src/phone_plans.rs
// ============================================================================
// Module: Catalog Numbering Plans
// Description: National numbering plans for phone validation and E.164 output.
// Purpose: Back `phonenumber.<country>` service validation.
// Dependencies: pidl-core
// ============================================================================

//! ## Overview
//! Plans describe the national significant number after trunk prefixes are
//! stripped. Markets that keep their leading zero internationally declare no
//! trunk prefix.

use pidl_core::NumberingPlan;

/// Builds one plan.
const fn plan(
    region: &'static str,
    calling_code: &'static str,
    min: usize,
    max: usize,
    trunk_prefix: Option<&'static str>,
    national_pattern: &'static str,
) -> NumberingPlan {
    NumberingPlan {
        region,
        calling_code,
        national_lengths: min..=max,
        trunk_prefix,
        national_pattern,
    }
}

/// Returns the built-in numbering plans.
#[must_use]
pub fn plans() -> Vec<NumberingPlan> {
    vec![
        plan("us", "1", 10, 10, Some("1"), r"[2-9]\d{2}[2-9]\d{6}"),
        plan("ca", "1", 10, 10, Some("1"), r"[2-9]\d{2}[2-9]\d{6}"),
        plan("gb", "44", 9, 10, Some("0"), r"[1-9]\d{8,9}"),
        plan("de", "49", 7, 11, Some("0"), r"[1-9]\d{6,10}"),
        plan("fr", "33", 9, 9, Some("0"), r"[1-9]\d{8}"),
        plan("in", "91", 10, 10, Some("0"), r"[1-9]\d{9}"),
        plan("br", "55", 10, 11, Some("0"), r"[1-9]{2}(9\d{8}|[2-8]\d{7})"),
        plan("jp", "81", 9, 10, Some("0"), r"[1-9]\d{8,9}"),
        plan("au", "61", 9, 9, Some("0"), r"[2-478]\d{8}"),
        plan("cn", "86", 10, 11, Some("0"), r"1[3-9]\d{9}|[2-9]\d{9,10}"),
        plan("it", "39", 6, 11, None, r"0\d{5,10}|3\d{8,9}"),
        plan("es", "34", 9, 9, None, r"[6-9]\d{8}"),
        plan("mx", "52", 10, 10, None, r"[1-9]\d{9}"),
        plan("nl", "31", 9, 9, Some("0"), r"[1-9]\d{8}"),
        plan("se", "46", 7, 9, Some("0"), r"[1-9]\d{6,8}"),
        plan("tr", "90", 10, 10, Some("0"), r"[2-5]\d{9}"),
        plan("eg", "20", 8, 10, Some("0"), r"1[0125]\d{8}|[2-9]\d{7,8}"),
        plan("kr", "82", 8, 10, Some("0"), r"[1-9]\d{7,9}"),
        plan("tw", "886", 8, 9, Some("0"), r"[2-9]\d{7,8}"),
        plan("no", "47", 8, 8, None, r"[2-9]\d{7}"),
    ]
}
