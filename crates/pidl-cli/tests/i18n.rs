// crates/pidl-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: pidl-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the `pidl` CLI i18n catalog behavior:
//! - Translation falls back to keys on misses.
//! - The [`t!`](pidl_cli::t) macro formats placeholders correctly.
//! - Locale parsing tolerates case and region tags.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use pidl_cli::i18n::Locale;
use pidl_cli::i18n::MessageArg;
use pidl_cli::i18n::SUPPORTED_LOCALES;
use pidl_cli::i18n::translate;
use pidl_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("count", "3")];
    assert_eq!(translate("roundtrip.ok", args), "Round trip verified for 3 documents.");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the t! macro formats named arguments.
#[test]
fn t_macro_formats_message() {
    let rendered = t!("input.read_too_large", kind = "documents file", path = "docs.json", size = 10, limit = 8);
    assert_eq!(rendered, "Refusing to read documents file at docs.json because it is 10 bytes (limit 8).");
}

/// Confirms locale parsing accepts region tags and rejects unknown languages.
#[test]
fn locale_parse_handles_region_tags() {
    assert_eq!(Locale::parse("EN-us"), Some(Locale::En));
    assert_eq!(Locale::parse(" ca_ES "), Some(Locale::Ca));
    assert_eq!(Locale::parse("pt-BR"), None);
    assert_eq!(Locale::parse(""), None);
    let labels: Vec<&str> = SUPPORTED_LOCALES.iter().map(|locale| locale.as_str()).collect();
    assert_eq!(labels, ["en", "ca"]);
}
