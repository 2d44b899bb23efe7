// crates/pidl-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded reads, flag parsing, and key building.
// Purpose: Ensure CLI inputs fail closed and keys carry every flag.
// Dependencies: pidl-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `read_bytes_with_limit`, locale and flight parsing, and the
//! translation from `resolve` arguments into a resolution key.

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

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use pidl_cli::i18n::Locale;

use super::Cli;
use super::Commands;
use super::ReadLimitError;
use super::build_key;
use super::parse_flights;
use super::read_bytes_with_limit;
use super::resolve_locale;

// ============================================================================
// SECTION: Bounded Reads
// ============================================================================

/// Verifies a file exactly at the limit is read.
#[test]
fn read_bytes_with_limit_accepts_file_at_limit() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("at-limit.json");
    fs::write(&path, vec![b'a'; 16]).expect("write");
    let bytes = read_bytes_with_limit(&path, 16).expect("read");
    assert_eq!(bytes.len(), 16);
}

/// Verifies oversized files are rejected with their size.
#[test]
fn read_bytes_with_limit_rejects_oversized_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("oversized.json");
    fs::write(&path, vec![b'a'; 17]).expect("write");
    match read_bytes_with_limit(&path, 16) {
        Err(ReadLimitError::TooLarge {
            size,
            limit,
        }) => {
            assert_eq!(size, 17);
            assert_eq!(limit, 16);
        }
        other => panic!("expected size error, got {other:?}"),
    }
}

/// Verifies missing files surface as I/O errors.
#[test]
fn read_bytes_with_limit_reports_missing_file() {
    let path = PathBuf::from("/nonexistent/pidl/documents.json");
    assert!(matches!(read_bytes_with_limit(&path, 16), Err(ReadLimitError::Io(_))));
}

// ============================================================================
// SECTION: Flag Parsing
// ============================================================================

/// Verifies the `--lang` flag wins over `PIDL_LANG`.
#[test]
fn resolve_locale_prefers_flag_then_env() {
    assert_eq!(resolve_locale(None, None).unwrap(), Locale::En);
    assert_eq!(resolve_locale(None, Some("ca_ES")).unwrap(), Locale::Ca);
    assert_eq!(resolve_locale(Some(super::LangArg::En), Some("ca")).unwrap(), Locale::En);
    assert!(resolve_locale(None, Some("fr")).is_err());
}

/// Verifies flight list parsing.
#[test]
fn parse_flights_handles_absent_and_malformed_lists() {
    assert!(parse_flights(None).unwrap().is_empty());
    assert_eq!(parse_flights(Some("PXAddressUseJarvisV3, IndiaTokenizationMessage")).unwrap().len(), 2);
    assert!(parse_flights(Some("PX Enable")).is_err());
}

/// Verifies every resolve flag reaches the resolution key.
#[test]
fn resolve_arguments_populate_the_key() {
    let cli = Cli::try_parse_from([
        "pidl",
        "resolve",
        "tax_id",
        "--country",
        "BR",
        "--operation",
        "add",
        "--partner",
        "commercialstores",
        "--type",
        "consumer_tax_id",
        "--profile-type",
        "consumer",
        "--language",
        "pt-BR",
        "--standalone",
        "--flights",
        "PXAddressUseJarvisV3",
    ])
    .expect("parse");
    let Some(Commands::Resolve(command)) = cli.command else {
        panic!("expected resolve command");
    };
    assert_eq!(command.descriptor, "tax_id");
    let key = build_key(&command).unwrap();
    assert_eq!(key.country().as_str(), "br");
    assert_eq!(key.type_name(), "consumer_tax_id");
    assert_eq!(key.profile_type(), Some("consumer"));
    assert_eq!(key.language(), "pt-BR");
    assert!(key.standalone());
    assert_eq!(key.flights().len(), 1);
}
