// crates/pidl-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests that run the built `pidl` binary.
// Purpose: Ensure each command reads bounded input and reports through exit codes.
// Dependencies: pidl-cli binary
// ============================================================================
//! ## Overview
//! Runs every `pidl` subcommand against the built-in catalog in an isolated
//! working directory so no ambient `pidl.toml` or `PIDL_CONFIG` leaks in.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn pidl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pidl"))
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(pidl_bin())
        .current_dir(dir)
        .env_remove("PIDL_CONFIG")
        .env_remove("PIDL_LANG")
        .args(args)
        .output()
        .expect("run pidl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("utf-8 stderr")
}

fn commercial_tax_id_args() -> Vec<&'static str> {
    vec![
        "resolve",
        "tax-id",
        "--country",
        "de",
        "--operation",
        "add",
        "--partner",
        "commercialstores",
        "--type",
        "commercial_tax_id",
        "--profile-type",
        "organization",
    ]
}

// ============================================================================
// SECTION: Resolve
// ============================================================================

/// Verifies a resolution prints a JSON document array.
#[test]
fn resolve_prints_document_array() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_in(dir.path(), &commercial_tax_id_args());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let documents: Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(documents.as_array().map(Vec::len), Some(1));
    assert!(stdout(&output).contains("https://{hapi-endpoint}/{userId}/taxids"));
}

/// Verifies unknown descriptor families fail closed.
#[test]
fn resolve_rejects_unknown_descriptor() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_in(dir.path(), &["resolve", "gift-card", "--country", "us", "--operation", "add", "--partner", "cart"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Resolution failed"));
}

/// Verifies flight names containing whitespace are rejected.
#[test]
fn resolve_rejects_malformed_flights() {
    let dir = TempDir::new().expect("temp dir");
    let mut args = commercial_tax_id_args();
    args.extend(["--flights", "PX Enable"]);
    let output = run_in(dir.path(), &args);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid flight list"));
}

/// Verifies `--setting` redirects matching to the template partner.
#[test]
fn resolve_applies_experience_setting_template() {
    let dir = TempDir::new().expect("temp dir");
    let setting = dir.path().join("setting.json");
    fs::write(&setting, r#"{"template":"commercialstores","features":{}}"#).expect("write setting");
    let mut args = commercial_tax_id_args();
    args[7] = "partner-without-catalog-entry";
    let bare = run_in(dir.path(), &args);
    assert!(bare.status.success(), "stderr: {}", stderr(&bare));
    assert!(!stdout(&bare).contains("https://{hapi-endpoint}/{userId}/taxids"));

    args.extend(["--setting", "setting.json"]);
    let output = run_in(dir.path(), &args);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("https://{hapi-endpoint}/{userId}/taxids"));
}

/// Verifies the file audit sink records resolved descriptors.
#[test]
fn resolve_writes_audit_events_when_enabled() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("pidl.toml"), "[audit]\nenabled = true\npath = \"audit.jsonl\"\n").expect("write config");
    let output = run_in(dir.path(), &commercial_tax_id_args());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let audit = fs::read_to_string(dir.path().join("audit.jsonl")).expect("audit log");
    let event: Value = serde_json::from_str(audit.lines().next().expect("one event")).expect("json event");
    assert_eq!(event["event"], "descriptor_resolved");
    assert_eq!(event["document_count"], 1);
}

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Verifies the expiry-year window prints every generated year.
#[test]
fn dictionary_prints_expiry_years_in_order() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_in(dir.path(), &["dictionary", "{}YearsExpiry"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let years: Value = serde_json::from_str(&stdout(&output)).expect("json output");
    let years = years.as_object().expect("object");
    assert_eq!(years.len(), 25);
}

/// Verifies unknown named dictionaries fail.
#[test]
fn dictionary_reports_unknown_names() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_in(dir.path(), &["dictionary", "{}NoSuchDictionary"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Dictionary lookup failed"));
}

/// Verifies phone validation exit codes track the result status.
#[test]
fn validate_phone_exit_code_follows_the_result() {
    let dir = TempDir::new().expect("temp dir");
    let passed = run_in(dir.path(), &["validate-phone", "--country", "US", "(425) 555-0100"]);
    assert!(passed.status.success(), "stderr: {}", stderr(&passed));
    assert_eq!(stdout(&passed).trim(), r#"{"status":"Passed"}"#);

    let failed = run_in(dir.path(), &["validate-phone", "--country", "zz", "12345678"]);
    assert!(!failed.status.success());
    assert!(stdout(&failed).contains("CountryCodeNotSupported"));
}

/// Verifies India state names transform to their initials.
#[test]
fn transform_rewrites_india_state_names() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_in(dir.path(), &[
        "transform",
        "--property",
        "region",
        "--value",
        "tamil nadu",
        "--country",
        "in",
        "--description-type",
        "address",
        "--type",
        "billing",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let result: Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(result["transformedValue"], "TN");
}

// ============================================================================
// SECTION: Roundtrip and Config
// ============================================================================

/// Verifies resolved output survives a decode and re-encode.
#[test]
fn roundtrip_verifies_resolved_output() {
    let dir = TempDir::new().expect("temp dir");
    let resolved = run_in(dir.path(), &commercial_tax_id_args());
    assert!(resolved.status.success(), "stderr: {}", stderr(&resolved));
    fs::write(dir.path().join("documents.json"), &resolved.stdout).expect("write documents");
    let output = run_in(dir.path(), &["roundtrip", "documents.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Round trip verified for 1 documents."));
}

/// Verifies `limits.max_document_bytes` bounds document reads.
#[test]
fn roundtrip_enforces_document_limit() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("pidl.toml"), "[limits]\nmax_document_bytes = 8\n").expect("write config");
    fs::write(dir.path().join("documents.json"), "[            ]").expect("write documents");
    let output = run_in(dir.path(), &["roundtrip", "documents.json"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Refusing to read documents file"));
}

/// Verifies unknown display types fail decoding.
#[test]
fn roundtrip_rejects_unknown_node_types() {
    let dir = TempDir::new().expect("temp dir");
    let documents = r#"[{"identity":{},"data_description":{},"displayDescription":[{"displayType":"hologram","displayId":"x"}]}]"#;
    fs::write(dir.path().join("documents.json"), documents).expect("write documents");
    let output = run_in(dir.path(), &["roundtrip", "documents.json"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to decode documents"));
}

/// Verifies `config validate` reports bad values and accepts good ones.
#[test]
fn config_validate_reports_invalid_values() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("pidl.toml"), "[dictionaries]\nyear_window = 0\n").expect("write config");
    let output = run_in(dir.path(), &["config", "validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("year_window must be between 1 and 50"));

    fs::write(dir.path().join("pidl.toml"), "[engine]\ndefault_flights = [\"PXAddressUseJarvisV3\"]\n")
        .expect("write config");
    let output = run_in(dir.path(), &["config", "validate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Config valid.");
}

/// Verifies version output and Catalan error rendering.
#[test]
fn version_and_catalan_disclaimer() {
    let dir = TempDir::new().expect("temp dir");
    let output = run_in(dir.path(), &["--version"]);
    assert_eq!(stdout(&output).trim(), format!("pidl {}", env!("CARGO_PKG_VERSION")));

    let output = run_in(dir.path(), &["--lang", "ca", "config", "validate", "--config", "absent.toml"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("traduïda automàticament"));
    assert!(stderr(&output).contains("No s'ha pogut carregar la configuració"));
}
