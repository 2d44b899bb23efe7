//! Config load validation tests for pidl-config.
// crates/pidl-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, syntax).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use pidl_config::AuditTarget;
use pidl_config::ConfigError;
use pidl_config::PidlConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<PidlConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(PidlConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(PidlConfig::load(Some(Path::new(&long_component))), "config path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&"#".repeat(1_048_577))?;
    assert_invalid(PidlConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(PidlConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match PidlConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected missing file to fail".to_string()),
    }
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config("[engine]\nstrict = false\n")?;
    assert_invalid(PidlConfig::load(Some(file.path())), "config parse error")
}

#[test]
fn empty_file_yields_defaults() -> TestResult {
    let file = write_config("")?;
    let config = PidlConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != PidlConfig::default() {
        return Err("empty config should equal defaults".to_string());
    }
    if config.audit_target() != AuditTarget::Disabled {
        return Err("audit should be disabled by default".to_string());
    }
    Ok(())
}

#[test]
fn full_file_populates_every_section() -> TestResult {
    let file = write_config(
        r#"
[engine]
default_flights = ["PXAddressUseJarvisV3", "IndiaTokenizationMessage"]
strict_validators = false

[dictionaries]
year_window = 10
grace_cutoff_month = 3
grace_cutoff_day = 15

[audit]
enabled = true
path = "pidl-audit.jsonl"

[limits]
max_document_bytes = 1024
"#,
    )?;
    let config = PidlConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let engine = config.engine_config().map_err(|err| err.to_string())?;
    if engine.default_flights.len() != 2 || engine.strict_validators {
        return Err("engine section not applied".to_string());
    }
    let window = config.year_window().map_err(|err| err.to_string())?;
    if window.length != 10 || window.grace_day != 15 || window.grace_month != time::Month::March {
        return Err("dictionary section not applied".to_string());
    }
    match config.audit_target() {
        AuditTarget::File(path) if path == Path::new("pidl-audit.jsonl") => Ok(()),
        _ => Err("audit section not applied".to_string()),
    }
}
