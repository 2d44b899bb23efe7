//! Boundary validation tests for pidl-config.
// crates/pidl-config/tests/boundary_validation.rs
// =============================================================================
// Module: Boundary Validation Tests
// Description: Min/max boundaries for dictionary, limit, and engine values.
// Purpose: Ensure every numeric boundary is enforced by validate().
// =============================================================================

use std::path::PathBuf;

use pidl_config::ConfigError;
use pidl_config::PidlConfig;
use time::Date;
use time::Month;

type TestResult = Result<(), String>;

/// Assert that a validation result is an error containing a specific substring.
fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

// ============================================================================
// SECTION: Dictionaries
// ============================================================================

#[test]
fn year_window_at_minimum_1() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.year_window = 1;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn year_window_at_maximum_50() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.year_window = 50;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn year_window_at_zero_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.year_window = 0;
    assert_invalid(config.validate(), "year_window must be between 1 and 50")
}

#[test]
fn year_window_above_maximum_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.year_window = 51;
    assert_invalid(config.validate(), "year_window must be between 1 and 50")
}

#[test]
fn grace_month_thirteen_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.grace_cutoff_month = 13;
    assert_invalid(config.validate(), "grace_cutoff_month must be between 1 and 12")
}

#[test]
fn grace_day_outside_month_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.grace_cutoff_month = 2;
    config.dictionaries.grace_cutoff_day = 29;
    assert_invalid(config.validate(), "grace_cutoff_day is not a day of grace_cutoff_month")
}

#[test]
fn catalog_options_carry_the_window() -> TestResult {
    let mut config = PidlConfig::default();
    config.dictionaries.year_window = 5;
    let today = Date::from_calendar_date(2026, Month::January, 15).map_err(|err| err.to_string())?;
    let options = config.catalog_options(today).map_err(|err| err.to_string())?;
    let years = options.year_window.years(options.today).map_err(|err| err.to_string())?;
    if years != ["2024", "2025", "2026", "2027", "2028"] {
        return Err(format!("unexpected years {}", years.join(",")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Limits
// ============================================================================

#[test]
fn max_document_bytes_at_zero_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.limits.max_document_bytes = 0;
    assert_invalid(config.validate(), "max_document_bytes must be greater than zero")
}

#[test]
fn max_document_bytes_above_ceiling_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.limits.max_document_bytes = 64 * 1024 * 1024 + 1;
    assert_invalid(config.validate(), "max_document_bytes must not exceed")
}

// ============================================================================
// SECTION: Engine and Audit
// ============================================================================

#[test]
fn malformed_default_flight_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.engine.default_flights = vec!["PX Enable".to_string()];
    assert_invalid(config.validate(), "engine.default_flights")
}

#[test]
fn blank_default_flights_are_ignored() -> TestResult {
    let mut config = PidlConfig::default();
    config.engine.default_flights = vec![" ".to_string(), "PXEnableAVSSuggestions".to_string()];
    let engine = config.engine_config().map_err(|err| err.to_string())?;
    if engine.default_flights.len() != 1 {
        return Err("blank flight names should be dropped".to_string());
    }
    Ok(())
}

#[test]
fn audit_path_component_too_long_rejected() -> TestResult {
    let mut config = PidlConfig::default();
    config.audit.path = Some(PathBuf::from("a".repeat(300)));
    assert_invalid(config.validate(), "audit path component too long")
}
