// crates/pidl-config/src/config.rs
// ============================================================================
// Module: PIDL Config Model
// Description: TOML sections, loading guards, and validation.
// Purpose: Provide validated engine and catalog settings.
// Dependencies: pidl-core, pidl-catalog, serde, thiserror, time, toml
// ============================================================================

//! ## Overview
//! The config path comes from the explicit argument, then `PIDL_CONFIG`, then
//! `pidl.toml` in the working directory. Every section is optional and
//! defaults to the built-in behavior.
//! Invariants:
//! - Paths longer than 4096 bytes or with a component over 255 bytes are
//!   rejected before any I/O.
//! - Files over 1 MiB or not UTF-8 are rejected before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use pidl_catalog::CatalogOptions;
use pidl_core::EngineConfig;
use pidl_core::FlightSet;
use pidl_core::YearWindow;
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use time::Month;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default config filename.
pub const DEFAULT_CONFIG_NAME: &str = "pidl.toml";
/// Environment variable override for the config path.
pub const CONFIG_ENV_VAR: &str = "PIDL_CONFIG";
/// Maximum allowed config file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length for config-related paths.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Largest accepted expiry-year window.
const MAX_YEAR_WINDOW: u16 = 50;
/// Largest accepted document input, in bytes.
const MAX_DOCUMENT_BYTES_CEILING: usize = 64 * 1024 * 1024;
/// Default document input limit, in bytes.
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Config load and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// PIDL configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidlConfig {
    /// Engine behavior.
    #[serde(default)]
    pub engine: EngineSection,
    /// Generated dictionary parameters.
    #[serde(default)]
    pub dictionaries: DictionaryConfig,
    /// Audit log routing.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// `[engine]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Flights active for every resolution.
    #[serde(default)]
    pub default_flights: Vec<String>,
    /// Fail resolutions that reference a missing validator.
    #[serde(default = "default_true")]
    pub strict_validators: bool,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            default_flights: Vec::new(),
            strict_validators: true,
        }
    }
}

/// `[dictionaries]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionaryConfig {
    /// Number of expiry years offered.
    #[serde(default = "default_year_window")]
    pub year_window: u16,
    /// Month of the expiry grace cutoff, 1-based.
    #[serde(default = "default_grace_month")]
    pub grace_cutoff_month: u8,
    /// Day of the expiry grace cutoff.
    #[serde(default = "default_grace_day")]
    pub grace_cutoff_day: u8,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            year_window: default_year_window(),
            grace_cutoff_month: default_grace_month(),
            grace_cutoff_day: default_grace_day(),
        }
    }
}

/// `[audit]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Emit audit events.
    #[serde(default)]
    pub enabled: bool,
    /// Append-only JSON-lines file; stderr when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `[limits]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest documents file accepted by `roundtrip`, in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

/// Where audit events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditTarget {
    /// Auditing is off.
    Disabled,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File(PathBuf),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl PidlConfig {
    /// Loads configuration from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path, size, encoding, syntax, or
    /// values are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_resolved(&resolved)
    }

    /// Loads configuration, falling back to defaults when no config was
    /// requested and the default file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as [`Self::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none() && env::var_os(CONFIG_ENV_VAR).is_none() && !Path::new(DEFAULT_CONFIG_NAME).exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Reads and validates the file at `resolved`.
    fn load_resolved(resolved: &Path) -> Result<Self, ConfigError> {
        validate_path(resolved, "config")?;
        let bytes = fs::read(resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content =
            std::str::from_utf8(&bytes).map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_flights()?;
        self.year_window()?;
        if let Some(path) = &self.audit.path {
            validate_path(path, "audit")?;
        }
        if self.limits.max_document_bytes == 0 {
            return Err(ConfigError::Invalid("max_document_bytes must be greater than zero".to_string()));
        }
        if self.limits.max_document_bytes > MAX_DOCUMENT_BYTES_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_document_bytes must not exceed {MAX_DOCUMENT_BYTES_CEILING}"
            )));
        }
        Ok(())
    }

    // ========================================================================
    // SECTION: Derived Settings
    // ========================================================================

    /// Parses `[engine].default_flights`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a flight name is malformed.
    pub fn default_flights(&self) -> Result<FlightSet, ConfigError> {
        FlightSet::from_names(&self.engine.default_flights)
            .map_err(|err| ConfigError::Invalid(format!("engine.default_flights: {err}")))
    }

    /// Builds the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a default flight is malformed.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        Ok(EngineConfig {
            default_flights: self.default_flights()?,
            strict_validators: self.engine.strict_validators,
            ..EngineConfig::default()
        })
    }

    /// Builds the expiry-year window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the window length is outside
    /// 1..=50 or the cutoff is not a calendar date.
    pub fn year_window(&self) -> Result<YearWindow, ConfigError> {
        let section = &self.dictionaries;
        if section.year_window == 0 || section.year_window > MAX_YEAR_WINDOW {
            return Err(ConfigError::Invalid(format!("year_window must be between 1 and {MAX_YEAR_WINDOW}")));
        }
        let month = Month::try_from(section.grace_cutoff_month)
            .map_err(|_| ConfigError::Invalid("grace_cutoff_month must be between 1 and 12".to_string()))?;
        // The cutoff must exist in every year, so February 29 is rejected.
        Date::from_calendar_date(2023, month, section.grace_cutoff_day)
            .map_err(|_| ConfigError::Invalid("grace_cutoff_day is not a day of grace_cutoff_month".to_string()))?;
        Ok(YearWindow {
            length: section.year_window,
            grace_month: month,
            grace_day: section.grace_cutoff_day,
            ..YearWindow::default()
        })
    }

    /// Builds catalog options anchored on `today`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the dictionary section is invalid.
    pub fn catalog_options(&self, today: Date) -> Result<CatalogOptions, ConfigError> {
        Ok(CatalogOptions {
            today,
            year_window: self.year_window()?,
        })
    }

    /// Returns the audit destination.
    #[must_use]
    pub fn audit_target(&self) -> AuditTarget {
        match (self.audit.enabled, &self.audit.path) {
            (false, _) => AuditTarget::Disabled,
            (true, None) => AuditTarget::Stderr,
            (true, Some(path)) => AuditTarget::File(path.clone()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serde default for `true` flags.
const fn default_true() -> bool {
    true
}

/// Serde default for the year window length.
const fn default_year_window() -> u16 {
    25
}

/// Serde default for the grace cutoff month.
const fn default_grace_month() -> u8 {
    2
}

/// Serde default for the grace cutoff day.
const fn default_grace_day() -> u8 {
    1
}

/// Serde default for the document size limit.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Resolves the config path from explicit input or environment.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates path length and components; `label` names the path in errors.
fn validate_path(path: &Path, label: &str) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{label} path exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{label} path component too long")));
        }
    }
    Ok(())
}
