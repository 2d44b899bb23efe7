// crates/pidl-config/src/lib.rs
// ============================================================================
// Module: PIDL Config
// Description: Configuration model and loader for the PIDL engine.
// Purpose: Turn a guarded TOML file into engine, dictionary, and audit settings.
// Dependencies: pidl-core, pidl-catalog, serde, thiserror, time, toml
// ============================================================================

//! ## Overview
//! [`PidlConfig`] is the single configuration surface for the engine and the
//! `pidl` CLI. Loading is fail-closed: path length, file size, and encoding
//! are checked before parsing, and [`PidlConfig::validate`] runs last.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuditConfig;
pub use config::AuditTarget;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::DictionaryConfig;
pub use config::EngineSection;
pub use config::LimitsConfig;
pub use config::PidlConfig;
