// crates/pidl-core/src/lib.rs
// ============================================================================
// Module: PIDL Core Library
// Description: Public API surface for the PIDL descriptor resolution engine.
// Purpose: Expose descriptor types, interfaces, and runtime resolvers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! PIDL core resolves a multi-axis key (country, family, type, operation,
//! language, partner, scenario, flights) into descriptor documents that
//! describe the data a client collects and the display tree that renders it.
//! Static tables are built once and passed by reference; every resolution is
//! a pure, synchronous computation over those tables.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::NoopAuditSink;
pub use interfaces::ResolutionAuditEvent;
pub use interfaces::ResolutionAuditSink;
pub use interfaces::ResolutionFailureEvent;
pub use interfaces::ValidatorMissingEvent;
pub use runtime::DictionaryError;
pub use runtime::DictionaryStore;
pub use runtime::EngineConfig;
pub use runtime::EngineTables;
pub use runtime::ExecutionResult;
pub use runtime::ExecutionStatus;
pub use runtime::FamilyCatalog;
pub use runtime::FileAuditSink;
pub use runtime::LegacyPhoneTuple;
pub use runtime::NumberingPlan;
pub use runtime::PartnerSet;
pub use runtime::PhoneNumberValidator;
pub use runtime::RepositoryError;
pub use runtime::ResolutionEngine;
pub use runtime::ResolutionError;
pub use runtime::RuleScope;
pub use runtime::SerializationError;
pub use runtime::StderrAuditSink;
pub use runtime::SubmitLinkRule;
pub use runtime::TemplateRepository;
pub use runtime::TransformationKind;
pub use runtime::TransformationResult;
pub use runtime::TransformationRule;
pub use runtime::TransformationRuleTable;
pub use runtime::ValidationError;
pub use runtime::ValidationRule;
pub use runtime::ValidationRuleTable;
pub use runtime::YearWindow;
pub use runtime::deserialize_documents;
pub use runtime::round_trips;
pub use runtime::serialize_documents;
pub use runtime::serialize_documents_pretty;
