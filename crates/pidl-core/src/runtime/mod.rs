// crates/pidl-core/src/runtime/mod.rs
// ============================================================================
// Module: PIDL Runtime
// Description: Rule tables, template repository, engine, and serializer.
// Purpose: Resolve descriptor documents from immutable shared tables.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime tables are built once and shared read-only. The engine is the only
//! component that combines them; every table also answers its own queries so
//! the command-line surface can exercise each one in isolation.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod dictionary;
pub mod engine;
pub mod merge;
pub mod phone;
pub mod repository;
pub mod serializer;
pub mod transformation;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::StderrAuditSink;
pub use dictionary::DictionaryDefinition;
pub use dictionary::DictionaryError;
pub use dictionary::DictionaryStore;
pub use dictionary::DictionaryStoreBuilder;
pub use dictionary::YearWindow;
pub use engine::EngineConfig;
pub use engine::EngineTables;
pub use engine::ResolutionEngine;
pub use engine::ResolutionError;
pub use engine::SUBMIT_HINT_IDS;
pub use phone::ExecutionResult;
pub use phone::ExecutionStatus;
pub use phone::NumberingPlan;
pub use phone::PhoneError;
pub use phone::PhoneNumber;
pub use phone::PhoneNumberValidator;
pub use repository::FamilyCatalog;
pub use repository::PartnerSet;
pub use repository::RepositoryError;
pub use repository::SubmitLinkRule;
pub use repository::TemplateRepository;
pub use serializer::SerializationError;
pub use serializer::deserialize_documents;
pub use serializer::round_trips;
pub use serializer::serialize_documents;
pub use serializer::serialize_documents_pretty;
pub use transformation::LegacyPhoneTuple;
pub use transformation::TransformationIdentity;
pub use transformation::TransformationKind;
pub use transformation::TransformationRequest;
pub use transformation::TransformationResult;
pub use transformation::TransformationRule;
pub use transformation::TransformationRuleTable;
pub use validation::CompiledValidator;
pub use validation::RuleScope;
pub use validation::ValidationError;
pub use validation::ValidationRule;
pub use validation::ValidationRuleTable;
pub use validation::ValidatorQuery;
