// crates/pidl-core/src/core/mod.rs
// ============================================================================
// Module: PIDL Core Types
// Description: Canonical key, template, override, and document structures.
// Purpose: Provide stable, serializable types for descriptor resolution.
// Dependencies: regex, serde, serde_jcs, sha2, smallvec, thiserror
// ============================================================================

//! ## Overview
//! Core types define the resolution key, the template authoring model, the
//! override fragments that refine templates, and the resolved descriptor
//! documents. These types are the source of truth for the serializer and
//! the command-line surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod display;
pub mod document;
pub mod experience;
pub mod flights;
pub mod hashing;
pub mod identifiers;
pub mod key;
pub mod ordered_map;
pub mod overrides;
pub mod template;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use display::Action;
pub use display::ActionContext;
pub use display::ContainerHint;
pub use display::ContentHint;
pub use display::DisplayNode;
pub use display::HttpMethod;
pub use display::PartnerActionKind;
pub use display::PidlDocInfo;
pub use display::PropertyHint;
pub use display::ResourceActionContext;
pub use display::ResourceLink;
pub use display::RestLink;
pub use document::DataEntry;
pub use document::DataType;
pub use document::DescriptorDocument;
pub use document::DocumentError;
pub use document::PropertyDescriptor;
pub use document::PropertyTransformation;
pub use document::PropertyType;
pub use document::PropertyValidation;
pub use document::ValidationType;
pub use experience::DisplayCustomizationDetail;
pub use experience::FeatureConfig;
pub use experience::PaymentExperienceSetting;
pub use flights::FlightError;
pub use flights::FlightName;
pub use flights::FlightRequirement;
pub use flights::FlightSet;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::document_digest;
pub use identifiers::CountryCode;
pub use identifiers::HintId;
pub use identifiers::OperationName;
pub use identifiers::PartnerName;
pub use identifiers::ScenarioName;
pub use key::DescriptorFamily;
pub use key::ResolutionKey;
pub use key::ResolutionKeyBuilder;
pub use key::UnknownDescriptorFamilyError;
pub use ordered_map::OrderedMap;
pub use overrides::AxisMatch;
pub use overrides::InsertPosition;
pub use overrides::OverrideFragment;
pub use overrides::OverrideScope;
pub use overrides::Patch;
pub use overrides::PropertyOverride;
pub use overrides::Qualifier;
pub use overrides::Specificity;
pub use template::BaseTemplate;
pub use template::DataSourceTemplate;
pub use template::DataTemplateEntry;
pub use template::DocumentTemplate;
pub use template::PrefillMode;
pub use template::PropertyTemplate;
pub use template::TemplateSelector;
pub use template::ValidationSource;
