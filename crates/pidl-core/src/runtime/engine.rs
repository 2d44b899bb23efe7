// crates/pidl-core/src/runtime/engine.rs
// ============================================================================
// Module: PIDL Resolution Engine
// Description: Merges base templates and fragments into descriptor documents.
// Purpose: Resolve one key into immutable, validated documents.
// Dependencies: crate::core, crate::interfaces, crate::runtime, thiserror, url
// ============================================================================

//! ## Overview
//! [`ResolutionEngine::resolve`] runs a fixed pipeline over shared
//! [`EngineTables`]:
//! 1. Compute the effective partner from the experience setting.
//! 2. Select the base template.
//! 3. Filter fragments by flights, experience features, and scope.
//! 4. Apply fragments in ascending specificity; equal specificity keeps
//!    declaration order.
//! 5. Finalize properties: optionality, dictionaries, validators, and
//!    transformations.
//! 6. Apply experience display customizations.
//! 7. Attach the submit link and client prefill sources.
//! 8. Drop the display description for not-applicable partners.
//!
//! Resolution performs no I/O besides the best-effort audit call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use url::form_urlencoded;

use crate::core::display::Action;
use crate::core::display::DisplayNode;
use crate::core::display::RestLink;
use crate::core::display::find_node_mut;
use crate::core::display::remove_node;
use crate::core::display::visit_nodes_mut;
use crate::core::document::DataEntry;
use crate::core::document::DescriptorDocument;
use crate::core::document::DocumentError;
use crate::core::document::PropertyDescriptor;
use crate::core::document::PropertyTransformation;
use crate::core::document::PropertyValidation;
use crate::core::document::ValidationType;
use crate::core::experience::DisplayCustomizationDetail;
use crate::core::experience::PaymentExperienceSetting;
use crate::core::flights::FlightSet;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::document_digest;
use crate::core::identifiers::PartnerName;
use crate::core::identifiers::ScenarioName;
use crate::core::key::DescriptorFamily;
use crate::core::key::ResolutionKey;
use crate::core::ordered_map::OrderedMap;
use crate::core::overrides::OverrideFragment;
use crate::core::template::DataTemplateEntry;
use crate::core::template::DocumentTemplate;
use crate::core::template::PrefillMode;
use crate::core::template::PropertyTemplate;
use crate::core::template::ValidationSource;
use crate::interfaces::ResolutionAuditEvent;
use crate::interfaces::ResolutionAuditEventParams;
use crate::interfaces::ResolutionAuditSink;
use crate::interfaces::ResolutionFailureEvent;
use crate::interfaces::ValidatorMissingEvent;
use crate::runtime::dictionary::DictionaryError;
use crate::runtime::dictionary::DictionaryStore;
use crate::runtime::merge::apply_fragment;
use crate::runtime::phone::ExecutionResult;
use crate::runtime::phone::PhoneNumberValidator;
use crate::runtime::phone::VALIDATION_TYPE_NOT_SUPPORTED;
use crate::runtime::repository::RepositoryError;
use crate::runtime::repository::TemplateRepository;
use crate::runtime::transformation::TransformationIdentity;
use crate::runtime::transformation::TransformationRequest;
use crate::runtime::transformation::TransformationResult;
use crate::runtime::transformation::TransformationRuleTable;
use crate::runtime::validation::ValidationError;
use crate::runtime::validation::ValidationRuleTable;
use crate::runtime::validation::ValidatorQuery;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hint ids that receive the submit action.
pub const SUBMIT_HINT_IDS: [&str; 7] = [
    "submitButton",
    "submitButtonHidden",
    "saveButton",
    "saveButtonHidden",
    "saveNextButton",
    "paypalSaveNextButton",
    "saveContinueButton",
];

/// Hint id removed by the `removeCancelButton` customization.
pub const CANCEL_BUTTON_HINT_ID: &str = "cancelButton";

/// Error code for a value rejected by its resolved regex.
pub const INVALID_PROPERTY_VALUE: &str = "InvalidPropertyValue";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Template repository failure.
    #[error("template repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// Dictionary lookup failure.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
    /// Validator resolution failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// A property finished merging without an optionality decision.
    #[error("unresolved optionality for property {property}")]
    UnresolvedOptionality {
        /// Property name.
        property: String,
    },
    /// A resolved document violates a document invariant.
    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),
}

impl ResolutionError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Repository(RepositoryError::UnknownDescriptorFamily(_)) => "unknown_descriptor_family",
            Self::Repository(RepositoryError::ConfigNotFound { .. })
            | Self::Dictionary(DictionaryError::ConfigNotFound(_)) => "config_not_found",
            Self::Repository(RepositoryError::DuplicateFamily(_)) => "duplicate_family",
            Self::Dictionary(_) => "invalid_dictionary",
            Self::Validation(ValidationError::NoValidatorDefined { .. }) => "no_validator_defined",
            Self::Validation(ValidationError::InvalidPattern { .. }) => "invalid_pattern",
            Self::UnresolvedOptionality { .. } => "unresolved_optionality",
            Self::Document(DocumentError::InvalidRegex { .. }) => "invalid_regex",
            Self::Document(DocumentError::DuplicateHintId(_)) => "duplicate_hint_id",
        }
    }
}

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Immutable tables shared by every resolution.
#[derive(Debug, Clone)]
pub struct EngineTables {
    /// Dictionary store.
    pub dictionaries: DictionaryStore,
    /// Validation rules.
    pub validators: ValidationRuleTable,
    /// Phone numbering plans.
    pub phone: PhoneNumberValidator,
    /// Transformation rules.
    pub transformations: TransformationRuleTable,
    /// Template repository.
    pub templates: TemplateRepository,
    /// Property name to service validation type, e.g. `phonenumber.{country}`.
    pub service_validations: OrderedMap<String>,
}

impl EngineTables {
    /// Validates a phone number against a dotted service type.
    #[must_use]
    pub fn validate_phone(&self, url_validation_type: &str, value: &str) -> ExecutionResult {
        self.phone.validate_phone(url_validation_type, value)
    }

    /// Applies the transformation configured for a property and target.
    #[must_use]
    pub fn transform(
        &self,
        property: &str,
        value: &str,
        identity: &OrderedMap<String>,
        target: &str,
        flights: &FlightSet,
    ) -> TransformationResult {
        let identity = TransformationIdentity::from_map(identity);
        self.transformations.transform(&self.phone, &TransformationRequest {
            property,
            value,
            identity: &identity,
            target,
            flights,
        })
    }

    /// Validates a property value given the owning document identity.
    ///
    /// Properties with a service validation use it; others fall back to the
    /// regex rule chain.
    #[must_use]
    pub fn validate_property(
        &self,
        property: &str,
        identity: &OrderedMap<String>,
        value: &str,
        flights: &FlightSet,
    ) -> ExecutionResult {
        let identity = TransformationIdentity::from_map(identity);
        if let Some(service) = self.service_validations.get(property) {
            return self.phone.validate_phone(&service.replace("{country}", &identity.country), value);
        }
        let query = ValidatorQuery {
            property,
            region: &identity.country,
            operation: &identity.operation,
            descriptor_type: &identity.type_name,
            flights,
        };
        match self.validators.resolve(&query) {
            Ok(validator) if validator.is_match(value) => ExecutionResult::passed(),
            Ok(validator) => ExecutionResult::failed(
                validator.error_code().unwrap_or(INVALID_PROPERTY_VALUE),
                validator.error_message().unwrap_or("Invalid value."),
            ),
            Err(err) => ExecutionResult::failed(VALIDATION_TYPE_NOT_SUPPORTED, err.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Engine behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Flights active for every resolution.
    pub default_flights: FlightSet,
    /// Fail when a requested validator is missing; otherwise drop the regex.
    pub strict_validators: bool,
    /// Digest algorithm for audit records; `None` skips digesting.
    pub digest: Option<HashAlgorithm>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_flights: FlightSet::new(),
            strict_validators: true,
            digest: Some(HashAlgorithm::Sha256),
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Resolution engine over shared tables.
pub struct ResolutionEngine<'t, A: ResolutionAuditSink> {
    /// Shared tables.
    tables: &'t EngineTables,
    /// Audit sink.
    audit: A,
    /// Behavior switches.
    config: EngineConfig,
}

/// Intermediate result used for auditing.
struct Resolved {
    /// Output documents.
    documents: Vec<DescriptorDocument>,
    /// Partner used for axis matching.
    effective_partner: PartnerName,
    /// Number of active flights.
    flight_count: usize,
    /// Base template id.
    base_template: String,
    /// Applied fragment ids in application order.
    fragments: Vec<String>,
}

impl<'t, A: ResolutionAuditSink> ResolutionEngine<'t, A> {
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new(tables: &'t EngineTables, audit: A) -> Self {
        Self {
            tables,
            audit,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the shared tables.
    #[must_use]
    pub const fn tables(&self) -> &'t EngineTables {
        self.tables
    }

    /// Resolves a family given by name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] for unknown families and every failure of
    /// [`ResolutionEngine::resolve`].
    pub fn resolve_named(
        &self,
        family: &str,
        key: &ResolutionKey,
        setting: Option<&PaymentExperienceSetting>,
    ) -> Result<Vec<DescriptorDocument>, ResolutionError> {
        match self.tables.templates.family_by_name(family) {
            Ok(family) => self.resolve(family, key, setting),
            Err(err) => {
                let err = ResolutionError::from(err);
                self.record_failure(family, key, &err);
                Err(err)
            }
        }
    }

    /// Resolves descriptor documents for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when template selection, dictionary
    /// lookup, validator resolution, or document validation fails.
    pub fn resolve(
        &self,
        family: DescriptorFamily,
        key: &ResolutionKey,
        setting: Option<&PaymentExperienceSetting>,
    ) -> Result<Vec<DescriptorDocument>, ResolutionError> {
        match self.resolve_documents(family, key, setting) {
            Ok(resolved) => {
                let digest = self.config.digest.and_then(|algorithm| document_digest(algorithm, &resolved.documents).ok());
                self.audit.record_resolution(&ResolutionAuditEvent::new(ResolutionAuditEventParams {
                    family: family.as_str(),
                    country: key.country().to_string(),
                    partner: key.partner().to_string(),
                    effective_partner: resolved.effective_partner.to_string(),
                    operation: key.operation().to_string(),
                    flight_count: resolved.flight_count,
                    base_template: resolved.base_template,
                    fragments: resolved.fragments,
                    document_count: resolved.documents.len(),
                    digest,
                }));
                Ok(resolved.documents)
            }
            Err(err) => {
                self.record_failure(family.as_str(), key, &err);
                Err(err)
            }
        }
    }

    /// Runs the pipeline without auditing the outcome.
    fn resolve_documents(
        &self,
        family: DescriptorFamily,
        key: &ResolutionKey,
        setting: Option<&PaymentExperienceSetting>,
    ) -> Result<Resolved, ResolutionError> {
        let templates = &self.tables.templates;
        let effective_partner =
            setting.and_then(PaymentExperienceSetting::template).map_or_else(|| key.partner().clone(), PartnerName::new);
        let flights = key.flights().union(&self.config.default_flights);
        let country = key.country().as_str();

        let base = templates.get_base_template(family, key)?;
        let mut fragments: Vec<&OverrideFragment> = templates
            .get_overrides(family, key)?
            .into_iter()
            .filter(|fragment| fragment_applies(fragment, key, &effective_partner, &flights, setting))
            .collect();
        fragments.sort_by_key(|fragment| fragment.specificity());

        let mut working = base.documents.clone();
        for fragment in &fragments {
            apply_fragment(&mut working, fragment);
        }

        let finalizer = Finalizer {
            engine: self,
            family,
            key,
            flights: &flights,
            base_template: &base.id,
        };
        let mut documents =
            working.iter().map(|template| finalizer.document(template, true)).collect::<Result<Vec<_>, _>>()?;

        if let Some(setting) = setting {
            for detail in setting.customizations(country) {
                for document in &mut documents {
                    customize(document, detail);
                }
            }
        }

        if let Some(rule) = templates.submit_link(family, key, &effective_partner, &flights)? {
            let link = RestLink {
                href: finalizer.expand(&rule.href),
                method: rule.method,
                headers: rule.headers.as_ref().map(|headers| {
                    headers.iter().map(|(name, value)| (name.clone(), finalizer.expand(value))).collect()
                }),
            };
            for document in &mut documents {
                attach_submit(document, &link);
            }
        }

        if templates.is_not_applicable(family, key.partner()) || templates.is_not_applicable(family, &effective_partner)
        {
            for document in &mut documents {
                document.display_description = None;
            }
        }

        for document in &documents {
            document.validate()?;
        }
        Ok(Resolved {
            documents,
            effective_partner,
            flight_count: flights.len(),
            base_template: base.id.clone(),
            fragments: fragments.iter().map(|fragment| fragment.id.clone()).collect(),
        })
    }

    /// Records a failed resolution.
    fn record_failure(&self, family: &str, key: &ResolutionKey, err: &ResolutionError) {
        self.audit.record_failure(&ResolutionFailureEvent::new(
            family,
            key.country().as_str(),
            key.partner().as_str(),
            key.operation().as_str(),
            err.kind_label(),
            err.to_string(),
        ));
    }
}

// ============================================================================
// SECTION: Finalization
// ============================================================================

/// Converts merged templates into output documents for one key.
struct Finalizer<'e, 't, 'k, A: ResolutionAuditSink> {
    /// Owning engine.
    engine: &'e ResolutionEngine<'t, A>,
    /// Family being resolved.
    family: DescriptorFamily,
    /// Resolution key.
    key: &'k ResolutionKey,
    /// Active flights.
    flights: &'k FlightSet,
    /// Base template id used as the default source layer.
    base_template: &'k str,
}

impl<A: ResolutionAuditSink> Finalizer<'_, '_, '_, A> {
    /// Finalizes one document and its nested documents.
    fn document(&self, template: &DocumentTemplate, top_level: bool) -> Result<DescriptorDocument, ResolutionError> {
        let identity = template.identity.iter().map(|(name, value)| (name.clone(), self.expand(value))).collect();
        let mut data_description = OrderedMap::new();
        for (name, entry) in template.data.iter() {
            let entry = match entry {
                DataTemplateEntry::Property(property) => DataEntry::Property(self.property(name, property)?),
                DataTemplateEntry::Nested(nested) => DataEntry::Nested(
                    nested.iter().map(|child| self.document(child, false)).collect::<Result<Vec<_>, _>>()?,
                ),
            };
            data_description.insert(name.clone(), entry);
        }
        let display_description =
            if top_level || !template.display.is_empty() { Some(template.display.clone()) } else { None };
        Ok(DescriptorDocument {
            identity,
            data_description,
            display_description,
            data_sources: self.data_sources(template),
        })
    }

    /// Finalizes one property.
    fn property(&self, name: &str, template: &PropertyTemplate) -> Result<PropertyDescriptor, ResolutionError> {
        let is_optional = template.is_optional.ok_or_else(|| ResolutionError::UnresolvedOptionality {
            property: name.to_string(),
        })?;
        let possible_values = match &template.possible_values {
            Some(token) => Some(self.engine.tables.dictionaries.get_dictionary(&self.expand(token))?.into_owned()),
            None => None,
        };
        let transformation = if template.transformations.is_empty() {
            None
        } else {
            Some(
                template
                    .transformations
                    .iter()
                    .map(|(target, kind)| {
                        (target.clone(), PropertyTransformation {
                            transformation_type: kind.clone(),
                        })
                    })
                    .collect(),
            )
        };
        Ok(PropertyDescriptor {
            property_type: template.property_type,
            data_type: template.data_type,
            is_key: template.is_key,
            is_optional,
            is_updatable: template.is_updatable,
            default_value: template.default_value.as_deref().map(|value| self.expand(value)),
            possible_values,
            validation: self.validation(name, template)?,
            transformation,
            source_override_layer: template.source_layer.clone().unwrap_or_else(|| self.base_template.to_string()),
        })
    }

    /// Resolves the validation block of a property.
    fn validation(
        &self,
        name: &str,
        template: &PropertyTemplate,
    ) -> Result<Option<PropertyValidation>, ResolutionError> {
        let validation = match &template.validation {
            ValidationSource::None => None,
            ValidationSource::Regex {
                regex,
                error_code,
                error_message,
            } => Some(PropertyValidation {
                validation_type: ValidationType::Regex,
                regex: Some(regex.clone()),
                url_validation_type: None,
                error_code: error_code.clone(),
                error_message: template.error_message.clone().or_else(|| error_message.clone()),
            }),
            ValidationSource::Service {
                url_validation_type,
                error_code,
            } => Some(PropertyValidation {
                validation_type: ValidationType::Service,
                regex: None,
                url_validation_type: Some(self.expand(url_validation_type)),
                error_code: error_code.clone(),
                error_message: template.error_message.clone(),
            }),
            ValidationSource::Resolver {
                rule_property,
            } => self.resolved_validation(rule_property.as_deref().unwrap_or(name), template)?,
        };
        Ok(validation)
    }

    /// Resolves a regex through the validation rule chain.
    fn resolved_validation(
        &self,
        rule_property: &str,
        template: &PropertyTemplate,
    ) -> Result<Option<PropertyValidation>, ResolutionError> {
        let descriptor_type =
            if self.key.type_name().is_empty() { self.family.description_type() } else { self.key.type_name() };
        let query = ValidatorQuery {
            property: rule_property,
            region: self.key.country().as_str(),
            operation: self.key.operation().as_str(),
            descriptor_type,
            flights: self.flights,
        };
        match self.engine.tables.validators.resolve(&query) {
            Ok(validator) => Ok(Some(PropertyValidation {
                validation_type: ValidationType::Regex,
                regex: Some(validator.pattern().to_string()),
                url_validation_type: None,
                error_code: validator.error_code().map(str::to_string),
                error_message: template.error_message.clone().or_else(|| validator.error_message().map(str::to_string)),
            })),
            Err(err @ ValidationError::NoValidatorDefined { .. }) => {
                self.engine.audit.record_validator_missing(&ValidatorMissingEvent::new(
                    rule_property,
                    query.region,
                    query.operation,
                    descriptor_type,
                ));
                if self.engine.config.strict_validators { Err(err.into()) } else { Ok(None) }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Builds client prefill data sources.
    fn data_sources(&self, template: &DocumentTemplate) -> Option<OrderedMap<RestLink>> {
        if template.prefill != PrefillMode::Client {
            return None;
        }
        let source = template.data_source.as_ref()?;
        let mut href = self.expand(&source.link.href);
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("partner", self.key.partner().as_str());
        if let Some(product) = self.key.classic_product() {
            query.append_pair("classicProduct", product);
        }
        if let Some(account) = self.key.billable_account_id() {
            query.append_pair("billableAccountId", account);
        }
        href.push(if href.contains('?') { '&' } else { '?' });
        href.push_str(&query.finish());
        let link = RestLink {
            href,
            method: source.link.method,
            headers: source.link.headers.clone(),
        };
        Some([(source.name.clone(), link)].into_iter().collect())
    }

    /// Substitutes key placeholders; unknown placeholders are kept.
    ///
    /// An absent profile type substitutes as empty.
    fn expand(&self, text: &str) -> String {
        if !text.contains('{') {
            return text.to_string();
        }
        let key = self.key;
        let values = [
            ("{country}", Some(key.country().as_str())),
            ("{language}", Some(key.language())),
            ("{partner}", Some(key.partner().as_str())),
            ("{operation}", Some(key.operation().as_str())),
            ("{type}", Some(key.type_name())),
            ("{family}", Some(key.family())),
            ("{profileType}", Some(key.profile_type().unwrap_or_default())),
            ("{scenario}", key.scenario().map(ScenarioName::as_str)),
        ];
        values.into_iter().fold(text.to_string(), |acc, (placeholder, value)| match value {
            Some(value) => acc.replace(placeholder, value),
            None => acc,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when every gate of `fragment` is satisfied.
fn fragment_applies(
    fragment: &OverrideFragment,
    key: &ResolutionKey,
    partner: &PartnerName,
    flights: &FlightSet,
    setting: Option<&PaymentExperienceSetting>,
) -> bool {
    fragment.flights.as_ref().is_none_or(|requirement| requirement.is_satisfied_by(flights))
        && fragment.feature.as_deref().is_none_or(|feature| {
            setting.is_some_and(|setting| setting.is_feature_enabled(feature, key.country().as_str()))
        })
        && fragment.scope.matches(key, partner)
}

/// Applies one display customization to a document.
fn customize(document: &mut DescriptorDocument, detail: &DisplayCustomizationDetail) {
    for field in detail.fields_to_make_required.iter().flatten() {
        for_each_property(document, field, &mut |property| property.is_optional = false);
    }
    let Some(display) = document.display_description.as_mut() else {
        return;
    };
    if let Some(hidden) = &detail.fields_to_be_hidden {
        visit_nodes_mut(display, &mut |node: &mut DisplayNode| {
            let named = hidden.iter().any(|field| {
                node.hint_id().as_str() == field.as_str() || node.property_name() == Some(field.as_str())
            });
            if named {
                node.set_hidden(true);
            }
        });
    }
    if let Some(contents) = &detail.set_button_display_content {
        for (hint_id, content) in contents.iter() {
            if let Some(node) = find_node_mut(display, hint_id) {
                node.set_display_content(content.clone());
            }
        }
    }
    if detail.remove_cancel_button == Some(true) {
        remove_node(display, CANCEL_BUTTON_HINT_ID);
    }
    if let Some(tags) = &detail.display_tags_to_be_added {
        for (hint_id, additions) in tags.iter() {
            if let Some(node) = find_node_mut(display, hint_id) {
                for (tag, value) in additions.iter() {
                    node.display_tags_mut().insert(tag.clone(), value.clone());
                }
            }
        }
    }
}

/// Runs `apply` on every property called `name` at any depth.
fn for_each_property(document: &mut DescriptorDocument, name: &str, apply: &mut dyn FnMut(&mut PropertyDescriptor)) {
    for (entry_name, entry) in document.data_description.iter_mut() {
        match entry {
            DataEntry::Property(property) if entry_name == name => apply(property),
            DataEntry::Property(_) => {}
            DataEntry::Nested(nested) => {
                for child in nested.iter_mut() {
                    for_each_property(child, name, apply);
                }
            }
        }
    }
}

/// Sets the submit action on every allowed submit hint.
fn attach_submit(document: &mut DescriptorDocument, link: &RestLink) {
    if let Some(display) = document.display_description.as_mut() {
        visit_nodes_mut(display, &mut |node: &mut DisplayNode| {
            if SUBMIT_HINT_IDS.contains(&node.hint_id().as_str()) {
                node.set_action(Some(Action::Submit(link.clone())));
            }
        });
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
