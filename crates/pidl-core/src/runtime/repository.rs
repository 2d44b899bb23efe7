// crates/pidl-core/src/runtime/repository.rs
// ============================================================================
// Module: PIDL Template Repository
// Description: Per-family base templates, override fragments, and submit links.
// Purpose: Deterministic lookup of everything the engine merges for one key.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The repository holds one [`FamilyCatalog`] per descriptor family. Base
//! template selection is most-specific-first with the first declaration
//! winning ties; a family default always exists for a valid catalog. Override
//! fragments come back in declaration order, pre-filtered by key qualifiers;
//! scope and gate evaluation belong to the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::display::HttpMethod;
use crate::core::flights::FlightRequirement;
use crate::core::flights::FlightSet;
use crate::core::identifiers::PartnerName;
use crate::core::key::DescriptorFamily;
use crate::core::key::ResolutionKey;
use crate::core::ordered_map::OrderedMap;
use crate::core::overrides::OverrideFragment;
use crate::core::overrides::OverrideScope;
use crate::core::overrides::Qualifier;
use crate::core::overrides::Specificity;
use crate::core::overrides::qualifiers_match;
use crate::core::template::BaseTemplate;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Repository lookup and construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Family name is not recognized or not registered.
    #[error("unknown descriptor family: {0}")]
    UnknownDescriptorFamily(String),
    /// No template matched and the family has no default.
    #[error("no template configured for {family} (country {country}, operation {operation}, type {type_name})")]
    ConfigNotFound {
        /// Family name.
        family: String,
        /// Country queried.
        country: String,
        /// Operation queried.
        operation: String,
        /// Descriptor type queried.
        type_name: String,
    },
    /// A family catalog was registered twice.
    #[error("duplicate family catalog: {0}")]
    DuplicateFamily(String),
}

// ============================================================================
// SECTION: Catalog Types
// ============================================================================

/// Named partner subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerSet {
    /// Subset name.
    pub name: String,
    /// Member partners.
    pub partners: Vec<PartnerName>,
}

impl PartnerSet {
    /// Creates a subset.
    #[must_use]
    pub fn new<S: AsRef<str>>(name: impl Into<String>, partners: &[S]) -> Self {
        Self {
            name: name.into(),
            partners: partners.iter().map(PartnerName::new).collect(),
        }
    }

    /// Returns true when `partner` belongs to the subset.
    #[must_use]
    pub fn contains(&self, partner: &PartnerName) -> bool {
        self.partners.contains(partner)
    }
}

/// Submit endpoint selected by scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitLinkRule {
    /// Rule id.
    pub id: String,
    /// Axis scope.
    pub scope: OverrideScope,
    /// Key qualifiers.
    pub qualifiers: Vec<Qualifier>,
    /// Flight requirement.
    pub flights: Option<FlightRequirement>,
    /// HTTP method.
    pub method: HttpMethod,
    /// Href template.
    pub href: String,
    /// Header templates.
    pub headers: Option<OrderedMap<String>>,
}

impl SubmitLinkRule {
    /// Creates an ungated rule.
    #[must_use]
    pub fn new(id: impl Into<String>, scope: OverrideScope, method: HttpMethod, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope,
            qualifiers: Vec::new(),
            flights: None,
            method,
            href: href.into(),
            headers: None,
        }
    }

    /// Adds a qualifier.
    #[must_use]
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Gates the rule on flights.
    #[must_use]
    pub fn with_flights(mut self, requirement: FlightRequirement) -> Self {
        self.flights = Some(requirement);
        self
    }

    /// Adds a header template.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.get_or_insert_with(OrderedMap::new).insert(name.into(), value.into());
        self
    }

    /// Returns true when the rule applies.
    fn matches(&self, key: &ResolutionKey, partner: &PartnerName, flights: &FlightSet) -> bool {
        self.scope.matches(key, partner)
            && qualifiers_match(&self.qualifiers, key)
            && self.flights.as_ref().is_none_or(|requirement| requirement.is_satisfied_by(flights))
    }

    /// Ranking used to pick among matching rules.
    fn rank(&self) -> (Specificity, usize, bool) {
        (self.scope.specificity(), self.qualifiers.len(), self.flights.is_some())
    }
}

/// Everything configured for one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyCatalog {
    /// Family.
    pub family: DescriptorFamily,
    /// Base templates in declaration order.
    pub templates: Vec<BaseTemplate>,
    /// Override fragments in declaration order.
    pub fragments: Vec<OverrideFragment>,
    /// Submit link rules in declaration order.
    pub submit_links: Vec<SubmitLinkRule>,
    /// Named partner subsets.
    pub partner_sets: Vec<PartnerSet>,
    /// Name of the subset whose partners get no display description.
    pub not_applicable: Option<String>,
}

impl FamilyCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new(family: DescriptorFamily) -> Self {
        Self {
            family,
            templates: Vec::new(),
            fragments: Vec::new(),
            submit_links: Vec::new(),
            partner_sets: Vec::new(),
            not_applicable: None,
        }
    }

    /// Appends a base template.
    #[must_use]
    pub fn template(mut self, template: BaseTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Appends override fragments.
    #[must_use]
    pub fn fragments(mut self, fragments: impl IntoIterator<Item = OverrideFragment>) -> Self {
        self.fragments.extend(fragments);
        self
    }

    /// Appends submit link rules.
    #[must_use]
    pub fn submit_links(mut self, rules: impl IntoIterator<Item = SubmitLinkRule>) -> Self {
        self.submit_links.extend(rules);
        self
    }

    /// Appends a partner subset.
    #[must_use]
    pub fn partner_set(mut self, set: PartnerSet) -> Self {
        self.partner_sets.push(set);
        self
    }

    /// Names the not-applicable partner subset.
    #[must_use]
    pub fn not_applicable(mut self, set_name: impl Into<String>) -> Self {
        self.not_applicable = Some(set_name.into());
        self
    }
}

// ============================================================================
// SECTION: Repository
// ============================================================================

/// Immutable template repository.
#[derive(Debug, Clone, Default)]
pub struct TemplateRepository {
    /// Family catalogs.
    catalogs: Vec<FamilyCatalog>,
}

impl TemplateRepository {
    /// Creates a repository.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateFamily`] when a family is
    /// registered twice.
    pub fn new(catalogs: Vec<FamilyCatalog>) -> Result<Self, RepositoryError> {
        for (index, catalog) in catalogs.iter().enumerate() {
            if catalogs[..index].iter().any(|earlier| earlier.family == catalog.family) {
                return Err(RepositoryError::DuplicateFamily(catalog.family.to_string()));
            }
        }
        Ok(Self {
            catalogs,
        })
    }

    /// Parses a family name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownDescriptorFamily`] for unknown names.
    pub fn family_by_name(&self, name: &str) -> Result<DescriptorFamily, RepositoryError> {
        let family: DescriptorFamily =
            name.parse().map_err(|_| RepositoryError::UnknownDescriptorFamily(name.to_string()))?;
        self.catalog(family)?;
        Ok(family)
    }

    /// Returns the catalog for `family`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownDescriptorFamily`] when the family is
    /// not registered.
    pub fn catalog(&self, family: DescriptorFamily) -> Result<&FamilyCatalog, RepositoryError> {
        self.catalogs
            .iter()
            .find(|catalog| catalog.family == family)
            .ok_or_else(|| RepositoryError::UnknownDescriptorFamily(family.to_string()))
    }

    /// Iterates over registered catalogs.
    pub fn catalogs(&self) -> impl Iterator<Item = &FamilyCatalog> {
        self.catalogs.iter()
    }

    /// Selects the base template for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ConfigNotFound`] when nothing matches and the
    /// family has no default.
    pub fn get_base_template(
        &self,
        family: DescriptorFamily,
        key: &ResolutionKey,
    ) -> Result<&BaseTemplate, RepositoryError> {
        let catalog = self.catalog(family)?;
        let mut best: Option<&BaseTemplate> = None;
        for template in catalog.templates.iter().filter(|template| template.selector.matches(key)) {
            if best.is_none_or(|current| template.selector.score() > current.selector.score()) {
                best = Some(template);
            }
        }
        best.or_else(|| catalog.templates.iter().find(|template| template.selector.is_default())).ok_or_else(|| {
            RepositoryError::ConfigNotFound {
                family: family.to_string(),
                country: key.country().to_string(),
                operation: key.operation().to_string(),
                type_name: key.type_name().to_string(),
            }
        })
    }

    /// Returns fragments whose qualifiers accept `key`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownDescriptorFamily`] when the family is
    /// not registered.
    pub fn get_overrides(
        &self,
        family: DescriptorFamily,
        key: &ResolutionKey,
    ) -> Result<Vec<&OverrideFragment>, RepositoryError> {
        let catalog = self.catalog(family)?;
        Ok(catalog.fragments.iter().filter(|fragment| qualifiers_match(&fragment.qualifiers, key)).collect())
    }

    /// Returns the most specific submit link rule; ties go to the last one.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownDescriptorFamily`] when the family is
    /// not registered.
    pub fn submit_link(
        &self,
        family: DescriptorFamily,
        key: &ResolutionKey,
        partner: &PartnerName,
        flights: &FlightSet,
    ) -> Result<Option<&SubmitLinkRule>, RepositoryError> {
        let catalog = self.catalog(family)?;
        Ok(catalog
            .submit_links
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(key, partner, flights))
            .max_by_key(|(index, rule)| (rule.rank(), *index))
            .map(|(_, rule)| rule))
    }

    /// Returns the named partner subset.
    #[must_use]
    pub fn partner_set(&self, family: DescriptorFamily, name: &str) -> Option<&PartnerSet> {
        self.catalog(family).ok()?.partner_sets.iter().find(|set| set.name.eq_ignore_ascii_case(name))
    }

    /// Returns true when `partner` gets no display description for `family`.
    #[must_use]
    pub fn is_not_applicable(&self, family: DescriptorFamily, partner: &PartnerName) -> bool {
        self.catalog(family)
            .ok()
            .and_then(|catalog| catalog.not_applicable.as_deref())
            .and_then(|name| self.partner_set(family, name))
            .is_some_and(|set| set.contains(partner))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::FamilyCatalog;
    use super::PartnerSet;
    use super::RepositoryError;
    use super::SubmitLinkRule;
    use super::TemplateRepository;
    use crate::core::display::HttpMethod;
    use crate::core::flights::FlightSet;
    use crate::core::identifiers::PartnerName;
    use crate::core::key::DescriptorFamily;
    use crate::core::key::ResolutionKey;
    use crate::core::overrides::OverrideScope;
    use crate::core::template::BaseTemplate;
    use crate::core::template::TemplateSelector;

    fn repository() -> TemplateRepository {
        let catalog = FamilyCatalog::new(DescriptorFamily::TaxId)
            .template(BaseTemplate::new("tax.default", TemplateSelector::any(), Vec::new()))
            .template(BaseTemplate::new("tax.add", TemplateSelector::any().operations(&["add"]), Vec::new()))
            .template(BaseTemplate::new("tax.add.again", TemplateSelector::any().operations(&["add"]), Vec::new()))
            .template(BaseTemplate::new(
                "tax.de.add",
                TemplateSelector::any().operations(&["add"]).countries(&["de"]),
                Vec::new(),
            ))
            .submit_links([
                SubmitLinkRule::new("generic", OverrideScope::any(), HttpMethod::Post, "https://a"),
                SubmitLinkRule::new("cart", OverrideScope::any().with_partner("cart"), HttpMethod::Put, "https://b"),
            ])
            .partner_set(PartnerSet::new("NotApplicableForTaxId", &["bing"]))
            .not_applicable("NotApplicableForTaxId");
        TemplateRepository::new(vec![catalog]).unwrap()
    }

    #[test]
    fn most_specific_template_wins_and_first_declaration_breaks_ties() {
        let repo = repository();
        let de = ResolutionKey::builder("de", "add", "cart").build();
        assert_eq!(repo.get_base_template(DescriptorFamily::TaxId, &de).unwrap().id, "tax.de.add");
        let fr = ResolutionKey::builder("fr", "add", "cart").build();
        assert_eq!(repo.get_base_template(DescriptorFamily::TaxId, &fr).unwrap().id, "tax.add");
        let update = ResolutionKey::builder("zz", "update", "unknownpartner").build();
        assert_eq!(repo.get_base_template(DescriptorFamily::TaxId, &update).unwrap().id, "tax.default");
    }

    #[test]
    fn unregistered_family_is_reported() {
        let key = ResolutionKey::builder("de", "add", "cart").build();
        let repo = repository();
        let result = repo.get_base_template(DescriptorFamily::Address, &key);
        assert!(matches!(result, Err(RepositoryError::UnknownDescriptorFamily(_))));
        assert!(repository().family_by_name("bogus").is_err());
    }

    #[test]
    fn partner_scoped_submit_link_beats_generic() {
        let key = ResolutionKey::builder("de", "add", "cart").build();
        let repo = repository();
        let rule = repo
            .submit_link(DescriptorFamily::TaxId, &key, &PartnerName::new("cart"), &FlightSet::new())
            .unwrap()
            .unwrap();
        assert_eq!(rule.method, HttpMethod::Put);
    }

    #[test]
    fn not_applicable_partners_are_detected() {
        let repo = repository();
        assert!(repo.is_not_applicable(DescriptorFamily::TaxId, &PartnerName::new("Bing")));
        assert!(!repo.is_not_applicable(DescriptorFamily::TaxId, &PartnerName::new("cart")));
    }

    #[test]
    fn duplicate_families_are_rejected() {
        let result = TemplateRepository::new(vec![
            FamilyCatalog::new(DescriptorFamily::Address),
            FamilyCatalog::new(DescriptorFamily::Address),
        ]);
        assert!(matches!(result, Err(RepositoryError::DuplicateFamily(_))));
    }
}
