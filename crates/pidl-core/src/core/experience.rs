// crates/pidl-core/src/core/experience.rs
// ============================================================================
// Module: PIDL Partner Experience Settings
// Description: Partner-supplied template aliasing and display customization.
// Purpose: Let partners reuse a template partner and toggle market features.
// Dependencies: crate::core::ordered_map, serde
// ============================================================================

//! ## Overview
//! A [`PaymentExperienceSetting`] arrives as JSON alongside a resolution
//! request. Its `template` names the partner used for axis matching, and its
//! `features` enable fragment gates and display customizations per market.
//! Unknown fields are ignored so settings authored for newer engines still
//! load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::ordered_map::OrderedMap;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Display customization carried by a feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCustomizationDetail {
    /// Hint ids or property names to hide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_be_hidden: Option<Vec<String>>,
    /// Property names to make required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_make_required: Option<Vec<String>>,
    /// Button hint id to display content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_button_display_content: Option<OrderedMap<String>>,
    /// Removes cancel buttons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_cancel_button: Option<bool>,
    /// Hint id to tags to add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_tags_to_be_added: Option<OrderedMap<OrderedMap<String>>>,
}

/// Feature toggle with optional market restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    /// Markets where the feature applies; absent or empty means every market.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable_markets: Option<Vec<String>>,
    /// Customizations applied when the feature is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_customization_detail: Option<Vec<DisplayCustomizationDetail>>,
}

impl FeatureConfig {
    /// Returns true when the feature applies in `country`.
    #[must_use]
    pub fn applies_to(&self, country: &str) -> bool {
        match &self.applicable_markets {
            None => true,
            Some(markets) if markets.is_empty() => true,
            Some(markets) => markets.iter().any(|market| market.eq_ignore_ascii_case(country)),
        }
    }
}

/// Partner experience setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentExperienceSetting {
    /// Template partner used for axis matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Enabled features by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<OrderedMap<FeatureConfig>>,
}

impl PaymentExperienceSetting {
    /// Parses a setting from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the JSON is malformed.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Returns the template partner, ignoring blanks.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref().map(str::trim).filter(|template| !template.is_empty())
    }

    /// Returns true when `feature` is enabled for `country`.
    ///
    /// Feature names compare case-insensitively.
    #[must_use]
    pub fn is_feature_enabled(&self, feature: &str, country: &str) -> bool {
        self.features.as_ref().is_some_and(|features| {
            features
                .iter()
                .any(|(name, config)| name.eq_ignore_ascii_case(feature) && config.applies_to(country))
        })
    }

    /// Iterates over customizations of every feature enabled for `country`.
    pub fn customizations<'a>(&'a self, country: &'a str) -> impl Iterator<Item = &'a DisplayCustomizationDetail> {
        self.features
            .iter()
            .flat_map(|features| features.values())
            .filter(move |config| config.applies_to(country))
            .filter_map(|config| config.display_customization_detail.as_ref())
            .flatten()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::PaymentExperienceSetting;

    #[test]
    fn features_respect_applicable_markets() {
        let setting = PaymentExperienceSetting::from_json(
            r#"{"template":"defaulttemplate","features":{
                "everywhere":{"applicableMarkets":[]},
                "usOnly":{"applicableMarkets":["US"],"displayCustomizationDetail":[{"removeCancelButton":true}]},
                "unknownKey":{"somethingNew":1}
            }}"#,
        )
        .unwrap();
        assert_eq!(setting.template(), Some("defaulttemplate"));
        assert!(setting.is_feature_enabled("EVERYWHERE", "de"));
        assert!(setting.is_feature_enabled("usOnly", "us"));
        assert!(!setting.is_feature_enabled("usOnly", "de"));
        assert_eq!(setting.customizations("us").count(), 1);
        assert_eq!(setting.customizations("de").count(), 0);
    }

    #[test]
    fn null_features_are_allowed() {
        let setting = PaymentExperienceSetting::from_json(r#"{"template":" ","features":null}"#).unwrap();
        assert_eq!(setting.template(), None);
        assert!(!setting.is_feature_enabled("anything", "us"));
    }
}
