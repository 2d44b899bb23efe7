// crates/pidl-core/src/runtime/dictionary.rs
// ============================================================================
// Module: PIDL Dictionary Store
// Description: Named and inline ordered dictionaries for possible values.
// Purpose: Resolve `possible_values` tokens into ordered key/value maps.
// Dependencies: crate::core::ordered_map, thiserror, time
// ============================================================================

//! ## Overview
//! Dictionary tokens come in two shapes. A token starting with `{}` names a
//! registered dictionary (`{}Months`). Any other token is an inline list of
//! `name=value` pairs separated by `;`; a pair without `=` uses the value as
//! its own name.
//!
//! Derived dictionaries are declared once as a digit-count transform over
//! another dictionary's keys. The year-expiry window is generated from an
//! injected calendar date so resolution stays deterministic in tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::collections::BTreeMap;

use thiserror::Error;
use time::Date;
use time::Month;

use crate::core::ordered_map::OrderedMap;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix that marks a named dictionary token.
pub const NAMED_DICTIONARY_PREFIX: &str = "{}";

/// Two-digit expiry years.
pub const YEARS_EXPIRY: &str = "YearsExpiry";

/// Four-digit expiry years.
pub const YEARS_EXPIRY_4_DIGIT: &str = "YearsExpiry4Digit";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dictionary lookup and build failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// No dictionary is registered under the name.
    #[error("dictionary config not found: {0}")]
    ConfigNotFound(String),
    /// Malformed inline token or dictionary declaration.
    #[error("invalid dictionary config: {0}")]
    InvalidConfig(String),
    /// Empty token.
    #[error("dictionary token is empty")]
    EmptyToken,
}

// ============================================================================
// SECTION: Year Window
// ============================================================================

/// Expiry-year window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    /// Number of consecutive years.
    pub length: u16,
    /// Years before the current year where the window starts.
    pub years_back: u16,
    /// Month of the grace cutoff.
    pub grace_month: Month,
    /// Day of the grace cutoff.
    pub grace_day: u8,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            length: 25,
            years_back: 2,
            grace_month: Month::February,
            grace_day: 1,
        }
    }
}

impl YearWindow {
    /// Returns the 4-digit years of the window for `today`, ascending.
    ///
    /// The window starts `years_back` years ago and moves forward by one year
    /// once `today` reaches the grace cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::InvalidConfig`] when the cutoff is not a
    /// calendar date or the window is empty.
    pub fn years(&self, today: Date) -> Result<Vec<String>, DictionaryError> {
        if self.length == 0 {
            return Err(DictionaryError::InvalidConfig("year window length must be positive".to_string()));
        }
        let cutoff = Date::from_calendar_date(today.year(), self.grace_month, self.grace_day)
            .map_err(|err| DictionaryError::InvalidConfig(format!("grace cutoff: {err}")))?;
        let mut start = today.year() - i32::from(self.years_back);
        if today >= cutoff {
            start += 1;
        }
        Ok((0..i32::from(self.length)).map(|offset| format!("{:04}", start + offset)).collect())
    }
}

// ============================================================================
// SECTION: Definitions
// ============================================================================

/// Declaration of one named dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryDefinition {
    /// Authored entries.
    Authored(OrderedMap<String>),
    /// Expiry-year window keyed by 4-digit year.
    YearWindow {
        /// Characters kept from each year for the value.
        digits: usize,
    },
    /// Keys of `base`, with values set to the last `digits` characters of each key.
    DigitSuffix {
        /// Source dictionary name.
        base: String,
        /// Characters kept from each key.
        digits: usize,
    },
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Materialized named dictionaries.
///
/// # Invariants
/// - Every named dictionary is materialized at build time.
/// - Entry order is declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryStore {
    /// Dictionaries by name.
    dictionaries: BTreeMap<String, OrderedMap<String>>,
}

impl DictionaryStore {
    /// Starts a builder anchored at `today`.
    #[must_use]
    pub fn builder(today: Date, window: YearWindow) -> DictionaryStoreBuilder {
        DictionaryStoreBuilder {
            today,
            window,
            definitions: Vec::new(),
        }
    }

    /// Resolves a dictionary token.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::EmptyToken`] for blank tokens,
    /// [`DictionaryError::ConfigNotFound`] for unknown names, and
    /// [`DictionaryError::InvalidConfig`] for malformed inline lists.
    pub fn get_dictionary(&self, token: &str) -> Result<Cow<'_, OrderedMap<String>>, DictionaryError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DictionaryError::EmptyToken);
        }
        if let Some(name) = token.strip_prefix(NAMED_DICTIONARY_PREFIX) {
            return self
                .dictionaries
                .get(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| DictionaryError::ConfigNotFound(name.to_string()));
        }
        parse_inline(token).map(Cow::Owned)
    }

    /// Returns true when a named dictionary exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.dictionaries.contains_key(name)
    }

    /// Iterates over dictionary names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }
}

/// Builder for [`DictionaryStore`].
#[derive(Debug, Clone)]
pub struct DictionaryStoreBuilder {
    /// Anchor date for generated windows.
    today: Date,
    /// Year window parameters.
    window: YearWindow,
    /// Declarations in order.
    definitions: Vec<(String, DictionaryDefinition)>,
}

impl DictionaryStoreBuilder {
    /// Declares a dictionary.
    #[must_use]
    pub fn define(mut self, name: impl Into<String>, definition: DictionaryDefinition) -> Self {
        self.definitions.push((name.into(), definition));
        self
    }

    /// Declares an authored dictionary from pairs.
    #[must_use]
    pub fn authored<K, V>(self, name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        self.define(name, DictionaryDefinition::Authored(map))
    }

    /// Declares the standard 2- and 4-digit expiry-year dictionaries.
    #[must_use]
    pub fn expiry_years(self) -> Self {
        self.define(YEARS_EXPIRY, DictionaryDefinition::YearWindow {
            digits: 2,
        })
        .define(YEARS_EXPIRY_4_DIGIT, DictionaryDefinition::DigitSuffix {
            base: YEARS_EXPIRY.to_string(),
            digits: 4,
        })
    }

    /// Materializes every declaration.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::InvalidConfig`] for duplicate names,
    /// derived dictionaries declared before their base, and invalid windows.
    pub fn build(self) -> Result<DictionaryStore, DictionaryError> {
        let mut dictionaries: BTreeMap<String, OrderedMap<String>> = BTreeMap::new();
        for (name, definition) in self.definitions {
            if dictionaries.contains_key(&name) {
                return Err(DictionaryError::InvalidConfig(format!("duplicate dictionary: {name}")));
            }
            let map = match definition {
                DictionaryDefinition::Authored(map) => map,
                DictionaryDefinition::YearWindow {
                    digits,
                } => suffix_values(self.window.years(self.today)?.iter().map(String::as_str), digits),
                DictionaryDefinition::DigitSuffix {
                    base,
                    digits,
                } => {
                    let source = dictionaries.get(&base).ok_or_else(|| {
                        DictionaryError::InvalidConfig(format!("{name} derives from undeclared {base}"))
                    })?;
                    suffix_values(source.keys().map(String::as_str), digits)
                }
            };
            dictionaries.insert(name, map);
        }
        Ok(DictionaryStore {
            dictionaries,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses an inline `name=value;name=value` token.
///
/// # Errors
///
/// Returns [`DictionaryError::InvalidConfig`] when a pair holds more than one
/// `=`, or a name or value is empty.
pub fn parse_inline(token: &str) -> Result<OrderedMap<String>, DictionaryError> {
    let mut map = OrderedMap::new();
    for pair in token.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
        let mut parts = pair.split('=');
        let (name, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(value), None, None) => (value, value),
            (Some(name), Some(value), None) => (name.trim(), value.trim()),
            _ => return Err(DictionaryError::InvalidConfig(format!("pair has more than one '=': {pair}"))),
        };
        if name.is_empty() || value.is_empty() {
            return Err(DictionaryError::InvalidConfig(format!("empty name or value: {pair}")));
        }
        map.insert(name.to_string(), value.to_string());
    }
    if map.is_empty() {
        return Err(DictionaryError::EmptyToken);
    }
    Ok(map)
}

/// Maps keys to their last `digits` characters.
fn suffix_values<'a>(keys: impl Iterator<Item = &'a str>, digits: usize) -> OrderedMap<String> {
    keys.map(|key| {
        let skip = key.chars().count().saturating_sub(digits);
        (key.to_string(), key.chars().skip(skip).collect::<String>())
    })
    .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
