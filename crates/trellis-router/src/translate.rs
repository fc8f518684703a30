//! Locale translation of route segments and parameters.

use std::collections::HashMap;

/// Maps between canonical route keys and locale-specific path text.
///
/// Routes reference translations in two places: `/@key` literal segments
/// and `:@name` translated parameters. Both are decoded with [`key_for`]
/// when matching and encoded with [`value_for`] when assembling.
///
/// [`key_for`]: RouteTranslator::key_for
/// [`value_for`]: RouteTranslator::value_for
pub trait RouteTranslator: Send + Sync {
    /// Returns the localized path text for a canonical key.
    fn value_for(&self, key: &str) -> Option<String>;

    /// Returns the canonical key for localized path text.
    fn key_for(&self, value: &str) -> Option<String>;
}

/// Bidirectional map-backed translator.
///
/// # Example
///
/// ```
/// use trellis_router::{MapTranslator, RouteTranslator};
///
/// let translator = MapTranslator::new().entry("info", "informatie");
/// assert_eq!(translator.value_for("info"), Some("informatie".to_string()));
/// assert_eq!(translator.key_for("informatie"), Some("info".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    values: HashMap<String, String>,
    keys: HashMap<String, String>,
}

impl MapTranslator {
    /// Creates an empty translator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key/value pair.
    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        self.keys.insert(value.clone(), key.clone());
        self.values.insert(key, value);
        self
    }
}

impl RouteTranslator for MapTranslator {
    fn value_for(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn key_for(&self, value: &str) -> Option<String> {
        self.keys.get(value).cloned()
    }
}
