//! Normalized, immutable translations for one locale.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::input::normalizer::{
    NormalizeError,
    normalize,
};
use crate::input::tree::ResourceTree;
use crate::types::{
    LocaleCode,
    SourceShape,
};

/// The normalized translations of one locale.
///
/// Never mutated after construction. Updating a locale builds a new bundle
/// and swaps it into the registry.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    /// Locale the entries belong to.
    locale: LocaleCode,
    /// Canonical key → translated string.
    entries: HashMap<String, String>,
    /// Shape of the most recently loaded tree.
    shape: SourceShape,
    /// When the most recent tree was normalized.
    loaded_at: SystemTime,
}

impl LocaleBundle {
    /// Normalizes `tree` into a new bundle.
    ///
    /// # Errors
    /// Returns `MalformedResource` if the tree cannot be normalized.
    pub fn from_tree(
        locale: LocaleCode,
        tree: &ResourceTree,
        separator: &str,
    ) -> Result<Self, NormalizeError> {
        let entries = normalize(tree, separator)?;
        Ok(Self { locale, entries, shape: tree.shape(separator), loaded_at: SystemTime::now() })
    }

    /// Layers `incoming` over this bundle.
    ///
    /// Keys from `incoming` win; keys only present here are kept. Shape and
    /// timestamp come from `incoming`.
    #[must_use]
    pub fn merged_with(&self, incoming: Self) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(incoming.entries);
        Self {
            locale: incoming.locale,
            entries,
            shape: incoming.shape,
            loaded_at: incoming.loaded_at,
        }
    }

    #[must_use]
    pub const fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    #[must_use]
    pub const fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    #[must_use]
    pub const fn shape(&self) -> SourceShape {
        self.shape
    }

    #[must_use]
    pub const fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Canonical keys in sorted order.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
