//! Registry of loaded locale bundles.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::bundle::LocaleBundle;
use crate::input::normalizer::NormalizeError;
use crate::input::tree::ResourceTree;
use crate::types::LocaleCode;

/// An immutable view of every registered bundle.
pub type RegistrySnapshot = HashMap<LocaleCode, Arc<LocaleBundle>>;

/// All loaded locale bundles, keyed by locale code.
///
/// # Concurrency
///
/// Readers load the current snapshot without locking and never observe a
/// partially merged bundle. Writers are serialized by `write_lock`, build the
/// next snapshot off to the side, then publish it with a single store.
pub struct BundleRegistry {
    /// Published snapshot.
    bundles: ArcSwap<RegistrySnapshot>,
    /// Serializes register / replace / remove.
    write_lock: Mutex<()>,
    /// Separator used to join nested keys.
    key_separator: String,
}

impl BundleRegistry {
    #[must_use]
    pub fn new(key_separator: impl Into<String>) -> Self {
        Self {
            bundles: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(()),
            key_separator: key_separator.into(),
        }
    }

    /// Normalizes `tree` and merges it into the locale's bundle.
    ///
    /// New keys are added, existing keys are overwritten, and keys absent from
    /// `tree` are kept. A malformed tree leaves the registry untouched.
    ///
    /// # Errors
    /// Returns `MalformedResource` if the tree cannot be normalized.
    pub fn register(
        &self,
        locale: impl Into<LocaleCode>,
        tree: &ResourceTree,
    ) -> Result<Arc<LocaleBundle>, NormalizeError> {
        let locale = locale.into();
        let incoming = LocaleBundle::from_tree(locale.clone(), tree, &self.key_separator)?;

        let bundle = self.update(|bundles| {
            let bundle = Arc::new(match bundles.get(&locale) {
                Some(existing) => existing.merged_with(incoming),
                None => incoming,
            });
            bundles.insert(locale.clone(), Arc::clone(&bundle));
            bundle
        });

        tracing::debug!(
            %locale,
            entries = bundle.len(),
            shape = %bundle.shape(),
            "Registered bundle"
        );
        Ok(bundle)
    }

    /// Normalizes `tree` and swaps it in, discarding the previous bundle.
    ///
    /// # Errors
    /// Returns `MalformedResource` if the tree cannot be normalized. The
    /// previous bundle stays in place in that case.
    pub fn replace(
        &self,
        locale: impl Into<LocaleCode>,
        tree: &ResourceTree,
    ) -> Result<Arc<LocaleBundle>, NormalizeError> {
        let locale = locale.into();
        let bundle =
            Arc::new(LocaleBundle::from_tree(locale.clone(), tree, &self.key_separator)?);

        self.update(|bundles| bundles.insert(locale.clone(), Arc::clone(&bundle)));

        tracing::debug!(
            %locale,
            entries = bundle.len(),
            shape = %bundle.shape(),
            "Replaced bundle"
        );
        Ok(bundle)
    }

    /// Merges already normalized bundles into the registry in one publication.
    ///
    /// Readers see either none or all of `bundles`. Bundles for the same
    /// locale are layered in order.
    pub fn register_bundles(
        &self,
        bundles: impl IntoIterator<Item = LocaleBundle>,
    ) -> Vec<Arc<LocaleBundle>> {
        let merged = self.update(|current| {
            let mut touched: Vec<LocaleCode> = Vec::new();
            for incoming in bundles {
                let locale = incoming.locale().clone();
                let bundle = match current.get(&locale) {
                    Some(existing) => existing.merged_with(incoming),
                    None => incoming,
                };
                current.insert(locale.clone(), Arc::new(bundle));
                if !touched.contains(&locale) {
                    touched.push(locale);
                }
            }
            touched.iter().filter_map(|locale| current.get(locale).cloned()).collect::<Vec<_>>()
        });

        for bundle in &merged {
            tracing::debug!(locale = %bundle.locale(), entries = bundle.len(), "Registered bundle");
        }
        merged
    }

    /// Removes the locale's bundle, returning it if one was registered.
    pub fn remove(&self, locale: &str) -> Option<Arc<LocaleBundle>> {
        let removed = self.update(|bundles| bundles.remove(locale));
        if removed.is_some() {
            tracing::debug!(locale, "Removed bundle");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, locale: &str) -> Option<Arc<LocaleBundle>> {
        self.bundles.load().get(locale).cloned()
    }

    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.bundles.load().contains_key(locale)
    }

    /// Registered locale codes in sorted order.
    #[must_use]
    pub fn locales(&self) -> Vec<LocaleCode> {
        let mut locales: Vec<LocaleCode> = self.bundles.load().keys().cloned().collect();
        locales.sort_unstable();
        locales
    }

    /// Current snapshot. Stays consistent however the registry changes later.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.bundles.load_full()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.load().is_empty()
    }

    #[must_use]
    pub fn key_separator(&self) -> &str {
        &self.key_separator
    }

    /// Applies `apply` to a copy of the current snapshot and publishes it.
    fn update<R>(&self, apply: impl FnOnce(&mut RegistrySnapshot) -> R) -> R {
        let _guard = self.write_lock.lock();
        let mut next = RegistrySnapshot::clone(&self.bundles.load_full());
        let result = apply(&mut next);
        self.bundles.store(Arc::new(next));
        result
    }
}

impl Default for BundleRegistry {
    fn default() -> Self {
        Self::new(".")
    }
}

impl std::fmt::Debug for BundleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleRegistry")
            .field("locales", &self.locales())
            .field("key_separator", &self.key_separator)
            .finish_non_exhaustive()
    }
}
