//! The application-level localization handle.

use std::path::Path;
use std::sync::Arc;

use crate::active::{
    ActivationError,
    ActiveLocale,
};
use crate::audit::{
    MissRecord,
    MissRecorder,
};
use crate::bundle::LocaleBundle;
use crate::config::{
    ActivationMode,
    ConfigError,
    EngineSettings,
    MissingKeyPolicy,
};
use crate::coverage::{
    CoverageReport,
    compute_coverage,
};
use crate::fallback::{
    BaseLanguageFallback,
    ConfiguredFallback,
    FallbackStrategy,
    FnFallback,
};
use crate::input::normalizer::NormalizeError;
use crate::input::tree::ResourceTree;
use crate::loader::{
    self,
    LoadError,
};
use crate::registry::BundleRegistry;
use crate::resolver::{
    ResolveError,
    Resolution,
    Resolver,
};
use crate::types::LocaleCode;

/// Owns the bundles, the active locale, and the resolution settings of one
/// application.
///
/// Cloning is cheap and shares state. Separate `Localizer`s are fully
/// isolated from each other.
///
/// ```
/// use locale_engine::{Localizer, LocaleCode, ResourceTree};
/// use serde_json::json;
///
/// let i18n = Localizer::default();
/// i18n.register("en", &ResourceTree::from_value(json!({"basic": {"name": "Name"}}))?)?;
/// i18n.register("zh", &ResourceTree::from_flat([("basic.name", "名称")]))?;
///
/// assert_eq!(i18n.resolve("basic.name", None)?, "Name");
/// assert_eq!(i18n.resolve("basic.name", Some(&LocaleCode::from("zh")))?, "名称");
/// # Ok::<(), locale_engine::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    /// Shared state.
    inner: Arc<Inner>,
}

/// State behind a [`Localizer`].
#[derive(Debug)]
struct Inner {
    /// Validated settings the localizer was built with.
    settings: EngineSettings,
    /// Loaded bundles.
    registry: BundleRegistry,
    /// Locale used when a lookup does not name one.
    active: ActiveLocale,
    /// Chain walking and missing-key policy.
    resolver: Resolver,
    /// Filled only when `recordMisses` is enabled.
    misses: Arc<MissRecorder>,
}

impl Inner {
    /// Wires the components together. `settings` must already be valid.
    fn new(settings: EngineSettings, fallback: Option<Arc<dyn FallbackStrategy>>) -> Self {
        let fallback = fallback.unwrap_or_else(|| default_fallback(&settings));
        let misses = Arc::new(MissRecorder::with_limit(settings.max_recorded_misses));

        let mut resolver =
            Resolver::new(settings.default_locale.clone(), fallback, settings.missing_key_policy)
                .with_missing_default(settings.missing_default.clone());
        if settings.record_misses {
            resolver = resolver.with_miss_recorder(Arc::clone(&misses));
        }

        Self {
            registry: BundleRegistry::new(settings.key_separator.clone()),
            active: ActiveLocale::new(settings.default_locale.clone(), settings.activation_mode),
            resolver,
            misses,
            settings,
        }
    }
}

impl Default for Inner {
    fn default() -> Self {
        Self::new(EngineSettings::default(), None)
    }
}

/// Uses configured chains when there are any, else base-language fallback.
fn default_fallback(settings: &EngineSettings) -> Arc<dyn FallbackStrategy> {
    if settings.fallback.chains.is_empty() && settings.fallback.append_default {
        Arc::new(BaseLanguageFallback)
    } else {
        Arc::new(ConfiguredFallback::from_settings(&settings.fallback))
    }
}

impl Localizer {
    #[must_use]
    pub fn builder() -> LocalizerBuilder {
        LocalizerBuilder::default()
    }

    /// Builds a localizer from `settings`.
    ///
    /// # Errors
    /// Returns `ValidationErrors` if the settings are invalid.
    pub fn new(settings: EngineSettings) -> Result<Self, ConfigError> {
        Self::builder().settings(settings).build()
    }

    /// Merges `tree` into the locale's bundle.
    ///
    /// # Errors
    /// Returns `MalformedResource`; the previous bundle is kept.
    pub fn register(
        &self,
        locale: impl Into<LocaleCode>,
        tree: &ResourceTree,
    ) -> Result<Arc<LocaleBundle>, NormalizeError> {
        self.inner.registry.register(locale, tree)
    }

    /// Replaces the locale's bundle with `tree`.
    ///
    /// # Errors
    /// Returns `MalformedResource`; the previous bundle is kept.
    pub fn replace(
        &self,
        locale: impl Into<LocaleCode>,
        tree: &ResourceTree,
    ) -> Result<Arc<LocaleBundle>, NormalizeError> {
        self.inner.registry.replace(locale, tree)
    }

    pub fn remove(&self, locale: &str) -> Option<Arc<LocaleBundle>> {
        self.inner.registry.remove(locale)
    }

    #[must_use]
    pub fn bundle(&self, locale: &str) -> Option<Arc<LocaleBundle>> {
        self.inner.registry.get(locale)
    }

    /// Registered locales, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<LocaleCode> {
        self.inner.registry.locales()
    }

    /// Resolves `key` for `locale`, or for the active locale when `None`.
    ///
    /// # Errors
    /// Returns `TranslationMissing` only under the `fail` policy.
    pub fn resolve(&self, key: &str, locale: Option<&LocaleCode>) -> Result<String, ResolveError> {
        let locale = self.effective_locale(locale);
        self.inner.resolver.resolve(&self.inner.registry, key, &locale, None)
    }

    /// Like [`Localizer::resolve`], with a caller default for `returnDefault`.
    ///
    /// # Errors
    /// Returns `TranslationMissing` only under the `fail` policy.
    pub fn resolve_or(
        &self,
        key: &str,
        locale: Option<&LocaleCode>,
        default: &str,
    ) -> Result<String, ResolveError> {
        let locale = self.effective_locale(locale);
        self.inner.resolver.resolve(&self.inner.registry, key, &locale, Some(default))
    }

    /// The first hit along the chain, without policy or miss recording.
    #[must_use]
    pub fn lookup(&self, key: &str, locale: Option<&LocaleCode>) -> Option<Resolution> {
        let locale = self.effective_locale(locale);
        self.inner.resolver.lookup(&self.inner.registry, key, &locale)
    }

    /// Whether some locale in the chain has `key`.
    #[must_use]
    pub fn contains(&self, key: &str, locale: Option<&LocaleCode>) -> bool {
        self.lookup(key, locale).is_some()
    }

    /// The fallback chain consulted for `locale`.
    #[must_use]
    pub fn fallback_chain(&self, locale: Option<&LocaleCode>) -> Vec<LocaleCode> {
        self.inner.resolver.chain(&self.effective_locale(locale))
    }

    /// `locale` or the active locale.
    fn effective_locale(&self, locale: Option<&LocaleCode>) -> LocaleCode {
        locale.map_or_else(|| self.inner.active.get(), LocaleCode::clone)
    }

    #[must_use]
    pub fn active_locale(&self) -> LocaleCode {
        self.inner.active.get()
    }

    /// # Errors
    /// Returns `LocaleNotRegistered` in strict mode when no bundle exists.
    pub fn set_active_locale(&self, locale: impl Into<LocaleCode>) -> Result<(), ActivationError> {
        self.inner.active.set(locale, &self.inner.registry)
    }

    /// Recorded misses, sorted by locale then key.
    ///
    /// Grows with every distinct unknown key until [`Localizer::clear_misses`],
    /// up to `maxRecordedMisses` pairs. Past that, new pairs are only counted in
    /// [`Localizer::dropped_misses`].
    #[must_use]
    pub fn misses(&self) -> Vec<MissRecord> {
        self.inner.misses.snapshot()
    }

    /// Misses of new `(locale, key)` pairs turned away by the limit.
    #[must_use]
    pub fn dropped_misses(&self) -> u64 {
        self.inner.misses.dropped()
    }

    pub fn clear_misses(&self) {
        self.inner.misses.clear();
    }

    /// Key coverage of the other locales against `reference`.
    ///
    /// Returns `None` when `reference` is not registered.
    #[must_use]
    pub fn coverage(&self, reference: &LocaleCode) -> Option<CoverageReport> {
        compute_coverage(&self.inner.registry, reference, &self.inner.settings.coverage)
    }

    /// Registers every resource file found under `root`.
    ///
    /// Every file is read and normalized before anything is registered, then
    /// all bundles are merged in path order with a single publication. If any
    /// file fails, the registry is left exactly as it was.
    ///
    /// # Errors
    /// Returns the first discovery, read, parse, or normalization error.
    pub fn load_dir(&self, root: &Path) -> Result<Vec<LocaleCode>, LoadError> {
        let files = loader::discover_resource_files(root, &self.inner.settings.resource_files)?;
        tracing::debug!(root = %root.display(), files = files.len(), "Discovered resource files");

        let separator = self.inner.registry.key_separator();
        let mut bundles = Vec::with_capacity(files.len());
        for path in &files {
            let resource = loader::load_resource_file(root, path)?;
            let bundle = LocaleBundle::from_tree(resource.locale, &resource.tree, separator)
                .map_err(|source| LoadError::Malformed { path: path.clone(), source })?;
            tracing::info!(
                locale = %bundle.locale(),
                path = %path.display(),
                keys = bundle.len(),
                "Loaded resource file"
            );
            bundles.push(bundle);
        }

        let mut loaded: Vec<LocaleCode> = self
            .inner
            .registry
            .register_bundles(bundles)
            .iter()
            .map(|bundle| bundle.locale().clone())
            .collect();
        loaded.sort_unstable();
        Ok(loaded)
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.inner.settings
    }

    #[must_use]
    pub fn registry(&self) -> &BundleRegistry {
        &self.inner.registry
    }
}

/// Builds a [`Localizer`].
///
/// Starts from [`EngineSettings::default`]; individual setters override single
/// fields of whatever settings are current.
#[derive(Default)]
pub struct LocalizerBuilder {
    /// Settings to validate and use.
    settings: EngineSettings,
    /// Overrides the strategy derived from `settings.fallback`.
    fallback: Option<Arc<dyn FallbackStrategy>>,
}

impl LocalizerBuilder {
    #[must_use]
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn default_locale(mut self, locale: impl Into<LocaleCode>) -> Self {
        self.settings.default_locale = locale.into();
        self
    }

    #[must_use]
    pub fn missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.settings.missing_key_policy = policy;
        self
    }

    #[must_use]
    pub fn missing_default(mut self, text: impl Into<String>) -> Self {
        self.settings.missing_default = Some(text.into());
        self
    }

    #[must_use]
    pub fn activation_mode(mut self, mode: ActivationMode) -> Self {
        self.settings.activation_mode = mode;
        self
    }

    #[must_use]
    pub fn key_separator(mut self, separator: impl Into<String>) -> Self {
        self.settings.key_separator = separator.into();
        self
    }

    #[must_use]
    pub fn record_misses(mut self, enabled: bool) -> Self {
        self.settings.record_misses = enabled;
        self
    }

    #[must_use]
    pub fn max_recorded_misses(mut self, limit: usize) -> Self {
        self.settings.max_recorded_misses = limit;
        self
    }

    #[must_use]
    pub fn fallback_strategy(mut self, strategy: impl FallbackStrategy + 'static) -> Self {
        self.fallback = Some(Arc::new(strategy));
        self
    }

    /// Uses `chain` as the fallback strategy. Its result is used as-is; the
    /// default locale is not appended.
    #[must_use]
    pub fn fallback_fn<F>(self, chain: F) -> Self
    where
        F: Fn(&LocaleCode) -> Vec<LocaleCode> + Send + Sync + 'static,
    {
        self.fallback_strategy(FnFallback::new(chain))
    }

    /// # Errors
    /// Returns `ValidationErrors` if the settings are invalid.
    pub fn build(self) -> Result<Localizer, ConfigError> {
        self.settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(
            default_locale = %self.settings.default_locale,
            policy = ?self.settings.missing_key_policy,
            mode = ?self.settings.activation_mode,
            "Building localizer"
        );
        Ok(Localizer { inner: Arc::new(Inner::new(self.settings, self.fallback)) })
    }
}

impl std::fmt::Debug for LocalizerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizerBuilder")
            .field("settings", &self.settings)
            .field("custom_fallback", &self.fallback.is_some())
            .finish()
    }
}
