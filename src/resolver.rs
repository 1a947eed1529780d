//! Key resolution across a fallback chain.

use std::sync::Arc;

use thiserror::Error;

use crate::audit::MissRecorder;
use crate::config::MissingKeyPolicy;
use crate::fallback::FallbackStrategy;
use crate::registry::BundleRegistry;
use crate::types::LocaleCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Only raised under [`MissingKeyPolicy::Fail`].
    #[error("Translation missing for key '{key}' in locale '{locale}'")]
    TranslationMissing { locale: LocaleCode, key: String },
}

/// A translated string and the locale in the chain that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub locale: LocaleCode,
}

/// Resolves keys against a registry.
///
/// Holds everything that is fixed per application: the default locale, the
/// fallback strategy, the missing-key policy, and where misses are recorded.
pub struct Resolver {
    /// Last entry of every chain built by the default strategies.
    default_locale: LocaleCode,
    /// Builds the chain for an effective locale.
    fallback: Arc<dyn FallbackStrategy>,
    /// Applied uniformly to every miss.
    policy: MissingKeyPolicy,
    /// Returned by `returnDefault` when the caller supplies nothing.
    missing_default: Option<String>,
    /// `None` disables miss recording.
    misses: Option<Arc<MissRecorder>>,
}

impl Resolver {
    #[must_use]
    pub fn new(
        default_locale: LocaleCode,
        fallback: Arc<dyn FallbackStrategy>,
        policy: MissingKeyPolicy,
    ) -> Self {
        Self { default_locale, fallback, policy, missing_default: None, misses: None }
    }

    #[must_use]
    pub fn with_missing_default(mut self, missing_default: Option<String>) -> Self {
        self.missing_default = missing_default;
        self
    }

    #[must_use]
    pub fn with_miss_recorder(mut self, misses: Arc<MissRecorder>) -> Self {
        self.misses = Some(misses);
        self
    }

    #[must_use]
    pub const fn default_locale(&self) -> &LocaleCode {
        &self.default_locale
    }

    #[must_use]
    pub const fn policy(&self) -> MissingKeyPolicy {
        self.policy
    }

    /// The chain consulted for `locale`.
    #[must_use]
    pub fn chain(&self, locale: &LocaleCode) -> Vec<LocaleCode> {
        self.fallback.chain(locale, &self.default_locale)
    }

    /// Walks the chain and returns the first hit, without applying the
    /// missing-key policy or recording a miss.
    ///
    /// The whole walk reads a single registry snapshot.
    #[must_use]
    pub fn lookup(
        &self,
        registry: &BundleRegistry,
        key: &str,
        locale: &LocaleCode,
    ) -> Option<Resolution> {
        let snapshot = registry.snapshot();
        self.chain(locale).into_iter().find_map(|candidate| {
            let value = snapshot.get(&candidate)?.get(key)?.to_string();
            Some(Resolution { value, locale: candidate })
        })
    }

    /// Resolves `key` for `locale`, applying the missing-key policy on a miss.
    ///
    /// `default` is only consulted under `returnDefault`.
    ///
    /// # Errors
    /// Returns `TranslationMissing` when the policy is `fail` and no locale in
    /// the chain has the key.
    pub fn resolve(
        &self,
        registry: &BundleRegistry,
        key: &str,
        locale: &LocaleCode,
        default: Option<&str>,
    ) -> Result<String, ResolveError> {
        if let Some(resolution) = self.lookup(registry, key, locale) {
            return Ok(resolution.value);
        }

        tracing::debug!(%locale, key, policy = ?self.policy, "Translation missing");
        if let Some(misses) = &self.misses {
            misses.record(locale, key);
        }

        match self.policy {
            MissingKeyPolicy::ReturnKey => Ok(key.to_string()),
            MissingKeyPolicy::ReturnDefault => {
                Ok(default.or(self.missing_default.as_deref()).unwrap_or(key).to_string())
            }
            MissingKeyPolicy::Fail => Err(ResolveError::TranslationMissing {
                locale: locale.clone(),
                key: key.to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("default_locale", &self.default_locale)
            .field("policy", &self.policy)
            .field("missing_default", &self.missing_default)
            .field("records_misses", &self.misses.is_some())
            .finish_non_exhaustive()
    }
}
