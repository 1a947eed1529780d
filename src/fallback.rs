//! Fallback chain construction.

use std::collections::{
    HashMap,
    HashSet,
};

use crate::config::FallbackSettings;
use crate::types::LocaleCode;

/// Builds the ordered list of locales consulted for a lookup.
pub trait FallbackStrategy: Send + Sync {
    /// Returns the chain for `locale`; `default_locale` is the configured default.
    fn chain(&self, locale: &LocaleCode, default_locale: &LocaleCode) -> Vec<LocaleCode>;
}

/// `[locale, base language of locale, default locale]`.
///
/// `fr-FR` with default `en` yields `[fr-FR, fr, en]`; `zh` yields `[zh, en]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseLanguageFallback;

impl FallbackStrategy for BaseLanguageFallback {
    fn chain(&self, locale: &LocaleCode, default_locale: &LocaleCode) -> Vec<LocaleCode> {
        dedup([Some(locale.clone()), locale.base_language(), Some(default_locale.clone())]
            .into_iter()
            .flatten())
    }
}

/// Per-locale chains from settings.
///
/// Locales without a configured chain use `[locale, base language]`. The
/// default locale is appended to every chain when `append_default` is set.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredFallback {
    /// Locales consulted after the keyed locale itself.
    chains: HashMap<LocaleCode, Vec<LocaleCode>>,
    /// Push the default locale onto every chain.
    append_default: bool,
}

impl ConfiguredFallback {
    #[must_use]
    pub const fn new(chains: HashMap<LocaleCode, Vec<LocaleCode>>, append_default: bool) -> Self {
        Self { chains, append_default }
    }

    #[must_use]
    pub fn from_settings(settings: &FallbackSettings) -> Self {
        Self::new(settings.chains.clone(), settings.append_default)
    }
}

impl FallbackStrategy for ConfiguredFallback {
    fn chain(&self, locale: &LocaleCode, default_locale: &LocaleCode) -> Vec<LocaleCode> {
        let mut chain = vec![locale.clone()];
        match self.chains.get(locale) {
            Some(configured) => chain.extend(configured.iter().cloned()),
            None => chain.extend(locale.base_language()),
        }
        if self.append_default {
            chain.push(default_locale.clone());
        }
        dedup(chain)
    }
}

/// A strategy backed by a closure. The closure's chain is used as-is
/// (duplicates removed); the default locale is not appended.
pub struct FnFallback<F>(
    /// Builds the chain for a locale.
    F,
);

impl<F> FnFallback<F>
where
    F: Fn(&LocaleCode) -> Vec<LocaleCode> + Send + Sync,
{
    #[must_use]
    pub const fn new(chain: F) -> Self {
        Self(chain)
    }
}

impl<F> FallbackStrategy for FnFallback<F>
where
    F: Fn(&LocaleCode) -> Vec<LocaleCode> + Send + Sync,
{
    fn chain(&self, locale: &LocaleCode, _default_locale: &LocaleCode) -> Vec<LocaleCode> {
        dedup((self.0)(locale))
    }
}

impl<F> std::fmt::Debug for FnFallback<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnFallback").field(&"<fn>").finish()
    }
}

/// Drops repeated locales, keeping the first occurrence.
fn dedup(chain: impl IntoIterator<Item = LocaleCode>) -> Vec<LocaleCode> {
    let mut seen = HashSet::new();
    chain.into_iter().filter(|locale| seen.insert(locale.clone())).collect()
}
