//! The active locale.

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::config::ActivationMode;
use crate::registry::BundleRegistry;
use crate::types::LocaleCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    #[error("Locale '{0}' is not registered")]
    LocaleNotRegistered(LocaleCode),
}

/// Holds the locale used when a lookup does not name one.
///
/// Reads never block; a change is visible to every lookup that starts after
/// `set` returns.
#[derive(Debug)]
pub struct ActiveLocale {
    /// Current locale.
    current: ArcSwap<LocaleCode>,
    /// Whether `set` requires a registered bundle.
    mode: ActivationMode,
}

impl ActiveLocale {
    /// The initial locale is not checked against the registry.
    #[must_use]
    pub fn new(initial: LocaleCode, mode: ActivationMode) -> Self {
        Self { current: ArcSwap::from_pointee(initial), mode }
    }

    #[must_use]
    pub fn get(&self) -> LocaleCode {
        LocaleCode::clone(&self.current.load())
    }

    #[must_use]
    pub const fn mode(&self) -> ActivationMode {
        self.mode
    }

    /// Makes `locale` the active locale.
    ///
    /// # Errors
    /// Returns `LocaleNotRegistered` in strict mode when `registry` has no
    /// bundle for `locale`. The active locale is unchanged in that case.
    pub fn set(
        &self,
        locale: impl Into<LocaleCode>,
        registry: &BundleRegistry,
    ) -> Result<(), ActivationError> {
        let locale = locale.into();
        if self.mode == ActivationMode::Strict && !registry.contains(locale.as_str()) {
            tracing::warn!(%locale, "Refusing to activate unregistered locale");
            return Err(ActivationError::LocaleNotRegistered(locale));
        }

        let previous = self.current.swap(Arc::new(locale.clone()));
        tracing::debug!(from = %previous, to = %locale, "Active locale changed");
        Ok(())
    }
}
