//! Key coverage of registered locales against a reference locale.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::CoverageSettings;
use crate::registry::BundleRegistry;
use crate::types::LocaleCode;

/// Keys one locale lacks or adds relative to the reference.
///
/// Only the locale's own bundle is compared; fallback is not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCoverage {
    pub locale: LocaleCode,
    /// Reference keys absent from this locale, sorted.
    pub missing: Vec<String>,
    /// Keys of this locale absent from the reference, sorted.
    pub extra: Vec<String>,
}

impl LocaleCoverage {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub reference: LocaleCode,
    /// Number of keys in the reference bundle.
    pub total_keys: usize,
    /// One entry per checked locale, sorted by locale.
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// Locales with at least one missing key.
    pub fn incomplete(&self) -> impl Iterator<Item = &LocaleCoverage> {
        self.locales.iter().filter(|coverage| !coverage.is_complete())
    }
}

/// Compares every checked locale in `registry` against `reference`.
///
/// Returns `None` when `reference` is not registered.
#[must_use]
pub fn compute_coverage(
    registry: &BundleRegistry,
    reference: &LocaleCode,
    settings: &CoverageSettings,
) -> Option<CoverageReport> {
    let snapshot = registry.snapshot();
    let reference_bundle = snapshot.get(reference)?;
    let reference_keys: HashSet<&str> =
        reference_bundle.entries().keys().map(String::as_str).collect();

    let mut locales: Vec<LocaleCoverage> = snapshot
        .iter()
        .filter(|(locale, _)| *locale != reference && settings.should_check(locale))
        .map(|(locale, bundle)| {
            let mut missing: Vec<String> = reference_keys
                .iter()
                .filter(|key| !bundle.contains_key(key))
                .map(ToString::to_string)
                .collect();
            missing.sort_unstable();

            let mut extra: Vec<String> = bundle
                .entries()
                .keys()
                .filter(|key| !reference_keys.contains(key.as_str()))
                .cloned()
                .collect();
            extra.sort_unstable();

            LocaleCoverage { locale: locale.clone(), missing, extra }
        })
        .collect();
    locales.sort_by(|a, b| a.locale.cmp(&b.locale));

    tracing::debug!(
        %reference,
        checked = locales.len(),
        incomplete = locales.iter().filter(|c| !c.is_complete()).count(),
        "Computed coverage"
    );

    Some(CoverageReport { reference: reference.clone(), total_keys: reference_keys.len(), locales })
}
