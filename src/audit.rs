//! Records of lookups that found no translation.

use std::collections::HashMap;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use parking_lot::Mutex;
use serde::Serialize;

use crate::types::LocaleCode;

/// A missed `(locale, key)` pair and how often it was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissRecord {
    /// The effective locale of the lookup, before fallback.
    pub locale: LocaleCode,
    pub key: String,
    pub count: u64,
}

/// Distinct `(locale, key)` pairs kept by [`MissRecorder::new`].
pub const DEFAULT_MISS_LIMIT: usize = 10_000;

/// Thread-safe collection of translation misses.
///
/// Recording never changes what a lookup returns. At most `limit` distinct
/// pairs are kept; once full, known pairs still count up and new pairs are
/// only counted in [`MissRecorder::dropped`] until [`MissRecorder::clear`].
#[derive(Debug)]
pub struct MissRecorder {
    /// Hit count per `(locale, key)`.
    misses: Mutex<HashMap<(LocaleCode, String), u64>>,
    /// Maximum number of distinct pairs.
    limit: usize,
    /// Misses of new pairs turned away because the map was full.
    dropped: AtomicU64,
}

impl Default for MissRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MissRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MISS_LIMIT)
    }

    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { misses: Mutex::new(HashMap::new()), limit, dropped: AtomicU64::new(0) }
    }

    pub fn record(&self, locale: &LocaleCode, key: &str) {
        let mut misses = self.misses.lock();
        if let Some(count) = misses.get_mut(&(locale.clone(), key.to_string())) {
            *count = count.saturating_add(1);
            return;
        }

        if misses.len() >= self.limit {
            if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                tracing::warn!(limit = self.limit, %locale, key, "Miss record is full");
            }
            return;
        }
        misses.insert((locale.clone(), key.to_string()), 1);
    }

    /// Misses not recorded because the limit was reached.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// All misses, sorted by locale then key.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MissRecord> {
        let mut records: Vec<MissRecord> = self
            .misses
            .lock()
            .iter()
            .map(|((locale, key), count)| MissRecord {
                locale: locale.clone(),
                key: key.clone(),
                count: *count,
            })
            .collect();
        records.sort_by(|a, b| a.locale.cmp(&b.locale).then_with(|| a.key.cmp(&b.key)));
        records
    }

    pub fn clear(&self) {
        let mut misses = self.misses.lock();
        misses.clear();
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Number of distinct `(locale, key)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.misses.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.misses.lock().is_empty()
    }
}
