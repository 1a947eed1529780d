//! Core types used throughout the project.

use std::borrow::Borrow;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// Locale identifier (e.g. `en`, `zh`, `fr-FR`).
///
/// Compared by exact string equality. No tag negotiation is performed beyond
/// [`LocaleCode::base_language`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleCode(String);

impl LocaleCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the base language of a compound tag.
    ///
    /// # Examples
    /// - `fr-FR` → `Some("fr")`
    /// - `zh_CN` → `Some("zh")`
    /// - `en` → `None`
    #[must_use]
    pub fn base_language(&self) -> Option<Self> {
        let (base, _) = self.0.split_once(['-', '_'])?;
        (!base.is_empty()).then(|| Self(base.to_string()))
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for LocaleCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&LocaleCode> for LocaleCode {
    fn from(code: &LocaleCode) -> Self {
        code.clone()
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocaleCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The shape a resource tree was authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceShape {
    /// Values are strings or nested objects.
    Nested,
    /// Keys are already joined paths and every value is a string.
    Flat,
    /// Both nested objects and joined-path keys at the top level.
    Mixed,
}

impl fmt::Display for SourceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nested => "nested",
            Self::Flat => "flat",
            Self::Mixed => "mixed",
        };
        f.write_str(name)
    }
}
