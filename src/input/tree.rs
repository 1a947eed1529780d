//! In-memory resource trees as handed over by a loader.

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use super::normalizer::{
    MalformedReason,
    NormalizeError,
};
use crate::types::SourceShape;

/// Path reported for errors about the tree root itself.
pub(crate) const ROOT_PATH: &str = "(root)";

/// One locale's translations in the shape they were authored in.
///
/// Either nested (`{"basic": {"name": "Name"}}`), flat
/// (`{"basic.name": "名称"}`), or a mix of both. The shape only matters until
/// the tree is normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTree(Map<String, Value>);

impl ResourceTree {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a parsed JSON value. The root must be an object.
    ///
    /// # Errors
    /// Returns `MalformedResource` when the root is not an object.
    pub fn from_value(value: Value) -> Result<Self, NormalizeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NormalizeError::MalformedResource {
                path: ROOT_PATH.to_string(),
                reason: MalformedReason::UnsupportedValue(value_kind(&other)),
            }),
        }
    }

    /// Builds a flat tree from already-joined keys.
    pub fn from_flat<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(entries.into_iter().map(|(k, v)| (k.into(), Value::String(v.into()))).collect())
    }

    /// Inserts a top-level entry, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Detects the authored shape.
    ///
    /// A tree without nested objects is flat even when none of its keys
    /// contain `separator` (e.g. `{"save": "Save"}`).
    #[must_use]
    pub fn shape(&self, separator: &str) -> SourceShape {
        let has_nested = self.0.values().any(Value::is_object);
        let has_joined = self.0.keys().any(|key| key.contains(separator));

        match (has_nested, has_joined) {
            (true, true) => SourceShape::Mixed,
            (true, false) => SourceShape::Nested,
            (false, _) => SourceShape::Flat,
        }
    }
}

impl From<Map<String, Value>> for ResourceTree {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ResourceTree {
    type Error = NormalizeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// JSON type name used in error messages.
pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
