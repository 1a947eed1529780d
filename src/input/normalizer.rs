//! Resource tree normalization into canonical dot-joined keys.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::tree::{
    ResourceTree,
    value_kind,
};

/// Errors raised while normalizing a resource tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Malformed resource at '{path}': {reason}")]
    MalformedResource { path: String, reason: MalformedReason },
}

/// Why a resource tree was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// A value that is neither a string nor an object.
    UnsupportedValue(&'static str),
    /// Two paths collapsed onto the same canonical key with different values.
    DuplicateKey { existing: String, conflicting: String },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedValue(kind) => {
                write!(f, "expected a string or an object, found {kind}")
            }
            Self::DuplicateKey { existing, conflicting } => {
                write!(f, "duplicate key with conflicting values ({existing:?} vs {conflicting:?})")
            }
        }
    }
}

/// Normalize a resource tree into a flat `canonical key -> string` map.
///
/// Nested objects are joined with `separator`; keys that are already joined
/// pass through unchanged, so nested and flat trees holding the same strings
/// normalize identically.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use locale_engine::ResourceTree;
/// use locale_engine::input::normalizer::normalize;
///
/// let tree = ResourceTree::from_value(json!({
///     "basic": {
///         "name": "Name",
///         "namePlaceholder": "Input the name of pingap process"
///     },
///     "form.remove": "Remove"
/// }))
/// .unwrap();
///
/// let entries = normalize(&tree, ".").unwrap();
/// assert_eq!(entries.get("basic.name"), Some(&"Name".to_string()));
/// assert_eq!(entries.get("form.remove"), Some(&"Remove".to_string()));
/// ```
///
/// # Errors
/// Returns `MalformedResource` when a leaf is not a string, or when two
/// different values end up under the same canonical key.
pub fn normalize(
    tree: &ResourceTree,
    separator: &str,
) -> Result<HashMap<String, String>, NormalizeError> {
    let mut result = HashMap::with_capacity(tree.len());
    for (key, value) in tree.as_map() {
        normalize_value(value, separator, key, &mut result)?;
    }
    tracing::trace!(entries = result.len(), "Normalized resource tree");
    Ok(result)
}

/// Walks `value`, emitting a canonical key for every string leaf under `path`.
fn normalize_value(
    value: &Value,
    separator: &str,
    path: &str,
    result: &mut HashMap<String, String>,
) -> Result<(), NormalizeError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key = format!("{path}{separator}{key}");
                normalize_value(child, separator, &full_key, result)?;
            }
            Ok(())
        }
        Value::String(s) => insert_unique(result, path, s),
        other => Err(NormalizeError::MalformedResource {
            path: path.to_string(),
            reason: MalformedReason::UnsupportedValue(value_kind(other)),
        }),
    }
}

/// Identical values under one key are tolerated; differing ones are not.
fn insert_unique(
    result: &mut HashMap<String, String>,
    key: &str,
    value: &str,
) -> Result<(), NormalizeError> {
    match result.entry(key.to_string()) {
        Entry::Occupied(existing) if existing.get() != value => {
            Err(NormalizeError::MalformedResource {
                path: key.to_string(),
                reason: MalformedReason::DuplicateKey {
                    existing: existing.get().clone(),
                    conflicting: value.to_string(),
                },
            })
        }
        Entry::Occupied(_) => Ok(()),
        Entry::Vacant(slot) => {
            slot.insert(value.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn tree(value: Value) -> ResourceTree {
        ResourceTree::from_value(value).unwrap()
    }

    #[googletest::test]
    fn test_normalize_nested() {
        let tree = tree(json!({
            "nav": {
                "basic": "Basic",
                "server": "Server"
            },
            "basic": {
                "namePlaceholder": "Input the name of pingap process"
            }
        }));

        let result = normalize(&tree, ".").unwrap();

        expect_that!(result.get("nav.basic"), some(eq(&"Basic".to_string())));
        expect_that!(result.get("nav.server"), some(eq(&"Server".to_string())));
        expect_that!(
            result.get("basic.namePlaceholder"),
            some(eq(&"Input the name of pingap process".to_string()))
        );
        expect_that!(result.len(), eq(3));
    }

    #[googletest::test]
    fn test_normalize_deep_nested() {
        let tree = tree(json!({"a": {"b": {"c": "Deep value"}}}));

        let result = normalize(&tree, ".").unwrap();

        expect_that!(result.get("a.b.c"), some(eq(&"Deep value".to_string())));
        expect_that!(result.len(), eq(1));
    }

    #[googletest::test]
    fn test_normalize_flat_is_pass_through() {
        let flat = tree(json!({
            "basic.name": "名称",
            "form.remove": "删除",
            "save": "保存"
        }));

        let result = normalize(&flat, ".").unwrap();

        let expected: HashMap<String, String> = flat
            .as_map()
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
            .collect();
        assert_eq!(result, expected);
    }

    #[googletest::test]
    fn test_normalize_nested_and_flat_are_equivalent() {
        let nested = tree(json!({
            "basic": {"name": "Name", "threads": "Threads"},
            "nav": {"plugin": "Plugin"},
            "save": "Save"
        }));
        let flat = tree(json!({
            "basic.name": "Name",
            "basic.threads": "Threads",
            "nav.plugin": "Plugin",
            "save": "Save"
        }));

        assert_eq!(normalize(&nested, ".").unwrap(), normalize(&flat, ".").unwrap());
    }

    #[googletest::test]
    fn test_normalize_custom_separator() {
        let tree = tree(json!({"common": {"hello": "Hello"}}));

        let result = normalize(&tree, "_").unwrap();

        expect_that!(result.get("common_hello"), some(eq(&"Hello".to_string())));
    }

    #[googletest::test]
    fn test_normalize_empty_object_contributes_nothing() {
        let tree = tree(json!({"empty": {}, "save": "Save"}));

        let result = normalize(&tree, ".").unwrap();

        expect_that!(result.len(), eq(1));
    }

    #[rstest]
    #[case::number(json!({"basic": {"threads": 4}}), "basic.threads", "number")]
    #[case::boolean(json!({"enabled": true}), "enabled", "boolean")]
    #[case::null(json!({"basic": {"name": null}}), "basic.name", "null")]
    #[case::array(json!({"items": ["a", "b"]}), "items", "array")]
    fn test_normalize_rejects_unsupported_leaf(
        #[case] value: Value,
        #[case] path: &str,
        #[case] kind: &'static str,
    ) {
        let result = normalize(&tree(value), ".");

        assert_eq!(
            result,
            Err(NormalizeError::MalformedResource {
                path: path.to_string(),
                reason: MalformedReason::UnsupportedValue(kind),
            })
        );
    }

    #[googletest::test]
    fn test_normalize_rejects_conflicting_duplicate() {
        let tree = tree(json!({
            "form": {"remove": "Remove"},
            "form.remove": "Delete"
        }));

        let result = normalize(&tree, ".");

        let Err(NormalizeError::MalformedResource { path, reason }) = result else {
            panic!("expected a malformed resource error");
        };
        expect_that!(path, eq("form.remove"));
        expect_that!(matches!(reason, MalformedReason::DuplicateKey { .. }), eq(true));
    }

    #[googletest::test]
    fn test_normalize_accepts_identical_duplicate() {
        let tree = tree(json!({
            "form": {"remove": "Remove"},
            "form.remove": "Remove"
        }));

        let result = normalize(&tree, ".").unwrap();

        expect_that!(result.get("form.remove"), some(eq(&"Remove".to_string())));
        expect_that!(result.len(), eq(1));
    }

    #[googletest::test]
    fn test_malformed_error_message() {
        let result = normalize(&tree(json!({"basic": {"threads": 4}})), ".");

        let message = result.unwrap_err().to_string();

        expect_that!(message, contains_substring("basic.threads"));
        expect_that!(message, contains_substring("found number"));
    }
}
