//! Reading locale resource files from disk.
//!
//! The engine itself never touches the file system; this module turns JSON and
//! JSONC files into [`ResourceTree`]s that can be registered.

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use jsonc_parser::ParseOptions;
use thiserror::Error;

use crate::config::ResourceFilesConfig;
use crate::input::normalizer::NormalizeError;
use crate::input::tree::{
    ResourceTree,
    value_kind,
};
use crate::types::LocaleCode;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("'{}' does not contain a resource object (found {found})", path.display())]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("'{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: NormalizeError,
    },
}

/// A parsed resource file and the locale it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedResource {
    pub locale: LocaleCode,
    pub path: PathBuf,
    pub tree: ResourceTree,
}

/// ISO 639-1 language codes recognized in resource paths.
static LANGUAGE_CODES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "af", "am", "ar", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el",
        "en", "eo", "es", "et", "eu", "fa", "fi", "fil", "fr", "ga", "gl", "gu", "he", "hi",
        "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "kk", "km", "kn", "ko", "ky", "lo",
        "lt", "lv", "mk", "ml", "mn", "mr", "ms", "my", "nb", "ne", "nl", "nn", "no", "pa",
        "pl", "ps", "pt", "ro", "ru", "si", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "te",
        "th", "tl", "tr", "uk", "ur", "uz", "vi", "zh", "zu",
    ]
    .into_iter()
    .collect()
});

/// Returns true for `zh`, `en-US`, `pt_BR`, `zh-Hant`, `zh-Hant-TW`.
fn is_language_code(part: &str) -> bool {
    let mut subtags = part.split(['-', '_']);
    let Some(language) = subtags.next() else {
        return false;
    };
    if !LANGUAGE_CODES.contains(language.to_ascii_lowercase().as_str()) {
        return false;
    }
    subtags.all(|subtag| {
        matches!(subtag.len(), 2 | 4) && subtag.chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Detects the locale a resource file belongs to.
///
/// Splits the path on `/` and `.` and returns the last part that is a
/// language code, falling back to the file stem. Pass a path relative to the
/// scanned directory; directories above it are not locale names.
///
/// # Examples
/// - `locales/zh.jsonc` → `zh`
/// - `i18n/en-US/admin.json` → `en-US`
/// - `lang/custom.json` → `custom`
#[must_use]
pub fn detect_locale_from_path(path: &Path) -> Option<LocaleCode> {
    let path_str = path.to_string_lossy();
    path_str
        .split(['/', '\\', '.'])
        .rev()
        .find(|part| is_language_code(part))
        .map(LocaleCode::from)
        .or_else(|| {
            path.file_stem().map(|stem| LocaleCode::from(stem.to_string_lossy().into_owned()))
        })
}

/// Parses JSON or JSONC text into a resource tree.
///
/// Comments and trailing commas are accepted.
///
/// # Errors
/// Returns `Parse` for invalid syntax or an empty document and
/// `NotAnObject` when the root is not an object.
pub fn parse_resource(path: &Path, text: &str) -> Result<ResourceTree, LoadError> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|err| LoadError::Parse { path: path.to_path_buf(), message: err.to_string() })?
        .ok_or_else(|| LoadError::Parse {
            path: path.to_path_buf(),
            message: "document is empty".to_string(),
        })?;

    match value {
        serde_json::Value::Object(map) => Ok(ResourceTree::from(map)),
        other => {
            Err(LoadError::NotAnObject { path: path.to_path_buf(), found: value_kind(&other) })
        }
    }
}

/// Reads one resource file found under `root`.
///
/// The locale is detected from the part of `path` below `root`, so
/// `<root>/messages.json` belongs to `messages` even when `root` itself sits
/// in a directory named like a language.
///
/// # Errors
/// Returns `Io` if the file cannot be read, otherwise see [`parse_resource`].
pub fn load_resource_file(root: &Path, path: &Path) -> Result<LoadedResource, LoadError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let tree = parse_resource(path, &text)?;
    let relative_path = path.strip_prefix(root).unwrap_or(path);
    let locale = detect_locale_from_path(relative_path).ok_or_else(|| LoadError::Parse {
        path: path.to_path_buf(),
        message: "cannot detect locale from path".to_string(),
    })?;

    tracing::debug!(%locale, path = %path.display(), keys = tree.len(), "Parsed resource file");
    Ok(LoadedResource { locale, path: path.to_path_buf(), tree })
}

/// Builds a glob set from `patterns`.
fn build_glob_set(kind: &'static str, patterns: &[String]) -> Result<GlobSet, LoadError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| LoadError::InvalidPattern {
            kind,
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| LoadError::InvalidPattern {
        kind,
        pattern: patterns.join(", "),
        source,
    })
}

/// Finds resource files under `root`, sorted by path.
///
/// Honors `.gitignore` and skips hidden files, so the settings file is never
/// picked up. Patterns are matched against paths relative to `root`.
///
/// # Errors
/// Returns `InvalidPattern` if a pattern is not a valid glob.
pub fn discover_resource_files(
    root: &Path,
    config: &ResourceFilesConfig,
) -> Result<Vec<PathBuf>, LoadError> {
    let include_set = build_glob_set("include", &config.include_patterns)?;
    let exclude_set = build_glob_set("exclude", &config.exclude_patterns)?;

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(root) else {
            continue;
        };
        if !include_set.is_match(relative_path) || exclude_set.is_match(relative_path) {
            continue;
        }

        found_files.push(path.to_path_buf());
    }

    found_files.sort();
    Ok(found_files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case::file_name("/app/locales/zh.jsonc", "zh")]
    #[case::directory("/app/i18n/en-US/admin.json", "en-US")]
    #[case::underscore_region("/app/locales/pt_BR.json", "pt_BR")]
    #[case::script("/app/locales/zh-Hant.json", "zh-Hant")]
    #[case::last_match_wins("/app/en/locales/ja.json", "ja")]
    #[case::typescript_module("/web/src/i18n/en.ts", "en")]
    #[case::stem_fallback("/app/lang/custom.json", "custom")]
    #[case::hyphenated_word("/app/locales/en-translation.json", "en-translation")]
    fn test_detect_locale_from_path(#[case] path: &str, #[case] expected: &str) {
        let result = detect_locale_from_path(Path::new(path));

        assert_eq!(result, Some(LocaleCode::from(expected)));
    }

    #[googletest::test]
    fn test_parse_resource_accepts_jsonc() {
        let text = r#"{
            // section heading
            "basic.name": "名称",
            /* block */
            "form": { "remove": "删除", },
        }"#;

        let tree = parse_resource(Path::new("zh.jsonc"), text).unwrap();

        expect_that!(tree.len(), eq(2));
        expect_that!(tree.as_map().get("basic.name").and_then(|v| v.as_str()), some(eq("名称")));
    }

    #[rstest]
    #[case::array("[1, 2]", "array")]
    #[case::string(r#""hello""#, "string")]
    fn test_parse_resource_rejects_non_object(#[case] text: &str, #[case] kind: &str) {
        let result = parse_resource(Path::new("en.json"), text);

        match result {
            Err(LoadError::NotAnObject { found, .. }) => assert_eq!(found, kind),
            other => panic!("expected NotAnObject, got {other:?}"),
        }
    }

    #[rstest]
    #[case::syntax("{ \"a\": ")]
    #[case::empty("")]
    fn test_parse_resource_rejects_invalid(#[case] text: &str) {
        let result = parse_resource(Path::new("en.json"), text);

        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[googletest::test]
    fn test_load_resource_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("en.json");
        fs::write(&path, r#"{"basic": {"name": "Name"}}"#).unwrap();

        let loaded = load_resource_file(temp_dir.path(), &path).unwrap();

        expect_that!(loaded.locale.as_str(), eq("en"));
        expect_that!(loaded.path, eq(&path));
        expect_that!(loaded.tree.len(), eq(1));
    }

    #[rstest]
    #[case::stem_below_language_dir("it/admin-ui", "messages.json", "messages")]
    #[case::nested_locale_dir("it/admin-ui", "de/messages.json", "de")]
    #[case::locale_file("it/admin-ui", "zh.jsonc", "zh")]
    fn test_load_resource_file_ignores_dirs_above_root(
        #[case] root: &str,
        #[case] file: &str,
        #[case] expected: &str,
    ) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(root);
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"title": "Admin"}"#).unwrap();

        let loaded = load_resource_file(&root, &path).unwrap();

        assert_eq!(loaded.locale, LocaleCode::from(expected));
    }

    #[rstest]
    fn test_load_resource_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_resource_file(temp_dir.path(), &temp_dir.path().join("fr.json"));

        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[rstest]
    fn test_discover_resource_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("locales/en")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("locales/zh.jsonc"), "{}").unwrap();
        fs::write(root.join("locales/en/common.json"), "{}").unwrap();
        fs::write(root.join("locales/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/en.json"), "{}").unwrap();
        fs::write(root.join(".locale-engine.json"), "{}").unwrap();

        let files = discover_resource_files(root, &ResourceFilesConfig::default()).unwrap();

        let relative: Vec<PathBuf> =
            files.iter().map(|p| p.strip_prefix(root).unwrap().to_path_buf()).collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("locales/en/common.json"), PathBuf::from("locales/zh.jsonc")]
        );
    }

    #[rstest]
    fn test_discover_rejects_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let config = ResourceFilesConfig {
            include_patterns: vec!["[invalid".to_string()],
            exclude_patterns: vec![],
        };

        let result = discover_resource_files(temp_dir.path(), &config);

        assert!(matches!(result, Err(LoadError::InvalidPattern { kind: "include", .. })));
    }
}
