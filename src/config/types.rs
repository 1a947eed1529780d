use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::audit::DEFAULT_MISS_LIMIT;
use crate::types::LocaleCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "fallback.chains.zh-TW[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One numbered line per error.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What a lookup returns when no locale in the chain has the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingKeyPolicy {
    /// The key itself, so the gap stays visible in the UI.
    #[default]
    ReturnKey,
    /// The caller's default, else `missingDefault`, else the key.
    ReturnDefault,
    /// A `TranslationMissing` error.
    Fail,
}

/// Whether a locale must be registered before it can be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivationMode {
    Strict,
    /// Unloaded locales can be activated; lookups fall back until a bundle arrives.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub default_locale: LocaleCode,

    pub missing_key_policy: MissingKeyPolicy,
    /// Used by `returnDefault` when the caller supplies no default.
    pub missing_default: Option<String>,

    pub activation_mode: ActivationMode,

    pub key_separator: String,

    /// Keep a record of every `(locale, key)` miss.
    pub record_misses: bool,
    /// Distinct `(locale, key)` pairs kept before new misses are only counted.
    pub max_recorded_misses: usize,

    pub fallback: FallbackSettings,
    pub coverage: CoverageSettings,
    pub resource_files: ResourceFilesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbackSettings {
    /// Explicit chains per locale, consulted after the locale itself.
    ///
    /// Locales without an entry fall back to their base language.
    pub chains: HashMap<LocaleCode, Vec<LocaleCode>>,

    /// Append `defaultLocale` to the end of every chain.
    pub append_default: bool,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self { chains: HashMap::new(), append_default: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageSettings {
    /// Locales checked by coverage reports.
    ///
    /// - `None`: All registered locales are checked (default)
    /// - `Some([...])`: Only specified locales are checked
    ///
    /// Mutually exclusive with `optional_locales`.
    pub required_locales: Option<Vec<LocaleCode>>,

    /// Locales skipped by coverage reports.
    ///
    /// Mutually exclusive with `required_locales`.
    pub optional_locales: Option<Vec<LocaleCode>>,
}

impl CoverageSettings {
    /// Returns true if coverage should be reported for `locale`.
    #[must_use]
    pub fn should_check(&self, locale: &LocaleCode) -> bool {
        if let Some(required) = &self.required_locales {
            return required.contains(locale);
        }
        self.optional_locales.as_ref().is_none_or(|optional| !optional.contains(locale))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for ResourceFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/*.json".to_string(), "**/*.jsonc".to_string()],
            exclude_patterns: vec!["node_modules/**".to_string()],
        }
    }
}

impl EngineSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid separator
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_locale.as_str().is_empty() {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The default locale cannot be empty. Example: \"en\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        for (locale, chain) in &self.fallback.chains {
            if locale.as_str().is_empty() {
                errors.push(ValidationError::new(
                    "fallback.chains",
                    "Locale codes used as chain keys cannot be empty",
                ));
            }
            for (index, entry) in chain.iter().enumerate() {
                if entry.as_str().is_empty() {
                    errors.push(ValidationError::new(
                        format!("fallback.chains.{locale}[{index}]"),
                        "Locale codes in a fallback chain cannot be empty",
                    ));
                }
            }
        }

        if self.coverage.required_locales.is_some() && self.coverage.optional_locales.is_some() {
            errors.push(ValidationError::new(
                "coverage.requiredLocales/coverage.optionalLocales",
                "Cannot specify both 'requiredLocales' and 'optionalLocales'. Please use only one",
            ));
        }

        if self.resource_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "resourceFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/*.json\"]",
            ));
        }

        for (index, pattern) in self.resource_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("resourceFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.resource_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("resourceFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_locale: LocaleCode::from("en"),
            missing_key_policy: MissingKeyPolicy::default(),
            missing_default: None,
            activation_mode: ActivationMode::default(),
            key_separator: ".".to_string(),
            record_misses: true,
            max_recorded_misses: DEFAULT_MISS_LIMIT,
            fallback: FallbackSettings::default(),
            coverage: CoverageSettings::default(),
            resource_files: ResourceFilesConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = EngineSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: EngineSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale.as_str(), eq("en"));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.missing_key_policy, eq(MissingKeyPolicy::ReturnKey));
        assert_that!(settings.activation_mode, eq(ActivationMode::Lenient));
        assert_that!(settings.record_misses, eq(true));
        assert_that!(settings.max_recorded_misses, eq(10_000));
        assert_that!(settings.fallback.append_default, eq(true));
        assert_that!(
            settings.resource_files.include_patterns,
            elements_are![eq("**/*.json"), eq("**/*.jsonc")]
        );
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{
            "defaultLocale": "zh",
            "missingKeyPolicy": "fail",
            "activationMode": "strict",
            "fallback": {"chains": {"zh-TW": ["zh-HK", "zh"]}}
        }"#;

        let settings: EngineSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale.as_str(), eq("zh"));
        assert_that!(settings.missing_key_policy, eq(MissingKeyPolicy::Fail));
        assert_that!(settings.activation_mode, eq(ActivationMode::Strict));
        assert_that!(settings.fallback.append_default, eq(true));
        assert_that!(settings.fallback.chains.get("zh-TW").map(Vec::len), some(eq(2)));
    }

    #[rstest]
    fn deserialize_unknown_policy_fails() {
        let json = r#"{"missingKeyPolicy": "ignore"}"#;

        let result: serde_json::Result<EngineSettings> = serde_json::from_str(json);

        assert_that!(result.is_err(), eq(true));
    }

    #[rstest]
    fn validate_invalid_key_separator_empty() {
        let settings = EngineSettings { key_separator: String::new(), ..EngineSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_default_locale_empty() {
        let settings =
            EngineSettings { default_locale: LocaleCode::from(""), ..EngineSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLocale")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_fallback_chain_entry() {
        let mut settings = EngineSettings::default();
        settings
            .fallback
            .chains
            .insert(LocaleCode::from("zh-TW"), vec![LocaleCode::from("zh"), LocaleCode::from("")]);

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("fallback.chains.zh-TW[1]"))])
        );
    }

    #[rstest]
    fn validate_required_and_optional_locales_conflict() {
        let settings = EngineSettings {
            coverage: CoverageSettings {
                required_locales: Some(vec![LocaleCode::from("zh")]),
                optional_locales: Some(vec![LocaleCode::from("fr")]),
            },
            ..EngineSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(
                ValidationError.message,
                contains_substring("Cannot specify both")
            )])
        );
    }

    #[rstest]
    fn validate_invalid_include_pattern_invalid_glob() {
        let settings = EngineSettings {
            resource_files: ResourceFilesConfig {
                include_patterns: vec!["**/*.{json,jsonc".to_string()],
                ..ResourceFilesConfig::default()
            },
            ..EngineSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("resourceFiles.includePatterns[0]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("**/*.{json,jsonc"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_include_patterns_empty() {
        let settings = EngineSettings {
            resource_files: ResourceFilesConfig {
                include_patterns: vec![],
                ..ResourceFilesConfig::default()
            },
            ..EngineSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(
                ValidationError.field_path,
                eq("resourceFiles.includePatterns")
            )])
        );
    }

    #[rstest]
    #[case::all_checked_by_default(None, None, "fr", true)]
    #[case::required_listed(Some(vec!["zh"]), None, "zh", true)]
    #[case::required_not_listed(Some(vec!["zh"]), None, "fr", false)]
    #[case::optional_listed(None, Some(vec!["fr"]), "fr", false)]
    #[case::optional_not_listed(None, Some(vec!["fr"]), "zh", true)]
    fn coverage_should_check(
        #[case] required: Option<Vec<&str>>,
        #[case] optional: Option<Vec<&str>>,
        #[case] locale: &str,
        #[case] expected: bool,
    ) {
        let to_codes = |codes: Vec<&str>| codes.into_iter().map(LocaleCode::from).collect();
        let settings = CoverageSettings {
            required_locales: required.map(to_codes),
            optional_locales: optional.map(to_codes),
        };

        assert_that!(settings.should_check(&LocaleCode::from(locale)), eq(expected));
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = EngineSettings {
            key_separator: String::new(),
            resource_files: ResourceFilesConfig {
                include_patterns: vec![],
                ..ResourceFilesConfig::default()
            },
            ..EngineSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. keySeparator"));
        assert_that!(error_message, contains_substring("cannot be empty"));
        assert_that!(error_message, contains_substring("2. resourceFiles.includePatterns"));
        assert_that!(error_message, contains_substring("At least one pattern"));
    }
}
