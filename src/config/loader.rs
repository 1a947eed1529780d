//! Reading `.locale-engine.json`.

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    EngineSettings,
};

/// Name of the settings file looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = ".locale-engine.json";

/// Loads and validates the settings stored in `dir`.
///
/// A directory without a settings file yields [`EngineSettings::default`].
///
/// # Errors
/// Returns `IoError` if the file exists but cannot be read, `ParseError` for
/// invalid JSON, and `ValidationErrors` for settings that parse but are not
/// usable.
pub fn load_settings(dir: &Path) -> Result<EngineSettings, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    let settings = match std::fs::read_to_string(&config_path) {
        Ok(content) => {
            let settings: EngineSettings = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded settings file");
            settings
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No settings file, using defaults");
            EngineSettings::default()
        }
        Err(err) => return Err(err.into()),
    };

    settings.validate().map_err(ConfigError::ValidationErrors)?;
    Ok(settings)
}
