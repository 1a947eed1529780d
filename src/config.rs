//! Engine configuration: settings types, validation, and the settings file.

/// Settings file loader
mod loader;
/// Configuration types and settings
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    load_settings,
};
pub use types::{
    ActivationMode,
    ConfigError,
    CoverageSettings,
    EngineSettings,
    FallbackSettings,
    MissingKeyPolicy,
    ResourceFilesConfig,
    ValidationError,
};
