//! locale-engine
//!
//! Resolves translation keys against per-locale bundles with fallback chains,
//! whether the locale files were authored as nested trees or flat dot-keys.

pub mod active;
pub mod audit;
pub mod bundle;
pub mod config;
pub mod coverage;
pub mod error;
pub mod fallback;
pub mod input;
pub mod loader;
pub mod localizer;
pub mod registry;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use error::{
    Error,
    Result,
};
pub use input::tree::ResourceTree;
pub use localizer::{
    Localizer,
    LocalizerBuilder,
};
pub use types::{
    LocaleCode,
    SourceShape,
};
