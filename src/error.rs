//! Crate-level error type.

use thiserror::Error;

use crate::active::ActivationError;
use crate::config::ConfigError;
use crate::input::normalizer::NormalizeError;
use crate::loader::LoadError;
use crate::resolver::ResolveError;

/// Any error the engine can return.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
