//! Runtime error types.

use thiserror::Error;
use weft_framework::ConfigurationError;

use crate::config::ConfigError;

/// Errors that can occur while assembling a [`PluginRuntime`](crate::PluginRuntime).
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The plugin factory could not be constructed.
    #[error("Failed to set up plugin factory: {0}")]
    Factory(#[from] ConfigurationError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
