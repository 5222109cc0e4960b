//! Error types for the Weft framework.

use thiserror::Error;
use weft_container::ContainerError;

/// Fatal errors raised while setting up a [`PluginFactory`](crate::PluginFactory).
///
/// These surface before any descriptor is processed; per-descriptor problems
/// are reported through [`LoadReport`](crate::LoadReport) instead.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Neither a container nor a type source was supplied.
    #[error("plugin factory needs a container or at least one type source")]
    MissingCollaborators,

    /// Bootstrapping the layered container failed.
    #[error("container bootstrap failed: {0}")]
    Container(#[from] ContainerError),
}

/// Result type for factory construction.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
