//! Container error types.

use thiserror::Error;

/// Errors raised while building a layered container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A layered container needs at least one type source.
    #[error("cannot build a layered container without type sources")]
    NoSources,

    /// Two definitions in the same scope share a bean name.
    #[error("duplicate bean name '{name}' in scope '{scope}' ({first} and {second})")]
    DuplicateBeanName {
        /// Scope holding both definitions.
        scope: String,
        /// The clashing bean name.
        name: String,
        /// Type of the first definition.
        first: String,
        /// Type of the second definition.
        second: String,
    },
}

/// Result type for container construction.
pub type ContainerResult<T> = Result<T, ContainerError>;
