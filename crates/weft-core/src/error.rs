//! Error types shared by every Weft layer.

use thiserror::Error;

/// Boxed error returned by constructors and bean factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A type source could not resolve a type name.
#[derive(Debug, Clone, Error)]
#[error("type '{type_name}' not found in source '{origin}'")]
pub struct TypeNotFound {
    /// The requested type name.
    pub type_name: String,
    /// Label of the source that was asked.
    pub origin: String,
}

impl TypeNotFound {
    /// Creates a not-found error for `type_name` in the source labelled `origin`.
    pub fn new(type_name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            origin: origin.into(),
        }
    }
}

/// Plain (no-argument) construction of a resolved type failed.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The type was resolved but is not registered for the requested capability.
    #[error("type '{type_name}' does not implement capability '{capability}'")]
    NotACapability {
        /// Resolved type name.
        type_name: String,
        /// Requested capability.
        capability: &'static str,
    },

    /// The type can only be produced by a container.
    #[error("type '{type_name}' has no plain constructor for capability '{capability}'")]
    NoPlainConstructor {
        /// Resolved type name.
        type_name: String,
        /// Requested capability.
        capability: &'static str,
    },

    /// The registered constructor returned an error.
    #[error("constructor of '{type_name}' failed: {source}")]
    Failed {
        /// Resolved type name.
        type_name: String,
        /// Error raised by the constructor.
        #[source]
        source: BoxError,
    },

    /// The constructor produced a value of another capability.
    #[error("constructor of '{type_name}' did not produce a '{capability}'")]
    Downcast {
        /// Resolved type name.
        type_name: String,
        /// Requested capability.
        capability: &'static str,
    },
}

/// A container could not produce a bean for a request.
#[derive(Debug, Error)]
pub enum BeanLookupError {
    /// No definition matches the requested type.
    #[error("no bean of type '{type_name}' for capability '{capability}'")]
    NoSuchBean {
        /// Requested type name.
        type_name: String,
        /// Requested capability.
        capability: &'static str,
    },

    /// No definition carries the requested name.
    #[error("no bean named '{name}' of type '{type_name}'")]
    NoSuchNamedBean {
        /// Requested type name.
        type_name: String,
        /// Requested bean name.
        name: String,
    },

    /// An unnamed lookup matched several definitions in the same scope.
    #[error("bean of type '{type_name}' is not unique, candidates: {}", .candidates.join(", "))]
    NotUnique {
        /// Requested type name.
        type_name: String,
        /// Names of the matching definitions.
        candidates: Vec<String>,
    },

    /// A bean with the requested name exists but has another type.
    #[error("bean '{name}' is of type '{actual}', expected '{expected}'")]
    TypeMismatch {
        /// Requested bean name.
        name: String,
        /// Requested type name.
        expected: String,
        /// Type of the definition found under that name.
        actual: String,
    },

    /// The bean factory returned an error.
    #[error("failed to create bean '{name}': {source}")]
    Creation {
        /// Bean name.
        name: String,
        /// Error raised by the factory.
        #[source]
        source: BoxError,
    },

    /// The bean factory produced a value of another capability.
    #[error("bean '{name}' is not a '{capability}'")]
    Downcast {
        /// Bean name.
        name: String,
        /// Requested capability.
        capability: &'static str,
    },
}
