//! Compile-time registration tables (linkme distributed slices).
//!
//! Entries are normally emitted by the `#[plugin_type]` and `#[bean]`
//! attribute macros and read back by [`StaticSource`](crate::StaticSource).

use linkme::distributed_slice;

use crate::bean::BeanContext;
use crate::capability::{CapabilityId, ErasedPlugin};
use crate::error::BoxError;

/// Plain constructor function pointer.
pub type ConstructPtr = fn() -> Result<ErasedPlugin, BoxError>;

/// Bean factory function pointer.
pub type BeanFactoryPtr = fn(&dyn BeanContext) -> Result<ErasedPlugin, BoxError>;

/// A type made resolvable for one capability.
pub struct TypeRegistration {
    /// Fully-qualified type name (`module_path!()` plus the type ident).
    pub type_name: &'static str,
    /// Capability the type is registered for.
    pub capability: fn() -> CapabilityId,
    /// Plain constructor, `None` for container-only types.
    pub construct: Option<ConstructPtr>,
}

/// A container-managed bean definition.
pub struct BeanRegistration {
    /// Fully-qualified type name.
    pub type_name: &'static str,
    /// Explicit bean name; derived from the type name when `None`.
    pub bean_name: Option<&'static str>,
    /// Capability produced by the factory.
    pub capability: fn() -> CapabilityId,
    /// Factory run by the container on every lookup.
    pub factory: BeanFactoryPtr,
}

/// Types contributed by `#[plugin_type]`.
#[distributed_slice]
pub static PLUGIN_TYPES: [TypeRegistration];

/// Beans contributed by `#[bean]`.
#[distributed_slice]
pub static PLUGIN_BEANS: [BeanRegistration];
