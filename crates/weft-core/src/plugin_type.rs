//! Resolved plugin types and their per-capability constructors.

use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilityId, ErasedPlugin, unerase};
use crate::error::{BoxError, ConstructionError};

/// Plain constructor producing an erased `Box<P>` for one capability.
pub type ConstructFn = Arc<dyn Fn() -> Result<ErasedPlugin, BoxError> + Send + Sync>;

/// Splits a type name into `(package, simple_name)`.
///
/// Both `::` and `.` are accepted as separators; the last one wins.
///
/// ```
/// use weft_core::split_type_name;
///
/// assert_eq!(split_type_name("acme::checks::Name"), ("acme::checks", "Name"));
/// assert_eq!(split_type_name("com.acme.Name"), ("com.acme", "Name"));
/// assert_eq!(split_type_name("Name"), ("", "Name"));
/// ```
pub fn split_type_name(type_name: &str) -> (&str, &str) {
    let colons = type_name.rfind("::").map(|i| (i, i + 2));
    let dot = type_name.rfind('.').map(|i| (i, i + 1));
    match colons.max(dot) {
        Some((end, start)) => (&type_name[..end], &type_name[start..]),
        None => ("", type_name),
    }
}

/// One capability a type can be produced as.
#[derive(Clone)]
pub struct TypeConstructor {
    capability: CapabilityId,
    construct: Option<ConstructFn>,
}

impl TypeConstructor {
    /// Registers `capability` with an optional plain constructor.
    pub fn new(capability: CapabilityId, construct: Option<ConstructFn>) -> Self {
        Self {
            capability,
            construct,
        }
    }

    /// The capability produced.
    pub fn capability(&self) -> CapabilityId {
        self.capability
    }

    /// Returns `true` when a plain constructor is present.
    pub fn is_constructible(&self) -> bool {
        self.construct.is_some()
    }
}

/// A type resolved by a [`TypeSource`](crate::TypeSource).
#[derive(Clone)]
pub struct PluginType {
    name: Arc<str>,
    origin: Arc<str>,
    constructors: Vec<TypeConstructor>,
}

impl PluginType {
    /// Creates a type with no capabilities yet.
    pub fn new(name: impl Into<Arc<str>>, origin: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            constructors: Vec::new(),
        }
    }

    /// Adds a capability.  A later plain constructor replaces an earlier
    /// missing one for the same capability.
    pub fn add_constructor(&mut self, constructor: TypeConstructor) {
        match self
            .constructors
            .iter_mut()
            .find(|c| c.capability == constructor.capability)
        {
            Some(existing) => {
                if constructor.construct.is_some() {
                    existing.construct = constructor.construct;
                }
            }
            None => self.constructors.push(constructor),
        }
    }

    /// Builder form of [`add_constructor`](Self::add_constructor).
    pub fn with_constructor(mut self, constructor: TypeConstructor) -> Self {
        self.add_constructor(constructor);
        self
    }

    /// Fully-qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the source that resolved this type.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Package part of the type name.
    pub fn package(&self) -> &str {
        split_type_name(&self.name).0
    }

    /// Simple (last-segment) type name.
    pub fn simple_name(&self) -> &str {
        split_type_name(&self.name).1
    }

    /// Capabilities this type is registered for.
    pub fn capabilities(&self) -> impl Iterator<Item = CapabilityId> + '_ {
        self.constructors.iter().map(TypeConstructor::capability)
    }

    /// Returns `true` when the type is registered for `capability`.
    pub fn implements(&self, capability: CapabilityId) -> bool {
        self.constructors.iter().any(|c| c.capability == capability)
    }

    /// Instantiates the type through its plain constructor as capability `P`.
    pub fn instantiate<P: ?Sized + 'static>(&self) -> Result<Box<P>, ConstructionError> {
        let capability = CapabilityId::of::<P>();
        let constructor = self
            .constructors
            .iter()
            .find(|c| c.capability == capability)
            .ok_or_else(|| ConstructionError::NotACapability {
                type_name: self.name.to_string(),
                capability: capability.name(),
            })?;

        let construct = constructor.construct.as_ref().ok_or_else(|| {
            ConstructionError::NoPlainConstructor {
                type_name: self.name.to_string(),
                capability: capability.name(),
            }
        })?;

        let erased = construct().map_err(|source| ConstructionError::Failed {
            type_name: self.name.to_string(),
            source,
        })?;

        unerase::<P>(erased).map_err(|_| ConstructionError::Downcast {
            type_name: self.name.to_string(),
            capability: capability.name(),
        })
    }
}

impl fmt::Debug for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginType")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("capabilities", &self.capabilities().collect::<Vec<_>>())
            .finish()
    }
}
