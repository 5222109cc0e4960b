//! The dependency-injection container contract consumed by the loaders.

use crate::capability::{CapabilityId, ErasedPlugin, unerase};
use crate::error::BeanLookupError;

/// One bean lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeanRequest<'a> {
    /// Fully-qualified type name of the wanted bean.
    pub type_name: &'a str,
    /// Capability the bean must be produced as.
    pub capability: CapabilityId,
    /// Bean name to match in addition to the type.
    pub name: Option<&'a str>,
}

impl<'a> BeanRequest<'a> {
    /// Lookup by type alone.
    pub fn by_type(type_name: &'a str, capability: CapabilityId) -> Self {
        Self {
            type_name,
            capability,
            name: None,
        }
    }

    /// Lookup by type and bean name.
    pub fn by_name(type_name: &'a str, capability: CapabilityId, name: &'a str) -> Self {
        Self {
            type_name,
            capability,
            name: Some(name),
        }
    }
}

/// A container able to hand out beans, falling back to ancestors when a
/// scope has no match of its own.
pub trait Container: Send + Sync {
    /// Identifier of the active scope.
    fn id(&self) -> &str;

    /// Produces the bean described by `request`.
    fn get_bean(&self, request: &BeanRequest<'_>) -> Result<ErasedPlugin, BeanLookupError>;
}

impl dyn Container + '_ {
    /// Typed lookup by type alone.
    pub fn bean<P: ?Sized + 'static>(&self, type_name: &str) -> Result<Box<P>, BeanLookupError> {
        let request = BeanRequest::by_type(type_name, CapabilityId::of::<P>());
        self.typed(&request)
    }

    /// Typed lookup by type and bean name.
    pub fn named_bean<P: ?Sized + 'static>(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<Box<P>, BeanLookupError> {
        let request = BeanRequest::by_name(type_name, CapabilityId::of::<P>(), name);
        self.typed(&request)
    }

    fn typed<P: ?Sized + 'static>(
        &self,
        request: &BeanRequest<'_>,
    ) -> Result<Box<P>, BeanLookupError> {
        let erased = self.get_bean(request)?;
        unerase::<P>(erased).map_err(|_| BeanLookupError::Downcast {
            name: request.name.unwrap_or(request.type_name).to_string(),
            capability: request.capability.name(),
        })
    }
}
