//! Container-managed bean definitions and the context their factories see.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilityId, ErasedPlugin};
use crate::error::BoxError;
use crate::plugin_type::split_type_name;

/// Shared singleton stored in a container scope, wrapping an `Arc<T>`.
pub type ServiceArc = Arc<dyn Any + Send + Sync>;

/// Factory producing an erased `Box<P>` for one bean definition.
pub type BeanFactory = Arc<dyn Fn(&dyn BeanContext) -> Result<ErasedPlugin, BoxError> + Send + Sync>;

/// Derives the default bean name from a type name.
///
/// The simple name is decapitalised unless its first two characters are both
/// upper case.
///
/// ```
/// use weft_core::default_bean_name;
///
/// assert_eq!(default_bean_name("acme::NameValidator"), "nameValidator");
/// assert_eq!(default_bean_name("acme.URLCheck"), "URLCheck");
/// ```
pub fn default_bean_name(type_name: &str) -> String {
    let simple = split_type_name(type_name).1;
    let mut chars = simple.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            simple.to_string()
        }
        (Some(first), _) => first.to_lowercase().chain(simple.chars().skip(1)).collect(),
        (None, _) => String::new(),
    }
}

// ─── BeanContext ──────────────────────────────────────────────────────────────

/// What a bean factory can see while it runs: the scope holding its
/// definition and, through it, every ancestor scope.
pub trait BeanContext {
    /// Identifier of the scope the definition lives in.
    fn scope_name(&self) -> &str;

    /// Looks up a shared service by the `TypeId` of `T` it was registered under,
    /// nearest scope first.
    fn service_by_type_id(&self, type_id: TypeId) -> Option<ServiceArc>;
}

impl dyn BeanContext + '_ {
    /// Returns the shared service registered as `T`, if any.
    pub fn service<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.service_by_type_id(TypeId::of::<T>())
            .and_then(|arc| arc.downcast_ref::<Arc<T>>().map(Arc::clone))
    }

    /// Returns the shared service registered as `T` or an error naming it.
    pub fn require<T: ?Sized + 'static>(&self) -> Result<Arc<T>, BoxError> {
        self.service::<T>().ok_or_else(|| {
            format!(
                "service '{}' is not registered in scope '{}' or its ancestors",
                std::any::type_name::<T>(),
                self.scope_name()
            )
            .into()
        })
    }
}

/// Types a container can build by pulling their dependencies from a
/// [`BeanContext`].
pub trait Injectable: Sized {
    /// Builds the bean.
    fn inject(ctx: &dyn BeanContext) -> Result<Self, BoxError>;
}

// ─── BeanDefinition ───────────────────────────────────────────────────────────

/// A bean a container scope can produce once its package has been scanned.
#[derive(Clone)]
pub struct BeanDefinition {
    name: String,
    type_name: String,
    capability: CapabilityId,
    factory: BeanFactory,
}

impl BeanDefinition {
    /// Creates a definition, deriving the bean name from the type when absent.
    pub fn new(
        type_name: impl Into<String>,
        bean_name: Option<&str>,
        capability: CapabilityId,
        factory: BeanFactory,
    ) -> Self {
        let type_name = type_name.into();
        let name = bean_name.map_or_else(|| default_bean_name(&type_name), str::to_string);
        Self {
            name,
            type_name,
            capability,
            factory,
        }
    }

    /// Bean name, unique within a scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully-qualified name of the produced type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Package part of the type name, matched against scan roots.
    pub fn package(&self) -> &str {
        split_type_name(&self.type_name).0
    }

    /// Capability produced by the factory.
    pub fn capability(&self) -> CapabilityId {
        self.capability
    }

    /// Returns `true` when this definition produces `type_name` as `capability`.
    pub fn produces(&self, type_name: &str, capability: CapabilityId) -> bool {
        self.type_name == type_name && self.capability == capability
    }

    /// Runs the factory.
    pub fn create(&self, ctx: &dyn BeanContext) -> Result<ErasedPlugin, BoxError> {
        (self.factory)(ctx)
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("capability", &self.capability)
            .finish()
    }
}
