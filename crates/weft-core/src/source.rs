//! Type sources: where type names are resolved and bean definitions found.
//!
//! Two implementations ship with the crate:
//!
//! - [`TypeRegistry`] is populated at runtime, typically by a host that wants
//!   to isolate one plugin family per source.
//! - [`StaticSource`] reads the link-time tables filled by the registration
//!   macros.
//!
//! A list of sources is ordered: the first source that resolves a name wins,
//! and the same order is used to stack container scopes parent to child.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::bean::{BeanContext, BeanDefinition, BeanFactory};
use crate::capability::{CapabilityId, ErasedPlugin, erase};
use crate::error::{BoxError, TypeNotFound};
use crate::plugin_type::{ConstructFn, PluginType, TypeConstructor};
use crate::registration::{PLUGIN_BEANS, PLUGIN_TYPES};

/// A place type names can be resolved from.
pub trait TypeSource: Send + Sync {
    /// Short label used in diagnostics and as the container scope name.
    fn label(&self) -> &str;

    /// Resolves a fully-qualified type name.
    fn resolve(&self, type_name: &str) -> Result<PluginType, TypeNotFound>;

    /// Bean definitions this source contributes to its container scope.
    fn beans(&self) -> Vec<BeanDefinition>;
}

// ─── TypeRegistry ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct RegistryTables {
    types: HashMap<String, PluginType>,
    beans: Vec<BeanDefinition>,
}

/// Runtime-populated type source.
///
/// Registration goes through `&self` so a registry can be filled after it has
/// been shared as an `Arc<dyn TypeSource>`.
pub struct TypeRegistry {
    label: Arc<str>,
    tables: RwLock<RegistryTables>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            tables: RwLock::new(RegistryTables::default()),
        }
    }

    /// Registers `type_name` for capability `P` with a plain constructor.
    ///
    /// ```
    /// use weft_core::{PluginDescriptor, PluginSpec, TypeRegistry, TypeSource};
    ///
    /// trait Named: PluginSpec {}
    ///
    /// #[derive(Default)]
    /// struct Plain(Option<PluginDescriptor>);
    ///
    /// impl PluginSpec for Plain {
    ///     fn set_config(&mut self, c: PluginDescriptor) { self.0 = Some(c); }
    ///     fn config(&self) -> Option<&PluginDescriptor> { self.0.as_ref() }
    /// }
    /// impl Named for Plain {}
    ///
    /// let registry = TypeRegistry::new("app");
    /// registry.register_type::<dyn Named, _>("app::Plain", || Ok(Box::new(Plain::default())));
    /// assert!(registry.resolve("app::Plain").is_ok());
    /// ```
    pub fn register_type<P, F>(&self, type_name: impl Into<String>, construct: F)
    where
        P: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Box<P>, BoxError> + Send + Sync + 'static,
    {
        let construct: ConstructFn =
            Arc::new(move || -> Result<ErasedPlugin, BoxError> { construct().map(erase) });
        self.insert_type(
            type_name.into(),
            TypeConstructor::new(CapabilityId::of::<P>(), Some(construct)),
        );
    }

    /// Registers `type_name` for capability `P` without a plain constructor.
    ///
    /// Such a type resolves but can only be produced by a container.
    pub fn register_abstract<P: ?Sized + 'static>(&self, type_name: impl Into<String>) {
        self.insert_type(
            type_name.into(),
            TypeConstructor::new(CapabilityId::of::<P>(), None),
        );
    }

    /// Registers a bean definition and makes its type resolvable for `P`.
    pub fn register_bean<P, F>(
        &self,
        type_name: impl Into<String>,
        bean_name: Option<&str>,
        factory: F,
    ) where
        P: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn BeanContext) -> Result<Box<P>, BoxError> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        let capability = CapabilityId::of::<P>();
        let factory: BeanFactory = Arc::new(
            move |ctx: &dyn BeanContext| -> Result<ErasedPlugin, BoxError> {
                factory(ctx).map(erase)
            },
        );
        let definition = BeanDefinition::new(type_name.clone(), bean_name, capability, factory);
        debug!(
            source = %self.label,
            bean = definition.name(),
            type_name = %type_name,
            "Registered bean definition"
        );
        self.tables.write().beans.push(definition);
        self.insert_type(type_name, TypeConstructor::new(capability, None));
    }

    /// Number of resolvable types.
    pub fn type_count(&self) -> usize {
        self.tables.read().types.len()
    }

    /// Number of bean definitions.
    pub fn bean_count(&self) -> usize {
        self.tables.read().beans.len()
    }

    fn insert_type(&self, type_name: String, constructor: TypeConstructor) {
        let mut tables = self.tables.write();
        let label = Arc::clone(&self.label);
        trace!(
            source = %label,
            type_name = %type_name,
            capability = %constructor.capability(),
            "Registered type"
        );
        tables
            .types
            .entry(type_name)
            .or_insert_with_key(|name| PluginType::new(name.as_str(), label))
            .add_constructor(constructor);
    }
}

impl TypeSource for TypeRegistry {
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, type_name: &str) -> Result<PluginType, TypeNotFound> {
        self.tables
            .read()
            .types
            .get(type_name)
            .cloned()
            .ok_or_else(|| TypeNotFound::new(type_name, &*self.label))
    }

    fn beans(&self) -> Vec<BeanDefinition> {
        self.tables.read().beans.clone()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("TypeRegistry")
            .field("label", &self.label)
            .field("types", &tables.types.len())
            .field("beans", &tables.beans.len())
            .finish()
    }
}

// ─── StaticSource ─────────────────────────────────────────────────────────────

/// Type source backed by the link-time registration tables.
///
/// Every type and bean registered with `#[plugin_type]` or `#[bean]` in any
/// crate linked into the binary is visible here.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSource;

impl StaticSource {
    /// Label reported by this source.
    pub const LABEL: &'static str = "static";
}

impl TypeSource for StaticSource {
    fn label(&self) -> &str {
        Self::LABEL
    }

    fn resolve(&self, type_name: &str) -> Result<PluginType, TypeNotFound> {
        let mut resolved: Option<PluginType> = None;

        let types = PLUGIN_TYPES.iter().filter(|r| r.type_name == type_name).map(|r| {
            let construct = r.construct.map(|ptr| -> ConstructFn { Arc::new(ptr) });
            TypeConstructor::new((r.capability)(), construct)
        });
        let beans = PLUGIN_BEANS
            .iter()
            .filter(|r| r.type_name == type_name)
            .map(|r| TypeConstructor::new((r.capability)(), None));

        for constructor in types.chain(beans) {
            resolved
                .get_or_insert_with(|| PluginType::new(type_name, Self::LABEL))
                .add_constructor(constructor);
        }

        resolved.ok_or_else(|| TypeNotFound::new(type_name, Self::LABEL))
    }

    fn beans(&self) -> Vec<BeanDefinition> {
        PLUGIN_BEANS
            .iter()
            .map(|r| {
                let ptr = r.factory;
                let factory: BeanFactory = Arc::new(ptr);
                BeanDefinition::new(r.type_name, r.bean_name, (r.capability)(), factory)
            })
            .collect()
    }
}
