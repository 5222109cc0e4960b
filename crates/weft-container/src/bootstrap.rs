//! Container bootstrap: reuse a supplied container or build a layered one.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use weft_core::{Container, PluginDescriptor, ServiceArc, TypeSource};

use crate::error::{ContainerError, ContainerResult};
use crate::layered::{LayeredContainer, LayeredContainerBuilder};
use crate::scan::PackageScan;

/// Default context identifier for bootstrapped containers.
pub const DEFAULT_CONTEXT_ID: &str = "custom-plugin";

/// Produces the container used to resolve injected plugins.
#[derive(Clone)]
pub struct ContainerBootstrap {
    context_id: String,
    services: HashMap<TypeId, ServiceArc>,
}

impl Default for ContainerBootstrap {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_ID)
    }
}

impl ContainerBootstrap {
    /// Creates a bootstrap naming its scopes after `context_id`.
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            services: HashMap::new(),
        }
    }

    /// Context identifier used for built containers.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Adds a shared service to the root scope of every built container.
    pub fn with_service<T: ?Sized + Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(service));
        self
    }

    /// Adds an already-erased shared service, keyed by the `TypeId` it is
    /// looked up under.
    pub fn with_erased_service(mut self, type_id: TypeId, service: ServiceArc) -> Self {
        self.services.insert(type_id, service);
        self
    }

    /// Returns `existing` unchanged when supplied, otherwise builds a layered
    /// container over `sources`.
    pub fn bootstrap<'a, I>(
        &self,
        existing: Option<Arc<dyn Container>>,
        descriptors: I,
        sources: &[Arc<dyn TypeSource>],
    ) -> ContainerResult<Arc<dyn Container>>
    where
        I: IntoIterator<Item = &'a PluginDescriptor>,
    {
        if let Some(container) = existing {
            debug!(container = container.id(), "Using supplied container");
            return Ok(container);
        }

        let container = self.build_layered(descriptors, sources)?;
        Ok(Arc::new(container))
    }

    /// Builds a layered container: one scope per source in listed order,
    /// each scanning the union of the injected descriptors' package roots.
    pub fn build_layered<'a, I>(
        &self,
        descriptors: I,
        sources: &[Arc<dyn TypeSource>],
    ) -> ContainerResult<LayeredContainer>
    where
        I: IntoIterator<Item = &'a PluginDescriptor>,
    {
        if sources.is_empty() {
            return Err(ContainerError::NoSources);
        }

        let scan = PackageScan::from_descriptors(descriptors);
        info!(
            context = %self.context_id,
            sources = sources.len(),
            packages = ?scan.roots(),
            "Bootstrapping layered container"
        );

        let mut builder = LayeredContainerBuilder::new(self.context_id.clone()).package_scan(scan);
        for (type_id, service) in &self.services {
            builder = builder.erased_service(*type_id, Arc::clone(service));
        }
        for source in sources {
            builder = builder.scope(source.as_ref());
        }
        builder.refresh()
    }
}

impl std::fmt::Debug for ContainerBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBootstrap")
            .field("context_id", &self.context_id)
            .field("services", &self.services.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::testing::{Greeter, RecordingContainer, StubGreeter};
    use weft_core::{InjectionSpec, TypeRegistry};

    fn bean_source(label: &str, type_name: &str, id: &'static str) -> Arc<dyn TypeSource> {
        let registry = TypeRegistry::new(label);
        registry.register_bean::<dyn Greeter, _>(type_name, None, move |_| {
            Ok(Box::new(StubGreeter::new(id)))
        });
        Arc::new(registry)
    }

    #[test]
    fn supplied_container_is_returned_untouched() {
        let supplied: Arc<dyn Container> = Arc::new(RecordingContainer::new());
        let descriptors =
            [PluginDescriptor::new("pkg::Bar").with_injection(InjectionSpec::scanning(["pkg"]))];

        let container = ContainerBootstrap::default()
            .bootstrap(Some(Arc::clone(&supplied)), &descriptors, &[])
            .unwrap();

        assert!(Arc::ptr_eq(&container, &supplied));
    }

    #[test]
    fn no_sources_and_no_container_fails() {
        let descriptors: [PluginDescriptor; 0] = [];
        let err = ContainerBootstrap::default()
            .bootstrap(None, &descriptors, &[])
            .err()
            .unwrap();
        assert!(matches!(err, ContainerError::NoSources));
    }

    #[test]
    fn builds_one_scope_per_source_in_order() {
        let sources = [
            bean_source("a", "pkg::A", "a"),
            bean_source("b", "pkg::B", "b"),
            bean_source("c", "pkg::C", "c"),
        ];
        let descriptors =
            [PluginDescriptor::new("pkg::A").with_injection(InjectionSpec::scanning(["pkg"]))];

        let container = ContainerBootstrap::new("ctx")
            .build_layered(&descriptors, &sources)
            .unwrap();

        let labels: Vec<_> = container
            .lineage(container.active())
            .map(|(_, scope)| scope.source().to_string())
            .collect();
        assert_eq!(labels, ["c", "b", "a"]);
        assert_eq!(container.depth(), 3);

        let container: &dyn Container = &container;
        assert_eq!(container.bean::<dyn Greeter>("pkg::A").unwrap().id(), "a");
        assert_eq!(container.bean::<dyn Greeter>("pkg::C").unwrap().id(), "c");
    }

    #[test]
    fn empty_scan_yields_no_beans() {
        let sources = [bean_source("a", "pkg::A", "a")];
        let descriptors = [PluginDescriptor::new("pkg::A")];

        let container = ContainerBootstrap::default()
            .build_layered(&descriptors, &sources)
            .unwrap();

        assert!(container.scope(container.active()).unwrap().beans().is_empty());
        assert_eq!(Container::id(&container), "custom-plugin-a");
    }

    #[test]
    fn services_reach_bootstrapped_factories() {
        let registry = TypeRegistry::new("s");
        registry.register_bean::<dyn Greeter, _>("pkg::Configured", None, |ctx| {
            let suffix = ctx.require::<String>()?;
            Ok(Box::new(StubGreeter::new(format!("configured-{suffix}"))))
        });
        let sources: [Arc<dyn TypeSource>; 1] = [Arc::new(registry)];
        let descriptors = [PluginDescriptor::new("pkg::Configured")
            .with_injection(InjectionSpec::scanning(["pkg"]))];

        let container = ContainerBootstrap::default()
            .with_service(Arc::new(String::from("x")))
            .bootstrap(None, &descriptors, &sources)
            .unwrap();

        let greeter = container.bean::<dyn Greeter>("pkg::Configured").unwrap();
        assert_eq!(greeter.id(), "configured-x");
    }
}
