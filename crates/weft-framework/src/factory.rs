//! The plugin factory: container bootstrap plus both loading paths.

use std::sync::Arc;

use tracing::info;
use weft_container::ContainerBootstrap;
use weft_core::{Capability, Container, PluginConfigSet, PluginDescriptor, PluginSpec, TypeSource};

use crate::error::{ConfigurationError, ConfigurationResult};
use crate::injected::ContainerPluginLoader;
use crate::report::LoadOutcome;

/// Owns the configuration, the type sources and the container, and builds
/// plugins for any capability.
///
/// # Example
///
/// ```rust,ignore
/// let factory = PluginFactory::new(None, config.plugins, vec![Arc::new(StaticSource)])?;
/// let validators = factory.load::<dyn Validator>();
/// for failure in validators.report.failures() {
///     eprintln!("{failure}");
/// }
/// ```
pub struct PluginFactory {
    config: PluginConfigSet,
    sources: Vec<Arc<dyn TypeSource>>,
    container: Arc<dyn Container>,
}

impl PluginFactory {
    /// Creates a factory, bootstrapping a layered container with the default
    /// context id unless `container` is supplied.
    ///
    /// Fails when neither a container nor a source is given.
    pub fn new(
        container: Option<Arc<dyn Container>>,
        config: PluginConfigSet,
        sources: Vec<Arc<dyn TypeSource>>,
    ) -> ConfigurationResult<Self> {
        Self::with_bootstrap(&ContainerBootstrap::default(), container, config, sources)
    }

    /// Like [`new`](Self::new) with a caller-configured bootstrap.
    pub fn with_bootstrap(
        bootstrap: &ContainerBootstrap,
        container: Option<Arc<dyn Container>>,
        config: PluginConfigSet,
        sources: Vec<Arc<dyn TypeSource>>,
    ) -> ConfigurationResult<Self> {
        if container.is_none() && sources.is_empty() {
            return Err(ConfigurationError::MissingCollaborators);
        }

        let container = bootstrap.bootstrap(container, config.stream_all(), &sources)?;
        info!(
            container = container.id(),
            sources = sources.len(),
            descriptors = config.len(),
            "Plugin factory ready"
        );

        Ok(Self {
            config,
            sources,
            container,
        })
    }

    /// The configured descriptors.
    pub fn config(&self) -> &PluginConfigSet {
        &self.config
    }

    /// Type sources in priority order.
    pub fn sources(&self) -> &[Arc<dyn TypeSource>] {
        &self.sources
    }

    /// The container used for injected descriptors.
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Builds `descriptors` as capability `P`.
    pub fn build<'d, P, I>(&self, descriptors: I) -> LoadOutcome<P>
    where
        P: ?Sized + PluginSpec,
        I: IntoIterator<Item = &'d PluginDescriptor>,
    {
        ContainerPluginLoader::new(&self.sources, self.container.as_ref()).build(descriptors)
    }

    /// Builds the descriptors of the capability's configuration group.
    pub fn load<P: ?Sized + Capability>(&self) -> LoadOutcome<P> {
        let outcome = self.build::<P, _>(self.config.for_capability(P::KEY));
        info!(
            capability = P::KEY,
            stats = %outcome.report.stats(),
            "Loaded capability"
        );
        outcome
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactory")
            .field("descriptors", &self.config.len())
            .field(
                "sources",
                &self.sources.iter().map(|s| s.label()).collect::<Vec<_>>(),
            )
            .field("container", &self.container.id())
            .finish()
    }
}
