//! Runtime wiring: configuration, then logging, then the plugin factory.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use weft_runtime::PluginRuntime;
//!
//! // Search weft.toml / weft.yaml in the current directory
//! let runtime = PluginRuntime::builder().build()?;
//! let validators = runtime.load::<dyn Validator>();
//!
//! // Specific file and profile
//! let runtime = PluginRuntime::builder()
//!     .config_file("config/weft.yaml")
//!     .profile("production")
//!     .build()?;
//! ```

use std::any::TypeId;
use std::path::Path;
use std::sync::Arc;

use figment::Provider;
use serde::Serialize;
use tracing::info;
use weft_container::ContainerBootstrap;
use weft_core::{Capability, Container, ServiceArc, StaticSource, TypeSource};
use weft_framework::{LoadOutcome, PluginFactory};

use crate::config::{ConfigFormat, ConfigLoader, WeftConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// A loaded configuration together with the factory built from it.
pub struct PluginRuntime {
    config: WeftConfig,
    factory: PluginFactory,
}

impl PluginRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Validates the configuration, initializes logging from
    /// `config.logging` and bootstraps a container named after
    /// `config.container.context_id`.
    pub fn from_config(
        config: WeftConfig,
        sources: Vec<Arc<dyn TypeSource>>,
    ) -> RuntimeResult<Self> {
        validate_config(&config)?;
        logging::init_from_config(&config.logging);
        Self::assemble(config, sources, None, Vec::new())
    }

    fn assemble(
        config: WeftConfig,
        sources: Vec<Arc<dyn TypeSource>>,
        container: Option<Arc<dyn Container>>,
        services: Vec<(TypeId, ServiceArc)>,
    ) -> RuntimeResult<Self> {
        let mut bootstrap = ContainerBootstrap::new(config.container.context_id.clone());
        for (type_id, service) in services {
            bootstrap = bootstrap.with_erased_service(type_id, service);
        }

        let factory =
            PluginFactory::with_bootstrap(&bootstrap, container, config.plugins.clone(), sources)?;

        info!(
            context_id = %config.container.context_id,
            plugins = config.plugins.len(),
            container = factory.container().id(),
            "Plugin runtime ready"
        );

        Ok(Self { config, factory })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WeftConfig {
        &self.config
    }

    /// Returns the plugin factory.
    pub fn factory(&self) -> &PluginFactory {
        &self.factory
    }

    /// Builds the descriptors of capability `P`'s configuration group.
    pub fn load<P: ?Sized + Capability>(&self) -> LoadOutcome<P> {
        self.factory.load::<P>()
    }
}

impl std::fmt::Debug for PluginRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRuntime")
            .field("context_id", &self.config.container.context_id)
            .field("factory", &self.factory)
            .finish()
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`PluginRuntime`].
///
/// Without an explicit [`source`](Self::source) the runtime resolves types
/// registered with `#[plugin_type]` and `#[bean]` through [`StaticSource`].
///
/// # Example
///
/// ```rust,ignore
/// let runtime = PluginRuntime::builder()
///     .config_file("weft.toml")
///     .service::<dyn Directory>(Arc::new(LdapDirectory::connect()?))
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    sources: Vec<Arc<dyn TypeSource>>,
    container: Option<Arc<dyn Container>>,
    services: Vec<(TypeId, ServiceArc)>,
    init_logging: bool,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder searching the current directory.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            sources: Vec::new(),
            container: None,
            services: Vec::new(),
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Uses an in-memory configuration document.
    pub fn config_str(mut self, format: ConfigFormat, text: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.document(format, text);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Replaces the built-in configuration defaults.
    pub fn defaults(mut self, config: WeftConfig) -> Self {
        self.config_loader = self.config_loader.defaults(config);
        self
    }

    /// Merges a provider over files and the environment.
    pub fn merge<T: Provider>(mut self, provider: T) -> Self {
        self.config_loader = self.config_loader.merge(provider);
        self
    }

    /// Overrides a single dotted configuration key.
    pub fn set<V: Serialize>(mut self, key: &str, value: V) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Appends a type source; the first one added has the highest priority.
    pub fn source(mut self, source: Arc<dyn TypeSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Uses an existing container instead of bootstrapping one.
    pub fn container(mut self, container: Arc<dyn Container>) -> Self {
        self.container = Some(container);
        self
    }

    /// Registers a shared service on the root scope of the bootstrapped
    /// container.
    pub fn service<T: ?Sized + Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.services.push((TypeId::of::<T>(), Arc::new(service)));
        self
    }

    /// Leaves logging setup to the caller.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Loads the configuration, initializes logging and builds the factory.
    pub fn build(self) -> RuntimeResult<PluginRuntime> {
        let config = self.config_loader.load()?;
        if self.init_logging {
            logging::init_from_config(&config.logging);
        }

        let sources = if self.sources.is_empty() {
            vec![Arc::new(StaticSource) as Arc<dyn TypeSource>]
        } else {
            self.sources
        };

        PluginRuntime::assemble(config, sources, self.container, self.services)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
