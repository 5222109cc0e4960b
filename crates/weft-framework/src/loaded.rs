//! Loaded plugins and where they came from.

use std::fmt;
use std::ops::{Deref, DerefMut};

use weft_core::PluginDescriptor;

/// How a plugin object was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginOrigin {
    /// Built through the type's plain constructor.
    Constructed {
        /// Label of the source that resolved the type.
        source: String,
    },
    /// Obtained from the container.
    Injected {
        /// Label of the source that resolved the type.
        source: String,
        /// Identifier of the container that produced the bean.
        container: String,
    },
}

impl PluginOrigin {
    /// Label of the resolving source.
    pub fn source(&self) -> &str {
        match self {
            Self::Constructed { source } | Self::Injected { source, .. } => source,
        }
    }

    /// Returns `true` for container-produced plugins.
    pub fn is_injected(&self) -> bool {
        matches!(self, Self::Injected { .. })
    }
}

impl fmt::Display for PluginOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructed { source } => write!(f, "constructed from '{source}'"),
            Self::Injected { source, container } => {
                write!(f, "injected by '{container}' (type from '{source}')")
            }
        }
    }
}

/// A configured, enabled plugin object and the descriptor it came from.
pub struct LoadedPlugin<P: ?Sized> {
    plugin: Box<P>,
    descriptor: PluginDescriptor,
    origin: PluginOrigin,
}

impl<P: ?Sized> LoadedPlugin<P> {
    pub(crate) fn new(plugin: Box<P>, descriptor: PluginDescriptor, origin: PluginOrigin) -> Self {
        Self {
            plugin,
            descriptor,
            origin,
        }
    }

    /// The plugin object.
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// The descriptor the plugin was loaded from.
    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// How the plugin was produced.
    pub fn origin(&self) -> &PluginOrigin {
        &self.origin
    }

    /// Fully-qualified type name from the descriptor.
    pub fn type_name(&self) -> &str {
        &self.descriptor.type_name
    }

    /// Consumes the wrapper, returning the plugin object.
    pub fn into_plugin(self) -> Box<P> {
        self.plugin
    }
}

impl<P: ?Sized> Deref for LoadedPlugin<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.plugin
    }
}

impl<P: ?Sized> DerefMut for LoadedPlugin<P> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.plugin
    }
}

impl<P: ?Sized> fmt::Debug for LoadedPlugin<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("type_name", &self.descriptor.type_name)
            .field("origin", &self.origin)
            .finish()
    }
}
