//! Shared fixtures for tests in this and downstream crates.
//!
//! Enabled with the `testing` feature.

use parking_lot::Mutex;

use crate::capability::{Capability, CapabilityId, ErasedPlugin, PluginSpec, erase};
use crate::container::{BeanRequest, Container};
use crate::descriptor::PluginDescriptor;
use crate::error::BeanLookupError;
use crate::plugin_type::split_type_name;
use crate::source::TypeRegistry;

/// Sample capability used throughout the test suites.
pub trait Greeter: PluginSpec {
    /// Returns a greeting for `name`.
    fn greet(&self, name: &str) -> String;

    /// Identifier of the implementation that produced this greeter.
    fn id(&self) -> &str;
}

impl Capability for dyn Greeter {
    const KEY: &'static str = "greeters";
}

/// A greeter whose `enabled()` follows its applied descriptor.
#[derive(Debug, Default)]
pub struct StubGreeter {
    id: String,
    config: Option<PluginDescriptor>,
}

impl StubGreeter {
    /// Creates a greeter identified by `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config: None,
        }
    }
}

impl PluginSpec for StubGreeter {
    fn set_config(&mut self, config: PluginDescriptor) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&PluginDescriptor> {
        self.config.as_ref()
    }
}

impl Greeter for StubGreeter {
    fn greet(&self, name: &str) -> String {
        format!("{}: hello {name}", self.id)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// A greeter that always reports itself disabled.
#[derive(Debug, Default)]
pub struct MutedGreeter {
    config: Option<PluginDescriptor>,
}

impl PluginSpec for MutedGreeter {
    fn set_config(&mut self, config: PluginDescriptor) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&PluginDescriptor> {
        self.config.as_ref()
    }

    fn enabled(&self) -> bool {
        false
    }
}

impl Greeter for MutedGreeter {
    fn greet(&self, _name: &str) -> String {
        String::new()
    }

    fn id(&self) -> &str {
        "muted"
    }
}

/// Builds a registry that resolves every name in `type_names` to a
/// [`StubGreeter`] identified by the simple type name.
pub fn greeter_registry(label: &str, type_names: &[&str]) -> TypeRegistry {
    let registry = TypeRegistry::new(label);
    for type_name in type_names {
        let id = split_type_name(type_name).1.to_string();
        registry.register_type::<dyn Greeter, _>(*type_name, move || {
            Ok(Box::new(StubGreeter::new(id.clone())))
        });
    }
    registry
}

/// A request observed by [`RecordingContainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested type name.
    pub type_name: String,
    /// Requested bean name.
    pub name: Option<String>,
}

/// Container double that records every lookup and answers with a
/// [`StubGreeter`] named after the request.
#[derive(Debug, Default)]
pub struct RecordingContainer {
    requests: Mutex<Vec<RecordedRequest>>,
    missing: Vec<String>,
}

impl RecordingContainer {
    /// Creates a container that answers every greeter lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes lookups of `type_name` fail with `NoSuchBean`.
    pub fn without(mut self, type_name: impl Into<String>) -> Self {
        self.missing.push(type_name.into());
        self
    }

    /// Requests observed so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

impl Container for RecordingContainer {
    fn id(&self) -> &str {
        "recording"
    }

    fn get_bean(&self, request: &BeanRequest<'_>) -> Result<ErasedPlugin, BeanLookupError> {
        self.requests.lock().push(RecordedRequest {
            type_name: request.type_name.to_string(),
            name: request.name.map(str::to_string),
        });

        if request.capability != CapabilityId::of::<dyn Greeter>()
            || self.missing.iter().any(|t| t == request.type_name)
        {
            return Err(BeanLookupError::NoSuchBean {
                type_name: request.type_name.to_string(),
                capability: request.capability.name(),
            });
        }

        let id = request
            .name
            .unwrap_or_else(|| split_type_name(request.type_name).1);
        let greeter: Box<dyn Greeter> = Box::new(StubGreeter::new(id));
        Ok(erase(greeter))
    }
}
