//! Plugin descriptors, the parsed declarative view of one pluggable unit.
//!
//! A [`PluginConfigSet`] is produced once from configuration and treated as
//! read-only afterwards.  Descriptors are compared by value, which is how the
//! container loader collapses duplicates.
//!
//! ```yaml
//! plugins:
//!   - type_name: acme::validators::NameValidator
//!     capability: validators
//!   - type_name: acme::validators::OwnerValidator
//!     injection:
//!       bean_name: ownerValidator
//!       package_scan: [acme::validators]
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_enabled() -> bool {
    true
}

// ─── InjectionSpec ────────────────────────────────────────────────────────────

/// Marks a descriptor as container-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionSpec {
    /// Bean name to match in addition to the type.  Lookup is by type alone
    /// when absent.
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub bean_name: Option<String>,

    /// Package roots scanned by every container scope.
    #[serde(default)]
    pub package_scan: Vec<String>,

    /// Whether this descriptor currently participates in injection.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for InjectionSpec {
    fn default() -> Self {
        Self {
            bean_name: None,
            package_scan: Vec::new(),
            enabled: true,
        }
    }
}

impl InjectionSpec {
    /// Creates an enabled spec that scans the given package roots.
    pub fn scanning<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            package_scan: packages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the bean name to resolve.
    pub fn named(mut self, bean_name: impl Into<String>) -> Self {
        self.bean_name = Some(bean_name.into());
        self
    }

    /// Sets the injection enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ─── PluginDescriptor ─────────────────────────────────────────────────────────

/// Declarative description of one plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Fully-qualified name of the implementing type.
    #[serde(alias = "class_name", alias = "className")]
    pub type_name: String,

    /// Declared-enabled flag.  Disabled descriptors are never attempted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Present iff the plugin is resolved through the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injection: Option<InjectionSpec>,

    /// Capability group this descriptor belongs to (e.g. `"validators"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,

    /// Free-form plugin settings.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub settings: Value,
}

impl PluginDescriptor {
    /// Creates an enabled, non-injected descriptor.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            enabled: true,
            injection: None,
            capability: None,
            settings: Value::Null,
        }
    }

    /// Sets the declared-enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Attaches an injection spec.
    pub fn with_injection(mut self, injection: InjectionSpec) -> Self {
        self.injection = Some(injection);
        self
    }

    /// Assigns the descriptor to a capability group.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = Some(capability.into());
        self
    }

    /// Replaces the free-form settings.
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }

    /// Returns `true` when the injection spec is present and enabled.
    pub fn is_injected(&self) -> bool {
        self.injection.as_ref().is_some_and(|spec| spec.enabled)
    }

    /// Bean name declared by an enabled injection spec.
    pub fn bean_name(&self) -> Option<&str> {
        self.injection
            .as_ref()
            .filter(|spec| spec.enabled)
            .and_then(|spec| spec.bean_name.as_deref())
    }

    /// Deserialises [`settings`](Self::settings) into `T`.
    ///
    /// Absent settings deserialise from an empty object so that structs with
    /// `#[serde(default)]` work without any configuration.
    pub fn settings<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match &self.settings {
            Value::Null => serde_json::from_value(Value::Object(Default::default())),
            value => T::deserialize(value),
        }
    }
}

// ─── PluginConfigSet ──────────────────────────────────────────────────────────

/// Ordered collection of descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginConfigSet {
    plugins: Vec<PluginDescriptor>,
}

impl PluginConfigSet {
    /// Creates a set preserving the given order.
    pub fn new(plugins: Vec<PluginDescriptor>) -> Self {
        Self { plugins }
    }

    /// Appends a descriptor.
    pub fn push(&mut self, descriptor: PluginDescriptor) {
        self.plugins.push(descriptor);
    }

    /// All descriptors in insertion order.
    pub fn stream_all(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter()
    }

    /// Descriptors whose injection spec is present and enabled.
    pub fn injected(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter().filter(|d| d.is_injected())
    }

    /// Descriptors in the given capability group.
    pub fn for_capability<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a PluginDescriptor> {
        self.plugins
            .iter()
            .filter(move |d| d.capability.as_deref() == Some(key))
    }

    /// Borrow the descriptors as a slice.
    pub fn as_slice(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when the set holds no descriptors.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl From<Vec<PluginDescriptor>> for PluginConfigSet {
    fn from(plugins: Vec<PluginDescriptor>) -> Self {
        Self::new(plugins)
    }
}

impl FromIterator<PluginDescriptor> for PluginConfigSet {
    fn from_iter<I: IntoIterator<Item = PluginDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_defaults_from_json() {
        let descriptor: PluginDescriptor =
            serde_json::from_value(json!({ "type_name": "acme::Foo" })).unwrap();

        assert_eq!(descriptor.type_name, "acme::Foo");
        assert!(descriptor.enabled);
        assert!(descriptor.injection.is_none());
        assert!(!descriptor.is_injected());
        assert!(descriptor.settings.is_null());
    }

    #[test]
    fn injection_spec_accepts_name_alias() {
        let descriptor: PluginDescriptor = serde_json::from_value(json!({
            "className": "acme::Bar",
            "injection": { "name": "b1", "package_scan": ["acme"] }
        }))
        .unwrap();

        assert_eq!(descriptor.type_name, "acme::Bar");
        assert!(descriptor.is_injected());
        assert_eq!(descriptor.bean_name(), Some("b1"));
    }

    #[test]
    fn disabled_injection_is_not_injected() {
        let descriptor = PluginDescriptor::new("acme::Bar")
            .with_injection(InjectionSpec::scanning(["acme"]).named("b1").with_enabled(false));

        assert!(!descriptor.is_injected());
        assert_eq!(descriptor.bean_name(), None);
    }

    #[test]
    fn config_set_filters_preserve_order() {
        let set: PluginConfigSet = vec![
            PluginDescriptor::new("a").with_capability("validators"),
            PluginDescriptor::new("b").with_injection(InjectionSpec::scanning(["pkg"])),
            PluginDescriptor::new("c").with_capability("validators"),
            PluginDescriptor::new("d").with_injection(InjectionSpec::default()),
        ]
        .into();

        let all: Vec<_> = set.stream_all().map(|d| d.type_name.as_str()).collect();
        assert_eq!(all, ["a", "b", "c", "d"]);

        let injected: Vec<_> = set.injected().map(|d| d.type_name.as_str()).collect();
        assert_eq!(injected, ["b", "d"]);

        let validators: Vec<_> = set
            .for_capability("validators")
            .map(|d| d.type_name.as_str())
            .collect();
        assert_eq!(validators, ["a", "c"]);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        #[derive(Deserialize, Default, Debug, PartialEq)]
        #[serde(default)]
        struct Limits {
            max_len: usize,
        }

        let bare = PluginDescriptor::new("x");
        assert_eq!(bare.settings::<Limits>().unwrap(), Limits::default());

        let set = PluginDescriptor::new("x").with_settings(json!({ "max_len": 12 }));
        assert_eq!(set.settings::<Limits>().unwrap(), Limits { max_len: 12 });
    }
}
