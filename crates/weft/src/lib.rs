//! # Weft
//!
//! Configuration-driven plugin loading with optional container injection.
//!
//! ## Overview
//!
//! A host declares its plugins as descriptors: a type name, an enabled flag
//! and, for container-managed plugins, a bean name and the package roots the
//! container should scan.  Weft resolves every type name across an ordered
//! list of type sources, builds the plain ones directly, asks a layered
//! container for the injected ones, hands each plugin its descriptor and
//! keeps those that report themselves enabled.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌──────────────┐     ┌──────────────────────────────┐
//! │  Config   │────▶│ PluginFactory│────▶│ BasePluginLoader   (plain)   │──▶ plugins
//! │ (figment) │     │              │────▶│ ContainerPluginLoader (beans)│──▶ + LoadReport
//! └───────────┘     └──────┬───────┘     └──────────────────────────────┘
//!                          │ bootstrap
//!                   ┌──────▼────────────────────────┐
//!                   │ LayeredContainer: one scope   │
//!                   │ per source, child → parent    │
//!                   └───────────────────────────────┘
//! ```
//!
//! - **Core**: descriptors, the plugin contract, type sources
//! - **Container**: package scan, scopes, bootstrap
//! - **Framework**: resolver, both loaders, the load report
//! - **Runtime**: configuration, logging, `PluginRuntime`
//! - **Macros**: `#[plugin_type]` and `#[bean]` registration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weft::prelude::*;
//!
//! pub trait Validator: PluginSpec {
//!     fn validate(&self, input: &str) -> bool;
//! }
//!
//! impl Capability for dyn Validator {
//!     const KEY: &'static str = "validators";
//! }
//!
//! #[plugin_type(dyn Validator)]
//! #[derive(Default)]
//! pub struct NonEmpty {
//!     config: Option<PluginDescriptor>,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = PluginRuntime::builder().config_file("weft.toml").build()?;
//!     let validators = runtime.load::<dyn Validator>();
//!     println!("{}", validators.report.stats());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use weft_container as container;
pub use weft_core as core;
pub use weft_framework as framework;
pub use weft_runtime as runtime;

pub use weft_macros::{bean, plugin_type};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use weft::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use weft_runtime::{PluginRuntime, WeftConfig};

    // Plugin contract
    pub use weft_core::{
        BeanContext, BoxError, Capability, InjectionSpec, Injectable, PluginConfigSet,
        PluginDescriptor, PluginSpec,
    };

    // Sources and container
    pub use weft_container::ContainerBootstrap;
    pub use weft_core::{Container, StaticSource, TypeRegistry, TypeSource};

    // Loading
    pub use weft_framework::{FailureKind, LoadOutcome, LoadReport, LoadedPlugin, PluginFactory};

    // Registration macros
    pub use weft_macros::{bean, plugin_type};
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::prelude::*;

    trait Shout: PluginSpec {
        fn shout(&self) -> String;
    }

    impl Capability for dyn Shout {
        const KEY: &'static str = "shouters";
    }

    trait Whisper: PluginSpec {
        fn whisper(&self) -> String;
    }

    impl Capability for dyn Whisper {
        const KEY: &'static str = "whisperers";
    }

    struct Volume(u8);

    macro_rules! plugin_spec {
        ($ty:ty) => {
            impl PluginSpec for $ty {
                fn set_config(&mut self, config: PluginDescriptor) {
                    self.config = Some(config);
                }

                fn config(&self) -> Option<&PluginDescriptor> {
                    self.config.as_ref()
                }
            }
        };
    }

    #[plugin_type(dyn Shout)]
    #[derive(Default)]
    struct Loud {
        config: Option<PluginDescriptor>,
    }

    plugin_spec!(Loud);

    impl Shout for Loud {
        fn shout(&self) -> String {
            "HEY".to_string()
        }
    }

    #[plugin_type(dyn Shout, dyn Whisper)]
    #[derive(Default)]
    struct Both {
        config: Option<PluginDescriptor>,
    }

    plugin_spec!(Both);

    impl Shout for Both {
        fn shout(&self) -> String {
            "BOTH".to_string()
        }
    }

    impl Whisper for Both {
        fn whisper(&self) -> String {
            "both".to_string()
        }
    }

    #[plugin_type(dyn Shout, type_name = "legacy.Echo")]
    #[derive(Default)]
    struct Echo {
        config: Option<PluginDescriptor>,
    }

    plugin_spec!(Echo);

    impl Shout for Echo {
        fn shout(&self) -> String {
            "echo".to_string()
        }
    }

    #[bean(dyn Shout, name = "measured")]
    struct Measured {
        volume: Arc<Volume>,
        config: Option<PluginDescriptor>,
    }

    plugin_spec!(Measured);

    impl Injectable for Measured {
        fn inject(ctx: &dyn BeanContext) -> Result<Self, BoxError> {
            Ok(Self {
                volume: ctx.require::<Volume>()?,
                config: None,
            })
        }
    }

    impl Shout for Measured {
        fn shout(&self) -> String {
            "!".repeat(self.volume.0 as usize)
        }
    }

    #[bean(dyn Shout)]
    struct Anonymous {
        config: Option<PluginDescriptor>,
    }

    plugin_spec!(Anonymous);

    impl Injectable for Anonymous {
        fn inject(_ctx: &dyn BeanContext) -> Result<Self, BoxError> {
            Ok(Self { config: None })
        }
    }

    impl Shout for Anonymous {
        fn shout(&self) -> String {
            "anonymous".to_string()
        }
    }

    fn factory(plugins: Vec<PluginDescriptor>) -> PluginFactory {
        let bootstrap = ContainerBootstrap::new("macros").with_service(Arc::new(Volume(3)));
        let sources: Vec<Arc<dyn TypeSource>> = vec![Arc::new(StaticSource)];
        PluginFactory::with_bootstrap(&bootstrap, None, plugins.into(), sources).unwrap()
    }

    #[test]
    fn plugin_type_registers_under_module_path() {
        let ty = StaticSource.resolve("weft::tests::Loud").unwrap();
        assert_eq!(ty.origin(), "static");
        assert!(ty.implements(crate::core::CapabilityId::of::<dyn Shout>()));
        assert!(!ty.implements(crate::core::CapabilityId::of::<dyn Whisper>()));
    }

    #[test]
    fn one_type_can_serve_several_capabilities() {
        let ty = StaticSource.resolve("weft::tests::Both").unwrap();
        assert_eq!(ty.capabilities().count(), 2);

        let whisperer = ty.instantiate::<dyn Whisper>().unwrap();
        assert_eq!(whisperer.whisper(), "both");
    }

    #[test]
    fn type_name_override_is_used_verbatim() {
        assert!(StaticSource.resolve("legacy.Echo").is_ok());
        assert!(StaticSource.resolve("weft::tests::Echo").is_err());
    }

    #[test]
    fn beans_carry_explicit_and_default_names() {
        let mut names: Vec<String> = StaticSource
            .beans()
            .iter()
            .map(|bean| bean.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["anonymous", "measured"]);
    }

    #[test]
    fn factory_loads_plain_and_injected_registrations() {
        let factory = factory(vec![
            PluginDescriptor::new("weft::tests::Loud").with_capability("shouters"),
            PluginDescriptor::new("weft::tests::Measured")
                .with_capability("shouters")
                .with_injection(InjectionSpec::scanning(["weft::tests"]).named("measured")),
            PluginDescriptor::new("weft::tests::Anonymous")
                .with_capability("shouters")
                .with_injection(InjectionSpec::scanning(["weft::tests"])),
            PluginDescriptor::new("legacy.Echo")
                .with_capability("shouters")
                .with_enabled(false),
        ]);

        let outcome = factory.load::<dyn Shout>();

        let shouts: Vec<_> = outcome.plugins.iter().map(|p| p.shout()).collect();
        assert_eq!(shouts, ["HEY", "!!!", "anonymous"]);
        assert_eq!(outcome.report.stats().skipped, 1);
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn bean_only_types_cannot_be_built_plainly() {
        let factory = factory(vec![
            PluginDescriptor::new("weft::tests::Measured").with_capability("shouters"),
        ]);

        let outcome = factory.load::<dyn Shout>();

        assert!(outcome.is_empty());
        assert_eq!(outcome.report.failures()[0].kind, FailureKind::Construction);
    }

    #[test]
    fn beans_outside_the_scan_are_not_found() {
        let factory = factory(vec![
            PluginDescriptor::new("weft::tests::Measured")
                .with_capability("shouters")
                .with_injection(InjectionSpec::scanning(["elsewhere"]).named("measured")),
        ]);

        let outcome = factory.load::<dyn Shout>();

        assert!(outcome.is_empty());
        assert_eq!(
            outcome.report.failures()[0].kind,
            FailureKind::InjectionLookup
        );
    }
}
