//! # Weft Core
//!
//! Contracts shared by every layer of the Weft plugin loader.
//!
//! Weft turns a declarative list of plugin descriptors into live plugin
//! objects.  This crate defines the vocabulary the other crates speak:
//!
//! - **Descriptors**: [`PluginDescriptor`], [`InjectionSpec`] and the ordered
//!   [`PluginConfigSet`] parsed from configuration.
//! - **Plugin contract**: [`PluginSpec`] (`set_config` / `enabled`) and
//!   [`Capability`], the trait object a caller asks for.
//! - **Type sources**: [`TypeSource`] with the runtime [`TypeRegistry`] and
//!   the link-time [`StaticSource`].
//! - **Container contract**: [`Container`], [`BeanRequest`] and the bean
//!   vocabulary ([`BeanDefinition`], [`BeanContext`], [`Injectable`]).
//!
//! ## Resolution Flow
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │  Descriptor  │───▶│  TypeSource  │───▶│ plain constructor│──┐
//! │  type_name   │    │  (in order)  │    └──────────────────┘  │  set_config
//! └──────────────┘    └──────────────┘    ┌──────────────────┐  ├─▶ enabled()?
//!                                    └───▶│ Container bean   │──┘
//!                                         └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use weft_core::{Capability, PluginDescriptor, PluginSpec, TypeRegistry, TypeSource};
//!
//! pub trait Validator: PluginSpec {
//!     fn validate(&self, input: &str) -> bool;
//! }
//!
//! impl Capability for dyn Validator {
//!     const KEY: &'static str = "validators";
//! }
//!
//! #[derive(Default)]
//! struct NonEmpty(Option<PluginDescriptor>);
//!
//! impl PluginSpec for NonEmpty {
//!     fn set_config(&mut self, config: PluginDescriptor) {
//!         self.0 = Some(config);
//!     }
//!
//!     fn config(&self) -> Option<&PluginDescriptor> {
//!         self.0.as_ref()
//!     }
//! }
//!
//! impl Validator for NonEmpty {
//!     fn validate(&self, input: &str) -> bool {
//!         !input.is_empty()
//!     }
//! }
//!
//! let registry = TypeRegistry::new("app");
//! registry.register_type::<dyn Validator, _>("app::NonEmpty", || {
//!     Ok(Box::new(NonEmpty::default()))
//! });
//!
//! let mut validator = registry
//!     .resolve("app::NonEmpty")
//!     .unwrap()
//!     .instantiate::<dyn Validator>()
//!     .unwrap();
//! validator.set_config(PluginDescriptor::new("app::NonEmpty"));
//!
//! assert!(validator.enabled());
//! assert!(validator.validate("x"));
//! ```

pub mod bean;
pub mod capability;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod plugin_type;
pub mod registration;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bean::{
    BeanContext, BeanDefinition, BeanFactory, Injectable, ServiceArc, default_bean_name,
};
pub use capability::{Capability, CapabilityId, ErasedPlugin, PluginSpec, erase, unerase};
pub use container::{BeanRequest, Container};
pub use descriptor::{InjectionSpec, PluginConfigSet, PluginDescriptor};
pub use error::{BeanLookupError, BoxError, ConstructionError, TypeNotFound};
pub use plugin_type::{ConstructFn, PluginType, TypeConstructor, split_type_name};
pub use registration::{
    BeanFactoryPtr, BeanRegistration, ConstructPtr, PLUGIN_BEANS, PLUGIN_TYPES, TypeRegistration,
};
pub use source::{StaticSource, TypeRegistry, TypeSource};

// Used by the registration macros.
pub use linkme;
