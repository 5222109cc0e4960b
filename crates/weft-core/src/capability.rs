//! The plugin object contract and capability identities.
//!
//! A *capability* is the trait object a caller asks for ("give me every
//! configured validator").  Plugins implement a capability trait that has
//! [`PluginSpec`] as a supertrait, and the capability is named by its trait
//! object type:
//!
//! ```rust,ignore
//! pub trait Validator: PluginSpec {
//!     fn validate(&self, input: &str) -> bool;
//! }
//!
//! impl Capability for dyn Validator {
//!     const KEY: &'static str = "validators";
//! }
//! ```
//!
//! Instances cross the type-erased boundary (sources, containers) as
//! [`ErasedPlugin`] (a `Box<dyn Any>` holding a `Box<P>`) and are recovered
//! with [`unerase`].

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::descriptor::PluginDescriptor;

/// A type-erased plugin instance wrapping a `Box<P>`.
pub type ErasedPlugin = Box<dyn Any + Send + Sync>;

/// Erases a capability box so it can travel through sources and containers.
pub fn erase<P: ?Sized + Send + Sync + 'static>(plugin: Box<P>) -> ErasedPlugin {
    Box::new(plugin)
}

/// Recovers a `Box<P>` from an erased plugin, handing the value back on mismatch.
pub fn unerase<P: ?Sized + 'static>(erased: ErasedPlugin) -> Result<Box<P>, ErasedPlugin> {
    erased.downcast::<Box<P>>().map(|boxed| *boxed)
}

// ─── PluginSpec ───────────────────────────────────────────────────────────────

/// Contract every loaded plugin object fulfils.
pub trait PluginSpec: Send + Sync + 'static {
    /// Applies the descriptor the plugin was loaded from.
    fn set_config(&mut self, config: PluginDescriptor);

    /// The descriptor applied by [`set_config`](Self::set_config), if any.
    fn config(&self) -> Option<&PluginDescriptor>;

    /// Whether the plugin takes part in the final result.
    ///
    /// Defaults to the applied descriptor's `enabled` flag.  The loaders call
    /// this after configuration and drop every plugin that answers `false`.
    fn enabled(&self) -> bool {
        self.config().is_some_and(|config| config.enabled)
    }
}

/// A capability trait object with a configuration group key.
pub trait Capability: PluginSpec {
    /// Descriptor group (`PluginDescriptor::capability`) built for this capability.
    const KEY: &'static str;
}

// ─── CapabilityId ─────────────────────────────────────────────────────────────

/// Runtime identity of a capability type.
#[derive(Clone, Copy)]
pub struct CapabilityId {
    type_id: TypeId,
    name: &'static str,
}

impl CapabilityId {
    /// Identity of the capability `P` (usually `dyn Trait`).
    pub fn of<P: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
        }
    }

    /// Rust type name of the capability, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `TypeId` of the capability.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for CapabilityId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CapabilityId {}

impl Hash for CapabilityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape: PluginSpec {
        fn sides(&self) -> u32;
    }

    #[derive(Default)]
    struct Square {
        config: Option<PluginDescriptor>,
    }

    impl PluginSpec for Square {
        fn set_config(&mut self, config: PluginDescriptor) {
            self.config = Some(config);
        }

        fn config(&self) -> Option<&PluginDescriptor> {
            self.config.as_ref()
        }
    }

    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    #[test]
    fn erase_roundtrip_keeps_capability() {
        let plugin: Box<dyn Shape> = Box::new(Square::default());
        let back = unerase::<dyn Shape>(erase(plugin)).ok().unwrap();
        assert_eq!(back.sides(), 4);
    }

    #[test]
    fn unerase_rejects_other_capability() {
        let plugin: Box<dyn Shape> = Box::new(Square::default());
        assert!(unerase::<dyn PluginSpec>(erase(plugin)).is_err());
    }

    #[test]
    fn enabled_follows_applied_config() {
        let mut square = Square::default();
        assert!(!square.enabled());

        square.set_config(PluginDescriptor::new("Square"));
        assert!(square.enabled());

        square.set_config(PluginDescriptor::new("Square").with_enabled(false));
        assert!(!square.enabled());
    }

    #[test]
    fn capability_ids_compare_by_type() {
        assert_eq!(CapabilityId::of::<dyn Shape>(), CapabilityId::of::<dyn Shape>());
        assert_ne!(CapabilityId::of::<dyn Shape>(), CapabilityId::of::<dyn PluginSpec>());
    }
}
