//! # Weft Framework
//!
//! Loading policy: how descriptors become plugins.
//!
//! ## Loading Paths
//!
//! - **Plain**: [`BasePluginLoader`] resolves the type across the sources in
//!   order ([`TypeResolver`]), runs its plain constructor, applies the
//!   descriptor and keeps the plugin if `enabled()` holds.
//! - **Injected**: [`ContainerPluginLoader`] runs the plain path for every
//!   non-injected descriptor, then resolves each distinct injected descriptor
//!   and asks the container for the bean, by name when one is declared.
//!
//! [`PluginFactory`] ties both together with a container, either supplied
//! or bootstrapped over the sources.
//!
//! ## Failure Isolation
//!
//! Only setup problems ([`ConfigurationError`]) abort.  Everything that goes
//! wrong for a single descriptor is logged, recorded as a [`LoadFailure`] in
//! the [`LoadReport`] and skipped:
//!
//! | Kind              | Cause                                             | Level |
//! |-------------------|---------------------------------------------------|-------|
//! | `Resolution`      | no source knows the type                          | warn  |
//! | `Construction`    | no plain constructor, constructor error           | warn  |
//! | `InjectionLookup` | no bean, ambiguous bean, wrong type, factory error | error |

pub mod base;
pub mod error;
pub mod factory;
pub mod injected;
pub mod loaded;
pub mod report;
pub mod resolver;

pub use base::BasePluginLoader;
pub use error::{ConfigurationError, ConfigurationResult};
pub use factory::PluginFactory;
pub use injected::ContainerPluginLoader;
pub use loaded::{LoadedPlugin, PluginOrigin};
pub use report::{FailureKind, LoadFailure, LoadOutcome, LoadReport, LoadStats};
pub use resolver::{ResolutionFailure, Resolved, TypeResolver};
