//! # Weft Container
//!
//! The layered bean container used for injected plugins.
//!
//! [`ContainerBootstrap`] either hands back a container the caller supplied
//! or stacks one [`Scope`] per type source into a [`LayeredContainer`]:
//!
//! - every scope scans the same [`PackageScan`], the union of the package
//!   roots of all injection-enabled descriptors;
//! - scope *i* is the parent of scope *i + 1* and the last scope is active;
//! - lookups start at the active scope and fall back towards the root;
//! - bean names must be unique within a scope, checked at refresh.
//!
//! ## Example
//!
//! ```rust,ignore
//! use weft_container::ContainerBootstrap;
//!
//! let container = ContainerBootstrap::default()
//!     .bootstrap(None, config.plugins.stream_all(), &sources)?;
//! let validator = container.named_bean::<dyn Validator>("acme::OwnerCheck", "ownerCheck")?;
//! ```

pub mod bootstrap;
pub mod error;
pub mod layered;
pub mod scan;
pub mod scope;

pub use bootstrap::{ContainerBootstrap, DEFAULT_CONTEXT_ID};
pub use error::{ContainerError, ContainerResult};
pub use layered::{LayeredContainer, LayeredContainerBuilder};
pub use scan::PackageScan;
pub use scope::{Scope, ScopeId};
