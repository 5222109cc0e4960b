//! Container scopes.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use weft_core::{BeanDefinition, ServiceArc};

/// Index of a scope inside a layered container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    /// Position of the scope in the chain, root first.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One layer of a container: the beans scanned from a single type source.
pub struct Scope {
    pub(crate) name: String,
    pub(crate) source: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) beans: Vec<BeanDefinition>,
    pub(crate) services: HashMap<TypeId, ServiceArc>,
}

impl Scope {
    /// Scope identifier, `{context_id}-{source_label}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the type source the scope was scanned from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parent scope, `None` for the root.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Bean definitions accepted by the package scan.
    pub fn beans(&self) -> &[BeanDefinition] {
        &self.beans
    }

    /// Returns `true` when a shared service of `type_id` lives in this scope.
    pub fn has_service(&self, type_id: TypeId) -> bool {
        self.services.contains_key(&type_id)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("parent", &self.parent)
            .field("beans", &self.beans)
            .field("services", &self.services.len())
            .finish()
    }
}
