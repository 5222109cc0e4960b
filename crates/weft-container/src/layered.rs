//! A chain of container scopes with child-first lookup.
//!
//! Scopes are kept in an arena ordered root first.  Scope *i* has scope
//! *i − 1* as its parent, and the last scope is the active one: every lookup
//! starts there and walks towards the root until a scope has a match.
//!
//! ```text
//!   scope #0 (source A)  ◀── parent ──  scope #1 (source B)  ◀── parent ──  scope #2 (source C)
//!                                                                            ▲ active
//! ```
//!
//! Beans are prototypes: every successful lookup runs the definition's
//! factory again.  Long-lived collaborators belong in shared services, which
//! factories reach through their [`BeanContext`].

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::{debug, info, trace};
use weft_core::{
    BeanContext, BeanDefinition, BeanLookupError, BeanRequest, Container, ErasedPlugin,
    ServiceArc, TypeSource,
};

use crate::error::{ContainerError, ContainerResult};
use crate::scan::PackageScan;
use crate::scope::{Scope, ScopeId};

// ─── Builder ──────────────────────────────────────────────────────────────────

/// Collects scopes and services before the container is refreshed.
pub struct LayeredContainerBuilder {
    context_id: String,
    scan: PackageScan,
    scopes: Vec<Scope>,
    root_services: HashMap<TypeId, ServiceArc>,
}

impl LayeredContainerBuilder {
    /// Creates a builder whose scopes are named after `context_id`.
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            scan: PackageScan::new(),
            scopes: Vec::new(),
            root_services: HashMap::new(),
        }
    }

    /// Sets the package roots every scope added afterwards scans.
    pub fn package_scan(mut self, scan: PackageScan) -> Self {
        self.scan = scan;
        self
    }

    /// Registers a shared service on the root scope.
    ///
    /// The service is stored under the `TypeId` of `T`, so register trait
    /// objects as `Arc<dyn Trait>`.
    pub fn service<T: ?Sized + Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.root_services.insert(TypeId::of::<T>(), Arc::new(service));
        self
    }

    /// Registers an already-erased shared service on the root scope.
    pub fn erased_service(mut self, type_id: TypeId, service: ServiceArc) -> Self {
        self.root_services.insert(type_id, service);
        self
    }

    /// Adds a scope for `source`, parented to the previously added scope.
    pub fn scope(mut self, source: &dyn TypeSource) -> Self {
        let index = self.scopes.len();
        let name = format!("{}-{}", self.context_id, source.label());
        let parent = index.checked_sub(1).map(ScopeId);

        let beans: Vec<BeanDefinition> = source
            .beans()
            .into_iter()
            .filter(|def| self.scan.matches(def.package()))
            .collect();

        debug!(
            scope = %name,
            source = source.label(),
            parent = ?parent,
            beans = beans.len(),
            "Scanned container scope"
        );

        self.scopes.push(Scope {
            name,
            source: source.label().to_string(),
            parent,
            beans,
            services: HashMap::new(),
        });
        self
    }

    /// Finalizes the chain.
    ///
    /// Fails when no scope was added or when a scope holds two definitions
    /// with the same bean name.
    pub fn refresh(mut self) -> ContainerResult<LayeredContainer> {
        if self.scopes.is_empty() {
            return Err(ContainerError::NoSources);
        }

        for scope in &self.scopes {
            let mut seen: HashMap<&str, &BeanDefinition> = HashMap::new();
            for def in &scope.beans {
                match seen.entry(def.name()) {
                    Entry::Occupied(first) => {
                        return Err(ContainerError::DuplicateBeanName {
                            scope: scope.name.clone(),
                            name: def.name().to_string(),
                            first: first.get().type_name().to_string(),
                            second: def.type_name().to_string(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(def);
                    }
                }
            }
        }

        self.scopes[0].services = std::mem::take(&mut self.root_services);
        let active = ScopeId(self.scopes.len() - 1);

        info!(
            context = %self.context_id,
            scopes = self.scopes.len(),
            active = %self.scopes[active.0].name,
            "Container refreshed"
        );

        Ok(LayeredContainer {
            context_id: self.context_id,
            scopes: self.scopes,
            active,
        })
    }
}

// ─── LayeredContainer ─────────────────────────────────────────────────────────

/// A refreshed, immutable chain of scopes.
pub struct LayeredContainer {
    context_id: String,
    scopes: Vec<Scope>,
    active: ScopeId,
}

impl LayeredContainer {
    /// Starts a builder.
    pub fn builder(context_id: impl Into<String>) -> LayeredContainerBuilder {
        LayeredContainerBuilder::new(context_id)
    }

    /// Context identifier the scopes are named after.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// The deepest scope, where lookups start.
    pub fn active(&self) -> ScopeId {
        self.active
    }

    /// Number of scopes in the chain.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Returns the scope with the given id.
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// Returns the parent of `id`.
    pub fn parent_of(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).and_then(Scope::parent)
    }

    /// Iterates from `id` to the root.
    pub fn lineage(&self, id: ScopeId) -> impl Iterator<Item = (ScopeId, &Scope)> + '_ {
        std::iter::successors(self.scope(id).map(|s| (id, s)), |(_, scope)| {
            scope
                .parent
                .and_then(|parent| self.scope(parent).map(|s| (parent, s)))
        })
    }

    /// Scopes in chain order, root first.
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> + '_ {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }

    fn find(
        &self,
        request: &BeanRequest<'_>,
    ) -> Result<(ScopeId, &BeanDefinition), BeanLookupError> {
        for (id, scope) in self.lineage(self.active) {
            match request.name {
                Some(name) => {
                    let Some(def) = scope.beans.iter().find(|def| def.name() == name) else {
                        continue;
                    };
                    if def.type_name() != request.type_name {
                        return Err(BeanLookupError::TypeMismatch {
                            name: name.to_string(),
                            expected: request.type_name.to_string(),
                            actual: def.type_name().to_string(),
                        });
                    }
                    if def.capability() != request.capability {
                        return Err(BeanLookupError::Downcast {
                            name: name.to_string(),
                            capability: request.capability.name(),
                        });
                    }
                    return Ok((id, def));
                }
                None => {
                    let mut candidates = scope
                        .beans
                        .iter()
                        .filter(|def| def.produces(request.type_name, request.capability));
                    let Some(first) = candidates.next() else {
                        continue;
                    };
                    let rest: Vec<&BeanDefinition> = candidates.collect();
                    if !rest.is_empty() {
                        return Err(BeanLookupError::NotUnique {
                            type_name: request.type_name.to_string(),
                            candidates: std::iter::once(first)
                                .chain(rest)
                                .map(|def| def.name().to_string())
                                .collect(),
                        });
                    }
                    return Ok((id, first));
                }
            }
        }

        Err(match request.name {
            Some(name) => BeanLookupError::NoSuchNamedBean {
                type_name: request.type_name.to_string(),
                name: name.to_string(),
            },
            None => BeanLookupError::NoSuchBean {
                type_name: request.type_name.to_string(),
                capability: request.capability.name(),
            },
        })
    }
}

impl Container for LayeredContainer {
    fn id(&self) -> &str {
        &self.scopes[self.active.0].name
    }

    fn get_bean(&self, request: &BeanRequest<'_>) -> Result<ErasedPlugin, BeanLookupError> {
        let (scope, def) = self.find(request)?;
        trace!(
            bean = def.name(),
            type_name = def.type_name(),
            scope = %self.scopes[scope.0].name,
            "Creating bean"
        );

        let ctx = ScopeContext {
            container: self,
            scope,
        };
        def.create(&ctx).map_err(|source| BeanLookupError::Creation {
            name: def.name().to_string(),
            source,
        })
    }
}

impl Drop for LayeredContainer {
    fn drop(&mut self) {
        while let Some(scope) = self.scopes.pop() {
            debug!(scope = %scope.name, beans = scope.beans.len(), "Closing container scope");
        }
    }
}

impl std::fmt::Debug for LayeredContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredContainer")
            .field("context_id", &self.context_id)
            .field("scopes", &self.scopes)
            .field("active", &self.active)
            .finish()
    }
}

// ─── ScopeContext ─────────────────────────────────────────────────────────────

/// The [`BeanContext`] handed to factories of one scope.
struct ScopeContext<'a> {
    container: &'a LayeredContainer,
    scope: ScopeId,
}

impl BeanContext for ScopeContext<'_> {
    fn scope_name(&self) -> &str {
        &self.container.scopes[self.scope.0].name
    }

    fn service_by_type_id(&self, type_id: TypeId) -> Option<ServiceArc> {
        self.container
            .lineage(self.scope)
            .find_map(|(_, scope)| scope.services.get(&type_id).map(Arc::clone))
    }
}
