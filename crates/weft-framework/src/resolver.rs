//! Ordered type resolution across type sources.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use weft_core::{PluginType, TypeNotFound, TypeSource};

/// A type resolved by one of the sources.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The resolved type.
    pub plugin_type: PluginType,
    /// Position of the winning source in the list.
    pub source_index: usize,
}

/// No source could resolve a type name.
#[derive(Debug, Clone, Error)]
#[error("type '{type_name}' not found in any of {} source(s)", .attempts.len())]
pub struct ResolutionFailure {
    /// The requested type name.
    pub type_name: String,
    /// One entry per source tried, in order.
    pub attempts: Vec<TypeNotFound>,
}

impl ResolutionFailure {
    /// Labels of the sources that were tried.
    pub fn sources_tried(&self) -> Vec<String> {
        self.attempts.iter().map(|a| a.origin.clone()).collect()
    }
}

/// Tries sources in order until one resolves a type name.
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    sources: &'a [Arc<dyn TypeSource>],
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver over `sources`, highest priority first.
    pub fn new(sources: &'a [Arc<dyn TypeSource>]) -> Self {
        Self { sources }
    }

    /// Labels of the sources, in priority order.
    pub fn labels(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.label().to_string()).collect()
    }

    /// Resolves `type_name`; the first source that knows it wins.
    pub fn resolve(&self, type_name: &str) -> Result<Resolved, ResolutionFailure> {
        let mut attempts = Vec::new();

        for (source_index, source) in self.sources.iter().enumerate() {
            match source.resolve(type_name) {
                Ok(plugin_type) => {
                    return Ok(Resolved {
                        plugin_type,
                        source_index,
                    });
                }
                Err(miss) => {
                    warn!(type_name, source = source.label(), "Type not found in source");
                    attempts.push(miss);
                }
            }
        }

        Err(ResolutionFailure {
            type_name: type_name.to_string(),
            attempts,
        })
    }
}

impl std::fmt::Debug for TypeResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeResolver")
            .field("sources", &self.labels())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::testing::greeter_registry;

    fn sources() -> Vec<Arc<dyn TypeSource>> {
        vec![
            Arc::new(greeter_registry("s1", &["acme::Foo"])),
            Arc::new(greeter_registry("s2", &["acme::Foo", "acme::Bar"])),
        ]
    }

    #[test]
    fn first_source_wins() {
        let sources = sources();
        let resolved = TypeResolver::new(&sources).resolve("acme::Foo").unwrap();
        assert_eq!(resolved.source_index, 0);
        assert_eq!(resolved.plugin_type.origin(), "s1");
    }

    #[test]
    fn later_sources_are_tried_in_order() {
        let sources = sources();
        let resolved = TypeResolver::new(&sources).resolve("acme::Bar").unwrap();
        assert_eq!(resolved.source_index, 1);
    }

    #[test]
    fn failure_lists_every_attempt() {
        let sources = sources();
        let failure = TypeResolver::new(&sources).resolve("acme::Missing").unwrap_err();
        assert_eq!(failure.type_name, "acme::Missing");
        assert_eq!(failure.sources_tried(), ["s1", "s2"]);
        assert!(failure.to_string().contains("2 source(s)"));
    }

    #[test]
    fn empty_source_list_never_resolves() {
        let failure = TypeResolver::new(&[]).resolve("acme::Foo").unwrap_err();
        assert!(failure.attempts.is_empty());
    }
}
