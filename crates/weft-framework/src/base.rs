//! Plain-construction loader for non-injected descriptors.

use std::sync::Arc;

use tracing::{debug, warn};
use weft_core::{PluginDescriptor, PluginSpec, TypeSource};

use crate::loaded::{LoadedPlugin, PluginOrigin};
use crate::report::{FailureKind, LoadFailure, LoadOutcome};
use crate::resolver::TypeResolver;

/// Resolves each descriptor's type across the sources, constructs it through
/// its plain constructor, applies the descriptor and keeps the enabled ones.
#[derive(Debug, Clone, Copy)]
pub struct BasePluginLoader<'a> {
    resolver: TypeResolver<'a>,
}

impl<'a> BasePluginLoader<'a> {
    /// Creates a loader over `sources`, highest priority first.
    pub fn new(sources: &'a [Arc<dyn TypeSource>]) -> Self {
        Self {
            resolver: TypeResolver::new(sources),
        }
    }

    /// Builds every descriptor as capability `P`, in order.
    ///
    /// Descriptors declared disabled are skipped without an attempt.  A
    /// descriptor that fails leaves no placeholder in the result.
    pub fn build<'d, P, I>(&self, descriptors: I) -> LoadOutcome<P>
    where
        P: ?Sized + PluginSpec,
        I: IntoIterator<Item = &'d PluginDescriptor>,
    {
        let mut outcome = LoadOutcome::empty();

        for descriptor in descriptors {
            if !descriptor.enabled {
                debug!(type_name = %descriptor.type_name, "Skipping disabled descriptor");
                outcome.report.skipped();
                continue;
            }
            outcome.report.attempted();

            let resolved = match self.resolver.resolve(&descriptor.type_name) {
                Ok(resolved) => resolved,
                Err(failure) => {
                    warn!(
                        type_name = %descriptor.type_name,
                        sources = ?failure.sources_tried(),
                        "Failed to resolve plugin type"
                    );
                    outcome.report.fail(LoadFailure::resolution(&failure));
                    continue;
                }
            };

            let plugin = match resolved.plugin_type.instantiate::<P>() {
                Ok(plugin) => plugin,
                Err(error) => {
                    warn!(
                        type_name = %descriptor.type_name,
                        source = resolved.plugin_type.origin(),
                        error = %error,
                        "Failed to construct plugin"
                    );
                    let tried = self.resolver.labels()[..=resolved.source_index].to_vec();
                    outcome.report.fail(LoadFailure::new(
                        FailureKind::Construction,
                        &descriptor.type_name,
                        tried,
                        error,
                    ));
                    continue;
                }
            };

            let origin = PluginOrigin::Constructed {
                source: resolved.plugin_type.origin().to_string(),
            };
            admit(&mut outcome, plugin, descriptor, origin);
        }

        outcome
    }
}

/// Applies the descriptor and keeps the plugin when it reports itself enabled.
pub(crate) fn admit<P: ?Sized + PluginSpec>(
    outcome: &mut LoadOutcome<P>,
    mut plugin: Box<P>,
    descriptor: &PluginDescriptor,
    origin: PluginOrigin,
) {
    plugin.set_config(descriptor.clone());

    if !plugin.enabled() {
        debug!(type_name = %descriptor.type_name, "Plugin disabled after configuration");
        outcome.report.disabled();
        return;
    }

    debug!(type_name = %descriptor.type_name, origin = %origin, "Loaded plugin");
    outcome.report.loaded();
    outcome
        .plugins
        .push(LoadedPlugin::new(plugin, descriptor.clone(), origin));
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::testing::{Greeter, MutedGreeter, StubGreeter, greeter_registry};
    use weft_core::{BoxError, TypeRegistry};

    fn descriptors(names: &[&str]) -> Vec<PluginDescriptor> {
        names.iter().map(|n| PluginDescriptor::new(*n)).collect()
    }

    #[test]
    fn preserves_descriptor_order() {
        let sources: Vec<Arc<dyn TypeSource>> =
            vec![Arc::new(greeter_registry("s1", &["a::One", "a::Two", "a::Three"]))];
        let input = descriptors(&["a::Three", "a::One", "a::Two"]);

        let outcome = BasePluginLoader::new(&sources).build::<dyn Greeter, _>(&input);

        assert_eq!(outcome.type_names(), ["a::Three", "a::One", "a::Two"]);
        let ids: Vec<_> = outcome.plugins.iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, ["Three", "One", "Two"]);
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn unresolvable_descriptor_is_isolated() {
        let sources: Vec<Arc<dyn TypeSource>> =
            vec![Arc::new(greeter_registry("s1", &["a::Foo"]))];
        let input = descriptors(&["a::Foo", "a::Missing"]);

        let outcome = BasePluginLoader::new(&sources).build::<dyn Greeter, _>(&input);

        assert_eq!(outcome.type_names(), ["a::Foo"]);
        let failures = outcome.report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Resolution);
        assert_eq!(failures[0].type_name, "a::Missing");
        assert_eq!(failures[0].sources_tried, ["s1"]);
    }

    #[test]
    fn plugins_reporting_disabled_are_dropped() {
        let registry = greeter_registry("s1", &["a::Loud"]);
        registry.register_type::<dyn Greeter, _>("a::Muted", || {
            Ok(Box::new(MutedGreeter::default()))
        });
        let sources: Vec<Arc<dyn TypeSource>> = vec![Arc::new(registry)];
        let input = descriptors(&["a::Loud", "a::Muted"]);

        let outcome = BasePluginLoader::new(&sources).build::<dyn Greeter, _>(&input);

        assert_eq!(outcome.type_names(), ["a::Loud"]);
        assert_eq!(outcome.report.stats().disabled, 1);
        assert!(outcome.plugins.iter().all(|p| p.enabled()));
    }

    #[test]
    fn declared_disabled_descriptors_are_not_attempted() {
        let sources: Vec<Arc<dyn TypeSource>> =
            vec![Arc::new(greeter_registry("s1", &["a::Foo"]))];
        let input = vec![
            PluginDescriptor::new("a::Foo").with_enabled(false),
            PluginDescriptor::new("a::Missing").with_enabled(false),
        ];

        let outcome = BasePluginLoader::new(&sources).build::<dyn Greeter, _>(&input);

        assert!(outcome.is_empty());
        assert!(outcome.report.is_clean());
        assert_eq!(outcome.report.stats().skipped, 2);
        assert_eq!(outcome.report.stats().attempted, 0);
    }

    #[test]
    fn configuration_is_applied_before_admission() {
        let sources: Vec<Arc<dyn TypeSource>> =
            vec![Arc::new(greeter_registry("s1", &["a::Foo"]))];
        let input = vec![PluginDescriptor::new("a::Foo").with_capability("greeters")];

        let outcome = BasePluginLoader::new(&sources).build::<dyn Greeter, _>(&input);

        let plugin = &outcome.plugins[0];
        assert_eq!(plugin.config(), Some(&input[0]));
        assert_eq!(plugin.descriptor(), &input[0]);
        assert_eq!(plugin.origin().source(), "s1");
    }

    #[test]
    fn construction_failures_are_reported() {
        let registry = TypeRegistry::new("s1");
        registry.register_abstract::<dyn Greeter>("a::BeanOnly");
        registry.register_type::<dyn Greeter, _>(
            "a::Broken",
            || -> Result<Box<dyn Greeter>, BoxError> { Err("constructor exploded".into()) },
        );
        registry.register_type::<dyn Greeter, _>("a::Fine", || {
            Ok(Box::new(StubGreeter::new("fine")))
        });
        let sources: Vec<Arc<dyn TypeSource>> = vec![Arc::new(registry)];
        let input = descriptors(&["a::BeanOnly", "a::Broken", "a::Fine"]);

        let outcome = BasePluginLoader::new(&sources).build::<dyn Greeter, _>(&input);

        assert_eq!(outcome.type_names(), ["a::Fine"]);
        let kinds: Vec<_> = outcome.report.failures().iter().map(|f| f.kind).collect();
        assert_eq!(kinds, [FailureKind::Construction, FailureKind::Construction]);
        assert!(outcome.report.failures()[1].message.contains("constructor exploded"));
    }

    #[test]
    fn repeated_builds_are_idempotent() {
        let sources: Vec<Arc<dyn TypeSource>> =
            vec![Arc::new(greeter_registry("s1", &["a::One", "a::Two"]))];
        let input = descriptors(&["a::One", "a::Gone", "a::Two"]);
        let loader = BasePluginLoader::new(&sources);

        let first = loader.build::<dyn Greeter, _>(&input);
        let second = loader.build::<dyn Greeter, _>(&input);

        assert_eq!(first.type_names(), second.type_names());
        assert_eq!(first.report, second.report);
    }
}
