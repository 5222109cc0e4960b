//! Container-backed loader: plain descriptors first, then injected beans.

use std::sync::Arc;

use tracing::{debug, error};
use weft_core::{Container, PluginDescriptor, PluginSpec, TypeSource};

use crate::base::{BasePluginLoader, admit};
use crate::loaded::PluginOrigin;
use crate::report::{FailureKind, LoadFailure, LoadOutcome};
use crate::resolver::TypeResolver;

/// Loads non-injected descriptors through [`BasePluginLoader`] and asks the
/// container for every distinct injection-enabled descriptor afterwards.
#[derive(Clone, Copy)]
pub struct ContainerPluginLoader<'a> {
    sources: &'a [Arc<dyn TypeSource>],
    container: &'a dyn Container,
}

impl<'a> ContainerPluginLoader<'a> {
    /// Creates a loader resolving types over `sources` and beans from
    /// `container`.
    pub fn new(sources: &'a [Arc<dyn TypeSource>], container: &'a dyn Container) -> Self {
        Self { sources, container }
    }

    /// Builds `descriptors` as capability `P`.
    ///
    /// The result lists the plainly constructed plugins first, then the
    /// injected ones, each group in descriptor order.
    pub fn build<'d, P, I>(&self, descriptors: I) -> LoadOutcome<P>
    where
        P: ?Sized + PluginSpec,
        I: IntoIterator<Item = &'d PluginDescriptor>,
    {
        let descriptors: Vec<&PluginDescriptor> = descriptors.into_iter().collect();

        let mut outcome = BasePluginLoader::new(self.sources)
            .build::<P, _>(descriptors.iter().copied().filter(|d| !d.is_injected()));

        let mut distinct: Vec<&PluginDescriptor> = Vec::new();
        for descriptor in descriptors.iter().copied().filter(|d| d.is_injected()) {
            if !distinct.contains(&descriptor) {
                distinct.push(descriptor);
            }
        }

        let resolver = TypeResolver::new(self.sources);
        let mut injected = LoadOutcome::empty();
        for descriptor in distinct {
            if !descriptor.enabled {
                debug!(type_name = %descriptor.type_name, "Skipping disabled injected descriptor");
                injected.report.skipped();
                continue;
            }
            injected.report.attempted();

            let bean_name = descriptor.bean_name();
            let resolved = match resolver.resolve(&descriptor.type_name) {
                Ok(resolved) => resolved,
                Err(failure) => {
                    error!(
                        type_name = %descriptor.type_name,
                        sources = ?failure.sources_tried(),
                        "Failed to resolve injected plugin type"
                    );
                    injected
                        .report
                        .fail(LoadFailure::resolution(&failure).with_bean_name(bean_name));
                    continue;
                }
            };

            let lookup = match bean_name {
                Some(name) => self.container.named_bean::<P>(&descriptor.type_name, name),
                None => self.container.bean::<P>(&descriptor.type_name),
            };

            let plugin = match lookup {
                Ok(plugin) => plugin,
                Err(lookup_error) => {
                    error!(
                        type_name = %descriptor.type_name,
                        bean = bean_name,
                        container = self.container.id(),
                        error = %lookup_error,
                        "Failed to obtain injected plugin"
                    );
                    let tried = resolver.labels()[..=resolved.source_index].to_vec();
                    injected.report.fail(
                        LoadFailure::new(
                            FailureKind::InjectionLookup,
                            &descriptor.type_name,
                            tried,
                            lookup_error,
                        )
                        .with_bean_name(bean_name),
                    );
                    continue;
                }
            };

            let origin = PluginOrigin::Injected {
                source: resolved.plugin_type.origin().to_string(),
                container: self.container.id().to_string(),
            };
            admit(&mut injected, plugin, descriptor, origin);
        }

        outcome.extend(injected);
        outcome
    }
}

impl std::fmt::Debug for ContainerPluginLoader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerPluginLoader")
            .field("sources", &TypeResolver::new(self.sources).labels())
            .field("container", &self.container.id())
            .finish()
    }
}
