//! A container-managed validator that depends on a shared word list.

use std::sync::Arc;

use weft::bean;
use weft::prelude::{BeanContext, BoxError, Injectable, PluginDescriptor, PluginSpec};

use crate::Validator;

/// Supplies the words [`Blocklist`] rejects.
pub trait WordSource: Send + Sync {
    fn words(&self) -> Vec<String>;
}

/// A fixed word list.
#[derive(Debug, Clone, Default)]
pub struct StaticWords(pub Vec<String>);

impl WordSource for StaticWords {
    fn words(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Rejects input containing any word from the registered [`WordSource`].
#[bean(dyn Validator, name = "blocklist")]
pub struct Blocklist {
    words: Vec<String>,
    config: Option<PluginDescriptor>,
}

impl Injectable for Blocklist {
    fn inject(ctx: &dyn BeanContext) -> Result<Self, BoxError> {
        let source = ctx.require::<dyn WordSource>()?;
        let words = source.words().into_iter().map(|w| w.to_lowercase()).collect();
        Ok(Self {
            words,
            config: None,
        })
    }
}

impl PluginSpec for Blocklist {
    fn set_config(&mut self, config: PluginDescriptor) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&PluginDescriptor> {
        self.config.as_ref()
    }
}

impl Validator for Blocklist {
    fn name(&self) -> &str {
        "blocklist"
    }

    fn validate(&self, input: &str) -> Result<(), String> {
        let lowered = input.to_lowercase();
        match self.words.iter().find(|word| lowered.contains(word.as_str())) {
            Some(word) => Err(format!("input contains blocked word '{word}'")),
            None => Ok(()),
        }
    }
}

/// Wraps a word source for registration as a shared service.
pub fn word_service(words: impl IntoIterator<Item = impl Into<String>>) -> Arc<dyn WordSource> {
    Arc::new(StaticWords(words.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft::prelude::{
        ContainerBootstrap, InjectionSpec, PluginFactory, StaticSource, TypeSource,
    };

    #[test]
    fn blocklist_is_injected_with_the_word_service() {
        let bootstrap =
            ContainerBootstrap::new("demo").with_service(word_service(["spam", "Scam"]));
        let plugins = vec![
            PluginDescriptor::new("weft_demo_validators::blocklist::Blocklist")
                .with_capability("validators")
                .with_injection(
                    InjectionSpec::scanning(["weft_demo_validators"]).named("blocklist"),
                ),
        ];
        let sources: Vec<Arc<dyn TypeSource>> = vec![Arc::new(StaticSource)];

        let factory =
            PluginFactory::with_bootstrap(&bootstrap, None, plugins.into(), sources).unwrap();
        let outcome = factory.load::<dyn Validator>();

        assert_eq!(outcome.len(), 1);
        let blocklist = &outcome.plugins[0];
        assert!(blocklist.validate("hello").is_ok());
        assert!(blocklist.validate("a SCAM offer").is_err());
    }

    #[test]
    fn missing_word_service_is_an_injection_failure() {
        let plugins = vec![
            PluginDescriptor::new("weft_demo_validators::blocklist::Blocklist")
                .with_capability("validators")
                .with_injection(InjectionSpec::scanning(["weft_demo_validators"])),
        ];
        let sources: Vec<Arc<dyn TypeSource>> = vec![Arc::new(StaticSource)];

        let factory = PluginFactory::new(None, plugins.into(), sources).unwrap();
        let outcome = factory.load::<dyn Validator>();

        assert!(outcome.is_empty());
        assert_eq!(outcome.report.failures().len(), 1);
    }
}
