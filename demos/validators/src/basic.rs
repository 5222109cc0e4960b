//! Validators built plainly from their `Default` impl.

use serde::Deserialize;
use tracing::warn;
use weft::plugin_type;
use weft::prelude::{PluginDescriptor, PluginSpec};

use crate::Validator;

/// Rejects empty or whitespace-only input.
#[plugin_type(dyn Validator)]
#[derive(Debug, Default)]
pub struct NonEmpty {
    config: Option<PluginDescriptor>,
}

impl PluginSpec for NonEmpty {
    fn set_config(&mut self, config: PluginDescriptor) {
        self.config = Some(config);
    }

    fn config(&self) -> Option<&PluginDescriptor> {
        self.config.as_ref()
    }
}

impl Validator for NonEmpty {
    fn name(&self) -> &str {
        "non-empty"
    }

    fn validate(&self, input: &str) -> Result<(), String> {
        if input.trim().is_empty() {
            Err("input is blank".to_string())
        } else {
            Ok(())
        }
    }
}

/// `settings` accepted by [`MaxLength`].
#[derive(Debug, Clone, Deserialize)]
pub struct MaxLengthSettings {
    #[serde(default = "default_max")]
    pub max: usize,
}

fn default_max() -> usize {
    64
}

/// Rejects input longer than `settings.max` characters.
///
/// Reports itself disabled when its settings do not parse.
#[plugin_type(dyn Validator)]
#[derive(Debug, Default)]
pub struct MaxLength {
    config: Option<PluginDescriptor>,
    settings: Option<MaxLengthSettings>,
}

impl PluginSpec for MaxLength {
    fn set_config(&mut self, config: PluginDescriptor) {
        self.settings = match config.settings::<MaxLengthSettings>() {
            Ok(settings) => Some(settings),
            Err(error) => {
                warn!(type_name = %config.type_name, error = %error, "Invalid max-length settings");
                None
            }
        };
        self.config = Some(config);
    }

    fn config(&self) -> Option<&PluginDescriptor> {
        self.config.as_ref()
    }

    fn enabled(&self) -> bool {
        self.settings.is_some() && self.config.as_ref().is_some_and(|c| c.enabled)
    }
}

impl Validator for MaxLength {
    fn name(&self) -> &str {
        "max-length"
    }

    fn validate(&self, input: &str) -> Result<(), String> {
        let max = self.settings.as_ref().map_or_else(default_max, |s| s.max);
        let len = input.chars().count();
        if len > max {
            Err(format!("input is {len} characters, limit is {max}"))
        } else {
            Ok(())
        }
    }
}
