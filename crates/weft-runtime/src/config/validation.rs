//! Configuration validation utilities.

use tracing::warn;
use weft_core::{PluginConfigSet, PluginDescriptor};

use super::error::{ConfigError, ConfigResult};
use super::schema::{ContainerConfig, LogLevel, LogOutput, LoggingConfig, WeftConfig};

/// Validates the entire configuration.
///
/// Hard errors stop loading.  Suspicious but loadable descriptors are only
/// logged.
pub fn validate_config(config: &WeftConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_container_config(&config.container)?;
    validate_plugins_config(&config.plugins)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    for (target, level) in &logging.filters {
        if target.trim().is_empty() {
            return Err(ConfigError::validation(
                "Log filter targets cannot be empty",
            ));
        }
        if level.parse::<LogLevel>().is_err() {
            return Err(ConfigError::UnknownLogLevel {
                target: target.clone(),
                level: level.clone(),
            });
        }
    }

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    Ok(())
}

fn validate_container_config(container: &ContainerConfig) -> ConfigResult<()> {
    if container.context_id.trim().is_empty() {
        return Err(ConfigError::missing_field("container.context_id"));
    }

    if container.context_id.contains(char::is_whitespace) {
        return Err(ConfigError::validation(
            "Container context id cannot contain whitespace",
        ));
    }

    Ok(())
}

fn validate_plugins_config(plugins: &PluginConfigSet) -> ConfigResult<()> {
    let mut seen: Vec<&PluginDescriptor> = Vec::new();

    for (index, descriptor) in plugins.stream_all().enumerate() {
        validate_descriptor(index, descriptor)?;

        if seen.contains(&descriptor) {
            warn!(
                index,
                type_name = %descriptor.type_name,
                "Duplicate plugin descriptor"
            );
        } else {
            seen.push(descriptor);
        }
    }

    Ok(())
}

/// Validates a single descriptor.
fn validate_descriptor(index: usize, descriptor: &PluginDescriptor) -> ConfigResult<()> {
    if descriptor.type_name.trim().is_empty() {
        return Err(ConfigError::missing_field(format!(
            "plugins[{index}].type_name"
        )));
    }

    if descriptor.type_name.contains(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Type name '{}' cannot contain whitespace",
            descriptor.type_name
        )));
    }

    let Some(injection) = &descriptor.injection else {
        return Ok(());
    };

    if injection
        .bean_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(ConfigError::validation(format!(
            "Bean name for '{}' cannot be blank",
            descriptor.type_name
        )));
    }

    if injection.package_scan.iter().any(|root| root.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Package roots for '{}' cannot be blank",
            descriptor.type_name
        )));
    }

    if injection.enabled && injection.package_scan.is_empty() {
        warn!(
            index,
            type_name = %descriptor.type_name,
            "Injected plugin declares no package roots; it only resolves if another descriptor scans its package"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::InjectionSpec;

    fn with_plugins(plugins: Vec<PluginDescriptor>) -> WeftConfig {
        WeftConfig {
            plugins: plugins.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_empty_config() {
        assert!(validate_config(&WeftConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_unknown_filter_level() {
        let mut config = WeftConfig::default();
        config
            .logging
            .filters
            .insert("weft_container".into(), "chatty".into());

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::UnknownLogLevel { .. })));
    }

    #[test]
    fn test_validate_file_output_requires_path() {
        let mut config = WeftConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.logging.file_path = Some("weft.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_blank_context_id() {
        let mut config = WeftConfig::default();
        config.container.context_id = " ".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_blank_type_name() {
        let config = with_plugins(vec![PluginDescriptor::new("")]);
        let result = validate_config(&config);
        assert!(
            matches!(result, Err(ConfigError::MissingField { field }) if field == "plugins[0].type_name")
        );
    }

    #[test]
    fn test_validate_blank_bean_name() {
        let config = with_plugins(vec![
            PluginDescriptor::new("acme::Foo")
                .with_injection(InjectionSpec::scanning(["acme"]).named("")),
        ]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_blank_package_root() {
        let config = with_plugins(vec![
            PluginDescriptor::new("acme::Foo").with_injection(InjectionSpec::scanning(["acme", ""])),
        ]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicates_and_rootless_injection_only_warn() {
        let rootless = PluginDescriptor::new("acme::Bar").with_injection(InjectionSpec::default());
        let config = with_plugins(vec![
            PluginDescriptor::new("acme::Foo"),
            PluginDescriptor::new("acme::Foo"),
            rootless,
        ]);
        assert!(validate_config(&config).is_ok());
    }
}
