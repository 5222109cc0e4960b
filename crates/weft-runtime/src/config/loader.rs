//! Configuration loader using figment.
//!
//! Supports TOML/YAML files, in-memory documents, environment variables and
//! programmatic layers, merged so that later sources override earlier ones.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration (`weft.toml`, `config.toml`)
//! - `yaml-config`: enables YAML configuration (`weft.yaml`, `weft.yml`, etc.)
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults, or a whole [`WeftConfig`] from [`ConfigLoader::defaults`]
//! 2. Profile-specific config file (`weft.{profile}.toml` / `weft.{profile}.yaml`)
//! 3. Main config file (`weft.toml` / `weft.yaml`) or an in-memory document
//! 4. Environment variables (`WEFT_*`)
//! 5. Programmatic overrides ([`ConfigLoader::merge`], [`ConfigLoader::set`])
//!
//! # Environment Variable Mapping
//!
//! Variables use the `WEFT_` prefix with `__` as separator:
//!
//! - `WEFT_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `WEFT_CONTAINER__CONTEXT_ID=host` → `container.context_id = "host"`
//!
//! # Example
//!
//! ```rust,ignore
//! use weft_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/weft.toml")
//!     .set("container.context_id", "billing")
//!     .load()?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::{Figment, Provider};
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::WeftConfig;
use super::validation::validate_config;

const ENV_PREFIX: &str = "WEFT_";
const PROFILE_VAR: &str = "WEFT_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Parses a profile name; `prod` and `dev` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads `WEFT_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configuration document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Maps a file extension to its format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Whether support for this format is compiled in.
    pub fn is_enabled(self) -> bool {
        match self {
            Self::Toml => cfg!(feature = "toml-config"),
            Self::Yaml => cfg!(feature = "yaml-config"),
        }
    }

    fn merge_file(self, figment: Figment, path: &Path) -> ConfigResult<Figment> {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => Ok(figment.merge(Yaml::file(path))),
            #[allow(unreachable_patterns)]
            disabled => Err(disabled.unsupported()),
        }
    }

    fn merge_str(self, figment: Figment, text: &str) -> ConfigResult<Figment> {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => Ok(figment.merge(Toml::string(text))),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => Ok(figment.merge(Yaml::string(text))),
            #[allow(unreachable_patterns)]
            disabled => {
                let _ = text;
                Err(disabled.unsupported())
            }
        }
    }

    fn unsupported(self) -> ConfigError {
        ConfigError::ParseError(format!("{self} configuration support is disabled"))
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => f.write_str("TOML"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Configuration loader with figment-based multi-source support.
///
/// [`load`](Self::load) validates the extracted configuration before
/// returning it.
pub struct ConfigLoader {
    /// Replacement for the built-in defaults.
    defaults: Option<WeftConfig>,
    /// Programmatic layers merged over every other source.
    overrides: Figment,
    /// Configuration profile.
    profile: Profile,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
    /// In-memory document (overrides file and search).
    inline: Option<(ConfigFormat, String)>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            defaults: None,
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
            inline: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("weft"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses an in-memory document instead of searching for files.
    pub fn document(mut self, format: ConfigFormat, text: impl Into<String>) -> Self {
        self.inline = Some((format, text.into()));
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Replaces the built-in defaults; files and the environment still
    /// override it.
    pub fn defaults(mut self, config: WeftConfig) -> Self {
        self.defaults = Some(config);
        self
    }

    /// Merges a provider over every other source.
    ///
    /// Only the keys the provider emits are overridden, so pass partial
    /// layers such as `Serialized::default("logging.level", "debug")`.
    pub fn merge<T: Provider>(mut self, provider: T) -> Self {
        self.overrides = self.overrides.merge(provider);
        self
    }

    /// Overrides a single dotted key, e.g. `container.context_id`.
    pub fn set<V: Serialize>(self, key: &str, value: V) -> Self {
        self.merge(Serialized::default(key, value))
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<WeftConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: WeftConfig = figment.extract().map_err(|e| {
            ConfigError::ParseError(format!("Failed to extract configuration: {e}"))
        })?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            context_id = %config.container.context_id,
            plugins = config.plugins.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(mut self) -> ConfigResult<Figment> {
        let defaults = self.defaults.take().unwrap_or_default();
        let mut figment = Figment::from(Serialized::defaults(defaults));

        if let Some((format, text)) = self.inline.take() {
            trace!(format = %format, "Loading in-memory configuration");
            figment = format.merge_str(figment, &text)?;
        } else if let Some(path) = self.config_file.take() {
            if path.exists() {
                info!(path = %path.display(), "Loading configuration file");
                figment = Self::merge_config_file(figment, &path)?;
            } else {
                return Err(ConfigError::FileNotFound(path));
            }
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with WEFT_ prefix");
            figment = figment.merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["PROFILE"])
                    .split("__"),
            );
        }

        let overrides = std::mem::take(&mut self.overrides);
        Ok(figment.merge(overrides))
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ConfigFormat::from_extension(ext) {
            Some(format) => format.merge_file(figment, path),
            None => Err(ConfigError::ParseError(format!(
                "Unsupported configuration file format: .{ext}"
            ))),
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            let mut paths = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd);
            }
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("weft"));
            }
            paths
        } else {
            self.search_paths.clone()
        }
    }

    /// Searches one format's base names across the search paths.
    ///
    /// A profile-specific variant is merged before its base file.  Stops at
    /// the first base file found.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        format: ConfigFormat,
        base_names: &[&str],
    ) -> (Figment, bool) {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path =
                    search_path.join(format!("{stem}.{}.{ext}", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    if let Ok(next) = format.merge_file(figment.clone(), &profile_path) {
                        figment = next;
                    }
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    if let Ok(next) = format.merge_file(figment.clone(), &base_path) {
                        figment = next;
                    }
                    return (figment, true);
                }
            }
        }
        (figment, false)
    }

    /// Searches for and loads configuration files for every enabled format.
    fn load_config_files(&self, figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        #[allow(unused_mut)]
        let mut figment = figment;
        #[allow(unused_mut)]
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                ConfigFormat::Toml,
                &["weft.toml", "config.toml"],
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                ConfigFormat::Yaml,
                &["weft.yaml", "weft.yml", "config.yaml", "config.yml"],
            );
            figment = f;
            found |= ok;
        }

        if !found {
            warn!(
                paths = ?search_paths,
                "No configuration file found, using defaults"
            );
        }
        figment
    }
}

/// Loads the configuration from the default search locations.
pub fn load_config() -> ConfigResult<WeftConfig> {
    ConfigLoader::new().load()
}

/// Loads the configuration from a specific file, plus environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<WeftConfig> {
    ConfigLoader::new().file(path).load()
}

/// Loads the configuration from an in-memory document, plus environment
/// overrides.
pub fn load_config_from_str(format: ConfigFormat, text: &str) -> ConfigResult<WeftConfig> {
    ConfigLoader::new().document(format, text).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = ConfigLoader::new()
            .without_env()
            .search_path("/nonexistent/weft")
            .load()
            .unwrap();

        assert_eq!(config.logging.level.as_str(), "info");
        assert_eq!(config.container.context_id, "custom-plugin");
    }

    #[test]
    fn profile_names_are_normalised() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("DEV"), Profile::Development);
        assert_eq!(Profile::parse("Staging").as_str(), "staging");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ConfigLoader::new()
            .without_env()
            .file("/nonexistent/weft.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("weft.ini", "level = debug")?;
            let err = ConfigLoader::new()
                .without_env()
                .file("weft.ini")
                .load()
                .unwrap_err();
            assert!(matches!(err, ConfigError::ParseError(_)));
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn in_memory_toml_document() {
        let text = r#"
            [container]
            context_id = "host"

            [[plugins]]
            type_name = "acme::Foo"
            capability = "validators"

            [[plugins]]
            type_name = "acme::Bar"
            injection = { bean_name = "bar", package_scan = ["acme"] }
        "#;

        let config = ConfigLoader::new()
            .without_env()
            .document(ConfigFormat::Toml, text)
            .load()
            .unwrap();

        assert_eq!(config.container.context_id, "host");
        let plugins = config.plugins.as_slice();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].capability.as_deref(), Some("validators"));
        assert_eq!(plugins[1].bean_name(), Some("bar"));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn profile_file_is_overridden_by_main_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "weft.production.toml",
                r#"
                [logging]
                level = "debug"
                [container]
                context_id = "from-profile"
                "#,
            )?;
            jail.create_file(
                "weft.toml",
                r#"
                [container]
                context_id = "from-main"
                "#,
            )?;
            jail.set_env("WEFT_LOGGING__LEVEL", "warn");

            let config = ConfigLoader::new()
                .profile("production")
                .search_path(jail.directory())
                .load()
                .unwrap();

            assert_eq!(config.container.context_id, "from-main");
            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn invalid_documents_fail_validation() {
        let text = r#"
            [[plugins]]
            type_name = "  "
        "#;
        let err = ConfigLoader::new()
            .without_env()
            .document(ConfigFormat::Toml, text)
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn programmatic_overrides_beat_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "weft.toml",
                r#"
                [logging]
                level = "debug"
                [container]
                context_id = "from-file"
                "#,
            )?;
            jail.set_env("WEFT_CONTAINER__CONTEXT_ID", "from-env");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .set("container.context_id", "from-merge")
                .load()
                .unwrap();

            assert_eq!(config.container.context_id, "from-merge");
            assert_eq!(config.logging.level, LogLevel::Debug);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn programmatic_defaults_sit_below_files() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "weft.toml",
                r#"
                [container]
                context_id = "from-file"
                "#,
            )?;

            let mut base = WeftConfig::default();
            base.container.context_id = "from-defaults".into();
            base.logging.level = LogLevel::Error;

            let config = ConfigLoader::new()
                .without_env()
                .search_path(jail.directory())
                .defaults(base)
                .load()
                .unwrap();

            assert_eq!(config.container.context_id, "from-file");
            assert_eq!(config.logging.level, LogLevel::Error);
            Ok(())
        });
    }

    #[cfg(feature = "yaml-config")]
    #[test]
    fn in_memory_yaml_document() {
        let text = "
plugins:
  - type_name: acme::Foo
    enabled: false
  - type_name: acme::Bar
    settings:
      threshold: 3
";
        let config = ConfigLoader::new()
            .without_env()
            .document(ConfigFormat::Yaml, text)
            .load()
            .unwrap();

        let plugins = config.plugins.as_slice();
        assert!(!plugins[0].enabled);
        assert_eq!(plugins[1].settings["threshold"], 3);
    }
}
