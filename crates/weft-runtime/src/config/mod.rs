//! Configuration module for the Weft runtime.
//!
//! This module provides figment-based loading and validation of the
//! logging settings, the container settings and the plugin descriptors.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ConfigFormat, ConfigLoader, Profile, load_config, load_config_from_file, load_config_from_str,
};
pub use schema::{
    ContainerConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig,
    WeftConfig,
};
pub use validation::validate_config;
