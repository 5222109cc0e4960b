//! Weft Runtime - configuration, logging and wiring for plugin hosts.
//!
//! This crate provides:
//! - Layered configuration loading with figment (`ConfigLoader`, `WeftConfig`)
//! - Configuration validation
//! - Logging setup on `tracing-subscriber` (`LoggingBuilder`)
//! - `PluginRuntime`, which turns a configuration into a ready `PluginFactory`
//!
//! ```ignore
//! use weft_runtime::PluginRuntime;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = PluginRuntime::builder().config_file("weft.yaml").build()?;
//!
//!     let validators = runtime.load::<dyn Validator>();
//!     println!("{}", validators.report.stats());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    ConfigError, ConfigFormat, ConfigLoader, ConfigResult, ContainerConfig, LoggingConfig,
    Profile, WeftConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{PluginRuntime, RuntimeBuilder};

// Re-export tracing for use by plugin crates
pub use tracing;

/// Logging macros for plugin code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
