//! Example validators for the Weft plugin host.
//!
//! Exposes the `"validators"` capability via the [`Validator`] trait and
//! registers three implementations:
//!
//! | Type | Registration | Notes |
//! |------|--------------|-------|
//! | [`NonEmpty`] | `#[plugin_type]` | rejects blank input |
//! | [`MaxLength`] | `#[plugin_type]` | reads `settings.max` |
//! | [`Blocklist`] | `#[bean(name = "blocklist")]` | needs a [`WordSource`] service |
//!
//! Configure them in `weft.yaml`:
//!
//! ```yaml
//! plugins:
//!   - type_name: weft_demo_validators::basic::NonEmpty
//!     capability: validators
//!   - type_name: weft_demo_validators::blocklist::Blocklist
//!     capability: validators
//!     injection:
//!       bean_name: blocklist
//!       package_scan: [weft_demo_validators]
//! ```

pub mod basic;
pub mod blocklist;

use weft::prelude::{Capability, PluginSpec};

pub use basic::{MaxLength, MaxLengthSettings, NonEmpty};
pub use blocklist::{Blocklist, StaticWords, WordSource, word_service};

/// Checks one piece of input.
pub trait Validator: PluginSpec {
    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Returns the reason the input is rejected, if it is.
    fn validate(&self, input: &str) -> Result<(), String>;
}

impl Capability for dyn Validator {
    const KEY: &'static str = "validators";
}
