//! Procedural macros for the Weft plugin loader.
//!
//! This crate provides:
//!
//! - `#[plugin_type(dyn Cap, ...)]` - Makes a `Default` struct resolvable and
//!   plainly constructible as one or more capabilities
//! - `#[bean(dyn Cap, name = "...")]` - Registers an `Injectable` struct as a
//!   container-managed bean
//!
//! Both macros leave the struct untouched and append entries to the link-time
//! tables in `weft-core`, which `StaticSource` reads.  The generated code
//! refers to `::weft_core`, so the calling crate must depend on it.
//!
//! # Type Names
//!
//! A registered type is named `module_path!()::Ident` unless overridden with
//! `type_name = "..."`.  Descriptors must use the same name:
//!
//! ```rust,ignore
//! // in crate `acme_checks`, module `names`
//! #[plugin_type(dyn Validator)]
//! #[derive(Default)]
//! pub struct NameValidator { /* ... */ }
//!
//! // configuration
//! // - type_name: acme_checks::names::NameValidator
//! ```

mod register;

use proc_macro::TokenStream;
use syn::{ItemStruct, parse::Parser, parse_macro_input};

use register::RegisterArgs;

/// Registers a struct as a plugin type.
///
/// The struct must implement `Default` and every listed capability trait.
///
/// # Attributes
///
/// - one or more capability types, e.g. `dyn Validator`
/// - `type_name = "..."` - Override the registered type name
///
/// # Example
///
/// ```rust,ignore
/// use weft::prelude::*;
///
/// #[plugin_type(dyn Validator)]
/// #[derive(Default)]
/// pub struct NonEmpty {
///     config: Option<PluginDescriptor>,
/// }
/// ```
#[proc_macro_attribute]
pub fn plugin_type(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RegisterArgs::plugin_type.parse(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };
    let item = parse_macro_input!(item as ItemStruct);

    match register::expand_plugin_type(args, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Registers a struct as a container-managed bean.
///
/// The struct must implement `Injectable` and the capability trait.  The
/// bean name defaults to the decapitalised struct name.
///
/// # Attributes
///
/// - exactly one capability type, e.g. `dyn Validator`
/// - `name = "..."` - Bean name used by named lookups
/// - `type_name = "..."` - Override the registered type name
///
/// # Example
///
/// ```rust,ignore
/// use weft::prelude::*;
///
/// #[bean(dyn Validator, name = "ownerCheck")]
/// pub struct OwnerCheck {
///     directory: Arc<dyn Directory>,
///     config: Option<PluginDescriptor>,
/// }
///
/// impl Injectable for OwnerCheck {
///     fn inject(ctx: &dyn BeanContext) -> Result<Self, BoxError> {
///         Ok(Self { directory: ctx.require::<dyn Directory>()?, config: None })
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn bean(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match RegisterArgs::bean.parse(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };
    let item = parse_macro_input!(item as ItemStruct);

    match register::expand_bean(args, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
