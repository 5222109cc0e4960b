use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Ident, ItemStruct, LitStr, Token, Type,
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
};

// ─── Attribute arguments ──────────────────────────────────────────────────────

/// One argument: a capability type or a `key = "value"` option.
enum Arg {
    Capability(Type),
    Option { key: Ident, value: LitStr },
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Ident) && input.peek2(Token![=]) {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            return Ok(Self::Option { key, value });
        }
        Ok(Self::Capability(input.parse()?))
    }
}

/// Parsed `#[plugin_type(...)]` / `#[bean(...)]` arguments.
pub struct RegisterArgs {
    capabilities: Vec<Type>,
    type_name: Option<LitStr>,
    bean_name: Option<LitStr>,
}

impl RegisterArgs {
    fn parse_with(input: ParseStream, allow_bean_name: bool) -> Result<Self> {
        let args: Punctuated<Arg, Token![,]> = Punctuated::parse_terminated(input)?;
        let mut out = Self {
            capabilities: Vec::new(),
            type_name: None,
            bean_name: None,
        };

        for arg in args {
            match arg {
                Arg::Capability(ty) => out.capabilities.push(ty),
                Arg::Option { key, value } => match key.to_string().as_str() {
                    "type_name" => out.type_name = Some(value),
                    "name" if allow_bean_name => out.bean_name = Some(value),
                    other => {
                        let expected = if allow_bean_name {
                            "name or type_name"
                        } else {
                            "type_name"
                        };
                        return Err(syn::Error::new(
                            key.span(),
                            format!("unknown option `{other}`; expected {expected}"),
                        ));
                    }
                },
            }
        }

        if out.capabilities.is_empty() {
            return Err(input.error("expected a capability type, e.g. `dyn Validator`"));
        }
        Ok(out)
    }

    /// Parser for `#[plugin_type]`.
    pub fn plugin_type(input: ParseStream) -> Result<Self> {
        Self::parse_with(input, false)
    }

    /// Parser for `#[bean]`.
    pub fn bean(input: ParseStream) -> Result<Self> {
        let args = Self::parse_with(input, true)?;
        if args.capabilities.len() > 1 {
            return Err(input.error("a bean is registered for exactly one capability"));
        }
        Ok(args)
    }
}

fn reject_generics(item: &ItemStruct) -> Result<()> {
    if item.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &item.generics,
            "registered plugin types cannot be generic",
        ))
    }
}

fn type_name_tokens(item: &ItemStruct, args: &RegisterArgs) -> TokenStream {
    let ident = &item.ident;
    match &args.type_name {
        Some(name) => quote!(#name),
        None => quote!(::std::concat!(::std::module_path!(), "::", ::std::stringify!(#ident))),
    }
}

// ─── Expansion ────────────────────────────────────────────────────────────────

/// Expands `#[plugin_type(dyn Cap, ...)]`.
///
/// Leaves the struct unchanged and appends one `PLUGIN_TYPES` entry per
/// capability, each constructing the struct through `Default`.
pub fn expand_plugin_type(args: RegisterArgs, item: ItemStruct) -> Result<TokenStream> {
    reject_generics(&item)?;
    let ident = &item.ident;
    let type_name = type_name_tokens(&item, &args);

    let entries = args.capabilities.iter().enumerate().map(|(i, cap)| {
        let construct = format_ident!("__weft_construct_{}", i);
        let capability = format_ident!("__weft_capability_{}", i);
        let entry = format_ident!("__WEFT_TYPE_{}", i);
        quote! {
            fn #construct() -> ::std::result::Result<::weft_core::ErasedPlugin, ::weft_core::BoxError> {
                let plugin: ::std::boxed::Box<#cap> =
                    ::std::boxed::Box::new(<#ident as ::std::default::Default>::default());
                ::std::result::Result::Ok(::weft_core::erase(plugin))
            }

            fn #capability() -> ::weft_core::CapabilityId {
                ::weft_core::CapabilityId::of::<#cap>()
            }

            #[::weft_core::linkme::distributed_slice(::weft_core::PLUGIN_TYPES)]
            #[linkme(crate = ::weft_core::linkme)]
            static #entry: ::weft_core::TypeRegistration = ::weft_core::TypeRegistration {
                type_name: #type_name,
                capability: #capability,
                construct: ::std::option::Option::Some(#construct),
            };
        }
    });

    Ok(quote! {
        #item

        const _: () = {
            #( #entries )*
        };
    })
}

/// Expands `#[bean(dyn Cap, name = "...")]`.
///
/// Leaves the struct unchanged and appends a `PLUGIN_BEANS` entry whose
/// factory builds the struct through `Injectable::inject`.
pub fn expand_bean(args: RegisterArgs, item: ItemStruct) -> Result<TokenStream> {
    reject_generics(&item)?;
    let ident = &item.ident;
    let type_name = type_name_tokens(&item, &args);
    let cap = &args.capabilities[0];
    let bean_name = match &args.bean_name {
        Some(name) => quote!(::std::option::Option::Some(#name)),
        None => quote!(::std::option::Option::None),
    };

    Ok(quote! {
        #item

        const _: () = {
            fn __weft_factory(
                ctx: &dyn ::weft_core::BeanContext,
            ) -> ::std::result::Result<::weft_core::ErasedPlugin, ::weft_core::BoxError> {
                let plugin: ::std::boxed::Box<#cap> =
                    ::std::boxed::Box::new(<#ident as ::weft_core::Injectable>::inject(ctx)?);
                ::std::result::Result::Ok(::weft_core::erase(plugin))
            }

            fn __weft_capability() -> ::weft_core::CapabilityId {
                ::weft_core::CapabilityId::of::<#cap>()
            }

            #[::weft_core::linkme::distributed_slice(::weft_core::PLUGIN_BEANS)]
            #[linkme(crate = ::weft_core::linkme)]
            static __WEFT_BEAN: ::weft_core::BeanRegistration = ::weft_core::BeanRegistration {
                type_name: #type_name,
                bean_name: #bean_name,
                capability: __weft_capability,
                factory: __weft_factory,
            };
        };
    })
}
