use crate::utils::{Placement, apply_derives, ensure_fields};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity] 宏实现
/// - 若缺失则追加字段：`id: String`, `version: usize`，并置于字段最前
/// - 自动实现 `::eventide_domain::entity::Entity`（id/version）
/// - 支持参数：`#[entity(versioned = true|false, debug = true|false)]`；
///   - `versioned` 默认 `true`。为 `false` 时不追加 `version` 字段，`version()` 返回 `None`，
///     投影时不参与最终一致等待；
///   - `debug` 默认 `true`（派生 Debug）。当为 `false` 时不派生 Debug，便于用户自定义实现。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // 仅支持具名字段结构体
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let versioned = cfg.versioned.unwrap_or(true);

    // 重新组织字段：确保 id/version 在最前，并避免重复
    let mut required: Vec<(&str, Type)> = vec![("id", syn::parse_quote!(String))];
    if versioned {
        required.push(("version", syn::parse_quote!(usize)));
    }
    ensure_fields(fields_named, &required, &st.vis, Placement::Front);

    // 合并/规范 derive：默认添加 Debug（可通过 debug=false 关闭）、Clone、Default、Serialize、Deserialize
    let mut derives: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        derives.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, derives);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let version_fn = if versioned {
        quote! {
            fn version(&self) -> ::core::option::Option<usize> {
                ::core::option::Option::Some(self.version)
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        #st

        impl #impl_generics ::eventide_domain::entity::Entity for #ident #ty_generics #where_clause {
            fn id(&self) -> &str { &self.id }

            #version_fn
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct EntityAttrConfig {
    versioned: Option<bool>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut versioned: Option<bool> = None;
        let mut derive_debug: Option<bool> = None;

        if input.is_empty() {
            return Ok(Self {
                versioned,
                derive_debug,
            });
        }

        let elems: Punctuated<EntityAttrElem, Token![,]> =
            Punctuated::<EntityAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            let (key, slot, value) = match elem {
                EntityAttrElem::Versioned(key, b) => (key, &mut versioned, b),
                EntityAttrElem::Debug(key, b) => (key, &mut derive_debug, b),
            };
            if slot.is_some() {
                return Err(syn::Error::new(
                    key.span(),
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
            *slot = Some(value);
        }

        Ok(Self {
            versioned,
            derive_debug,
        })
    }
}

enum EntityAttrElem {
    Versioned(syn::Ident, bool),
    Debug(syn::Ident, bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key != "versioned" && key != "debug" {
            return Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'versioned' or 'debug'",
            ));
        }

        let _eq: Token![=] = input.parse()?;
        let expr: syn::Expr = input.parse()?;
        let value = match expr {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Bool(b),
                ..
            }) => b.value(),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    format!("expected boolean literal for '{key}'"),
                ));
            }
        };

        if key == "versioned" {
            Ok(EntityAttrElem::Versioned(key, value))
        } else {
            Ok(EntityAttrElem::Debug(key, value))
        }
    }
}
