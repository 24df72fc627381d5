use crate::utils::{Placement, apply_derives, ensure_fields};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[command] 宏实现
/// - 若缺失则追加字段：`aggregate_id: String`（位于最前），已有字段保持原顺序
/// - 派生 Debug、Clone
/// - 自动实现 `::eventide_domain::command::Command`
/// - 支持参数：`#[command(name = "...", create = true|false)]`；
///   - `name` 为命令类型名，默认取结构体名；
///   - `create` 默认 `false`，为 `true` 时命令可作用于尚无历史的聚合。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as CommandAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[command] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let aggregate_id: Type = syn::parse_quote!(String);
    ensure_fields(
        fields_named,
        &[("aggregate_id", aggregate_id)],
        &st.vis,
        Placement::KeepExisting,
    );

    apply_derives(
        &mut st.attrs,
        vec![syn::parse_quote!(Debug), syn::parse_quote!(Clone)],
    );

    let ident = &st.ident;
    let command_type = cfg
        .name
        .map(|lit| lit.value())
        .unwrap_or_else(|| ident.to_string());
    let creates = cfg.create.unwrap_or(false);
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::eventide_domain::command::Command for #ident #ty_generics #where_clause {
            fn aggregate_id(&self) -> &str { &self.aggregate_id }

            fn command_type(&self) -> &str { #command_type }

            fn creates_aggregate(&self) -> bool { #creates }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

#[derive(Default)]
struct CommandAttrConfig {
    name: Option<LitStr>,
    create: Option<bool>,
}

impl Parse for CommandAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = CommandAttrConfig::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<CommandAttrElem, Token![,]> =
            Punctuated::<CommandAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                CommandAttrElem::Name(lit) => {
                    if cfg.name.is_some() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "duplicate key 'name' in attribute",
                        ));
                    }
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "command name must not be empty"));
                    }
                    cfg.name = Some(lit);
                }
                CommandAttrElem::Create(key, b) => {
                    if cfg.create.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'create' in attribute",
                        ));
                    }
                    cfg.create = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

enum CommandAttrElem {
    Name(LitStr),
    Create(syn::Ident, bool),
}

impl Parse for CommandAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        if key == "name" {
            let _eq: Token![=] = input.parse()?;
            let lit: LitStr = input.parse()?;
            Ok(CommandAttrElem::Name(lit))
        } else if key == "create" {
            // 允许简写 `create`
            if input.is_empty() || input.peek(Token![,]) {
                return Ok(CommandAttrElem::Create(key, true));
            }
            let _eq: Token![=] = input.parse()?;
            let lit: syn::LitBool = input.parse()?;
            Ok(CommandAttrElem::Create(key, lit.value()))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name' or 'create'",
            ))
        }
    }
}
