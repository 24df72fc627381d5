//! `#[entity]` 与 `#[command]` 共用的结构体改写：补齐派生、补齐字段
//!
use proc_macro2::Span;
use std::collections::HashSet;
use syn::punctuated::Punctuated;
use syn::{Attribute, Field, FieldsNamed, Ident, Path, Token, Type, Visibility};

/// 必需字段已存在时的处理方式
pub(crate) enum Placement {
    /// 必需字段按给定顺序移到最前
    Front,
    /// 已有字段保持原位，只把缺失的字段插在最前
    KeepExisting,
}

/// 合并派生：`required` 在前，用户已写的派生去重后追加，其余属性原样保留
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let mut derives = required;
    let mut others = Vec::new();

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("derive") {
            others.push(attr);
            continue;
        }
        match attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            Ok(list) => derives.extend(list),
            Err(_) => others.push(attr),
        }
    }

    let mut seen = HashSet::new();
    derives.retain(|path| seen.insert(derive_name(path)));

    attrs.push(syn::parse_quote!(#[derive(#(#derives),*)]));
    attrs.extend(others);
}

// 只比较末段，`Serialize` 与 `serde::Serialize` 视为同一派生
fn derive_name(path: &Path) -> String {
    path.segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default()
}

/// 确保具名字段结构体含有 `required` 中的字段，缺失的字段使用结构体自身的可见性
pub(crate) fn ensure_fields(
    fields: &mut FieldsNamed,
    required: &[(&str, Type)],
    vis: &Visibility,
    placement: Placement,
) {
    let mut rest: Vec<Field> = std::mem::take(&mut fields.named).into_iter().collect();
    let mut front: Vec<Field> = Vec::with_capacity(required.len());

    for (name, ty) in required {
        let existing = rest
            .iter()
            .position(|f| f.ident.as_ref().is_some_and(|ident| ident == name));

        match (existing, &placement) {
            (Some(index), Placement::Front) => front.push(rest.remove(index)),
            (Some(_), Placement::KeepExisting) => {}
            (None, _) => {
                let ident = Ident::new(name, Span::call_site());
                front.push(syn::parse_quote! { #vis #ident: #ty });
            }
        }
    }

    fields.named = front.into_iter().chain(rest).collect();
}
