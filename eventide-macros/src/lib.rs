//! eventide 过程宏
//!
//! - `#[entity]`：为读模型结构体补齐 `id`/`version` 字段并实现 `Entity`；
//! - `#[command]`：为命令结构体补齐 `aggregate_id` 字段并实现 `Command`。
//!
use proc_macro::TokenStream;

mod command;
mod entity;
mod utils;

/// 读模型实体宏
/// - 追加字段：`id: String`, `version: usize`（若缺失）并置于字段最前
/// - 自动实现 `::eventide_domain::entity::Entity`
/// - 支持参数：`#[entity(versioned = true|false, debug = true|false)]`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 命令宏
/// - 追加字段：`aggregate_id: String`（若缺失）并置于字段最前
/// - 自动实现 `::eventide_domain::command::Command`
/// - 支持参数：`#[command(name = "...", create = true|false)]`
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}
