use crate::error::AppError;
use async_trait::async_trait;
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use std::sync::Arc;

/// 命令处理器
///
/// 命令以 `Box<dyn Command>` 传入，中间件与命令总线都实现该接口，
/// 因而可以任意嵌套组合。
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError>;
}

#[async_trait]
impl<T> CommandHandler for Arc<T>
where
    T: CommandHandler + ?Sized,
{
    async fn handle(&self, ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError> {
        (**self).handle(ctx, command).await
    }
}
