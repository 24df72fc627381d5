use crate::command_handler::CommandHandler;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use std::sync::Arc;
use tracing::debug;

/// 命令总线（Command Bus）
///
/// - 按 `command_type` 把命令路由到已注册的处理器；
/// - 自身也是 `CommandHandler`，可以再套用中间件或作为 Saga 的下游；
/// - 每种命令类型只能注册一个处理器。
#[derive(Default)]
pub struct CommandBus {
    handlers: DashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为命令类型注册处理器
    pub fn set_handler<H>(
        &self,
        command_type: impl Into<String>,
        handler: H,
    ) -> Result<(), AppError>
    where
        H: CommandHandler + 'static,
    {
        match self.handlers.entry(command_type.into()) {
            Entry::Occupied(entry) => {
                Err(AppError::HandlerAlreadyRegistered(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    pub fn has_handler(&self, command_type: &str) -> bool {
        self.handlers.contains_key(command_type)
    }

    /// 已注册的命令类型（升序）
    pub fn command_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        types.sort();
        types
    }
}

#[async_trait]
impl CommandHandler for CommandBus {
    async fn handle(&self, ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError> {
        // 先克隆出处理器再释放分片锁，避免跨 await 持有锁
        let Some(handler) = self
            .handlers
            .get(command.command_type())
            .map(|h| Arc::clone(h.value()))
        else {
            return Err(AppError::HandlerNotFound(command.command_type().to_string()));
        };

        debug!(
            command_type = command.command_type(),
            aggregate_id = command.aggregate_id(),
            "dispatching command"
        );
        handler.handle(ctx, command).await
    }
}
