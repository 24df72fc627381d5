use super::CommandHandlerMiddleware;
use crate::command_handler::CommandHandler;
use crate::error::AppError;
use async_trait::async_trait;
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use std::sync::Arc;
use tracing::{debug, warn};

/// 记录命令处理结果的中间件
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl CommandHandlerMiddleware for LoggingMiddleware {
    fn wrap(&self, next: Arc<dyn CommandHandler>) -> Arc<dyn CommandHandler> {
        Arc::new(LoggingHandler { next })
    }
}

struct LoggingHandler {
    next: Arc<dyn CommandHandler>,
}

#[async_trait]
impl CommandHandler for LoggingHandler {
    async fn handle(&self, ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError> {
        let command_type = command.command_type().to_string();
        let aggregate_id = command.aggregate_id().to_string();

        let result = self.next.handle(ctx, command).await;
        match &result {
            Ok(()) => debug!(
                namespace = ctx.namespace(),
                command_type = %command_type,
                aggregate_id = %aggregate_id,
                "command succeeded"
            ),
            Err(err) => warn!(
                namespace = ctx.namespace(),
                command_type = %command_type,
                aggregate_id = %aggregate_id,
                error = %err,
                "command failed"
            ),
        }
        result
    }
}
