//! Saga 事件处理器
//!
//! Saga 是无状态的反应器：根据一个事件决定要发出的后续命令，
//! 由 `SagaEventHandler` 依次交给下游命令处理器（通常是命令总线）执行。
//! 某条命令失败不会中断其余命令，最终返回最后一个错误。
//! 上下文被取消或超时后立即停止派发，返回取消错误。
//!
use crate::command_handler::CommandHandler;
use crate::error::AppError;
use async_trait::async_trait;
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use eventide_domain::domain_event::Event;
use eventide_domain::eventing::{EventHandler, HandledEventType};
use tracing::warn;

#[async_trait]
pub trait Saga: Send + Sync {
    fn saga_type(&self) -> &str;

    /// 对事件作出反应，返回需要执行的命令（可为空）
    async fn run_saga(&self, ctx: &Context, event: &Event) -> Vec<Box<dyn Command>>;
}

pub struct SagaEventHandler<S, H> {
    saga: S,
    command_handler: H,
    handled_event_type: HandledEventType,
}

impl<S, H> SagaEventHandler<S, H>
where
    S: Saga,
    H: CommandHandler,
{
    pub fn new(saga: S, command_handler: H) -> Self {
        Self {
            saga,
            command_handler,
            handled_event_type: HandledEventType::All,
        }
    }

    /// 限定该 Saga 订阅的事件类型（默认全部）
    pub fn with_handled_event_type(mut self, handled: HandledEventType) -> Self {
        self.handled_event_type = handled;
        self
    }

    pub fn saga(&self) -> &S {
        &self.saga
    }

    /// 运行 Saga 并依次派发产生的命令
    pub async fn react(&self, ctx: &Context, event: &Event) -> Result<(), AppError> {
        let commands = self.saga.run_saga(ctx, event).await;

        let mut last_err = None;
        for command in commands {
            // 取消或超时后不再派发剩余命令
            if let Err(err) = ctx.check() {
                warn!(
                    saga = self.saga.saga_type(),
                    event = %event,
                    error = %err,
                    "saga aborted"
                );
                return Err(err.into());
            }

            let command_type = command.command_type().to_string();
            let aggregate_id = command.aggregate_id().to_string();

            if let Err(err) = self.command_handler.handle(ctx, command).await {
                warn!(
                    saga = self.saga.saga_type(),
                    event = %event,
                    command_type = %command_type,
                    aggregate_id = %aggregate_id,
                    error = %err,
                    "saga command failed"
                );
                last_err = Some(err);
            }
        }

        match last_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S, H> EventHandler for SagaEventHandler<S, H>
where
    S: Saga,
    H: CommandHandler,
{
    fn handler_name(&self) -> &str {
        self.saga.saga_type()
    }

    fn handled_event_type(&self) -> HandledEventType {
        self.handled_event_type.clone()
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> anyhow::Result<()> {
        self.react(ctx, event).await?;
        Ok(())
    }
}
