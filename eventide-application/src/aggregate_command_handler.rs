use crate::command_handler::CommandHandler;
use crate::error::AppError;
use async_trait::async_trait;
use eventide_domain::command::Command;
use eventide_domain::context::Context;
use eventide_domain::error::DomainError;
use eventide_domain::persist::AggregateStore;
use tracing::debug;

/// 绑定到单一聚合类型的命令处理器
///
/// 流程：加载聚合 → 校验存在性 → 调用聚合的命令钩子 → 保存。
/// 命令钩子与保存的错误均原样返回；命令钩子失败时不会保存。
pub struct AggregateCommandHandler<S> {
    aggregate_type: String,
    store: S,
}

impl<S> AggregateCommandHandler<S>
where
    S: AggregateStore,
{
    pub fn new(aggregate_type: impl Into<String>, store: S) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            store,
        }
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }
}

#[async_trait]
impl<S> CommandHandler for AggregateCommandHandler<S>
where
    S: AggregateStore,
{
    async fn handle(&self, ctx: &Context, command: Box<dyn Command>) -> Result<(), AppError> {
        let aggregate_id = command.aggregate_id();
        let mut aggregate = self
            .store
            .load(ctx, &self.aggregate_type, aggregate_id)
            .await?;

        // 没有任何历史的聚合只接受创建型命令
        if aggregate.version() == 0
            && aggregate.uncommitted_events().is_empty()
            && !command.creates_aggregate()
        {
            return Err(DomainError::AggregateNotFound {
                aggregate_type: self.aggregate_type.clone(),
                aggregate_id: aggregate_id.to_string(),
            }
            .into());
        }

        aggregate.handle_command(ctx, &*command)?;
        self.store.save(ctx, &mut *aggregate).await?;

        debug!(
            aggregate_type = %self.aggregate_type,
            aggregate_id,
            command_type = command.command_type(),
            version = aggregate.version(),
            "command handled"
        );

        Ok(())
    }
}
