//! 聚合存储（AggregateStore）
//!
//! 基于事件存储重建聚合（`load`），并以三个有序阶段保存聚合（`save`）：
//! 1. 应用：把未提交事件逐个应用到聚合；任何失败都不会写入或发布；
//! 2. 持久化：以批次前的版本作为期望版本追加到事件存储（乐观并发）；
//!    成功后版本前进、未提交列表清空；
//! 3. 发布：把同一批事件交给事件总线；发布失败原样返回，不回滚已持久化的事件。
//!
use crate::aggregate::Aggregate;
use crate::context::Context;
use crate::domain_event::Event;
use crate::error::{DomainError, DomainResult};
use crate::eventing::EventBus;
use crate::persist::EventStore;
use crate::registry::AggregateRegistry;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait]
pub trait AggregateStore: Send + Sync {
    /// 加载聚合；不存在历史事件时返回版本为 0 的新聚合
    async fn load(
        &self,
        ctx: &Context,
        aggregate_type: &str,
        id: &str,
    ) -> DomainResult<Box<dyn Aggregate>>;

    /// 保存聚合的未提交事件
    async fn save(&self, ctx: &Context, aggregate: &mut dyn Aggregate) -> DomainResult<()>;
}

#[async_trait]
impl<T> AggregateStore for Arc<T>
where
    T: AggregateStore + ?Sized,
{
    async fn load(
        &self,
        ctx: &Context,
        aggregate_type: &str,
        id: &str,
    ) -> DomainResult<Box<dyn Aggregate>> {
        (**self).load(ctx, aggregate_type, id).await
    }

    async fn save(&self, ctx: &Context, aggregate: &mut dyn Aggregate) -> DomainResult<()> {
        (**self).save(ctx, aggregate).await
    }
}

/// 事件溯源的聚合存储实现
/// - 使用 `AggregateRegistry` 按类型名创建空聚合
/// - 使用 `EventStore` 读取/追加事件
/// - 使用 `EventBus` 发布已持久化的事件
pub struct EventSourcedAggregateStore<S, B> {
    registry: Arc<AggregateRegistry>,
    store: S,
    bus: B,
}

impl<S, B> EventSourcedAggregateStore<S, B>
where
    S: EventStore,
    B: EventBus,
{
    pub fn new(registry: Arc<AggregateRegistry>, store: S, bus: B) -> Self {
        Self {
            registry,
            store,
            bus,
        }
    }

    pub fn registry(&self) -> &AggregateRegistry {
        &self.registry
    }
}

fn replay(
    ctx: &Context,
    aggregate_type: &str,
    aggregate: &mut dyn Aggregate,
    events: &[Event],
) -> DomainResult<()> {
    for event in events {
        if event.aggregate_type() != aggregate_type {
            return Err(DomainError::MismatchedEventType {
                expected: aggregate_type.to_string(),
                found: event.aggregate_type().to_string(),
                event: event.to_string(),
            });
        }

        if event.version() < aggregate.version() {
            return Err(DomainError::EventOutOfOrder {
                aggregate_id: aggregate.id().to_string(),
                expected: aggregate.version(),
                found: event.version(),
            });
        }

        apply(ctx, aggregate, event)?;
        aggregate.base_mut().set_version(event.version() + 1);
    }

    Ok(())
}

fn apply(ctx: &Context, aggregate: &mut dyn Aggregate, event: &Event) -> DomainResult<()> {
    aggregate
        .apply_event(ctx, event)
        .map_err(|source| DomainError::ApplyEvent {
            event: Box::new(event.clone()),
            source: Box::new(source),
        })
}

#[async_trait]
impl<S, B> AggregateStore for EventSourcedAggregateStore<S, B>
where
    S: EventStore,
    B: EventBus,
{
    async fn load(
        &self,
        ctx: &Context,
        aggregate_type: &str,
        id: &str,
    ) -> DomainResult<Box<dyn Aggregate>> {
        let mut aggregate = self.registry.create(aggregate_type, id)?;

        let events = ctx.run(self.store.load(ctx, id)).await?;
        replay(ctx, aggregate_type, &mut *aggregate, &events)?;

        debug!(
            aggregate_type,
            aggregate_id = id,
            replayed = events.len(),
            version = aggregate.version(),
            "aggregate loaded"
        );

        Ok(aggregate)
    }

    async fn save(&self, ctx: &Context, aggregate: &mut dyn Aggregate) -> DomainResult<()> {
        if aggregate.uncommitted_events().is_empty() {
            return Ok(());
        }

        let events = aggregate.uncommitted_events().to_vec();

        // 1. 应用
        for event in &events {
            apply(ctx, aggregate, event)?;
        }

        // 2. 持久化
        let expected_version = aggregate.version();
        ctx.run(self.store.save(ctx, &events, expected_version)).await?;
        aggregate.base_mut().commit();

        debug!(
            aggregate_type = aggregate.aggregate_type(),
            aggregate_id = aggregate.id(),
            committed = events.len(),
            version = aggregate.version(),
            "events committed"
        );

        // 3. 发布
        if let Err(err) = ctx.run(self.bus.publish(ctx, &events)).await {
            warn!(
                aggregate_type = aggregate.aggregate_type(),
                aggregate_id = aggregate.id(),
                error = %err,
                "publishing committed events failed"
            );
            return Err(err);
        }

        Ok(())
    }
}
