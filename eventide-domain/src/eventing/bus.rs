//! 事件总线（EventBus）协议
//!
//! 聚合存储在事件持久化成功后，把同一批事件交给总线发布；
//! 具体传输（进程内、消息队列等）由上层实现。
//!
use crate::context::Context;
use crate::domain_event::Event;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 事件总线：负责分发已持久化的事件
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, ctx: &Context, events: &[Event]) -> DomainResult<()>;
}

#[async_trait]
impl<T> EventBus for Arc<T>
where
    T: EventBus + ?Sized,
{
    async fn publish(&self, ctx: &Context, events: &[Event]) -> DomainResult<()> {
        (**self).publish(ctx, events).await
    }
}
