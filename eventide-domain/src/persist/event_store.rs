//! 事件存储（EventStore）协议
//!
//! 事件溯源的权威记录。实现方需保证：
//! - `load` 按版本升序返回某个聚合的全部事件；
//! - `save` 以乐观并发追加：当存储中的当前版本不等于 `expected_version` 时
//!   拒绝写入（通常返回 `DomainError::VersionConflict`）。
//!
use crate::context::Context;
use crate::domain_event::Event;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// 追加一批事件；`expected_version` 为写入前聚合应处的版本
    async fn save(
        &self,
        ctx: &Context,
        events: &[Event],
        expected_version: usize,
    ) -> DomainResult<()>;

    /// 读取聚合的全部事件（版本升序）
    async fn load(&self, ctx: &Context, aggregate_id: &str) -> DomainResult<Vec<Event>>;
}

#[async_trait]
impl<T> EventStore for Arc<T>
where
    T: EventStore + ?Sized,
{
    async fn save(
        &self,
        ctx: &Context,
        events: &[Event],
        expected_version: usize,
    ) -> DomainResult<()> {
        (**self).save(ctx, events, expected_version).await
    }

    async fn load(&self, ctx: &Context, aggregate_id: &str) -> DomainResult<Vec<Event>> {
        (**self).load(ctx, aggregate_id).await
    }
}
