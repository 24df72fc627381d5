//! 读模型仓储（EntityRepository）协议
//!
//! 投影处理器通过该接口读写读模型；实体不存在时 `load` 返回
//! `DomainError::EntityNotFound`，以便处理器从零值实体开始投影。
//!
use crate::context::Context;
use crate::entity::Entity;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EntityRepository<E>: Send + Sync
where
    E: Entity,
{
    async fn load(&self, ctx: &Context, id: &str) -> DomainResult<E>;

    async fn save(&self, ctx: &Context, entity: E) -> DomainResult<()>;

    async fn delete(&self, ctx: &Context, id: &str) -> DomainResult<()>;
}

#[async_trait]
impl<E, T> EntityRepository<E> for Arc<T>
where
    E: Entity + 'static,
    T: EntityRepository<E> + ?Sized,
{
    async fn load(&self, ctx: &Context, id: &str) -> DomainResult<E> {
        (**self).load(ctx, id).await
    }

    async fn save(&self, ctx: &Context, entity: E) -> DomainResult<()> {
        (**self).save(ctx, entity).await
    }

    async fn delete(&self, ctx: &Context, id: &str) -> DomainResult<()> {
        (**self).delete(ctx, id).await
    }
}
