//! 投影处理器（ProjectorEventHandler）
//!
//! 把事件流左折叠为读模型实体：
//! - 加载事件所属聚合 ID 对应的实体，不存在时由工厂创建零值实体；
//! - 实体版本为已投影的事件数；若实体报告的版本小于 `event.version`
//!   （即尚未投影紧邻的前一个事件），按 `poll_interval` 轮询仓储，
//!   直到读模型追上或超过 `consistency_timeout`（读模型存储本身可能是最终一致的）；
//! - 调用 `Projector::project` 得到新实体或删除指令，并写回仓储。
//!
//! 所有失败都包装为携带命名空间的 `ProjectorError`；投影失败时不写入任何内容。
//!
use crate::context::Context;
use crate::domain_event::Event;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::eventing::{EventHandler, HandledEventType};
use crate::persist::EntityRepository;
use async_trait::async_trait;
use bon::Builder;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 投影结果
#[derive(Debug, Clone, PartialEq)]
pub enum Projection<E> {
    /// 保存更新后的实体
    Save(E),
    /// 删除事件所属聚合对应的实体
    Delete,
}

/// 投影函数
#[async_trait]
pub trait Projector: Send + Sync {
    type Entity: Entity + 'static;

    fn projector_type(&self) -> &str;

    async fn project(
        &self,
        ctx: &Context,
        event: &Event,
        entity: Self::Entity,
    ) -> DomainResult<Projection<Self::Entity>>;
}

/// 投影处理器配置
#[derive(Builder, Clone, Copy, Debug)]
pub struct ProjectorConfig {
    /// 等待读模型追上时的轮询间隔
    #[builder(default = Duration::from_millis(10))]
    pub poll_interval: Duration,
    /// 等待读模型追上的最长时间
    #[builder(default = Duration::from_secs(1))]
    pub consistency_timeout: Duration,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// 投影失败，携带发生错误时上下文中的命名空间
#[derive(Debug, Error)]
#[error("projector error in namespace {namespace}: {source}")]
pub struct ProjectorError {
    pub namespace: String,
    #[source]
    pub source: DomainError,
}

impl ProjectorError {
    pub fn is_consistency_timeout(&self) -> bool {
        matches!(self.source, DomainError::ConsistencyTimeout { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        self.source.is_cancellation()
    }
}

type EntityFactory<E> = Box<dyn Fn() -> E + Send + Sync>;

pub struct ProjectorEventHandler<P, R>
where
    P: Projector,
{
    projector: P,
    repository: R,
    factory: EntityFactory<P::Entity>,
    config: ProjectorConfig,
    handled_event_type: HandledEventType,
}

impl<P, R> ProjectorEventHandler<P, R>
where
    P: Projector,
    R: EntityRepository<P::Entity>,
{
    pub fn new<F>(projector: P, repository: R, factory: F) -> Self
    where
        F: Fn() -> P::Entity + Send + Sync + 'static,
    {
        Self {
            projector,
            repository,
            factory: Box::new(factory),
            config: ProjectorConfig::default(),
            handled_event_type: HandledEventType::All,
        }
    }

    pub fn with_config(mut self, config: ProjectorConfig) -> Self {
        self.config = config;
        self
    }

    /// 限定该处理器订阅的事件类型（默认全部）
    pub fn with_handled_event_type(mut self, handled: HandledEventType) -> Self {
        self.handled_event_type = handled;
        self
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// 投影一个事件
    pub async fn project_event(&self, ctx: &Context, event: &Event) -> Result<(), ProjectorError> {
        self.try_project(ctx, event)
            .await
            .map_err(|source| ProjectorError {
                namespace: ctx.namespace().to_string(),
                source,
            })
    }

    async fn try_project(&self, ctx: &Context, event: &Event) -> DomainResult<()> {
        let id = event.aggregate_id();

        let mut entity = match ctx.run(self.repository.load(ctx, id)).await {
            Ok(entity) => entity,
            Err(DomainError::EntityNotFound { .. }) => (self.factory)(),
            Err(err) => return Err(err),
        };

        // 版本 N 的事件要求读模型已投影事件 0..N
        let required = event.version();
        if entity.version().is_some_and(|version| version < required) {
            entity = self.wait_for_version(ctx, id, required, entity.version()).await?;
        }

        let projection = ctx.run(self.projector.project(ctx, event, entity)).await?;

        match projection {
            Projection::Save(entity) => ctx.run(self.repository.save(ctx, entity)).await,
            Projection::Delete => ctx.run(self.repository.delete(ctx, id)).await,
        }
    }

    async fn wait_for_version(
        &self,
        ctx: &Context,
        id: &str,
        required: usize,
        mut actual: Option<usize>,
    ) -> DomainResult<P::Entity> {
        let deadline = Instant::now() + self.config.consistency_timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(
                    projector = self.projector.projector_type(),
                    entity_id = id,
                    required,
                    actual = ?actual,
                    "read model did not catch up in time"
                );
                return Err(DomainError::ConsistencyTimeout {
                    id: id.to_string(),
                    required,
                    actual,
                });
            }

            debug!(
                projector = self.projector.projector_type(),
                entity_id = id,
                required,
                actual = ?actual,
                "waiting for read model"
            );
            ctx.sleep(self.config.poll_interval.min(remaining)).await?;

            match ctx.run(self.repository.load(ctx, id)).await {
                Ok(entity) => match entity.version() {
                    Some(version) if version < required => actual = Some(version),
                    _ => return Ok(entity),
                },
                Err(DomainError::EntityNotFound { .. }) => actual = None,
                Err(err) => return Err(err),
            }
        }
    }
}

#[async_trait]
impl<P, R> EventHandler for ProjectorEventHandler<P, R>
where
    P: Projector,
    R: EntityRepository<P::Entity>,
{
    fn handler_name(&self) -> &str {
        self.projector.projector_type()
    }

    fn handled_event_type(&self) -> HandledEventType {
        self.handled_event_type.clone()
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> anyhow::Result<()> {
        self.project_event(ctx, event).await?;
        Ok(())
    }
}
