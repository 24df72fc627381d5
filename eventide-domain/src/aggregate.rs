//! 聚合（Aggregate）抽象
//!
//! 聚合只能通过产生事件来改变自身：
//! - `handle_command` 校验命令并通过 `AggregateBase::append_event` 追加未提交事件（不改变状态）；
//! - `apply_event` 将事件投影到状态（改变状态），重放与保存时都会调用；
//! - 版本与未提交事件由内嵌的 `AggregateBase` 维护。
//!
//! 聚合以 `Box<dyn Aggregate>` 形式由注册表创建，需要具体类型时使用 `downcast_ref`/`downcast_mut`。
//!
use crate::as_any::AsAny;
use crate::command::Command;
use crate::context::Context;
use crate::domain_event::{Event, EventData};
use crate::error::DomainResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 聚合根接口
pub trait Aggregate: AsAny + Send + Sync + 'static {
    fn base(&self) -> &AggregateBase;

    fn base_mut(&mut self) -> &mut AggregateBase;

    /// 处理命令，产生的事件追加到未提交列表
    fn handle_command(&mut self, ctx: &Context, command: &dyn Command) -> DomainResult<()>;

    /// 应用事件，更新聚合状态
    fn apply_event(&mut self, ctx: &Context, event: &Event) -> DomainResult<()>;

    fn aggregate_type(&self) -> &str {
        self.base().aggregate_type()
    }

    fn id(&self) -> &str {
        self.base().id()
    }

    /// 已提交事件数，同时也是下一个事件的版本号
    fn version(&self) -> usize {
        self.base().version()
    }

    fn uncommitted_events(&self) -> &[Event] {
        self.base().uncommitted_events()
    }
}

impl dyn Aggregate {
    pub fn downcast_ref<T: Aggregate>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Aggregate>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// 聚合的公共状态：类型、标识、版本与未提交事件
#[derive(Debug, Clone)]
pub struct AggregateBase {
    aggregate_type: String,
    id: String,
    version: usize,
    uncommitted: Vec<Event>,
}

impl AggregateBase {
    pub fn new(aggregate_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            id: id.into(),
            version: 0,
            uncommitted: Vec::new(),
        }
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> usize {
        self.version
    }

    pub fn uncommitted_events(&self) -> &[Event] {
        &self.uncommitted
    }

    /// 追加一个未提交事件并返回它
    ///
    /// 事件版本 = 当前版本 + 已有未提交事件数；上下文中的业务语境复制到事件元数据。
    pub fn append_event(
        &mut self,
        ctx: &Context,
        event_type: impl Into<String>,
        data: Option<Arc<dyn EventData>>,
        timestamp: DateTime<Utc>,
    ) -> Event {
        let event = Event::for_aggregate(
            event_type,
            data,
            timestamp,
            self.aggregate_type.clone(),
            self.id.clone(),
            self.version + self.uncommitted.len(),
        )
        .with_metadata(ctx.business().clone());

        self.uncommitted.push(event.clone());
        event
    }

    /// 重放时由聚合存储设置
    pub fn set_version(&mut self, version: usize) {
        self.version = version;
    }

    /// 事件持久化成功后提交：版本前进，清空未提交列表
    pub fn commit(&mut self) {
        self.version += self.uncommitted.len();
        self.uncommitted.clear();
    }
}
