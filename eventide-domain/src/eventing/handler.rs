//! 事件处理器（EventHandler）
//!
//! 定义消费某类/多类/全部事件的处理逻辑与元信息（名称、订阅类型）。
//! 投影处理器与 Saga 处理器都实现该接口，便于传输层统一分发。
//!
use crate::context::Context;
use crate::domain_event::Event;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandledEventType {
    One(String),
    Many(Vec<String>),
    All,
}

impl HandledEventType {
    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            HandledEventType::One(t) => t == event_type,
            HandledEventType::Many(types) => types.iter().any(|t| t == event_type),
            HandledEventType::All => true,
        }
    }
}

/// 事件处理器：处理某一类型的事件
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于日志与审计）
    fn handler_name(&self) -> &str;

    /// 返回该处理器支持的事件类型
    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::All
    }

    /// 处理事件
    async fn handle(&self, ctx: &Context, event: &Event) -> anyhow::Result<()>;
}

#[async_trait]
impl<T> EventHandler for Arc<T>
where
    T: EventHandler + ?Sized,
{
    fn handler_name(&self) -> &str {
        (**self).handler_name()
    }

    fn handled_event_type(&self) -> HandledEventType {
        (**self).handled_event_type()
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> anyhow::Result<()> {
        (**self).handle(ctx, event).await
    }
}
