//! 事件子系统（eventing）
//!
//! 提供事件发布与消费的基础抽象：
//! - `EventBus`：聚合存储发布已持久化事件的出口；
//! - `EventHandler`：对总线投递的事件进行消费处理；
//! - `ProjectorEventHandler`：维护读模型，容忍读模型存储的最终一致延迟。
//!
//! 该模块仅定义协议与处理器，不绑定具体传输实现，可对接任意消息系统或内存实现。
//!
pub mod bus;
pub mod handler;
pub mod projector;

pub use bus::EventBus;
pub use handler::{EventHandler, HandledEventType};
pub use projector::{
    Projection, Projector, ProjectorConfig, ProjectorError, ProjectorEventHandler,
};
