//! 事件溯源 / CQRS 领域层基础库（eventide-domain）
//!
//! 提供以事件溯源为中心的通用抽象与构件，用于在应用中实现：
//! - 聚合（`aggregate`）建模：命令钩子产生事件，应用钩子改变状态
//! - 不可变事件（`domain_event`）与随事件传播的业务语境
//! - 类型注册表（`registry`）：按类型名多态地创建聚合与事件载荷
//! - 事件存储、读模型仓储与三阶段保存的聚合存储（`persist`）
//! - 事件系统（`eventing`）：总线、处理器与带最终一致等待的投影处理器
//! - 贯穿所有调用的上下文（`context`）：命名空间、截止时间与取消
//!
//! 本 crate 与存储、传输实现解耦，仅定义领域层接口与最小必要的错误类型，
//! 以便在不同基础设施（例如 Postgres、消息中间件等）上进行适配实现。
//!
//! 典型用法：
//! 1. 定义聚合并实现 `Aggregate` 的 `handle_command/apply_event`，在 `AggregateRegistry` 中注册；
//! 2. 为 `EventStore`、`EventBus` 提供具体实现，组装 `EventSourcedAggregateStore`；
//! 3. 使用 `ProjectorEventHandler` 维护读模型，由传输层把事件投递给它。
//!
pub mod aggregate;
pub mod as_any;
pub mod command;
pub mod context;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod persist;
pub mod registry;

// 允许在本 crate 内部通过 ::eventide_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::eventide_domain 路径。
extern crate self as eventide_domain;
