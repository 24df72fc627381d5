//! 持久化与事件溯源（persist）
//!
//! 定义领域层依赖的存储协议及其组合实现：
//! - 事件的乐观并发追加与按聚合读取（`EventStore`）；
//! - 读模型的读写与删除（`EntityRepository`）；
//! - 基于注册表、事件存储与事件总线的聚合存储（`EventSourcedAggregateStore`）。
//!
//! 该模块聚焦协议与装配逻辑，具体存储后端由上层提供实现并注入。
//!
mod aggregate_store;
mod entity_repository;
mod event_store;

pub use aggregate_store::{AggregateStore, EventSourcedAggregateStore};
pub use entity_repository::EntityRepository;
pub use event_store::EventStore;
