//! 事件溯源 / CQRS 应用层（eventide-application）
//!
//! 把领域层构件编排为命令处理流程：
//! - `CommandHandler`：统一的命令处理接口；
//! - `AggregateCommandHandler`：加载聚合、执行命令、保存事件；
//! - `middleware`：按序包装处理器的中间件链与命令校验中间件；
//! - `CommandBus`：按命令类型路由；
//! - `saga`：对事件作出反应并派发后续命令。
//!
pub mod aggregate_command_handler;
pub mod command_bus;
pub mod command_handler;
pub mod error;
pub mod middleware;
pub mod saga;

pub use aggregate_command_handler::AggregateCommandHandler;
pub use command_bus::CommandBus;
pub use command_handler::CommandHandler;
pub use error::AppError;
