//! 命令（Command）抽象
//!
//! 命令以 `Box<dyn Command>` 在命令处理器、中间件与命令总线之间流转：
//! - `aggregate_id` 指明目标聚合；
//! - `command_type` 用于路由与日志；
//! - `creates_aggregate` 声明命令可作用于尚无历史的聚合；
//! - 包装命令（如附带校验的命令）通过 `inner` 暴露被包装的命令，
//!   保证 `downcast_ref` 总能还原出具体命令类型。
//!
use crate::as_any::AsAny;
use crate::error::DomainResult;
use std::fmt;

pub trait Command: AsAny + fmt::Debug + Send + Sync + 'static {
    fn aggregate_id(&self) -> &str;

    fn command_type(&self) -> &str;

    /// 是否允许作用于新聚合（版本为 0 且无未提交事件）
    fn creates_aggregate(&self) -> bool {
        false
    }

    /// 附加的校验结果；`None` 表示命令未携带校验
    fn validate(&self) -> Option<DomainResult<()>> {
        None
    }

    /// 被包装的命令
    fn inner(&self) -> Option<&dyn Command> {
        None
    }
}

impl dyn Command {
    /// 还原为具体命令类型，会穿透包装命令
    pub fn downcast_ref<T: Command>(&self) -> Option<&T> {
        match self.as_any().downcast_ref::<T>() {
            Some(command) => Some(command),
            None => self.inner()?.downcast_ref::<T>(),
        }
    }

    /// 去掉所有包装后的命令
    pub fn innermost(&self) -> &dyn Command {
        match self.inner() {
            Some(inner) => inner.innermost(),
            None => self,
        }
    }
}
